use kleister_client::models::{ModParams, ModPatch};

use crate::cli::ModCommand;
use crate::client::{AppContext, CliResult};
use crate::commands::{present, print_created, print_deleted, print_updated};
use crate::output::emit;

const LIST_TEMPLATE: &str = "{{ id }}: {{ slug }} ({{ name }})";
const SHOW_TEMPLATE: &str = "ID: {{ id }}
Slug: {{ slug }}
Name: {{ name }}
Description: {{ description }}
Author: {{ author }}
Website: {{ website }}
Donate: {{ donate }}
Created: {{ created_at }}
Updated: {{ updated_at }}";
const USER_TEMPLATE: &str = "{{ user_id }}: {{ user.slug }} ({{ perm }})";
const TEAM_TEMPLATE: &str = "{{ team_id }}: {{ team.slug }} ({{ perm }})";

pub(crate) async fn handle(ctx: &AppContext, command: ModCommand) -> CliResult<()> {
    match command {
        ModCommand::List => {
            let renderer = ctx.output.renderer(LIST_TEMPLATE)?;
            let mods = ctx.api.list_mods().await?;
            emit(&renderer.many("mod", &mods)?);
            Ok(())
        }
        ModCommand::Show(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let module = ctx.api.get_mod(&args.id).await?;
            emit(&renderer.one("mod", &module)?);
            Ok(())
        }
        ModCommand::Create(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let params = ModParams {
                slug: present(args.slug),
                name: args.name,
                description: present(args.description),
                author: present(args.author),
                website: present(args.website),
                donate: present(args.donate),
            };
            let module = ctx.api.create_mod(&params).await?;
            print_created(&renderer, "mod", &module)
        }
        ModCommand::Update(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let patch = ModPatch {
                slug: args.slug,
                name: args.name,
                description: args.description,
                author: args.author,
                website: args.website,
                donate: args.donate,
            };
            let outcome = ctx.api.update_mod(&args.id, &patch).await?;
            print_updated(&renderer, "mod", outcome)
        }
        ModCommand::Delete(args) => {
            ctx.api.delete_mod(&args.id).await?;
            print_deleted();
            Ok(())
        }
        ModCommand::User(command) => permissioned_links!(
            ctx, command,
            owner: "mod",
            element: "mod_user",
            template: USER_TEMPLATE,
            list: list_mod_users,
            append: append_mod_user,
            update: update_mod_user,
            remove: remove_mod_user,
        ),
        ModCommand::Team(command) => permissioned_links!(
            ctx, command,
            owner: "mod",
            element: "mod_team",
            template: TEAM_TEMPLATE,
            list: list_mod_teams,
            append: append_mod_team,
            update: update_mod_team,
            remove: remove_mod_team,
        ),
    }
}
