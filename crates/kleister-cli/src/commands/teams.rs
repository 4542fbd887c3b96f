use kleister_client::models::{TeamParams, TeamPatch};

use crate::cli::TeamCommand;
use crate::client::{AppContext, CliResult};
use crate::commands::{present, print_created, print_deleted, print_updated};
use crate::output::emit;

const LIST_TEMPLATE: &str = "{{ id }}: {{ slug }} ({{ name }})";
const SHOW_TEMPLATE: &str = "ID: {{ id }}
Slug: {{ slug }}
Name: {{ name }}
Created: {{ created_at }}
Updated: {{ updated_at }}";
const USER_TEMPLATE: &str = "{{ user_id }}: {{ user.slug }} ({{ perm }})";
const MOD_TEMPLATE: &str = "{{ mod_id }}: {{ mod.slug }} ({{ perm }})";
const PACK_TEMPLATE: &str = "{{ pack_id }}: {{ pack.slug }} ({{ perm }})";

pub(crate) async fn handle(ctx: &AppContext, command: TeamCommand) -> CliResult<()> {
    match command {
        TeamCommand::List => {
            let renderer = ctx.output.renderer(LIST_TEMPLATE)?;
            let teams = ctx.api.list_teams().await?;
            emit(&renderer.many("team", &teams)?);
            Ok(())
        }
        TeamCommand::Show(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let team = ctx.api.get_team(&args.id).await?;
            emit(&renderer.one("team", &team)?);
            Ok(())
        }
        TeamCommand::Create(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let params = TeamParams {
                slug: present(args.slug),
                name: args.name,
            };
            let team = ctx.api.create_team(&params).await?;
            print_created(&renderer, "team", &team)
        }
        TeamCommand::Update(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let patch = TeamPatch {
                slug: args.slug,
                name: args.name,
            };
            let outcome = ctx.api.update_team(&args.id, &patch).await?;
            print_updated(&renderer, "team", outcome)
        }
        TeamCommand::Delete(args) => {
            ctx.api.delete_team(&args.id).await?;
            print_deleted();
            Ok(())
        }
        TeamCommand::User(command) => permissioned_links!(
            ctx, command,
            owner: "team",
            element: "team_user",
            template: USER_TEMPLATE,
            list: list_team_users,
            append: append_team_user,
            update: update_team_user,
            remove: remove_team_user,
        ),
        TeamCommand::Mod(command) => permissioned_links!(
            ctx, command,
            owner: "team",
            element: "team_mod",
            template: MOD_TEMPLATE,
            list: list_team_mods,
            append: append_team_mod,
            update: update_team_mod,
            remove: remove_team_mod,
        ),
        TeamCommand::Pack(command) => permissioned_links!(
            ctx, command,
            owner: "team",
            element: "team_pack",
            template: PACK_TEMPLATE,
            list: list_team_packs,
            append: append_team_pack,
            update: update_team_pack,
            remove: remove_team_pack,
        ),
    }
}
