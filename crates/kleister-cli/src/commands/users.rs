use kleister_client::models::{UserParams, UserPatch};

use crate::cli::UserCommand;
use crate::client::{AppContext, CliResult};
use crate::commands::{present, print_created, print_deleted, print_updated};
use crate::output::emit;

const LIST_TEMPLATE: &str = "{{ id }}: {{ slug }} ({{ username }})";
const SHOW_TEMPLATE: &str = "ID: {{ id }}
Slug: {{ slug }}
Username: {{ username }}
Email: {{ email }}
Active: {{ active }}
Admin: {{ admin }}
Created: {{ created_at }}
Updated: {{ updated_at }}";
const TEAM_TEMPLATE: &str = "{{ team_id }}: {{ team.slug }} ({{ perm }})";
const MOD_TEMPLATE: &str = "{{ mod_id }}: {{ mod.slug }} ({{ perm }})";
const PACK_TEMPLATE: &str = "{{ pack_id }}: {{ pack.slug }} ({{ perm }})";

pub(crate) async fn handle(ctx: &AppContext, command: UserCommand) -> CliResult<()> {
    match command {
        UserCommand::List => {
            let renderer = ctx.output.renderer(LIST_TEMPLATE)?;
            let users = ctx.api.list_users().await?;
            emit(&renderer.many("user", &users)?);
            Ok(())
        }
        UserCommand::Show(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let user = ctx.api.get_user(&args.id).await?;
            emit(&renderer.one("user", &user)?);
            Ok(())
        }
        UserCommand::Create(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let params = UserParams {
                slug: present(args.slug),
                username: args.username,
                email: args.email,
                password: args.password,
                active: args.account.active()?.unwrap_or_default(),
                admin: args.account.admin()?.unwrap_or_default(),
            };
            let user = ctx.api.create_user(&params).await?;
            print_created(&renderer, "user", &user)
        }
        UserCommand::Update(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let patch = UserPatch {
                slug: args.slug,
                username: args.username,
                email: args.email,
                password: present(args.password),
                active: args.account.active()?,
                admin: args.account.admin()?,
            };
            let outcome = ctx.api.update_user(&args.id, &patch).await?;
            print_updated(&renderer, "user", outcome)
        }
        UserCommand::Delete(args) => {
            ctx.api.delete_user(&args.id).await?;
            print_deleted();
            Ok(())
        }
        UserCommand::Team(command) => permissioned_links!(
            ctx, command,
            owner: "user",
            element: "user_team",
            template: TEAM_TEMPLATE,
            list: list_user_teams,
            append: append_user_team,
            update: update_user_team,
            remove: remove_user_team,
        ),
        UserCommand::Mod(command) => permissioned_links!(
            ctx, command,
            owner: "user",
            element: "user_mod",
            template: MOD_TEMPLATE,
            list: list_user_mods,
            append: append_user_mod,
            update: update_user_mod,
            remove: remove_user_mod,
        ),
        UserCommand::Pack(command) => permissioned_links!(
            ctx, command,
            owner: "user",
            element: "user_pack",
            template: PACK_TEMPLATE,
            list: list_user_packs,
            append: append_user_pack,
            update: update_user_pack,
            remove: remove_user_pack,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{AccountFlags, PackLinkArgs, PackLinkCommand, UserCreateArgs, UserUpdateArgs};
    use crate::commands::fixtures::context;
    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn create_posts_account_flags() -> Result<()> {
        let server = MockServer::start_async().await;
        let create = server.mock(|when, then| {
            when.method(POST).path("/api/users").json_body(json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "secret",
                "active": true,
                "admin": false
            }));
            then.status(200).json_body(json!({
                "id": 3, "slug": "alice", "username": "alice", "email": "alice@example.com", "active": true
            }));
        });
        let ctx = context(&server)?;
        let args = UserCreateArgs {
            slug: None,
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "secret".into(),
            account: AccountFlags {
                active: true,
                ..AccountFlags::default()
            },
        };
        handle(&ctx, UserCommand::Create(args)).await?;
        create.assert();
        Ok(())
    }

    #[tokio::test]
    async fn password_change_is_always_sent() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/users/alice");
            then.status(200).json_body(json!({"id": 3, "slug": "alice", "username": "alice", "email": "a@x"}));
        });
        let patch = server.mock(|when, then| {
            when.method(PATCH)
                .path("/api/users/alice")
                .json_body(json!({"password": "rotated"}));
            then.status(200).json_body(json!({"id": 3, "slug": "alice", "username": "alice", "email": "a@x"}));
        });
        let ctx = context(&server)?;
        let args = UserUpdateArgs {
            id: "alice".into(),
            slug: None,
            username: Some("alice".into()),
            email: None,
            password: Some("rotated".into()),
            account: AccountFlags::default(),
        };
        handle(&ctx, UserCommand::Update(args)).await?;
        patch.assert();
        Ok(())
    }

    #[tokio::test]
    async fn pack_perm_puts_new_grade() -> Result<()> {
        let server = MockServer::start_async().await;
        let put = server.mock(|when, then| {
            when.method(PUT)
                .path("/api/users/alice/packs")
                .json_body(json!({"user": "alice", "pack": "tekkit", "perm": "admin"}));
            then.status(200).json_body(json!({"status": 200, "message": "ok"}));
        });
        let ctx = context(&server)?;
        let command = PackLinkCommand::Perm(PackLinkArgs {
            id: "alice".into(),
            member: "tekkit".into(),
            perm: Some("admin".into()),
        });
        handle(&ctx, UserCommand::Pack(command)).await?;
        put.assert();
        Ok(())
    }
}
