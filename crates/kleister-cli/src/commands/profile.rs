use kleister_client::models::ProfilePatch;

use crate::cli::{ProfileCommand, TokenArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::commands::{present, print_updated};
use crate::output::emit;

const SHOW_TEMPLATE: &str = "ID: {{ id }}
Slug: {{ slug }}
Username: {{ username }}
Email: {{ email }}
Active: {{ active }}
Admin: {{ admin }}
Created: {{ created_at }}
Updated: {{ updated_at }}";
const TOKEN_TEMPLATE: &str = "{{ token }}";

pub(crate) async fn handle(ctx: &AppContext, command: ProfileCommand) -> CliResult<()> {
    match command {
        ProfileCommand::Show => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let profile = ctx.api.profile().await?;
            emit(&renderer.one("profile", &profile)?);
        }
        ProfileCommand::Update(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let patch = ProfilePatch {
                slug: args.slug,
                username: args.username,
                email: args.email,
                password: present(args.password),
            };
            let outcome = ctx.api.update_profile(&patch).await?;
            print_updated(&renderer, "profile", outcome)?;
        }
        ProfileCommand::Token(args) => {
            let renderer = ctx.output.renderer(TOKEN_TEMPLATE)?;
            let token = match ctx.api.current_token().await? {
                Some(token) => token,
                None => {
                    let (username, password) = credentials(&args)?;
                    let session = ctx.api.login(username, password).await?;
                    ctx.api.with_token(session.token).token().await?
                }
            };
            emit(&renderer.one("token", &token)?);
        }
    }
    Ok(())
}

fn credentials(args: &TokenArgs) -> CliResult<(&str, &str)> {
    let username = args
        .username
        .as_deref()
        .filter(|username| !username.trim().is_empty())
        .ok_or_else(|| CliError::validation("missing --username, no valid token is configured"))?;
    let password = args
        .password
        .as_deref()
        .filter(|password| !password.is_empty())
        .ok_or_else(|| CliError::validation("missing --password, no valid token is configured"))?;
    Ok((username, password))
}
