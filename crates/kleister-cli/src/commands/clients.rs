use kleister_client::models::{ClientParams, ClientPatch};
use uuid::Uuid;

use crate::cli::ClientCommand;
use crate::client::{AppContext, CliError, CliResult};
use crate::commands::{present, print_created, print_deleted, print_updated};
use crate::output::emit;

const LIST_TEMPLATE: &str = "{{ id }}: {{ slug }} ({{ uuid }})";
const SHOW_TEMPLATE: &str = "ID: {{ id }}
Slug: {{ slug }}
Name: {{ name }}
UUID: {{ uuid }}
Created: {{ created_at }}
Updated: {{ updated_at }}";
const PACK_TEMPLATE: &str = "{{ pack_id }}: {{ pack.slug }}";

/// Launchers register with a UUID; reject anything else before sending it.
fn parse_uuid(raw: &str) -> CliResult<String> {
    Uuid::parse_str(raw.trim())
        .map(|uuid| uuid.hyphenated().to_string())
        .map_err(|err| CliError::validation(format!("invalid client UUID '{raw}': {err}")))
}

pub(crate) async fn handle(ctx: &AppContext, command: ClientCommand) -> CliResult<()> {
    match command {
        ClientCommand::List => {
            let renderer = ctx.output.renderer(LIST_TEMPLATE)?;
            let clients = ctx.api.list_clients().await?;
            emit(&renderer.many("client", &clients)?);
            Ok(())
        }
        ClientCommand::Show(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let client = ctx.api.get_client(&args.id).await?;
            emit(&renderer.one("client", &client)?);
            Ok(())
        }
        ClientCommand::Create(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let params = ClientParams {
                slug: present(args.slug),
                name: args.name,
                uuid: parse_uuid(&args.uuid)?,
            };
            let client = ctx.api.create_client(&params).await?;
            print_created(&renderer, "client", &client)
        }
        ClientCommand::Update(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let patch = ClientPatch {
                slug: args.slug,
                name: args.name,
                uuid: args.uuid.as_deref().map(parse_uuid).transpose()?,
            };
            let outcome = ctx.api.update_client(&args.id, &patch).await?;
            print_updated(&renderer, "client", outcome)
        }
        ClientCommand::Delete(args) => {
            ctx.api.delete_client(&args.id).await?;
            print_deleted();
            Ok(())
        }
        ClientCommand::Pack(command) => plain_links!(
            ctx, command,
            owner: "client",
            element: "client_pack",
            template: PACK_TEMPLATE,
            list: list_client_packs,
            append: append_client_pack,
            remove: remove_client_pack,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{ClientCreateArgs, PackPlainLinkArgs, PackPlainLinkCommand};
    use crate::commands::fixtures::context;
    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::json;

    #[test]
    fn uuids_are_normalised() {
        assert_eq!(
            parse_uuid(" 6F8B1D3E-0C5A-4E5B-9A3F-2B7C4D1E0F9A ").expect("valid"),
            "6f8b1d3e-0c5a-4e5b-9a3f-2b7c4d1e0f9a"
        );
        assert_eq!(parse_uuid("launcher").expect_err("invalid").exit_code(), 1);
    }

    #[tokio::test]
    async fn invalid_uuid_never_reaches_the_server() -> Result<()> {
        let server = MockServer::start_async().await;
        let create = server.mock(|when, then| {
            when.method(POST).path("/api/clients");
            then.status(200).json_body(json!({"id": 1}));
        });
        let ctx = context(&server)?;
        let args = ClientCreateArgs {
            slug: None,
            name: "Launcher".into(),
            uuid: "not-a-uuid".into(),
        };
        let err = handle(&ctx, ClientCommand::Create(args)).await.expect_err("bad uuid");
        assert_eq!(err.exit_code(), 1);
        create.assert_hits(0);
        Ok(())
    }

    #[tokio::test]
    async fn pack_append_posts_both_ends() -> Result<()> {
        let server = MockServer::start_async().await;
        let append = server.mock(|when, then| {
            when.method(POST)
                .path("/api/clients/launcher/packs")
                .json_body(json!({"client": "launcher", "pack": "tekkit"}));
            then.status(200).json_body(json!({"status": 200, "message": "ok"}));
        });
        let ctx = context(&server)?;
        let command = PackPlainLinkCommand::Append(PackPlainLinkArgs {
            id: "launcher".into(),
            member: "tekkit".into(),
        });
        handle(&ctx, ClientCommand::Pack(command)).await?;
        append.assert();
        Ok(())
    }
}
