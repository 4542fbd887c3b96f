use kleister_client::models::{KeyParams, KeyPatch};

use crate::cli::KeyCommand;
use crate::client::{AppContext, CliResult};
use crate::commands::{present, print_created, print_deleted, print_updated};
use crate::output::emit;

const LIST_TEMPLATE: &str = "{{ id }}: {{ slug }} ({{ name }})";
const SHOW_TEMPLATE: &str = "ID: {{ id }}
Slug: {{ slug }}
Name: {{ name }}
Value: {{ value }}
Created: {{ created_at }}
Updated: {{ updated_at }}";

pub(crate) async fn handle(ctx: &AppContext, command: KeyCommand) -> CliResult<()> {
    match command {
        KeyCommand::List => {
            let renderer = ctx.output.renderer(LIST_TEMPLATE)?;
            let keys = ctx.api.list_keys().await?;
            emit(&renderer.many("key", &keys)?);
        }
        KeyCommand::Show(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let key = ctx.api.get_key(&args.id).await?;
            emit(&renderer.one("key", &key)?);
        }
        KeyCommand::Create(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let params = KeyParams {
                name: args.name,
                value: present(args.value),
            };
            let key = ctx.api.create_key(&params).await?;
            print_created(&renderer, "key", &key)?;
        }
        KeyCommand::Update(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let patch = KeyPatch {
                name: args.name,
                value: args.value,
            };
            let outcome = ctx.api.update_key(&args.id, &patch).await?;
            print_updated(&renderer, "key", outcome)?;
        }
        KeyCommand::Delete(args) => {
            ctx.api.delete_key(&args.id).await?;
            print_deleted();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::KeyCreateArgs;
    use crate::commands::fixtures::context;
    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn create_lets_the_server_generate_the_secret() -> Result<()> {
        let server = MockServer::start_async().await;
        let create = server.mock(|when, then| {
            when.method(POST).path("/api/keys").json_body(json!({"name": "ci"}));
            then.status(200).json_body(json!({"id": 5, "slug": "ci", "name": "ci", "value": "generated"}));
        });
        let ctx = context(&server)?;
        let args = KeyCreateArgs {
            name: "ci".into(),
            value: Some(String::new()),
        };
        handle(&ctx, KeyCommand::Create(args)).await?;
        create.assert();
        Ok(())
    }

    #[tokio::test]
    async fn server_errors_exit_with_failure() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/keys");
            then.status(500).json_body(json!({"status": 500, "message": "database offline"}));
        });
        let ctx = context(&server)?;
        let err = handle(&ctx, KeyCommand::List).await.expect_err("server error");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.display_message(), "database offline (status 500)");
        Ok(())
    }
}
