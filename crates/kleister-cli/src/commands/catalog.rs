//! `minecraft` and `forge` share one command shape over different catalogs.

use kleister_client::{CatalogQuery, Select};

use crate::cli::{CatalogBuildCommand, CatalogCommand, CatalogListArgs};
use crate::client::{AppContext, CliResult};
use crate::output::{emit, notice};

const MINECRAFT_TEMPLATE: &str = "{{ id }}: {{ version }} ({{ type }})";
const FORGE_TEMPLATE: &str = "{{ id }}: {{ version }} (minecraft {{ minecraft }})";
const BUILD_TEMPLATE: &str = "{{ id }}: {{ pack.slug }}/{{ slug }}";

fn query(args: CatalogListArgs) -> CliResult<CatalogQuery> {
    Ok(CatalogQuery {
        filter: args.filter,
        sort: args.sort,
        select: Select::from_flags(args.first, args.last)?,
    })
}

pub(crate) async fn handle_minecraft(ctx: &AppContext, command: CatalogCommand) -> CliResult<()> {
    match command {
        CatalogCommand::List(args) => {
            let renderer = ctx.output.renderer(MINECRAFT_TEMPLATE)?;
            let rows = ctx.api.list_minecraft(&query(args)?).await?;
            emit(&renderer.many("minecraft", &rows)?);
        }
        CatalogCommand::Refresh => {
            ctx.api.refresh_minecraft().await?;
            notice("Successfully requested a refresh, the listing updates once the server finishes");
        }
        CatalogCommand::Build(CatalogBuildCommand::List(args)) => {
            let renderer = ctx.output.renderer(BUILD_TEMPLATE)?;
            let builds = ctx.api.list_minecraft_builds(&args.id).await?;
            emit(&renderer.many("build", &builds)?);
        }
        CatalogCommand::Build(CatalogBuildCommand::Append(args)) => {
            ctx.api.append_minecraft_build(&args.id, &args.pack, &args.build).await?;
            notice("Successfully appended to minecraft");
        }
        CatalogCommand::Build(CatalogBuildCommand::Remove(args)) => {
            ctx.api.remove_minecraft_build(&args.id, &args.pack, &args.build).await?;
            notice("Successfully removed from minecraft");
        }
    }
    Ok(())
}

pub(crate) async fn handle_forge(ctx: &AppContext, command: CatalogCommand) -> CliResult<()> {
    match command {
        CatalogCommand::List(args) => {
            let renderer = ctx.output.renderer(FORGE_TEMPLATE)?;
            let rows = ctx.api.list_forge(&query(args)?).await?;
            emit(&renderer.many("forge", &rows)?);
        }
        CatalogCommand::Refresh => {
            ctx.api.refresh_forge().await?;
            notice("Successfully requested a refresh, the listing updates once the server finishes");
        }
        CatalogCommand::Build(CatalogBuildCommand::List(args)) => {
            let renderer = ctx.output.renderer(BUILD_TEMPLATE)?;
            let builds = ctx.api.list_forge_builds(&args.id).await?;
            emit(&renderer.many("build", &builds)?);
        }
        CatalogCommand::Build(CatalogBuildCommand::Append(args)) => {
            ctx.api.append_forge_build(&args.id, &args.pack, &args.build).await?;
            notice("Successfully appended to forge");
        }
        CatalogCommand::Build(CatalogBuildCommand::Remove(args)) => {
            ctx.api.remove_forge_build(&args.id, &args.pack, &args.build).await?;
            notice("Successfully removed from forge");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CatalogBuildArgs;
    use crate::commands::fixtures::context;
    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn invalid_filter_fails_before_listing() -> Result<()> {
        let server = MockServer::start_async().await;
        let list = server.mock(|when, then| {
            when.method(GET).path("/api/forge");
            then.status(200).json_body(json!([]));
        });
        let ctx = context(&server)?;
        let args = CatalogListArgs {
            filter: Some("flavour == 'vanilla'".into()),
            ..CatalogListArgs::default()
        };
        let err = handle_forge(&ctx, CatalogCommand::List(args)).await.expect_err("unknown field");
        assert_eq!(err.exit_code(), 1);
        list.assert_hits(0);
        Ok(())
    }

    #[tokio::test]
    async fn first_and_last_conflict() -> Result<()> {
        let server = MockServer::start_async().await;
        let ctx = context(&server)?;
        let args = CatalogListArgs {
            first: true,
            last: true,
            ..CatalogListArgs::default()
        };
        let err = handle_minecraft(&ctx, CatalogCommand::List(args)).await.expect_err("conflict");
        assert_eq!(err.exit_code(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn refresh_patches_the_catalog() -> Result<()> {
        let server = MockServer::start_async().await;
        let refresh = server.mock(|when, then| {
            when.method(PATCH).path("/api/minecraft");
            then.status(200).json_body(json!({"status": 200, "message": "refresh started"}));
        });
        let ctx = context(&server)?;
        handle_minecraft(&ctx, CatalogCommand::Refresh).await?;
        refresh.assert();
        Ok(())
    }

    #[tokio::test]
    async fn forge_build_pin_posts_link_body() -> Result<()> {
        let server = MockServer::start_async().await;
        let append = server.mock(|when, then| {
            when.method(POST)
                .path("/api/forge/14-23-5-2847/builds")
                .json_body(json!({"forge": "14-23-5-2847", "pack": "tekkit", "build": "stable"}));
            then.status(200).json_body(json!({"status": 200, "message": "ok"}));
        });
        let ctx = context(&server)?;
        let args = CatalogBuildArgs {
            id: "14-23-5-2847".into(),
            pack: "tekkit".into(),
            build: "stable".into(),
        };
        handle_forge(&ctx, CatalogCommand::Build(CatalogBuildCommand::Append(args))).await?;
        append.assert();
        Ok(())
    }
}
