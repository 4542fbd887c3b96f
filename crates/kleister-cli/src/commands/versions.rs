use kleister_client::models::VersionPatch;
use kleister_client::{AssetSource, VersionDraft};

use crate::cli::{VersionBuildCommand, VersionCommand};
use crate::client::{AppContext, CliResult};
use crate::commands::{present, print_created, print_deleted, print_updated};
use crate::output::{emit, notice};

const LIST_TEMPLATE: &str = "{{ id }}: {{ slug }} ({{ name }})";
const SHOW_TEMPLATE: &str = "ID: {{ id }}
Mod: {{ mod.slug }}
Slug: {{ slug }}
Name: {{ name }}
File: {{ file.url }}
MD5: {{ file.md5 }}
Created: {{ created_at }}
Updated: {{ updated_at }}";
const BUILD_TEMPLATE: &str = "{{ build.pack.slug }}: {{ build.slug }}";

pub(crate) async fn handle(ctx: &AppContext, command: VersionCommand) -> CliResult<()> {
    match command {
        VersionCommand::List(args) => {
            let renderer = ctx.output.renderer(LIST_TEMPLATE)?;
            let versions = ctx.api.list_versions(&args.module).await?;
            emit(&renderer.many("version", &versions)?);
        }
        VersionCommand::Show(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let version = ctx.api.get_version(&args.module, &args.id).await?;
            emit(&renderer.one("version", &version)?);
        }
        VersionCommand::Create(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let source = AssetSource::from_flags("file", args.file_url.as_deref(), args.file_path.as_deref())?;
            let draft = VersionDraft {
                slug: present(args.slug),
                name: args.name,
                file: ctx.api.encode_asset(source.as_ref()).await?,
            };
            let version = ctx.api.create_version(&args.module, &draft).await?;
            print_created(&renderer, "version", &version)?;
        }
        VersionCommand::Update(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let source = AssetSource::from_flags("file", args.file_url.as_deref(), args.file_path.as_deref())?;
            let patch = VersionPatch {
                slug: args.slug,
                name: args.name,
                file: ctx.api.encode_asset(source.as_ref()).await?,
            };
            let outcome = ctx.api.update_version(&args.module, &args.id, &patch).await?;
            print_updated(&renderer, "version", outcome)?;
        }
        VersionCommand::Delete(args) => {
            ctx.api.delete_version(&args.module, &args.id).await?;
            print_deleted();
        }
        VersionCommand::Build(VersionBuildCommand::List(args)) => {
            let renderer = ctx.output.renderer(BUILD_TEMPLATE)?;
            let rows = ctx.api.list_version_builds(&args.module, &args.id).await?;
            emit(&renderer.many("build_version", &rows)?);
        }
        VersionCommand::Build(VersionBuildCommand::Append(args)) => {
            ctx.api
                .append_version_build(&args.module, &args.id, &args.pack, &args.build)
                .await?;
            notice("Successfully appended to version");
        }
        VersionCommand::Build(VersionBuildCommand::Remove(args)) => {
            ctx.api
                .remove_version_build(&args.module, &args.id, &args.pack, &args.build)
                .await?;
            notice("Successfully removed from version");
        }
    }
    Ok(())
}
