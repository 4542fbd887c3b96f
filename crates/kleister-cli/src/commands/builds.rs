use kleister_client::{BuildChanges, BuildDraft};

use crate::cli::{BuildCommand, BuildVersionCommand};
use crate::client::{AppContext, CliResult};
use crate::commands::{present, print_created, print_deleted, print_updated};
use crate::output::{emit, notice};

const LIST_TEMPLATE: &str = "{{ id }}: {{ slug }} ({{ name }})";
const SHOW_TEMPLATE: &str = "ID: {{ id }}
Pack: {{ pack.slug }}
Slug: {{ slug }}
Name: {{ name }}
Minecraft: {{ minecraft.version }}
Forge: {{ forge.version }}
Java: {{ min_java }}
Memory: {{ min_memory }}
Published: {{ published }}
Private: {{ private }}
Created: {{ created_at }}
Updated: {{ updated_at }}";
const VERSION_TEMPLATE: &str = "{{ version.mod.slug }}: {{ version.slug }}";

pub(crate) async fn handle(ctx: &AppContext, command: BuildCommand) -> CliResult<()> {
    match command {
        BuildCommand::List(args) => {
            let renderer = ctx.output.renderer(LIST_TEMPLATE)?;
            let builds = ctx.api.list_builds(&args.pack).await?;
            emit(&renderer.many("build", &builds)?);
        }
        BuildCommand::Show(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let build = ctx.api.get_build(&args.pack, &args.id).await?;
            emit(&renderer.one("build", &build)?);
        }
        BuildCommand::Create(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let draft = BuildDraft {
                slug: present(args.slug),
                name: args.name,
                minecraft: present(args.minecraft),
                forge: present(args.forge),
                min_java: present(args.min_java),
                min_memory: present(args.min_memory),
                published: args.visibility.published()?.unwrap_or_default(),
                private: args.visibility.private()?.unwrap_or_default(),
            };
            let build = ctx.api.create_build(&args.pack, &draft).await?;
            print_created(&renderer, "build", &build)?;
        }
        BuildCommand::Update(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let changes = BuildChanges {
                slug: args.slug,
                name: args.name,
                minecraft: args.minecraft,
                forge: args.forge,
                min_java: args.min_java,
                min_memory: args.min_memory,
                published: args.visibility.published()?,
                private: args.visibility.private()?,
            };
            let outcome = ctx.api.update_build(&args.pack, &args.id, &changes).await?;
            print_updated(&renderer, "build", outcome)?;
        }
        BuildCommand::Delete(args) => {
            ctx.api.delete_build(&args.pack, &args.id).await?;
            print_deleted();
        }
        BuildCommand::Version(BuildVersionCommand::List(args)) => {
            let renderer = ctx.output.renderer(VERSION_TEMPLATE)?;
            let rows = ctx.api.list_build_versions(&args.pack, &args.id).await?;
            emit(&renderer.many("build_version", &rows)?);
        }
        BuildCommand::Version(BuildVersionCommand::Append(args)) => {
            ctx.api
                .append_build_version(&args.pack, &args.id, &args.module, &args.version)
                .await?;
            notice("Successfully appended to build");
        }
        BuildCommand::Version(BuildVersionCommand::Remove(args)) => {
            ctx.api
                .remove_build_version(&args.pack, &args.id, &args.module, &args.version)
                .await?;
            notice("Successfully removed from build");
        }
    }
    Ok(())
}
