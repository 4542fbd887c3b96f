use kleister_client::models::PackParams;
use kleister_client::{AssetSource, Kleister, PackChanges};

use crate::cli::{PackArtwork, PackCommand};
use crate::client::{AppContext, CliResult};
use crate::commands::{present, print_created, print_deleted, print_updated};
use crate::output::emit;

const LIST_TEMPLATE: &str = "{{ id }}: {{ slug }} ({{ name }})";
const SHOW_TEMPLATE: &str = "ID: {{ id }}
Slug: {{ slug }}
Name: {{ name }}
Website: {{ website }}
Icon: {{ icon.url }}
Logo: {{ logo.url }}
Background: {{ background.url }}
Recommended: {{ recommended.slug }}
Latest: {{ latest.slug }}
Published: {{ published }}
Private: {{ private }}
Created: {{ created_at }}
Updated: {{ updated_at }}";
const CLIENT_TEMPLATE: &str = "{{ client_id }}: {{ client.slug }}";
const USER_TEMPLATE: &str = "{{ user_id }}: {{ user.slug }} ({{ perm }})";
const TEAM_TEMPLATE: &str = "{{ team_id }}: {{ team.slug }} ({{ perm }})";

pub(crate) async fn handle(ctx: &AppContext, command: PackCommand) -> CliResult<()> {
    match command {
        PackCommand::List => {
            let renderer = ctx.output.renderer(LIST_TEMPLATE)?;
            let packs = ctx.api.list_packs().await?;
            emit(&renderer.many("pack", &packs)?);
            Ok(())
        }
        PackCommand::Show(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let pack = ctx.api.get_pack(&args.id).await?;
            emit(&renderer.one("pack", &pack)?);
            Ok(())
        }
        PackCommand::Create(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let published = args.visibility.published()?.unwrap_or_default();
            let private = args.visibility.private()?.unwrap_or_default();
            let sources = ArtworkSources::from_args(&args.artwork)?;

            let (icon, logo, background) = sources.encode(&ctx.api).await?;
            let params = PackParams {
                slug: present(args.slug),
                name: args.name,
                website: present(args.website),
                icon,
                logo,
                background,
                published,
                private,
            };
            let pack = ctx.api.create_pack(&params).await?;
            print_created(&renderer, "pack", &pack)
        }
        PackCommand::Update(args) => {
            let renderer = ctx.output.renderer(SHOW_TEMPLATE)?;
            let published = args.visibility.published()?;
            let private = args.visibility.private()?;
            let sources = ArtworkSources::from_args(&args.artwork)?;

            let (icon, logo, background) = sources.encode(&ctx.api).await?;
            let changes = PackChanges {
                slug: args.slug,
                name: args.name,
                website: args.website,
                icon,
                logo,
                background,
                recommended: args.recommended,
                latest: args.latest,
                published,
                private,
            };
            let outcome = ctx.api.update_pack(&args.id, &changes).await?;
            print_updated(&renderer, "pack", outcome)
        }
        PackCommand::Delete(args) => {
            ctx.api.delete_pack(&args.id).await?;
            print_deleted();
            Ok(())
        }
        PackCommand::Client(command) => plain_links!(
            ctx, command,
            owner: "pack",
            element: "pack_client",
            template: CLIENT_TEMPLATE,
            list: list_pack_clients,
            append: append_pack_client,
            remove: remove_pack_client,
        ),
        PackCommand::User(command) => permissioned_links!(
            ctx, command,
            owner: "pack",
            element: "pack_user",
            template: USER_TEMPLATE,
            list: list_pack_users,
            append: append_pack_user,
            update: update_pack_user,
            remove: remove_pack_user,
        ),
        PackCommand::Team(command) => permissioned_links!(
            ctx, command,
            owner: "pack",
            element: "pack_team",
            template: TEAM_TEMPLATE,
            list: list_pack_teams,
            append: append_pack_team,
            update: update_pack_team,
            remove: remove_pack_team,
        ),
    }
}

/// Artwork flags validated up front, encoded only once every other flag
/// has been checked.
struct ArtworkSources {
    icon: Option<AssetSource>,
    logo: Option<AssetSource>,
    background: Option<AssetSource>,
}

type EncodedArtwork = (
    Option<kleister_client::models::Attachment>,
    Option<kleister_client::models::Attachment>,
    Option<kleister_client::models::Attachment>,
);

impl ArtworkSources {
    fn from_args(args: &PackArtwork) -> CliResult<Self> {
        Ok(Self {
            icon: AssetSource::from_flags("icon", args.icon_url.as_deref(), args.icon_path.as_deref())?,
            logo: AssetSource::from_flags("logo", args.logo_url.as_deref(), args.logo_path.as_deref())?,
            background: AssetSource::from_flags("bg", args.bg_url.as_deref(), args.bg_path.as_deref())?,
        })
    }

    async fn encode(&self, api: &Kleister) -> CliResult<EncodedArtwork> {
        Ok((
            api.encode_asset(self.icon.as_ref()).await?,
            api.encode_asset(self.logo.as_ref()).await?,
            api.encode_asset(self.background.as_ref()).await?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{IdArgs, PackCreateArgs, PackUpdateArgs, TeamLinkArgs, TeamLinkCommand, Visibility};
    use crate::commands::fixtures::context;
    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::json;

    fn tekkit() -> serde_json::Value {
        json!({"id": 7, "slug": "tekkit", "name": "Tekkit", "published": true, "private": false})
    }

    #[tokio::test]
    async fn create_sends_flags_and_artwork() -> Result<()> {
        let server = MockServer::start_async().await;
        let icon = tempfile::NamedTempFile::new()?;
        std::fs::write(icon.path(), b"\x89PNG\r\n\x1a\nrest")?;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/packs")
                .json_body(json!({
                    "slug": "tekkit",
                    "name": "Tekkit",
                    "icon": {"upload": "data:image/png;base64,iVBORw0KGgpyZXN0"},
                    "published": true,
                    "private": false
                }));
            then.status(200).json_body(tekkit());
        });

        let ctx = context(&server)?;
        let args = PackCreateArgs {
            slug: Some("tekkit".into()),
            name: "Tekkit".into(),
            website: None,
            artwork: PackArtwork {
                icon_path: Some(icon.path().to_path_buf()),
                ..PackArtwork::default()
            },
            visibility: Visibility {
                published: true,
                ..Visibility::default()
            },
        };
        handle(&ctx, PackCommand::Create(args)).await?;
        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn conflicting_visibility_fails_before_requests() -> Result<()> {
        let server = MockServer::start_async().await;
        let ctx = context(&server)?;
        let args = PackUpdateArgs {
            id: "tekkit".into(),
            slug: None,
            name: None,
            website: None,
            recommended: None,
            latest: None,
            artwork: PackArtwork::default(),
            visibility: Visibility {
                private: true,
                public: true,
                ..Visibility::default()
            },
        };
        let err = handle(&ctx, PackCommand::Update(args))
            .await
            .expect_err("conflicting flags");
        assert_eq!(err.exit_code(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_without_changes_skips_patch() -> Result<()> {
        let server = MockServer::start_async().await;
        let get = server.mock(|when, then| {
            when.method(GET).path("/api/packs/tekkit");
            then.status(200).json_body(tekkit());
        });
        let patch = server.mock(|when, then| {
            when.method(PATCH).path("/api/packs/tekkit");
            then.status(200).json_body(tekkit());
        });

        let ctx = context(&server)?;
        let args = PackUpdateArgs {
            id: "tekkit".into(),
            slug: None,
            name: Some("Tekkit".into()),
            website: None,
            recommended: None,
            latest: None,
            artwork: PackArtwork::default(),
            visibility: Visibility {
                published: true,
                ..Visibility::default()
            },
        };
        handle(&ctx, PackCommand::Update(args)).await?;
        get.assert();
        patch.assert_hits(0);
        Ok(())
    }

    #[tokio::test]
    async fn missing_pack_is_a_failure() -> Result<()> {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/packs/ghost");
            then.status(404).json_body(json!({"status": 404, "message": "failed to find pack"}));
        });
        let ctx = context(&server)?;
        let err = handle(&ctx, PackCommand::Show(IdArgs { id: "ghost".into() }))
            .await
            .expect_err("not found");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.display_message(), "failed to find pack");
        Ok(())
    }

    #[tokio::test]
    async fn team_perm_requires_a_grade() -> Result<()> {
        let server = MockServer::start_async().await;
        let put = server.mock(|when, then| {
            when.method(PUT).path("/api/packs/tekkit/teams");
            then.status(200).json_body(json!({"status": 200, "message": "ok"}));
        });
        let ctx = context(&server)?;
        let command = TeamLinkCommand::Perm(TeamLinkArgs {
            id: "tekkit".into(),
            member: "admins".into(),
            perm: None,
        });
        let err = handle(&ctx, PackCommand::Team(command)).await.expect_err("no perm");
        assert_eq!(err.exit_code(), 1);
        put.assert_hits(0);
        Ok(())
    }
}
