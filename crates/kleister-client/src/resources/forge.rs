use kleister_api_models::{Build, Forge, ForgeBuildParams, Identifiable};

use crate::api::{Kleister, ident};
use crate::catalog::CatalogQuery;
use crate::error::{Error, Result};
use crate::transport::{Method, Transport};

const FORGE_PATH: &str = "/api/forge";

impl<T: Transport> Kleister<T> {
    /// List Forge versions, shaped by `query`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an invalid query, otherwise the
    /// classified transport error.
    pub async fn list_forge(&self, query: &CatalogQuery) -> Result<Vec<Forge>> {
        let compiled = query.compile::<Forge>()?;
        let rows: Vec<Forge> = self.get(FORGE_PATH).await?;
        Ok(compiled.apply(rows))
    }

    /// Find a Forge version by id or slug.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no row matches.
    pub async fn get_forge(&self, reference: &str) -> Result<Forge> {
        let reference = ident("forge", reference)?;
        let rows: Vec<Forge> = self.get(FORGE_PATH).await?;
        rows.into_iter()
            .find(|row| row.matches(reference))
            .ok_or_else(|| Error::not_found(format!("failed to find forge version '{reference}'")))
    }

    /// Ask the server to re-scrape the upstream Forge index.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn refresh_forge(&self) -> Result<()> {
        tracing::info!("requesting forge catalog refresh");
        self.send::<()>(Method::PATCH, FORGE_PATH, None).await
    }

    /// List the builds pinned to a Forge version.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn list_forge_builds(&self, forge: &str) -> Result<Vec<Build>> {
        self.get(&builds_path(forge)?).await
    }

    /// Pin a build to a Forge version.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn append_forge_build(&self, forge: &str, pack: &str, build: &str) -> Result<()> {
        let body = params(forge, pack, build)?;
        self.send(Method::POST, &builds_path(forge)?, Some(&body)).await
    }

    /// Unpin a build from a Forge version.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn remove_forge_build(&self, forge: &str, pack: &str, build: &str) -> Result<()> {
        let body = params(forge, pack, build)?;
        self.send(Method::DELETE, &builds_path(forge)?, Some(&body)).await
    }
}

fn builds_path(forge: &str) -> Result<String> {
    Ok(format!("{FORGE_PATH}/{}/builds", ident("forge", forge)?))
}

fn params(forge: &str, pack: &str, build: &str) -> Result<ForgeBuildParams> {
    Ok(ForgeBuildParams {
        forge: ident("forge", forge)?.to_string(),
        pack: ident("pack", pack)?.to_string(),
        build: ident("build", build)?.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::fixtures::client;
    use crate::catalog::Select;
    use crate::testing::RecordingTransport;

    fn catalog() -> RecordingTransport {
        RecordingTransport::new().respond(
            Method::GET,
            FORGE_PATH,
            200,
            &json!([
                {"id": 1, "slug": "14-23-5-2847", "version": "14.23.5.2847", "minecraft": "1.12.2"},
                {"id": 2, "slug": "10-13-4-1614", "version": "10.13.4.1614", "minecraft": "1.7.10"},
                {"id": 3, "slug": "14-23-5-2860", "version": "14.23.5.2860", "minecraft": "1.12.2"}
            ]),
        )
    }

    #[tokio::test]
    async fn filter_sort_last() {
        let transport = catalog();
        let rows = client(&transport)
            .list_forge(&CatalogQuery {
                filter: Some("minecraft == '1.12.2'".into()),
                sort: Some("Version".into()),
                select: Select::Last,
            })
            .await
            .expect("list");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 3);
    }

    #[tokio::test]
    async fn missing_row_is_not_found() {
        let transport = catalog();
        let err = client(&transport).get_forge("99").await.expect_err("missing");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("'99'"));
    }

    #[tokio::test]
    async fn refresh_is_a_bare_patch() {
        let transport = RecordingTransport::new().respond_empty(Method::PATCH, FORGE_PATH, 202);
        client(&transport).refresh_forge().await.expect("refresh");
        assert_eq!(transport.calls_with(&Method::PATCH).len(), 1);
    }

    #[tokio::test]
    async fn build_unlink_sends_delete_body() {
        let transport =
            RecordingTransport::new().respond_empty(Method::DELETE, "/api/forge/1/builds", 200);
        client(&transport)
            .remove_forge_build("1", "tekkit", "1-0-0")
            .await
            .expect("remove");
        assert_eq!(
            transport.calls()[0].body,
            Some(json!({"forge": "1", "pack": "tekkit", "build": "1-0-0"}))
        );
    }
}
