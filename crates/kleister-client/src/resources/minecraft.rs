use kleister_api_models::{Build, Identifiable, Minecraft, MinecraftBuildParams};

use crate::api::{Kleister, ident};
use crate::catalog::CatalogQuery;
use crate::error::{Error, Result};
use crate::transport::{Method, Transport};

const MINECRAFT_PATH: &str = "/api/minecraft";

impl<T: Transport> Kleister<T> {
    /// List Minecraft versions, shaped by `query`.
    ///
    /// The query is validated before the request is sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an invalid query, otherwise the
    /// classified transport error.
    pub async fn list_minecraft(&self, query: &CatalogQuery) -> Result<Vec<Minecraft>> {
        let compiled = query.compile::<Minecraft>()?;
        let rows: Vec<Minecraft> = self.get(MINECRAFT_PATH).await?;
        Ok(compiled.apply(rows))
    }

    /// Find a Minecraft version by id or slug.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no row matches.
    pub async fn get_minecraft(&self, reference: &str) -> Result<Minecraft> {
        let reference = ident("minecraft", reference)?;
        let rows: Vec<Minecraft> = self.get(MINECRAFT_PATH).await?;
        rows.into_iter()
            .find(|row| row.matches(reference))
            .ok_or_else(|| Error::not_found(format!("failed to find minecraft version '{reference}'")))
    }

    /// Ask the server to re-scrape the upstream Minecraft index.
    ///
    /// The server works asynchronously; a following listing may not yet
    /// reflect the refresh.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn refresh_minecraft(&self) -> Result<()> {
        tracing::info!("requesting minecraft catalog refresh");
        self.send::<()>(Method::PATCH, MINECRAFT_PATH, None).await
    }

    /// List the builds pinned to a Minecraft version.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn list_minecraft_builds(&self, minecraft: &str) -> Result<Vec<Build>> {
        self.get(&builds_path(minecraft)?).await
    }

    /// Pin a build to a Minecraft version.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn append_minecraft_build(&self, minecraft: &str, pack: &str, build: &str) -> Result<()> {
        let body = params(minecraft, pack, build)?;
        self.send(Method::POST, &builds_path(minecraft)?, Some(&body)).await
    }

    /// Unpin a build from a Minecraft version.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn remove_minecraft_build(&self, minecraft: &str, pack: &str, build: &str) -> Result<()> {
        let body = params(minecraft, pack, build)?;
        self.send(Method::DELETE, &builds_path(minecraft)?, Some(&body)).await
    }
}

fn builds_path(minecraft: &str) -> Result<String> {
    Ok(format!("{MINECRAFT_PATH}/{}/builds", ident("minecraft", minecraft)?))
}

fn params(minecraft: &str, pack: &str, build: &str) -> Result<MinecraftBuildParams> {
    Ok(MinecraftBuildParams {
        minecraft: ident("minecraft", minecraft)?.to_string(),
        pack: ident("pack", pack)?.to_string(),
        build: ident("build", build)?.to_string(),
    })
}
