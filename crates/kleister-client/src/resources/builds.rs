use kleister_api_models::{Build, BuildParams, BuildPatch, BuildVersion, BuildVersionParams};

use crate::api::{Kleister, UpdateOutcome, changed, changed_opt, ident, numeric_id};
use crate::error::{Error, Result};
use crate::transport::{Method, Transport};

/// Body of a new build before catalog references are resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildDraft {
    /// Slug, derived from the name by the server when absent.
    pub slug: Option<String>,
    /// Display name.
    pub name: String,
    /// Minecraft version by id or slug.
    pub minecraft: Option<String>,
    /// Forge version by id or slug.
    pub forge: Option<String>,
    /// Minimal Java version.
    pub min_java: Option<String>,
    /// Minimal memory.
    pub min_memory: Option<String>,
    /// Publication flag.
    pub published: bool,
    /// Visibility flag.
    pub private: bool,
}

/// Requested changes to a build; an empty catalog reference clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildChanges {
    /// New slug.
    pub slug: Option<String>,
    /// New display name.
    pub name: Option<String>,
    /// Minecraft version by id or slug.
    pub minecraft: Option<String>,
    /// Forge version by id or slug.
    pub forge: Option<String>,
    /// New minimal Java version.
    pub min_java: Option<String>,
    /// New minimal memory.
    pub min_memory: Option<String>,
    /// New publication flag.
    pub published: Option<bool>,
    /// New visibility flag.
    pub private: Option<bool>,
}

fn builds_path(pack: &str) -> Result<String> {
    Ok(format!("/api/packs/{}/builds", ident("pack", pack)?))
}

fn build_path(pack: &str, build: &str) -> Result<String> {
    Ok(format!("{}/{}", builds_path(pack)?, ident("build", build)?))
}

impl<T: Transport> Kleister<T> {
    /// List the builds of a pack.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn list_builds(&self, pack: &str) -> Result<Vec<Build>> {
        self.get(&builds_path(pack)?).await
    }

    /// Fetch one build of a pack.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn get_build(&self, pack: &str, build: &str) -> Result<Build> {
        self.get(&build_path(pack, build)?).await
    }

    /// Create a build, resolving its catalog references first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty name and
    /// [`Error::NotFound`] for unknown catalog references.
    pub async fn create_build(&self, pack: &str, draft: &BuildDraft) -> Result<Build> {
        if draft.name.trim().is_empty() {
            return Err(Error::validation("missing build name"));
        }
        let path = builds_path(pack)?;
        let params = BuildParams {
            slug: draft.slug.clone(),
            name: draft.name.clone(),
            minecraft_id: self.catalog_ref(draft.minecraft.as_deref(), CatalogKind::Minecraft).await?,
            forge_id: self.catalog_ref(draft.forge.as_deref(), CatalogKind::Forge).await?,
            min_java: draft.min_java.clone(),
            min_memory: draft.min_memory.clone(),
            published: draft.published,
            private: draft.private,
        };
        self.post(&path, &params).await
    }

    /// Apply the fields of `changes` that differ from the server state.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error of the fetch, a catalog
    /// lookup or the PATCH.
    pub async fn update_build(
        &self,
        pack: &str,
        build: &str,
        changes: &BuildChanges,
    ) -> Result<UpdateOutcome<Build>> {
        let path = build_path(pack, build)?;
        let current: Build = self.get(&path).await?;

        let patch = BuildPatch {
            slug: changed(current.slug.as_str(), changes.slug.as_deref()),
            name: changed(current.name.as_str(), changes.name.as_deref()),
            minecraft_id: self
                .changed_catalog_ref(current.minecraft_id, changes.minecraft.as_deref(), CatalogKind::Minecraft)
                .await?,
            forge_id: self
                .changed_catalog_ref(current.forge_id, changes.forge.as_deref(), CatalogKind::Forge)
                .await?,
            min_java: changed_opt(current.min_java.as_deref(), changes.min_java.as_deref()),
            min_memory: changed_opt(current.min_memory.as_deref(), changes.min_memory.as_deref()),
            published: changed(&current.published, changes.published.as_ref()),
            private: changed(&current.private, changes.private.as_ref()),
        };

        if patch.is_empty() {
            tracing::debug!(pack, build, "build already up to date");
            return Ok(UpdateOutcome::Unchanged);
        }
        self.patch(&path, &patch).await.map(UpdateOutcome::Updated)
    }

    /// Delete a build.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn delete_build(&self, pack: &str, build: &str) -> Result<()> {
        self.delete::<()>(&build_path(pack, build)?, None).await
    }

    /// List the mod versions assigned to a build.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn list_build_versions(&self, pack: &str, build: &str) -> Result<Vec<BuildVersion>> {
        self.get(&format!("{}/versions", build_path(pack, build)?)).await
    }

    /// Assign a mod version to a build.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn append_build_version(
        &self,
        pack: &str,
        build: &str,
        module: &str,
        version: &str,
    ) -> Result<()> {
        let path = format!("{}/versions", build_path(pack, build)?);
        let body = build_version_params(pack, build, module, version)?;
        self.send(Method::POST, &path, Some(&body)).await
    }

    /// Remove a mod version from a build.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn remove_build_version(
        &self,
        pack: &str,
        build: &str,
        module: &str,
        version: &str,
    ) -> Result<()> {
        let path = format!("{}/versions", build_path(pack, build)?);
        let body = build_version_params(pack, build, module, version)?;
        self.send(Method::DELETE, &path, Some(&body)).await
    }

    async fn catalog_ref(&self, reference: Option<&str>, kind: CatalogKind) -> Result<Option<i64>> {
        match reference.map(str::trim) {
            None | Some("") => Ok(None),
            Some(reference) => self.resolve_catalog(reference, kind).await.map(Some),
        }
    }

    async fn changed_catalog_ref(
        &self,
        current: Option<i64>,
        next: Option<&str>,
        kind: CatalogKind,
    ) -> Result<Option<Option<i64>>> {
        let Some(next) = next else {
            return Ok(None);
        };
        let resolved = self.catalog_ref(Some(next), kind).await?;
        Ok((resolved != current).then_some(resolved))
    }

    async fn resolve_catalog(&self, reference: &str, kind: CatalogKind) -> Result<i64> {
        if let Some(id) = numeric_id(reference) {
            return Ok(id);
        }
        match kind {
            CatalogKind::Minecraft => self.get_minecraft(reference).await.map(|row| row.id),
            CatalogKind::Forge => self.get_forge(reference).await.map(|row| row.id),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum CatalogKind {
    Minecraft,
    Forge,
}

pub(crate) fn build_version_params(
    pack: &str,
    build: &str,
    module: &str,
    version: &str,
) -> Result<BuildVersionParams> {
    Ok(BuildVersionParams {
        pack: ident("pack", pack)?.to_string(),
        build: ident("build", build)?.to_string(),
        module: ident("mod", module)?.to_string(),
        version: ident("version", version)?.to_string(),
    })
}
