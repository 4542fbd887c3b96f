use kleister_api_models::{Attachment, BuildVersion, Mod, Version, VersionParams, VersionPatch};

use crate::api::{Kleister, UpdateOutcome, changed, ident, numeric_id};
use crate::error::{Error, Result};
use crate::resources::builds::build_version_params;
use crate::transport::{Method, Transport};

/// Body of a new version before its mod is resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionDraft {
    /// Slug, derived from the name by the server when absent.
    pub slug: Option<String>,
    /// Display name, usually the version number.
    pub name: String,
    /// Archive upload.
    pub file: Option<Attachment>,
}

fn versions_path(module: &str) -> Result<String> {
    Ok(format!("/api/mods/{}/versions", ident("mod", module)?))
}

fn version_path(module: &str, version: &str) -> Result<String> {
    Ok(format!("{}/{}", versions_path(module)?, ident("version", version)?))
}

impl<T: Transport> Kleister<T> {
    /// List the versions of a mod.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn list_versions(&self, module: &str) -> Result<Vec<Version>> {
        self.get(&versions_path(module)?).await
    }

    /// Fetch one version of a mod.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn get_version(&self, module: &str, version: &str) -> Result<Version> {
        self.get(&version_path(module, version)?).await
    }

    /// Create a version under `module`, resolving the mod to its id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty name, [`Error::NotFound`]
    /// for an unknown mod, otherwise the classified transport error.
    pub async fn create_version(&self, module: &str, draft: &VersionDraft) -> Result<Version> {
        if draft.name.trim().is_empty() {
            return Err(Error::validation("missing version name"));
        }
        let path = versions_path(module)?;
        let mod_id = match numeric_id(module) {
            Some(id) => id,
            None => self.get::<Mod>(&format!("/api/mods/{}", module.trim())).await?.id,
        };
        let params = VersionParams {
            slug: draft.slug.clone(),
            name: draft.name.clone(),
            mod_id,
            file: draft.file.clone(),
        };
        self.post(&path, &params).await
    }

    /// Apply the fields of `requested` that differ from the server state.
    ///
    /// A file upload always counts as a change.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error of the fetch or the PATCH.
    pub async fn update_version(
        &self,
        module: &str,
        version: &str,
        requested: &VersionPatch,
    ) -> Result<UpdateOutcome<Version>> {
        let path = version_path(module, version)?;
        let current: Version = self.get(&path).await?;

        let patch = VersionPatch {
            slug: changed(current.slug.as_str(), requested.slug.as_deref()),
            name: changed(current.name.as_str(), requested.name.as_deref()),
            file: requested.file.clone(),
        };

        if patch.is_empty() {
            return Ok(UpdateOutcome::Unchanged);
        }
        self.patch(&path, &patch).await.map(UpdateOutcome::Updated)
    }

    /// Delete a version.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn delete_version(&self, module: &str, version: &str) -> Result<()> {
        self.delete::<()>(&version_path(module, version)?, None).await
    }

    /// List the builds a version is assigned to.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn list_version_builds(&self, module: &str, version: &str) -> Result<Vec<BuildVersion>> {
        self.get(&format!("{}/builds", version_path(module, version)?)).await
    }

    /// Assign a version to a build, addressed from the version side.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn append_version_build(
        &self,
        module: &str,
        version: &str,
        pack: &str,
        build: &str,
    ) -> Result<()> {
        let path = format!("{}/builds", version_path(module, version)?);
        let body = build_version_params(pack, build, module, version)?;
        self.send(Method::POST, &path, Some(&body)).await
    }

    /// Remove a version from a build, addressed from the version side.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn remove_version_build(
        &self,
        module: &str,
        version: &str,
        pack: &str,
        build: &str,
    ) -> Result<()> {
        let path = format!("{}/builds", version_path(module, version)?);
        let body = build_version_params(pack, build, module, version)?;
        self.send(Method::DELETE, &path, Some(&body)).await
    }
}
