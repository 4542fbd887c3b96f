use kleister_api_models::{Mod, ModParams, ModPatch, ModTeam, ModTeamParams, ModUser, ModUserParams};

use crate::api::{Kleister, UpdateOutcome, changed, changed_opt};
use crate::error::{Error, Result};
use crate::resources::item_path;
use crate::transport::Transport;

impl<T: Transport> Kleister<T> {
    /// List all mods.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn list_mods(&self) -> Result<Vec<Mod>> {
        self.get("/api/mods").await
    }

    /// Fetch one mod by id or slug.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn get_mod(&self, module: &str) -> Result<Mod> {
        self.get(&item_path("mod", "mods", module)?).await
    }

    /// Create a mod.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty name, otherwise the
    /// classified transport error.
    pub async fn create_mod(&self, params: &ModParams) -> Result<Mod> {
        if params.name.trim().is_empty() {
            return Err(Error::validation("missing mod name"));
        }
        self.post("/api/mods", params).await
    }

    /// Apply the fields of `requested` that differ from the server state.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error of the fetch or the PATCH.
    pub async fn update_mod(&self, module: &str, requested: &ModPatch) -> Result<UpdateOutcome<Mod>> {
        let path = item_path("mod", "mods", module)?;
        let current: Mod = self.get(&path).await?;

        let patch = ModPatch {
            slug: changed(current.slug.as_str(), requested.slug.as_deref()),
            name: changed(current.name.as_str(), requested.name.as_deref()),
            description: changed_opt(current.description.as_deref(), requested.description.as_deref()),
            author: changed_opt(current.author.as_deref(), requested.author.as_deref()),
            website: changed_opt(current.website.as_deref(), requested.website.as_deref()),
            donate: changed_opt(current.donate.as_deref(), requested.donate.as_deref()),
        };

        if patch.is_empty() {
            return Ok(UpdateOutcome::Unchanged);
        }
        self.patch(&path, &patch).await.map(UpdateOutcome::Updated)
    }

    /// Delete a mod.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn delete_mod(&self, module: &str) -> Result<()> {
        self.delete::<()>(&item_path("mod", "mods", module)?, None).await
    }
}

permissioned!(
    "mod" / "user",
    path: ("mods", "users"),
    row: ModUser,
    params: ModUserParams { module, user },
    list: list_mod_users,
    append: append_mod_user,
    update: update_mod_user,
    remove: remove_mod_user,
);

permissioned!(
    "mod" / "team",
    path: ("mods", "teams"),
    row: ModTeam,
    params: ModTeamParams { module, team },
    list: list_mod_teams,
    append: append_mod_team,
    update: update_mod_team,
    remove: remove_mod_team,
);
