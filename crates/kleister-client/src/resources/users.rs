use kleister_api_models::{
    ModUser, ModUserParams, PackUser, PackUserParams, TeamUser, TeamUserParams, User, UserParams,
    UserPatch,
};

use crate::api::{Kleister, UpdateOutcome, changed};
use crate::error::{Error, Result};
use crate::resources::item_path;
use crate::transport::Transport;

impl<T: Transport> Kleister<T> {
    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.get("/api/users").await
    }

    /// Fetch one user by id or slug.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn get_user(&self, user: &str) -> Result<User> {
        self.get(&item_path("user", "users", user)?).await
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when username, email or password is
    /// missing.
    pub async fn create_user(&self, params: &UserParams) -> Result<User> {
        for (value, field) in [
            (&params.username, "username"),
            (&params.email, "email"),
            (&params.password, "password"),
        ] {
            if value.trim().is_empty() {
                return Err(Error::validation(format!("missing user {field}")));
            }
        }
        self.post("/api/users", params).await
    }

    /// Apply the fields of `requested` that differ from the server state.
    ///
    /// A password is always sent when given since it cannot be read back.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error of the fetch or the PATCH.
    pub async fn update_user(&self, user: &str, requested: &UserPatch) -> Result<UpdateOutcome<User>> {
        let path = item_path("user", "users", user)?;
        let current: User = self.get(&path).await?;

        let patch = UserPatch {
            slug: changed(current.slug.as_str(), requested.slug.as_deref()),
            username: changed(current.username.as_str(), requested.username.as_deref()),
            email: changed(current.email.as_str(), requested.email.as_deref()),
            password: requested.password.clone().filter(|password| !password.is_empty()),
            active: changed(&current.active, requested.active.as_ref()),
            admin: changed(&current.admin, requested.admin.as_ref()),
        };

        if patch.is_empty() {
            return Ok(UpdateOutcome::Unchanged);
        }
        self.patch(&path, &patch).await.map(UpdateOutcome::Updated)
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn delete_user(&self, user: &str) -> Result<()> {
        self.delete::<()>(&item_path("user", "users", user)?, None).await
    }
}

permissioned!(
    "user" / "team",
    path: ("users", "teams"),
    row: TeamUser,
    params: TeamUserParams { user, team },
    list: list_user_teams,
    append: append_user_team,
    update: update_user_team,
    remove: remove_user_team,
);

permissioned!(
    "user" / "mod",
    path: ("users", "mods"),
    row: ModUser,
    params: ModUserParams { user, module },
    list: list_user_mods,
    append: append_user_mod,
    update: update_user_mod,
    remove: remove_user_mod,
);

permissioned!(
    "user" / "pack",
    path: ("users", "packs"),
    row: PackUser,
    params: PackUserParams { user, pack },
    list: list_user_packs,
    append: append_user_pack,
    update: update_user_pack,
    remove: remove_user_pack,
);
