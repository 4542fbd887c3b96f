use kleister_api_models::{Profile, ProfilePatch};

use crate::api::{Kleister, UpdateOutcome, changed};
use crate::error::Result;
use crate::transport::Transport;

const PROFILE_PATH: &str = "/api/profile/self";

impl<T: Transport> Kleister<T> {
    /// Profile of the authenticated account.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn profile(&self) -> Result<Profile> {
        self.get(PROFILE_PATH).await
    }

    /// Apply the fields of `requested` that differ from the current profile.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error of the fetch or the PATCH.
    pub async fn update_profile(&self, requested: &ProfilePatch) -> Result<UpdateOutcome<Profile>> {
        let current = self.profile().await?;

        let patch = ProfilePatch {
            slug: changed(current.slug.as_str(), requested.slug.as_deref()),
            username: changed(current.username.as_str(), requested.username.as_deref()),
            email: changed(current.email.as_str(), requested.email.as_deref()),
            password: requested.password.clone().filter(|password| !password.is_empty()),
        };

        if patch.is_empty() {
            return Ok(UpdateOutcome::Unchanged);
        }
        self.patch(PROFILE_PATH, &patch).await.map(UpdateOutcome::Updated)
    }
}
