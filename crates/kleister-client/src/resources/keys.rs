use kleister_api_models::{Key, KeyParams, KeyPatch};

use crate::api::{Kleister, UpdateOutcome, changed};
use crate::error::{Error, Result};
use crate::resources::item_path;
use crate::transport::Transport;

impl<T: Transport> Kleister<T> {
    /// List all API keys.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn list_keys(&self) -> Result<Vec<Key>> {
        self.get("/api/keys").await
    }

    /// Fetch one key by id or slug.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn get_key(&self, key: &str) -> Result<Key> {
        self.get(&item_path("key", "keys", key)?).await
    }

    /// Create an API key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty name.
    pub async fn create_key(&self, params: &KeyParams) -> Result<Key> {
        if params.name.trim().is_empty() {
            return Err(Error::validation("missing key name"));
        }
        self.post("/api/keys", params).await
    }

    /// Apply the fields of `requested` that differ from the server state.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error of the fetch or the PATCH.
    pub async fn update_key(&self, key: &str, requested: &KeyPatch) -> Result<UpdateOutcome<Key>> {
        let path = item_path("key", "keys", key)?;
        let current: Key = self.get(&path).await?;

        let patch = KeyPatch {
            name: changed(current.name.as_str(), requested.name.as_deref()),
            value: changed(current.value.as_str(), requested.value.as_deref()),
        };

        if patch.is_empty() {
            return Ok(UpdateOutcome::Unchanged);
        }
        self.patch(&path, &patch).await.map(UpdateOutcome::Updated)
    }

    /// Delete an API key.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn delete_key(&self, key: &str) -> Result<()> {
        self.delete::<()>(&item_path("key", "keys", key)?, None).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::fixtures::client;
    use crate::testing::RecordingTransport;
    use crate::transport::Method;

    #[tokio::test]
    async fn deleted_key_is_not_found_afterwards() {
        let transport = RecordingTransport::new()
            .respond(Method::GET, "/api/keys/ci", 200, &json!({"id": 2, "slug": "ci", "name": "CI", "value": "s3cr3t"}))
            .respond(Method::GET, "/api/keys/ci", 404, &json!({"status": 404, "message": "failed to find key"}))
            .respond_empty(Method::DELETE, "/api/keys/ci", 200);
        let api = client(&transport);

        assert_eq!(api.get_key("ci").await.expect("get").value, "s3cr3t");
        api.delete_key("ci").await.expect("delete");
        let err = api.get_key("ci").await.expect_err("gone");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn identical_value_is_a_noop() {
        let transport = RecordingTransport::new().respond(
            Method::GET,
            "/api/keys/ci",
            200,
            &json!({"id": 2, "slug": "ci", "name": "CI", "value": "s3cr3t"}),
        );
        let outcome = client(&transport)
            .update_key(
                "ci",
                &KeyPatch {
                    name: Some("CI".into()),
                    value: Some("s3cr3t".into()),
                },
            )
            .await
            .expect("noop");
        assert!(outcome.is_unchanged());
        assert_eq!(transport.calls().len(), 1);
    }
}
