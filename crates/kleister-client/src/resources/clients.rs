use kleister_api_models::{Client, ClientParams, ClientPatch, PackClient, PackClientParams};

use crate::api::{Kleister, UpdateOutcome, changed};
use crate::error::{Error, Result};
use crate::resources::item_path;
use crate::transport::Transport;

impl<T: Transport> Kleister<T> {
    /// List all launcher clients.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        self.get("/api/clients").await
    }

    /// Fetch one client by id or slug.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn get_client(&self, client: &str) -> Result<Client> {
        self.get(&item_path("client", "clients", client)?).await
    }

    /// Register a launcher client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the name or UUID is empty.
    pub async fn create_client(&self, params: &ClientParams) -> Result<Client> {
        if params.name.trim().is_empty() {
            return Err(Error::validation("missing client name"));
        }
        if params.uuid.trim().is_empty() {
            return Err(Error::validation("missing client uuid"));
        }
        self.post("/api/clients", params).await
    }

    /// Apply the fields of `requested` that differ from the server state.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error of the fetch or the PATCH.
    pub async fn update_client(
        &self,
        client: &str,
        requested: &ClientPatch,
    ) -> Result<UpdateOutcome<Client>> {
        let path = item_path("client", "clients", client)?;
        let current: Client = self.get(&path).await?;

        let patch = ClientPatch {
            slug: changed(current.slug.as_str(), requested.slug.as_deref()),
            name: changed(current.name.as_str(), requested.name.as_deref()),
            uuid: changed(current.uuid.as_str(), requested.uuid.as_deref()),
        };

        if patch.is_empty() {
            return Ok(UpdateOutcome::Unchanged);
        }
        self.patch(&path, &patch).await.map(UpdateOutcome::Updated)
    }

    /// Delete a client.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn delete_client(&self, client: &str) -> Result<()> {
        self.delete::<()>(&item_path("client", "clients", client)?, None).await
    }
}

linked!(
    "client" / "pack",
    path: ("clients", "packs"),
    row: PackClient,
    params: PackClientParams { client, pack },
    list: list_client_packs,
    append: append_client_pack,
    remove: remove_client_pack,
);
