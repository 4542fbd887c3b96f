use kleister_api_models::{
    Attachment, Build, Pack, PackClient, PackClientParams, PackParams, PackPatch, PackTeam,
    PackTeamParams, PackUser, PackUserParams,
};

use crate::api::{Kleister, UpdateOutcome, changed, changed_opt, ident, numeric_id};
use crate::error::Result;
use crate::resources::item_path;
use crate::transport::Transport;

/// Requested changes to a pack.
///
/// `recommended` and `latest` name a build of the same pack by id or slug;
/// an empty string clears the reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackChanges {
    /// New slug.
    pub slug: Option<String>,
    /// New display name.
    pub name: Option<String>,
    /// New website.
    pub website: Option<String>,
    /// New icon upload.
    pub icon: Option<Attachment>,
    /// New logo upload.
    pub logo: Option<Attachment>,
    /// New background upload.
    pub background: Option<Attachment>,
    /// Recommended build reference.
    pub recommended: Option<String>,
    /// Latest build reference.
    pub latest: Option<String>,
    /// New publication flag.
    pub published: Option<bool>,
    /// New visibility flag.
    pub private: Option<bool>,
}

impl<T: Transport> Kleister<T> {
    /// List all packs.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn list_packs(&self) -> Result<Vec<Pack>> {
        self.get("/api/packs").await
    }

    /// Fetch one pack by id or slug.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) for unknown packs.
    pub async fn get_pack(&self, pack: &str) -> Result<Pack> {
        self.get(&item_path("pack", "packs", pack)?).await
    }

    /// Create a pack.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`](crate::Error::Validation) for an empty
    /// name, otherwise the classified transport error.
    pub async fn create_pack(&self, params: &PackParams) -> Result<Pack> {
        if params.name.trim().is_empty() {
            return Err(crate::Error::validation("missing pack name"));
        }
        self.post("/api/packs", params).await
    }

    /// Apply the fields of `changes` that differ from the server state.
    ///
    /// Uploads always count as changes since the stored blob cannot be
    /// compared locally.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error of the fetch, a reference
    /// lookup or the PATCH.
    pub async fn update_pack(&self, pack: &str, changes: &PackChanges) -> Result<UpdateOutcome<Pack>> {
        let path = item_path("pack", "packs", pack)?;
        let current: Pack = self.get(&path).await?;

        let patch = PackPatch {
            slug: changed(current.slug.as_str(), changes.slug.as_deref()),
            name: changed(current.name.as_str(), changes.name.as_deref()),
            website: changed_opt(current.website.as_deref(), changes.website.as_deref()),
            icon: changes.icon.clone(),
            logo: changes.logo.clone(),
            background: changes.background.clone(),
            recommended_id: self
                .changed_build_ref(pack, current.recommended_id, changes.recommended.as_deref())
                .await?,
            latest_id: self
                .changed_build_ref(pack, current.latest_id, changes.latest.as_deref())
                .await?,
            published: changed(&current.published, changes.published.as_ref()),
            private: changed(&current.private, changes.private.as_ref()),
        };

        if patch.is_empty() {
            tracing::debug!(pack, "pack already up to date");
            return Ok(UpdateOutcome::Unchanged);
        }
        self.patch(&path, &patch).await.map(UpdateOutcome::Updated)
    }

    /// Delete a pack.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn delete_pack(&self, pack: &str) -> Result<()> {
        self.delete::<()>(&item_path("pack", "packs", pack)?, None).await
    }

    /// Resolve a build reference within `pack` to its numeric id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) when the pack has
    /// no such build.
    pub async fn resolve_build(&self, pack: &str, reference: &str) -> Result<i64> {
        if let Some(id) = numeric_id(reference) {
            return Ok(id);
        }
        let path = format!(
            "/api/packs/{}/builds/{}",
            ident("pack", pack)?,
            ident("build", reference)?
        );
        let build: Build = self.get(&path).await?;
        Ok(build.id)
    }

    async fn changed_build_ref(
        &self,
        pack: &str,
        current: Option<i64>,
        next: Option<&str>,
    ) -> Result<Option<Option<i64>>> {
        let Some(next) = next else {
            return Ok(None);
        };
        let resolved = if next.trim().is_empty() {
            None
        } else {
            Some(self.resolve_build(pack, next).await?)
        };
        Ok((resolved != current).then_some(resolved))
    }
}

linked!(
    "pack" / "client",
    path: ("packs", "clients"),
    row: PackClient,
    params: PackClientParams { pack, client },
    list: list_pack_clients,
    append: append_pack_client,
    remove: remove_pack_client,
);

permissioned!(
    "pack" / "user",
    path: ("packs", "users"),
    row: PackUser,
    params: PackUserParams { pack, user },
    list: list_pack_users,
    append: append_pack_user,
    update: update_pack_user,
    remove: remove_pack_user,
);

permissioned!(
    "pack" / "team",
    path: ("packs", "teams"),
    row: PackTeam,
    params: PackTeamParams { pack, team },
    list: list_pack_teams,
    append: append_pack_team,
    update: update_pack_team,
    remove: remove_pack_team,
);

#[cfg(test)]
mod tests {
    use kleister_api_models::Perm;
    use serde_json::json;

    use super::*;
    use crate::api::fixtures::client;
    use crate::testing::RecordingTransport;
    use crate::transport::Method;

    fn tekkit() -> serde_json::Value {
        json!({
            "id": 7,
            "slug": "tekkit",
            "name": "Tekkit",
            "website": "https://tekkit.example",
            "recommended_id": 3,
            "latest_id": null,
            "published": true,
            "private": false
        })
    }

    #[tokio::test]
    async fn unchanged_fields_skip_the_patch() {
        let transport = RecordingTransport::new().respond(Method::GET, "/api/packs/tekkit", 200, &tekkit());
        let outcome = client(&transport)
            .update_pack(
                "tekkit",
                &PackChanges {
                    name: Some("Tekkit".into()),
                    website: Some("https://tekkit.example".into()),
                    recommended: Some("3".into()),
                    latest: Some(String::new()),
                    published: Some(true),
                    ..PackChanges::default()
                },
            )
            .await
            .expect("update");
        assert!(outcome.is_unchanged());
        assert!(transport.calls_with(&Method::PATCH).is_empty());
    }

    #[tokio::test]
    async fn patch_carries_only_changed_fields_and_resolved_refs() {
        let transport = RecordingTransport::new()
            .respond(Method::GET, "/api/packs/tekkit", 200, &tekkit())
            .respond(
                Method::GET,
                "/api/packs/tekkit/builds/stable",
                200,
                &json!({"id": 11, "pack_id": 7, "slug": "stable", "name": "Stable"}),
            )
            .respond(
                Method::PATCH,
                "/api/packs/tekkit",
                200,
                &json!({"id": 7, "slug": "tekkit", "name": "Tekkit Classic", "latest_id": 11}),
            );

        let outcome = client(&transport)
            .update_pack(
                "tekkit",
                &PackChanges {
                    name: Some("Tekkit Classic".into()),
                    recommended: Some(String::new()),
                    latest: Some("stable".into()),
                    private: Some(false),
                    ..PackChanges::default()
                },
            )
            .await
            .expect("update");

        let updated = outcome.updated().expect("patched");
        assert_eq!(updated.name, "Tekkit Classic");
        let patches = transport.calls_with(&Method::PATCH);
        assert_eq!(
            patches[0].body,
            Some(json!({"name": "Tekkit Classic", "recommended_id": null, "latest_id": 11}))
        );
    }

    #[tokio::test]
    async fn unknown_build_reference_is_not_found() {
        let transport = RecordingTransport::new().respond(Method::GET, "/api/packs/tekkit", 200, &tekkit());
        let err = client(&transport)
            .update_pack(
                "tekkit",
                &PackChanges {
                    latest: Some("ghost".into()),
                    ..PackChanges::default()
                },
            )
            .await
            .expect_err("missing build");
        assert!(err.is_not_found());
        assert!(transport.calls_with(&Method::PATCH).is_empty());
    }

    #[tokio::test]
    async fn user_links_use_post_put_delete() {
        let transport = RecordingTransport::new()
            .respond(Method::POST, "/api/packs/tekkit/users", 200, &json!({"status": 200, "message": "ok"}))
            .respond(Method::PUT, "/api/packs/tekkit/users", 200, &json!({"status": 200, "message": "ok"}))
            .respond_empty(Method::DELETE, "/api/packs/tekkit/users", 200)
            .respond(
                Method::GET,
                "/api/packs/tekkit/users",
                200,
                &json!([{"pack_id": 7, "user_id": 3, "user": {"id": 3, "slug": "alice", "username": "alice"}, "perm": "admin"}]),
            );
        let api = client(&transport);

        api.append_pack_user("tekkit", "alice", Perm::Owner).await.expect("append");
        api.update_pack_user("tekkit", "alice", Perm::Admin).await.expect("perm");
        let rows = api.list_pack_users("tekkit").await.expect("list");
        api.remove_pack_user("tekkit", "alice").await.expect("remove");

        assert_eq!(rows[0].perm, Perm::Admin);
        let calls = transport.calls();
        assert_eq!(calls[0].method, Method::POST);
        assert_eq!(calls[0].body, Some(json!({"pack": "tekkit", "user": "alice", "perm": "owner"})));
        assert_eq!(calls[1].method, Method::PUT);
        assert_eq!(calls[1].body, Some(json!({"pack": "tekkit", "user": "alice", "perm": "admin"})));
        assert_eq!(calls[3].method, Method::DELETE);
        assert_eq!(calls[3].body, Some(json!({"pack": "tekkit", "user": "alice"})));
    }

    #[tokio::test]
    async fn client_links_carry_both_endpoints() {
        let transport = RecordingTransport::new().respond_empty(Method::POST, "/api/packs/7/clients", 204);
        client(&transport)
            .append_pack_client("7", "launcher")
            .await
            .expect("append");
        assert_eq!(
            transport.calls()[0].body,
            Some(json!({"pack": "7", "client": "launcher"}))
        );
    }

    #[tokio::test]
    async fn create_requires_a_name() {
        let transport = RecordingTransport::new();
        let err = client(&transport)
            .create_pack(&PackParams::default())
            .await
            .expect_err("no name");
        assert!(err.is_validation());
        assert!(transport.calls().is_empty());
    }
}
