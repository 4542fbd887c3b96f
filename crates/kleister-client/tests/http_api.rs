//! Resource operations exercised over real sockets against a mock server.

use anyhow::Result;
use httpmock::prelude::*;
use kleister_client::models::{PackParams, Perm};
use kleister_client::{
    AssetSource, CatalogQuery, Error, Kleister, PackChanges, Select, TransportConfig, VersionDraft,
};
use serde_json::json;

fn connect(server: &MockServer, token: Option<&str>) -> Result<Kleister> {
    let mut config = TransportConfig::new(server.base_url().parse()?);
    config.token = token.map(str::to_string);
    Ok(Kleister::connect(config)?)
}

#[tokio::test]
async fn pack_lifecycle_create_get_patch_delete() -> Result<()> {
    let server = MockServer::start_async().await;
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/api/packs")
            .header("authorization", "Bearer admin-token")
            .json_body(json!({"slug": "tekkit", "name": "Tekkit", "published": true, "private": false}));
        then.status(200).json_body(json!({
            "id": 7, "slug": "tekkit", "name": "Tekkit", "published": true, "private": false
        }));
    });
    let fetch = server.mock(|when, then| {
        when.method(GET).path("/api/packs/7");
        then.status(200).json_body(json!({
            "id": 7, "slug": "tekkit", "name": "Tekkit", "published": true, "private": false
        }));
    });
    let patch = server.mock(|when, then| {
        when.method(PATCH)
            .path("/api/packs/7")
            .json_body(json!({"name": "Tekkit Classic"}));
        then.status(200).json_body(json!({
            "id": 7, "slug": "tekkit", "name": "Tekkit Classic", "published": true, "private": false
        }));
    });
    let delete = server.mock(|when, then| {
        when.method(DELETE).path("/api/packs/7");
        then.status(200).json_body(json!({"status": 200, "message": "successfully deleted pack"}));
    });

    let api = connect(&server, Some("admin-token"))?;
    let created = api
        .create_pack(&PackParams {
            slug: Some("tekkit".into()),
            name: "Tekkit".into(),
            published: true,
            ..PackParams::default()
        })
        .await?;
    assert_eq!(created.id, 7);
    assert_eq!(api.get_pack("7").await?, created);

    let updated = api
        .update_pack(
            "7",
            &PackChanges {
                name: Some("Tekkit Classic".into()),
                ..PackChanges::default()
            },
        )
        .await?
        .updated()
        .expect("name changed");
    assert_eq!(updated.name, "Tekkit Classic");
    api.delete_pack("7").await?;

    create.assert();
    fetch.assert_hits(2);
    patch.assert();
    delete.assert();
    Ok(())
}

#[tokio::test]
async fn deleted_pack_reports_not_found() -> Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/api/packs/gone");
        then.status(404)
            .json_body(json!({"status": 404, "message": "failed to find pack"}));
    });

    let err = connect(&server, None)?
        .get_pack("gone")
        .await
        .expect_err("pack was deleted");
    assert!(matches!(err, Error::NotFound { ref message } if message == "failed to find pack"));
    Ok(())
}

#[tokio::test]
async fn team_pack_permission_lifecycle() -> Result<()> {
    let server = MockServer::start_async().await;
    let append = server.mock(|when, then| {
        when.method(POST)
            .path("/api/teams/admins/packs")
            .json_body(json!({"team": "admins", "pack": "tekkit", "perm": "user"}));
        then.status(200).json_body(json!({"status": 200, "message": "ok"}));
    });
    let grade = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/teams/admins/packs")
            .json_body(json!({"team": "admins", "pack": "tekkit", "perm": "owner"}));
        then.status(200).json_body(json!({"status": 200, "message": "ok"}));
    });
    let list = server.mock(|when, then| {
        when.method(GET).path("/api/teams/admins/packs");
        then.status(200).json_body(json!([{
            "pack_id": 7,
            "pack": {"id": 7, "slug": "tekkit", "name": "Tekkit"},
            "team_id": 1,
            "perm": "owner"
        }]));
    });
    let remove = server.mock(|when, then| {
        when.method(DELETE)
            .path("/api/teams/admins/packs")
            .json_body(json!({"team": "admins", "pack": "tekkit"}));
        then.status(200);
    });

    let api = connect(&server, Some("t"))?;
    api.append_team_pack("admins", "tekkit", Perm::User).await?;
    api.update_team_pack("admins", "tekkit", Perm::Owner).await?;
    let rows = api.list_team_packs("admins").await?;
    assert_eq!(rows[0].perm, Perm::Owner);
    assert_eq!(rows[0].pack.as_ref().map(|pack| pack.slug.as_str()), Some("tekkit"));
    api.remove_team_pack("admins", "tekkit").await?;

    append.assert();
    grade.assert();
    list.assert();
    remove.assert();
    Ok(())
}

#[tokio::test]
async fn remote_asset_is_embedded_as_data_url() -> Result<()> {
    let jar = b"PK\x03\x04\x14\x00META-INF/MANIFEST.MF".to_vec();
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/downloads/ic2.jar");
        then.status(200).body(jar.clone());
    });
    let create = server.mock(|when, then| {
        when.method(POST).path("/api/mods/9/versions").json_body(json!({
            "name": "2.8.170",
            "mod_id": 9,
            "file": {"upload": "data:application/java-archive;base64,UEsDBBQATUVUQS1JTkYvTUFOSUZFU1QuTUY="}
        }));
        then.status(200)
            .json_body(json!({"id": 2, "mod_id": 9, "slug": "2-8-170", "name": "2.8.170"}));
    });

    let api = connect(&server, Some("t"))?;
    let source = AssetSource::Url(server.url("/downloads/ic2.jar").parse()?);
    let file = api.encode_asset(Some(&source)).await?;
    api.create_version(
        "9",
        &VersionDraft {
            name: "2.8.170".into(),
            file,
            ..VersionDraft::default()
        },
    )
    .await?;

    create.assert();
    Ok(())
}

#[tokio::test]
async fn catalog_listing_is_shaped_locally() -> Result<()> {
    let server = MockServer::start_async().await;
    let list = server.mock(|when, then| {
        when.method(GET).path("/api/minecraft");
        then.status(200).json_body(json!([
            {"id": 1, "slug": "1-7-10", "version": "1.7.10", "type": "release"},
            {"id": 2, "slug": "1-12-2", "version": "1.12.2", "type": "release"},
            {"id": 3, "slug": "1-10-2", "version": "1.10.2", "type": "release"}
        ]));
    });

    let api = connect(&server, None)?;
    let rows = api
        .list_minecraft(&CatalogQuery {
            filter: None,
            sort: Some("version".into()),
            select: Select::Last,
        })
        .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].version, "1.12.2");
    list.assert();
    Ok(())
}
