//! End-to-end runs of the `kleister` binary against a mock API server.

use std::io::Write as _;
use std::process::Command;

use anyhow::{Result, anyhow};
use httpmock::prelude::*;
use serde_json::{Value, json};

struct Run {
    code: i32,
    stdout: String,
    stderr: String,
}

fn kleister(server: &MockServer) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_kleister"));
    command.env_clear().env("KLEISTER_SERVER", server.base_url());
    command
}

fn run(mut command: Command, args: &[&str]) -> Result<Run> {
    let output = command.args(args).output()?;
    Ok(Run {
        code: output.status.code().ok_or_else(|| anyhow!("terminated by signal"))?,
        stdout: String::from_utf8(output.stdout)?,
        stderr: String::from_utf8(output.stderr)?,
    })
}

fn tekkit() -> Value {
    json!({"id": 7, "slug": "tekkit", "name": "Tekkit", "published": true, "private": false})
}

#[test]
fn pack_create_reports_success() -> Result<()> {
    let server = MockServer::start();
    let create = server.mock(|when, then| {
        when.method(POST)
            .path("/api/packs")
            .json_body(json!({"slug": "tekkit", "name": "Tekkit", "published": true, "private": false}));
        then.status(200).json_body(tekkit());
    });

    let result = run(
        kleister(&server),
        &["pack", "create", "--name", "Tekkit", "--slug", "tekkit", "--published"],
    )?;
    assert_eq!(result.code, 0, "{}", result.stderr);
    assert!(result.stderr.contains("Successfully created"), "{}", result.stderr);
    create.assert();
    Ok(())
}

#[test]
fn pack_show_prints_indented_json() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/packs/tekkit");
        then.status(200).json_body(tekkit());
    });

    let result = run(kleister(&server), &["pack", "show", "--id", "tekkit", "--output", "json"])?;
    assert_eq!(result.code, 0, "{}", result.stderr);
    assert!(result.stdout.starts_with("{\n  \"id\": 7,\n  \"slug\": \"tekkit\","), "{}", result.stdout);
    let parsed: Value = serde_json::from_str(&result.stdout)?;
    assert_eq!(parsed["name"], "Tekkit");
    assert_eq!(parsed["published"], true);
    Ok(())
}

#[test]
fn pack_user_append_perm_and_list() -> Result<()> {
    let server = MockServer::start();
    let append = server.mock(|when, then| {
        when.method(POST)
            .path("/api/packs/tekkit/users")
            .json_body(json!({"pack": "tekkit", "user": "alice", "perm": "owner"}));
        then.status(200).json_body(json!({"status": 200, "message": "ok"}));
    });
    let perm = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/packs/tekkit/users")
            .json_body(json!({"pack": "tekkit", "user": "alice", "perm": "admin"}));
        then.status(200).json_body(json!({"status": 200, "message": "ok"}));
    });
    let list = server.mock(|when, then| {
        when.method(GET).path("/api/packs/tekkit/users");
        then.status(200).json_body(json!([{
            "pack_id": 7,
            "user_id": 3,
            "user": {"id": 3, "slug": "alice", "username": "alice"},
            "perm": "admin"
        }]));
    });

    let appended = run(
        kleister(&server),
        &["pack", "user", "append", "--id", "tekkit", "--user", "alice", "--perm", "owner"],
    )?;
    assert_eq!(appended.code, 0, "{}", appended.stderr);
    let updated = run(
        kleister(&server),
        &["pack", "user", "perm", "--id", "tekkit", "--user", "alice", "--perm", "admin"],
    )?;
    assert_eq!(updated.code, 0, "{}", updated.stderr);
    let listed = run(kleister(&server), &["pack", "user", "ls", "--id", "tekkit"])?;
    assert_eq!(listed.code, 0, "{}", listed.stderr);
    assert!(listed.stdout.contains("alice"), "{}", listed.stdout);
    assert!(listed.stdout.contains("admin"), "{}", listed.stdout);

    append.assert();
    perm.assert();
    list.assert();
    Ok(())
}

#[test]
fn minecraft_listing_sorts_by_version_and_keeps_first() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/minecraft");
        then.status(200).json_body(json!([
            {"id": 1, "slug": "1-7-10", "version": "1.7.10", "type": "release"},
            {"id": 2, "slug": "1-12-2", "version": "1.12.2", "type": "release"},
            {"id": 3, "slug": "1-10-2", "version": "1.10.2", "type": "release"}
        ]));
    });

    let result = run(kleister(&server), &["minecraft", "ls", "--sort", "version", "--first"])?;
    assert_eq!(result.code, 0, "{}", result.stderr);
    assert_eq!(result.stdout, "1: 1.7.10 (release)\n");
    Ok(())
}

#[test]
fn version_create_uploads_the_archive() -> Result<()> {
    let server = MockServer::start();
    let mut jar = tempfile::NamedTempFile::new()?;
    jar.write_all(b"PK\x03\x04\x14\x00META-INF/MANIFEST.MF")?;

    let lookup = server.mock(|when, then| {
        when.method(GET).path("/api/mods/industrialcraft");
        then.status(200).json_body(json!({"id": 9, "slug": "industrialcraft", "name": "IndustrialCraft"}));
    });
    let create = server.mock(|when, then| {
        when.method(POST).path("/api/mods/industrialcraft/versions").json_body(json!({
            "name": "2.8.170",
            "mod_id": 9,
            "file": {"upload": "data:application/java-archive;base64,UEsDBBQATUVUQS1JTkYvTUFOSUZFU1QuTUY="}
        }));
        then.status(200)
            .json_body(json!({"id": 2, "mod_id": 9, "slug": "2-8-170", "name": "2.8.170"}));
    });

    let path = jar.path().to_str().ok_or_else(|| anyhow!("utf-8 temp path"))?;
    let result = run(
        kleister(&server),
        &["version", "create", "--mod", "industrialcraft", "--name", "2.8.170", "--file-path", path],
    )?;
    assert_eq!(result.code, 0, "{}", result.stderr);
    lookup.assert();
    create.assert();
    Ok(())
}

#[test]
fn profile_token_logs_in_when_unauthenticated() -> Result<()> {
    let server = MockServer::start();
    let login = server.mock(|when, then| {
        when.method(POST)
            .path("/api/auth/login")
            .json_body(json!({"Username": "alice", "Password": "secret"}));
        then.status(200).json_body(json!({"token": "session-token"}));
    });
    let token = server.mock(|when, then| {
        when.method(GET)
            .path("/api/profile/token")
            .header("authorization", "Bearer session-token");
        then.status(200).json_body(json!({"token": "session-token"}));
    });

    let result = run(
        kleister(&server),
        &["profile", "token", "--username", "alice", "--password", "secret"],
    )?;
    assert_eq!(result.code, 0, "{}", result.stderr);
    assert_eq!(result.stdout, "session-token\n");
    login.assert();
    token.assert();
    Ok(())
}

#[test]
fn conflicting_flags_exit_one_without_requests() -> Result<()> {
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.path_includes("/api/");
        then.status(200).json_body(tekkit());
    });

    for args in [
        &["pack", "update", "--id", "tekkit", "--published", "--hidden"][..],
        &["pack", "show", "--id", "tekkit", "--json", "--xml"][..],
        &["user", "update", "--id", "alice", "--admin", "--user"][..],
        &["forge", "ls", "--first", "--last"][..],
        &["pack", "user", "append", "--id", "tekkit", "--user", "alice", "--perm", "root"][..],
    ] {
        let result = run(kleister(&server), args)?;
        assert_eq!(result.code, 1, "{args:?}: {}", result.stderr);
        assert!(result.stderr.starts_with("Error: "), "{args:?}: {}", result.stderr);
    }
    any.assert_hits(0);
    Ok(())
}

#[test]
fn unchanged_update_is_an_advisory() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/packs/tekkit");
        then.status(200).json_body(tekkit());
    });
    let patch = server.mock(|when, then| {
        when.method(PATCH).path("/api/packs/tekkit");
        then.status(200).json_body(tekkit());
    });

    let result = run(
        kleister(&server),
        &["pack", "update", "--id", "tekkit", "--name", "Tekkit", "--published"],
    )?;
    assert_eq!(result.code, 0, "{}", result.stderr);
    assert!(result.stderr.contains("Nothing to update..."), "{}", result.stderr);
    assert!(result.stdout.is_empty());
    patch.assert_hits(0);
    Ok(())
}

#[test]
fn server_failures_exit_two() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/packs/ghost");
        then.status(404).json_body(json!({"status": 404, "message": "failed to find pack"}));
    });

    let result = run(kleister(&server), &["pack", "show", "--id", "ghost"])?;
    assert_eq!(result.code, 2);
    assert_eq!(result.stderr.trim_end(), "Error: failed to find pack");
    Ok(())
}

#[test]
fn env_file_supplies_server_and_token() -> Result<()> {
    let server = MockServer::start();
    let list = server.mock(|when, then| {
        when.method(GET)
            .path("/api/teams")
            .header("authorization", "Bearer from-file");
        then.status(200).json_body(json!([{"id": 1, "slug": "admins", "name": "Admins"}]));
    });
    let mut env_file = tempfile::NamedTempFile::new()?;
    writeln!(env_file, "KLEISTER_SERVER={}", server.base_url())?;
    writeln!(env_file, "KLEISTER_TOKEN=from-file")?;

    let mut command = Command::new(env!("CARGO_BIN_EXE_kleister"));
    command.env_clear().env("KLEISTER_ENV_FILE", env_file.path());
    let result = run(command, &["team", "ls", "--format", "{{ slug | upper }}"])?;
    assert_eq!(result.code, 0, "{}", result.stderr);
    assert_eq!(result.stdout, "ADMINS\n");
    list.assert();
    Ok(())
}

#[test]
fn help_exits_zero_and_usage_errors_exit_one() -> Result<()> {
    let server = MockServer::start();
    let help = run(kleister(&server), &["--help"])?;
    assert_eq!(help.code, 0);
    assert!(help.stdout.contains("--timeout"), "{}", help.stdout);

    let missing = run(kleister(&server), &["pack", "create"])?;
    assert_eq!(missing.code, 1);
    Ok(())
}
