//! Connection settings resolved from flags, environment and an env file.
//!
//! Precedence per setting: flag, process environment, `KLEISTER_ENV_FILE`
//! contents, built-in default. `clap` reads the `KLEISTER_*` variables;
//! the legacy `SOLDER_*` names are consulted here when those are unset.

use std::path::PathBuf;
use std::time::Duration;

use kleister_client::TransportConfig;
use url::Url;

use crate::client::{CliError, CliResult};

pub(crate) const DEFAULT_SERVER: &str = "http://localhost:8080";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const ENV_FILE_VAR: &str = "KLEISTER_ENV_FILE";
const LEGACY_SERVER_VAR: &str = "SOLDER_SERVER";
const LEGACY_TOKEN_VAR: &str = "SOLDER_TOKEN";

/// Load `KLEISTER_ENV_FILE` into the process environment.
///
/// Variables already set are kept. Returns the loaded path, if any.
pub(crate) fn load_env_file() -> CliResult<Option<PathBuf>> {
    let Some(path) = std::env::var_os(ENV_FILE_VAR).filter(|path| !path.is_empty()) else {
        return Ok(None);
    };
    let path = PathBuf::from(path);
    dotenvy::from_path(&path).map_err(|err| {
        CliError::validation(format!(
            "failed to load environment file '{}': {err}",
            path.display()
        ))
    })?;
    Ok(Some(path))
}

/// Settings needed to reach the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) server: Url,
    pub(crate) token: Option<String>,
    pub(crate) timeout: Duration,
}

impl Settings {
    /// Resolve settings from parsed flags, using `env` for the legacy
    /// fallbacks.
    pub(crate) fn resolve(
        server: Option<&str>,
        token: Option<&str>,
        timeout_secs: u64,
        env: impl Fn(&str) -> Option<String>,
    ) -> CliResult<Self> {
        let server = non_empty(server.map(str::to_string))
            .or_else(|| non_empty(env(LEGACY_SERVER_VAR)))
            .unwrap_or_else(|| DEFAULT_SERVER.to_string());
        let server = parse_server(&server)?;

        let token = non_empty(token.map(str::to_string)).or_else(|| non_empty(env(LEGACY_TOKEN_VAR)));

        if timeout_secs == 0 {
            return Err(CliError::validation("--timeout must be at least one second"));
        }

        Ok(Self {
            server,
            token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Transport configuration tagged with this invocation's request id.
    pub(crate) fn transport(&self, request_id: &str) -> TransportConfig {
        let mut config = TransportConfig::new(self.server.clone());
        config.token.clone_from(&self.token);
        config.timeout = Some(self.timeout);
        config.request_id = Some(request_id.to_string());
        config
    }
}

/// Parse the server URL provided to the CLI.
pub(crate) fn parse_server(input: &str) -> CliResult<Url> {
    let url = input
        .trim()
        .parse::<Url>()
        .map_err(|err| CliError::validation(format!("invalid server URL '{input}': {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CliError::validation(format!(
            "server URL '{input}' must use http or https"
        )));
    }
    Ok(url)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Process environment lookup.
pub(crate) fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
