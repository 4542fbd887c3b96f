//! CLI error type and the context shared by command handlers.

use std::fmt::{self, Display, Formatter};

use kleister_client::Kleister;

use crate::output::Output;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 1,
            Self::Failure(_) => 2,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<kleister_client::Error> for CliError {
    fn from(error: kleister_client::Error) -> Self {
        if error.is_validation() {
            Self::Validation(error.to_string())
        } else {
            Self::Failure(error.into())
        }
    }
}

impl From<kleister_client::models::InvalidPerm> for CliError {
    fn from(error: kleister_client::models::InvalidPerm) -> Self {
        Self::Validation(error.to_string())
    }
}

/// Application context passed to command handlers.
pub(crate) struct AppContext {
    pub(crate) api: Kleister,
    pub(crate) output: Output,
}
