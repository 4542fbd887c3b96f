//! Error taxonomy shared by every client operation.

use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::PathBuf;

use kleister_api_models::{ErrorEnvelope, InvalidPerm};
use reqwest::StatusCode;
use thiserror::Error;

/// Convenience alias for client results.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure classes surfaced by the client.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller supplied invalid or missing input; no request was issued.
    #[error("{message}")]
    Validation {
        /// Description of the offending input.
        message: String,
    },
    /// The server rejected the credentials (401/403) or login failed.
    #[error("{message}")]
    Auth {
        /// HTTP status returned by the server.
        status: u16,
        /// Server-provided message.
        message: String,
    },
    /// The server answered 404 or a catalog lookup found no row.
    #[error("{message}")]
    NotFound {
        /// Server-provided or lookup message.
        message: String,
    },
    /// Any other status above 206.
    #[error("{message} (status {status})")]
    Server {
        /// HTTP status returned by the server.
        status: u16,
        /// Server-provided message.
        message: String,
    },
    /// Connection, DNS, TLS or deadline failure.
    #[error("request to {url} failed ({kind})")]
    Network {
        /// Failure class.
        kind: NetworkErrorKind,
        /// Target of the failed request.
        url: String,
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },
    /// A body could not be encoded or decoded as the expected JSON shape.
    #[error("failed to decode {context}")]
    Decode {
        /// What was being decoded.
        context: String,
        /// Underlying serde error.
        source: serde_json::Error,
    },
    /// Local file access failed.
    #[error("failed to {operation} '{}'", .path.display())]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// File involved in the failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
}

/// Classification of transport-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// The connection could not be established.
    Connect,
    /// The request deadline expired.
    Timeout,
    /// Any other failure while sending or reading.
    Request,
}

impl Display for NetworkErrorKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Connect => "connect",
            Self::Timeout => "timeout",
            Self::Request => "request",
        })
    }
}

impl Error {
    /// Build a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Build a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Wrap an HTTP client error, classifying it by failure kind.
    #[must_use]
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        let kind = if source.is_timeout() {
            NetworkErrorKind::Timeout
        } else if source.is_connect() {
            NetworkErrorKind::Connect
        } else {
            NetworkErrorKind::Request
        };
        Self::Network {
            kind,
            url: url.into(),
            source,
        }
    }

    /// Wrap a serde failure with the thing being decoded.
    pub fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            context: context.into(),
            source,
        }
    }

    /// Map an error status and its body onto the taxonomy.
    ///
    /// The body is read as a `{status, message}` envelope; when that fails
    /// the trimmed body text is used, and the canonical reason phrase when
    /// the body is empty.
    #[must_use]
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorEnvelope>(body)
            .map(|envelope| envelope.message)
            .unwrap_or_else(|_| String::from_utf8_lossy(body).trim().to_string());
        let message = if message.is_empty() {
            StatusCode::from_u16(status)
                .ok()
                .and_then(|code| code.canonical_reason())
                .map_or_else(|| format!("request failed with status {status}"), str::to_string)
        } else {
            message
        };

        match status {
            401 | 403 => Self::Auth { status, message },
            404 => Self::NotFound { message },
            _ => Self::Server { status, message },
        }
    }

    /// Whether the error reports a missing resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether the caller, not the server, is at fault.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// HTTP status attached to server-side failures.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

impl From<InvalidPerm> for Error {
    fn from(err: InvalidPerm) -> Self {
        Self::validation(err.to_string())
    }
}
