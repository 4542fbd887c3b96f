//! Inline upload encoding for icons, logos, backgrounds and mod files.
//!
//! Assets travel inside their parent entity as RFC 2397 data URLs. Remote
//! assets are buffered through a named temporary file that is removed when
//! the handle drops, on success, error and unwind alike.

use std::io::Write;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use kleister_api_models::Attachment;
use reqwest::Client;
use tempfile::NamedTempFile;
use url::Url;

use crate::error::{Error, Result};
use crate::transport::MAX_SUCCESS_STATUS;

const MIME_PNG: &str = "image/png";
const MIME_JPEG: &str = "image/jpeg";
const MIME_GIF: &str = "image/gif";
const MIME_ZIP: &str = "application/zip";
const MIME_JAR: &str = "application/java-archive";
const MIME_TEXT: &str = "text/plain; charset=utf-8";
const MIME_BINARY: &str = "application/octet-stream";

/// Where an asset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// Local file.
    Path(PathBuf),
    /// Remote resource fetched with a plain GET.
    Url(Url),
}

impl AssetSource {
    /// Pick the source from a `--*-url` / `--*-path` flag pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when both are given or the URL does not
    /// parse.
    pub fn from_flags(
        label: &str,
        url: Option<&str>,
        path: Option<&Path>,
    ) -> Result<Option<Self>> {
        match (url, path) {
            (Some(_), Some(_)) => Err(Error::validation(format!(
                "the --{label}-url and --{label}-path flags are mutually exclusive"
            ))),
            (Some(raw), None) => raw
                .parse::<Url>()
                .map(|url| Some(Self::Url(url)))
                .map_err(|err| Error::validation(format!("invalid {label} URL '{raw}': {err}"))),
            (None, Some(path)) => Ok(Some(Self::Path(path.to_path_buf()))),
            (None, None) => Ok(None),
        }
    }
}

/// Turns files and URLs into upload attachments.
#[derive(Debug, Clone)]
pub struct AssetEncoder {
    client: Client,
}

impl AssetEncoder {
    /// Encoder downloading remote assets with `client`.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Encode an asset from either source.
    ///
    /// # Errors
    ///
    /// See [`Self::encode_path`] and [`Self::encode_url`].
    pub async fn encode(&self, source: &AssetSource) -> Result<Attachment> {
        match source {
            AssetSource::Path(path) => self.encode_path(path).await,
            AssetSource::Url(url) => self.encode_url(url).await,
        }
    }

    /// Read a local file into an upload attachment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read.
    pub async fn encode_path(&self, path: &Path) -> Result<Attachment> {
        let bytes = tokio::fs::read(path).await.map_err(|source| Error::Io {
            operation: "read asset",
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "encoding asset");
        Ok(Attachment::upload(data_url(&bytes)))
    }

    /// Download a remote asset and encode it like a local file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`] when the download fails, the classified
    /// status error when the server answers above 206, and [`Error::Io`]
    /// when the temporary buffer cannot be written.
    pub async fn encode_url(&self, url: &Url) -> Result<Attachment> {
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| Error::network(url.as_str(), err))?;

        let status = response.status().as_u16();
        if status > MAX_SUCCESS_STATUS {
            let body = response.bytes().await.unwrap_or_default();
            return Err(Error::from_status(status, &body));
        }

        let mut buffer = NamedTempFile::new().map_err(|source| Error::Io {
            operation: "create temporary file",
            path: std::env::temp_dir(),
            source,
        })?;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|err| Error::network(url.as_str(), err))?
        {
            buffer.write_all(&chunk).map_err(|source| Error::Io {
                operation: "buffer asset",
                path: buffer.path().to_path_buf(),
                source,
            })?;
        }
        buffer.flush().map_err(|source| Error::Io {
            operation: "buffer asset",
            path: buffer.path().to_path_buf(),
            source,
        })?;

        tracing::debug!(url = %url, "downloaded remote asset");
        self.encode_path(buffer.path()).await
    }
}

/// Encode `bytes` as `data:<mime>;base64,<payload>`.
#[must_use]
pub fn data_url(bytes: &[u8]) -> String {
    format!("data:{};base64,{}", detect_mime(bytes), STANDARD.encode(bytes))
}

/// Best-effort MIME detection from leading signature bytes.
#[must_use]
pub fn detect_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        MIME_PNG
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        MIME_JPEG
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        MIME_GIF
    } else if is_zip(bytes) {
        if is_java_archive(bytes) {
            MIME_JAR
        } else {
            MIME_ZIP
        }
    } else if std::str::from_utf8(bytes).is_ok() {
        MIME_TEXT
    } else {
        MIME_BINARY
    }
}

fn is_zip(bytes: &[u8]) -> bool {
    [b"PK\x03\x04", b"PK\x05\x06", b"PK\x07\x08"]
        .iter()
        .any(|magic| bytes.starts_with(*magic))
}

fn is_java_archive(bytes: &[u8]) -> bool {
    contains(bytes, b"META-INF/") || contains(bytes, b".class")
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}
