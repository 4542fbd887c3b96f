//! Typed façade over a [`Transport`].
//!
//! Resource operations live in `crate::resources`, one module per entity;
//! this module holds the shared plumbing they rely on: JSON encoding,
//! decoding, identifier checks and the update outcome type.

use kleister_api_models::Attachment;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::assets::{AssetEncoder, AssetSource};
use crate::error::{Error, Result};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport, TransportConfig};

/// Result of an update that may have had nothing to send.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum UpdateOutcome<T> {
    /// The server accepted a PATCH and returned the new state.
    Updated(T),
    /// No field differed from the current state; no request was issued.
    Unchanged,
}

impl<T> UpdateOutcome<T> {
    /// The updated entity, if any.
    pub fn updated(self) -> Option<T> {
        match self {
            Self::Updated(value) => Some(value),
            Self::Unchanged => None,
        }
    }

    /// Whether the update was skipped.
    pub const fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

/// Client for the Kleister API.
#[derive(Debug)]
pub struct Kleister<T = HttpTransport> {
    transport: T,
    assets: AssetEncoder,
}

impl Kleister<HttpTransport> {
    /// Connect over HTTP.
    ///
    /// # Errors
    ///
    /// Propagates [`HttpTransport::new`] failures.
    pub fn connect(config: TransportConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        let assets = AssetEncoder::new(transport.http_client().clone());
        Ok(Self { transport, assets })
    }
}

impl<T: Transport> Kleister<T> {
    /// Wrap an existing transport.
    pub const fn with_transport(transport: T, assets: AssetEncoder) -> Self {
        Self { transport, assets }
    }

    /// Underlying transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether requests carry a bearer token.
    pub fn has_token(&self) -> bool {
        self.transport.has_token()
    }

    /// Client sending `token` instead of the configured one.
    #[must_use]
    pub fn with_token(&self, token: String) -> Self {
        Self {
            transport: self.transport.with_token(token),
            assets: self.assets.clone(),
        }
    }

    /// Encode an optional asset into its upload form.
    ///
    /// # Errors
    ///
    /// Propagates [`AssetEncoder::encode`] failures.
    pub async fn encode_asset(&self, source: Option<&AssetSource>) -> Result<Option<Attachment>> {
        match source {
            Some(source) => self.assets.encode(source).await.map(Some),
            None => Ok(None),
        }
    }

    pub(crate) async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let response = self.execute(Method::GET, path, None).await?;
        decode(path, &response)
    }

    pub(crate) async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .execute(Method::POST, path, Some(encode(body)?))
            .await?;
        decode(path, &response)
    }

    pub(crate) async fn put<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.execute(Method::PUT, path, Some(encode(body)?)).await?;
        decode(path, &response)
    }

    pub(crate) async fn patch<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .execute(Method::PATCH, path, Some(encode(body)?))
            .await?;
        decode(path, &response)
    }

    /// Issue a request whose response body is ignored.
    pub(crate) async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + Sync + ?Sized,
    {
        let body = body.map(encode).transpose()?;
        self.execute(method, path, body).await.map(drop)
    }

    pub(crate) async fn delete<B>(&self, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.send(Method::DELETE, path, body).await
    }

    async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> Result<ApiResponse> {
        let mut request = ApiRequest::new(method, path);
        request.body = body;
        self.transport.execute(request).await
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value> {
    serde_json::to_value(body).map_err(|err| Error::decode("request body", err))
}

/// An empty body decodes as JSON `null`, so `()` and `Option<_>` targets
/// accept a bodiless success.
fn decode<R: DeserializeOwned>(path: &str, response: &ApiResponse) -> Result<R> {
    let decoded = if response.has_body() {
        serde_json::from_slice(&response.body)
    } else {
        serde_json::from_value(Value::Null)
    };
    decoded.map_err(|err| Error::decode(format!("response from {path}"), err))
}

/// Check an identifier before it is spliced into a URL path.
///
/// # Errors
///
/// Returns [`Error::Validation`] when `value` is empty or contains
/// characters that would change the request path.
pub fn ident<'a>(label: &str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(format!("missing {label} identifier")));
    }
    if value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '%'))
    {
        return Err(Error::validation(format!(
            "invalid {label} identifier '{value}'"
        )));
    }
    Ok(value)
}

/// Decimal id carried by `reference`, if it is purely numeric.
#[must_use]
pub fn numeric_id(reference: &str) -> Option<i64> {
    let reference = reference.trim();
    if !reference.is_empty() && reference.bytes().all(|byte| byte.is_ascii_digit()) {
        reference.parse().ok()
    } else {
        None
    }
}

/// `Some(next)` when `next` is set and differs from `current`.
pub(crate) fn changed<T: PartialEq + ?Sized + ToOwned>(
    current: &T,
    next: Option<&T>,
) -> Option<T::Owned> {
    next.filter(|next| *next != current).map(ToOwned::to_owned)
}

/// [`changed`] for optional current values such as websites.
pub(crate) fn changed_opt(current: Option<&str>, next: Option<&str>) -> Option<String> {
    next.filter(|next| Some(*next) != current).map(str::to_string)
}

/// Merge a mutually exclusive flag pair into an optional boolean.
///
/// # Errors
///
/// Returns [`Error::Validation`] when both flags are set.
pub fn flag_pair(on: bool, off: bool, on_name: &str, off_name: &str) -> Result<Option<bool>> {
    match (on, off) {
        (true, true) => Err(Error::validation(format!(
            "the --{on_name} and --{off_name} flags are mutually exclusive"
        ))),
        (true, false) => Ok(Some(true)),
        (false, true) => Ok(Some(false)),
        (false, false) => Ok(None),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use super::fixtures::client;
    use serde_json::json;

    #[tokio::test]
    async fn bodiless_success_leaves_the_output_empty() {
        let transport = RecordingTransport::new()
            .respond_empty(Method::PATCH, "/api/minecraft", 204)
            .respond_empty(Method::GET, "/api/keys/ci", 200);
        let api = client(&transport);
        let patched: Option<Value> = api.patch("/api/minecraft", &json!({})).await.expect("patch");
        assert_eq!(patched, None);
        let fetched: Result<kleister_api_models::Key> = api.get("/api/keys/ci").await;
        assert!(matches!(fetched, Err(Error::Decode { .. })));
    }

    #[test]
    fn identifiers_reject_path_characters() {
        assert_eq!(ident("pack", " tekkit ").ok(), Some("tekkit"));
        assert_eq!(ident("pack", "7").ok(), Some("7"));
        for bad in ["", "  ", "a/b", "a?b", "a#b", "a%2F", "two words"] {
            assert!(ident("pack", bad).expect_err(bad).is_validation());
        }
    }

    #[test]
    fn numeric_ids_are_all_digits() {
        assert_eq!(numeric_id("42"), Some(42));
        assert_eq!(numeric_id("042"), Some(42));
        assert_eq!(numeric_id("-1"), None);
        assert_eq!(numeric_id("1.0"), None);
        assert_eq!(numeric_id("tekkit"), None);
        assert_eq!(numeric_id(""), None);
    }

    #[test]
    fn changed_only_reports_differences() {
        assert_eq!(changed("Tekkit", Some("Tekkit")), None);
        assert_eq!(changed("Tekkit", Some("Tekkit Lite")), Some("Tekkit Lite".to_string()));
        assert_eq!(changed("Tekkit", None), None);
        assert_eq!(changed(&true, Some(&false)), Some(false));
        assert_eq!(changed_opt(None, Some("https://x")), Some("https://x".to_string()));
        assert_eq!(changed_opt(Some("https://x"), Some("https://x")), None);
    }

    #[test]
    fn flag_pairs_conflict() {
        assert_eq!(flag_pair(true, false, "published", "hidden").ok(), Some(Some(true)));
        assert_eq!(flag_pair(false, true, "published", "hidden").ok(), Some(Some(false)));
        assert_eq!(flag_pair(false, false, "published", "hidden").ok(), Some(None));
        let err = flag_pair(true, true, "private", "public").expect_err("conflict");
        assert!(err.to_string().contains("--private"));
    }

    #[test]
    fn update_outcome_accessors() {
        assert!(UpdateOutcome::<u8>::Unchanged.is_unchanged());
        assert_eq!(UpdateOutcome::Updated(3).updated(), Some(3));
    }
}
