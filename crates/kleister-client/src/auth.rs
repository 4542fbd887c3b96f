//! Session acquisition and token probing.

use kleister_api_models::{LoginParams, Token};

use crate::api::Kleister;
use crate::error::{Error, Result};
use crate::transport::{Method, Transport};

const LOGIN_PATH: &str = "/api/auth/login";
const TOKEN_PATH: &str = "/api/profile/token";

impl<T: Transport> Kleister<T> {
    /// Exchange credentials for a session token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when either credential is empty and
    /// [`Error::Auth`] when the server rejects them.
    pub async fn login(&self, username: &str, password: &str) -> Result<Token> {
        if username.trim().is_empty() {
            return Err(Error::validation("missing username"));
        }
        if password.is_empty() {
            return Err(Error::validation("missing password"));
        }

        let params = LoginParams {
            username: username.to_string(),
            password: password.to_string(),
        };
        let token: Token = self.post(LOGIN_PATH, &params).await?;
        tracing::info!(username, "login succeeded");
        Ok(token)
    }

    /// Whether the configured token is still accepted.
    ///
    /// Without a token this is `false` and no request is issued. Only a
    /// 401 answer counts as unauthenticated; other status errors leave the
    /// token presumed valid.
    ///
    /// The probe looks at the status only; the body is never decoded.
    ///
    /// # Errors
    ///
    /// Returns network failures.
    pub async fn is_authenticated(&self) -> Result<bool> {
        if !self.has_token() {
            return Ok(false);
        }
        match self.send::<()>(Method::GET, TOKEN_PATH, None).await {
            Ok(()) => Ok(true),
            Err(Error::Auth { status: 401, .. }) => Ok(false),
            Err(err @ (Error::Auth { .. } | Error::NotFound { .. } | Error::Server { .. })) => {
                tracing::warn!(status = err.status(), "token probe failed, assuming the token is valid");
                Ok(true)
            }
            Err(err) => Err(err),
        }
    }

    /// Token bound to the current credentials.
    ///
    /// # Errors
    ///
    /// Returns the classified transport error.
    pub async fn token(&self) -> Result<Token> {
        self.get(TOKEN_PATH).await
    }

    /// Token for the configured credentials, or `None` when there is no
    /// token or the server answers 401.
    ///
    /// Lets callers fall back to a login with a single round trip.
    ///
    /// # Errors
    ///
    /// Returns any other classified transport error.
    pub async fn current_token(&self) -> Result<Option<Token>> {
        if !self.has_token() {
            return Ok(None);
        }
        match self.token().await {
            Ok(token) => Ok(Some(token)),
            Err(Error::Auth { status: 401, .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }
}
