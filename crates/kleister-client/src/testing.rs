//! In-memory [`Transport`] that records calls and replays canned responses.
//!
//! Available under `cfg(test)` and the `testing` feature so downstream
//! crates can drive the resource layer without a socket.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::transport::{ApiRequest, ApiResponse, MAX_SUCCESS_STATUS, Method, Transport};

/// One request observed by a [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// HTTP verb.
    pub method: Method,
    /// Requested path.
    pub path: String,
    /// JSON body, when one was sent.
    pub body: Option<Value>,
    /// Bearer token in effect for the call.
    pub bearer: Option<String>,
}

#[derive(Debug)]
struct Route {
    method: Method,
    path: String,
    status: u16,
    body: Vec<u8>,
}

#[derive(Debug, Default)]
struct State {
    routes: VecDeque<Route>,
    calls: Vec<RecordedCall>,
}

/// Fake transport for resource-layer tests.
///
/// Routes are matched on method and exact path. A route registered once is
/// consumed by the first matching call unless it is the last route for that
/// method and path, which then keeps answering. Unmatched calls fail with a
/// 404 `NotFound`.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    state: Arc<Mutex<State>>,
    token: Option<String>,
}

impl RecordingTransport {
    /// Empty transport without credentials.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a JSON response.
    #[must_use]
    pub fn respond(self, method: Method, path: &str, status: u16, body: &Value) -> Self {
        self.push(method, path, status, body.to_string().into_bytes());
        self
    }

    /// Register a response with an empty body.
    #[must_use]
    pub fn respond_empty(self, method: Method, path: &str, status: u16) -> Self {
        self.push(method, path, status, Vec::new());
        self
    }

    fn push(&self, method: Method, path: &str, status: u16, body: Vec<u8>) {
        self.lock().routes.push_back(Route {
            method,
            path: path.to_string(),
            status,
            body,
        });
    }

    /// Every call observed so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Calls observed with the given verb.
    #[must_use]
    pub fn calls_with(&self, method: &Method) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| &call.method == method)
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut state = self.lock();
        state.calls.push(RecordedCall {
            method: request.method.clone(),
            path: request.path.clone(),
            body: request.body.clone(),
            bearer: self.token.clone(),
        });

        let matching: Vec<usize> = state
            .routes
            .iter()
            .enumerate()
            .filter(|(_, route)| route.method == request.method && route.path == request.path)
            .map(|(index, _)| index)
            .collect();

        let (status, body) = match matching.as_slice() {
            [] => {
                return Err(Error::from_status(
                    404,
                    format!("no canned response for {} {}", request.method, request.path)
                        .as_bytes(),
                ));
            }
            [only] => {
                let route = &state.routes[*only];
                (route.status, route.body.clone())
            }
            [first, ..] => {
                let index = *first;
                let route = state
                    .routes
                    .remove(index)
                    .ok_or_else(|| Error::not_found("canned response vanished"))?;
                (route.status, route.body)
            }
        };

        if status > MAX_SUCCESS_STATUS {
            return Err(Error::from_status(status, &body));
        }
        Ok(ApiResponse { status, body })
    }

    fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn with_token(&self, token: String) -> Self {
        Self {
            state: Arc::clone(&self.state),
            token: Some(token),
        }
    }
}
