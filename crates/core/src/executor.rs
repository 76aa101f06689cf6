//! HTTP executor: one request, one classified outcome
//!
//! Injects the auth token, sends the request through the [`Transport`]
//! port and maps the response onto [`PushError`]. Nothing is retried here.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};
use zeropush_domain::constants::AUTH_TOKEN_PARAM;
use zeropush_domain::{PushError, Result};

use crate::auth::AuthToken;
use crate::ports::{HttpRequest, HttpResponse, ResponseHeaders, Transport};

/// Status code the service uses for every success
const STATUS_OK: u16 = 200;

/// A decoded success body together with its response headers
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub body: T,
    pub headers: ResponseHeaders,
}

/// Executes requests against the service through a [`Transport`]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    token: Option<AuthToken>,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>, token: Option<AuthToken>) -> Self {
        Self { transport, token }
    }

    /// Whether an auth token is configured
    pub fn has_credentials(&self) -> bool {
        self.token.is_some()
    }

    /// Send `request` and decode a 200 body as `T`.
    ///
    /// # Errors
    ///
    /// Any non-200 status is classified (see [`classify`]); a 200 body that
    /// is not a valid `T` yields [`PushError::Decode`].
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
    ) -> Result<ApiResponse<T>> {
        let response = self.execute_raw(request).await?;
        let body = decode(&response.body)?;
        Ok(ApiResponse { body, headers: response.headers })
    }

    /// Send `request` and return the raw 200 response.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute_raw(&self, request: HttpRequest) -> Result<HttpResponse> {
        let request = self.authorize(request);

        let response = self.transport.send(request).await.map_err(|err| {
            warn!(error = %err, timed_out = err.timed_out, "Request failed before a response");
            PushError::Transport(err.to_string())
        })?;

        debug!(status = response.status, "Response received");
        classify(response)
    }

    fn authorize(&self, mut request: HttpRequest) -> HttpRequest {
        let Some(token) = &self.token else {
            return request;
        };

        if request.method.carries_body() {
            match request.body.take() {
                Some(Value::Object(mut body)) => {
                    body.insert(AUTH_TOKEN_PARAM.to_string(), Value::from(token.expose()));
                    request.body = Some(Value::Object(body));
                }
                None => {
                    let mut body = Map::new();
                    body.insert(AUTH_TOKEN_PARAM.to_string(), Value::from(token.expose()));
                    request.body = Some(Value::Object(body));
                }
                Some(other) => {
                    warn!("Request body is not a JSON object; sending auth token as query");
                    request.body = Some(other);
                    request.query.insert(0, token_param(token));
                }
            }
        } else {
            request.query.insert(0, token_param(token));
        }

        request
    }
}

fn token_param(token: &AuthToken) -> (String, String) {
    (AUTH_TOKEN_PARAM.to_string(), token.expose().to_string())
}

/// Map a response onto success or a typed error.
///
/// | status      | outcome                                   |
/// |-------------|-------------------------------------------|
/// | 200         | `Ok`                                      |
/// | 401         | [`PushError::Unauthorized`]               |
/// | 403         | [`PushError::Forbidden`] (server message) |
/// | 404         | [`PushError::NotFound`]                   |
/// | 412         | [`PushError::PreconditionFailed`]         |
/// | 500..=511   | [`PushError::Server`] (raw body)          |
/// | anything else | [`PushError::UnexpectedStatus`]         |
pub fn classify(response: HttpResponse) -> Result<HttpResponse> {
    match response.status {
        STATUS_OK => Ok(response),
        401 => Err(PushError::Unauthorized(
            server_message(&response.body).unwrap_or_else(|| "Resource access denied".into()),
        )),
        403 => Err(PushError::Forbidden(
            server_message(&response.body).unwrap_or_else(|| "Forbidden".into()),
        )),
        404 => Err(PushError::NotFound(
            server_message(&response.body).unwrap_or_else(|| "Resource not found".into()),
        )),
        412 => Err(PushError::PreconditionFailed(
            server_message(&response.body).unwrap_or_else(|| "Precondition failed".into()),
        )),
        status @ 500..=511 => Err(PushError::Server { status, body: response.body }),
        actual => Err(PushError::UnexpectedStatus { expected: STATUS_OK, actual }),
    }
}

/// The `message` field of a JSON error body, or the trimmed raw body.
fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => match map.get("message") {
            Some(Value::String(message)) => Some(message.clone()),
            _ => Some(trimmed.to_string()),
        },
        _ => Some(trimmed.to_string()),
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    if body.trim().is_empty() {
        return serde_json::from_value(Value::Null)
            .or_else(|_| serde_json::from_value(Value::Object(Map::new())))
            .map_err(|e| PushError::Decode(format!("empty response body: {e}")));
    }

    serde_json::from_str(body).map_err(|e| PushError::Decode(e.to_string()))
}
