//! Credential verification
//!
//! The first operation on a client checks the auth token against the
//! service once. The answer is memoized for the lifetime of the client.

use std::fmt;

use tokio::sync::OnceCell;
use tracing::{info, instrument, warn};
use zeropush_domain::constants::AUTHENTICATED_MESSAGE;
use zeropush_domain::{AuthStatus, MessageResponse, PushError, Result};

use crate::executor::RequestExecutor;
use crate::ports::HttpRequest;

const VERIFY_CREDENTIALS_PATH: &str = "/verify_credentials";

/// Server or application token for the service.
///
/// Never printed: `Debug` shows a placeholder.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// `None` for an empty or blank token.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// One-time credential check shared by every operation of a client.
///
/// Concurrent first callers wait on the same check; only one request is
/// sent. A definitive answer (authenticated, rejected, or a 401 from the
/// check itself) is kept forever. Transport and server failures are not,
/// so the next call checks again.
#[derive(Debug, Default)]
pub struct CredentialGate {
    authenticated: OnceCell<bool>,
}

impl CredentialGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> AuthStatus {
        match self.authenticated.get() {
            None => AuthStatus::Unknown,
            Some(true) => AuthStatus::Authenticated,
            Some(false) => AuthStatus::Denied,
        }
    }

    /// Ensure the client holds accepted credentials.
    ///
    /// # Errors
    ///
    /// - [`PushError::MissingCredential`] when no token is configured
    /// - [`PushError::Unauthorized`] when the token was rejected, now or
    ///   earlier
    /// - any executor error raised by a failed check (not memoized)
    pub async fn verify(&self, executor: &RequestExecutor) -> Result<()> {
        if !executor.has_credentials() {
            return Err(PushError::MissingCredential);
        }

        let authenticated =
            *self.authenticated.get_or_try_init(|| check_credentials(executor)).await?;

        if authenticated {
            Ok(())
        } else {
            Err(PushError::Unauthorized("Resource access denied".into()))
        }
    }
}

#[instrument(skip(executor))]
async fn check_credentials(executor: &RequestExecutor) -> Result<bool> {
    let request = HttpRequest::get(VERIFY_CREDENTIALS_PATH);

    match executor.execute::<MessageResponse>(request).await {
        Ok(response) => {
            let authenticated = response
                .body
                .message
                .is_some_and(|message| message.eq_ignore_ascii_case(AUTHENTICATED_MESSAGE));
            if authenticated {
                info!("Credentials verified");
            } else {
                warn!("Credential check answered without authentication");
            }
            Ok(authenticated)
        }
        Err(PushError::Unauthorized(_)) => {
            warn!("Credentials rejected");
            Ok(false)
        }
        Err(err) => {
            warn!(error = %err, "Credential check failed; will retry on next call");
            Err(err)
        }
    }
}
