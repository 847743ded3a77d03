use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::session::SessionStore;
use super::token::AccessToken;
use crate::api::{ApiClient, ApiError};
use crate::config::{Config, DEFAULT_PROBE_PATH};

/// Outcome of asking the guard for a usable access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Valid(AccessToken),
    /// No session: the caller must not issue the protected request
    Unavailable,
}

impl Credential {
    pub fn into_token(self) -> Option<AccessToken> {
        match self {
            Credential::Valid(token) => Some(token),
            Credential::Unavailable => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Credential::Valid(_))
    }
}

/// What happens to stored credentials when the refresh endpoint rejects
/// the refresh token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshFailurePolicy {
    /// Leave both tokens in place
    #[default]
    Retain,
    /// Remove both tokens so later calls fail fast without a network round trip
    Clear,
}

/// Produces a currently accepted access token before a protected request.
///
/// Validity is checked by a real protected call (the probe) rather than by
/// inspecting token expiry locally. A 401 on the probe triggers exactly one
/// refresh; any other probe failure gives up without refreshing.
#[derive(Clone)]
pub struct TokenGuard {
    api: ApiClient,
    session: SessionStore,
    probe_path: String,
    refresh_failure: RefreshFailurePolicy,
}

impl TokenGuard {
    pub fn new(api: ApiClient, session: SessionStore) -> Self {
        Self {
            api,
            session,
            probe_path: DEFAULT_PROBE_PATH.to_string(),
            refresh_failure: RefreshFailurePolicy::default(),
        }
    }

    pub fn from_config(api: ApiClient, session: SessionStore, config: &Config) -> Self {
        Self::new(api, session)
            .with_probe_path(&config.probe_path)
            .with_refresh_failure_policy(config.refresh_failure)
    }

    pub fn with_probe_path(mut self, path: &str) -> Self {
        self.probe_path = path.to_string();
        self
    }

    pub fn with_refresh_failure_policy(mut self, policy: RefreshFailurePolicy) -> Self {
        self.refresh_failure = policy;
        self
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Return a usable access token, refreshing it at most once.
    pub async fn obtain_valid_credential(&self) -> Credential {
        let Some((access, refresh)) = self.session.credentials() else {
            debug!("No stored credentials");
            return Credential::Unavailable;
        };

        match self.api.probe(&self.probe_path, &access).await {
            Ok(()) => {
                debug!("Access token accepted");
                return Credential::Valid(access);
            }
            Err(e) if e.is_unauthorized() => {
                debug!("Access token rejected, refreshing");
            }
            Err(e) => {
                warn!(status = ?e.status(), error = %e, "Probe failed, not refreshing");
                return Credential::Unavailable;
            }
        }

        match self.api.refresh_access(&refresh).await {
            Ok(new_access) => {
                if let Err(e) = self.session.replace_access(&new_access) {
                    // The new token is still good for this call
                    warn!(error = %e, "Failed to persist refreshed access token");
                }
                info!("Access token refreshed");
                Credential::Valid(new_access)
            }
            Err(e) => {
                warn!(status = ?e.status(), error = %e, "Token refresh failed");
                if is_rejection(&e) && self.refresh_failure == RefreshFailurePolicy::Clear {
                    if let Err(e) = self.session.clear() {
                        warn!(error = %e, "Failed to clear rejected credentials");
                    }
                }
                Credential::Unavailable
            }
        }
    }
}

/// The server looked at the refresh token and refused it. Transport and
/// server-side failures say nothing about the token.
fn is_rejection(err: &ApiError) -> bool {
    matches!(
        err,
        ApiError::BadRequest(_)
            | ApiError::Unauthorized
            | ApiError::AccessDenied(_)
            | ApiError::NotFound(_)
    )
}
