//! API client for communicating with the LetsPark REST API.
//!
//! This module provides the `ApiClient` struct for making the login,
//! signup, token refresh, booking, review and payment verification
//! requests. Every method returns a typed `ApiError` so callers can tell
//! an expired token (401) apart from any other failure.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::auth::{AccessToken, RefreshToken};
use crate::config::Config;
use crate::models::{
    Booking, LoginErrorBody, LoginRequest, PaymentVerification, RefreshRequest, RefreshResponse,
    Review, SignupErrorBody, SignupRequest, TokenPair, VerifyPaymentBody,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

pub const LOGIN_PATH: &str = "/api/users/login/";
pub const SIGNUP_PATH: &str = "/api/users/signup/";
pub const TOKEN_REFRESH_PATH: &str = "/api/users/token/refresh/";
pub const USER_BOOKINGS_PATH: &str = "/api/bookings/user-bookings/";
pub const REVIEWS_PATH: &str = "/api/reviews/";
pub const VERIFY_PAYMENT_PATH: &str = "/api/verify-payment/";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Result of a login attempt that reached the server
#[derive(Debug)]
pub enum LoginOutcome {
    Authenticated(TokenPair),
    Rejected(LoginErrorBody),
}

/// Result of a signup attempt that reached the server
#[derive(Debug)]
pub enum SignupOutcome {
    Created,
    Rejected(SignupErrorBody),
}

/// API client for LetsPark.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client with the default timeout
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::with_timeout(
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {}: {}", what, e)))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&AccessToken>,
    ) -> Result<T, ApiError> {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token.as_str());
        }

        let response = Self::check_response(request.send().await?).await?;
        Self::parse_json(response, path).await
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Response, ApiError> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    // ===== Authentication =====

    /// Exchange username and password for an access/refresh pair
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        let response = self
            .post(LOGIN_PATH, &LoginRequest { username, password })
            .await?;

        let status = response.status();
        debug!(status = %status, "Login response received");

        if status.is_success() {
            let pair = Self::parse_json(response, "login response").await?;
            Ok(LoginOutcome::Authenticated(pair))
        } else {
            let text = response.text().await.unwrap_or_default();
            let body = serde_json::from_str(&text).unwrap_or_default();
            Ok(LoginOutcome::Rejected(body))
        }
    }

    /// Register a new account. Only `201 Created` counts as success.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<SignupOutcome, ApiError> {
        let response = self
            .post(SIGNUP_PATH, &SignupRequest { username, email, password })
            .await?;

        let status = response.status();
        debug!(status = %status, "Signup response received");

        if status == StatusCode::CREATED {
            Ok(SignupOutcome::Created)
        } else {
            let text = response.text().await.unwrap_or_default();
            let body = serde_json::from_str(&text).unwrap_or_default();
            Ok(SignupOutcome::Rejected(body))
        }
    }

    /// Trade a refresh token for a new access token
    pub async fn refresh_access(&self, refresh: &RefreshToken) -> Result<AccessToken, ApiError> {
        let response = self
            .post(
                TOKEN_REFRESH_PATH,
                &RefreshRequest {
                    refresh: refresh.as_str(),
                },
            )
            .await?;

        let response = Self::check_response(response).await?;
        let body: RefreshResponse = Self::parse_json(response, "refresh response").await?;
        Ok(AccessToken::new(body.access))
    }

    /// Issue a protected GET purely to learn whether `token` is accepted.
    /// The response body is ignored.
    pub async fn probe(&self, path: &str, token: &AccessToken) -> Result<(), ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(token.as_str())
            .send()
            .await?;

        Self::check_response(response).await?;
        Ok(())
    }

    // ===== Data Fetching Methods =====

    /// Fetch every booking of the signed-in user, oldest first
    pub async fn fetch_user_bookings(&self, token: &AccessToken) -> Result<Vec<Booking>, ApiError> {
        self.get(USER_BOOKINGS_PATH, Some(token)).await
    }

    /// Fetch public reviews
    pub async fn fetch_reviews(&self) -> Result<Vec<Review>, ApiError> {
        self.get(REVIEWS_PATH, None).await
    }

    /// Look up the outcome of a checkout session.
    ///
    /// A non-2xx response whose body still carries a `message` is reported
    /// as `PaymentVerification::Failed` so the server's explanation reaches
    /// the user; any other non-2xx is an `ApiError`.
    pub async fn verify_payment(&self, session_id: &str) -> Result<PaymentVerification, ApiError> {
        let response = self
            .client
            .get(self.url(VERIFY_PAYMENT_PATH))
            .query(&[("session_id", session_id)])
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, "Verify payment response received");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if let Ok(VerifyPaymentBody {
                message: Some(message),
                ..
            }) = serde_json::from_str::<VerifyPaymentBody>(&text)
            {
                return Ok(PaymentVerification::Failed {
                    message: Some(message),
                });
            }
            return Err(ApiError::from_status(status, &text));
        }

        let body: VerifyPaymentBody = Self::parse_json(response, "verify payment response").await?;
        body.into_verification().map_err(ApiError::InvalidResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let api = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(api.base_url(), "http://localhost:8000");
        assert_eq!(api.url(LOGIN_PATH), "http://localhost:8000/api/users/login/");
        assert_eq!(api.url("api/reviews/"), "http://localhost:8000/api/reviews/");
    }

    #[test]
    fn test_from_config_uses_base_url() {
        let config = Config {
            base_url: "https://park.example.com".to_string(),
            ..Config::default()
        };
        let api = ApiClient::from_config(&config).unwrap();
        assert_eq!(api.base_url(), "https://park.example.com");
    }
}
