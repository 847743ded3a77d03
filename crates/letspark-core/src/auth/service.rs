use thiserror::Error;
use tracing::{error, info, warn};

use super::forms::{LoginForm, SignupForm, ValidationError};
use super::session::SessionStore;
use crate::api::client::{LoginOutcome, SignupOutcome};
use crate::api::{ApiClient, ApiError};

const LOGIN_FAILED: &str = "Login failed.";
const SIGNUP_FAILED: &str = "Signup failed.";
const TRANSPORT_FAILED: &str = "Something went wrong. Try again.";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The server refused the request; the message is meant for the user
    #[error("{0}")]
    Rejected(String),

    #[error("Request failed: {0}")]
    Transport(#[from] ApiError),

    #[error("Failed to store credentials: {0}")]
    Storage(anyhow::Error),
}

impl AuthError {
    /// Text a front end shows for this failure
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Validation(e) => e.to_string(),
            AuthError::Rejected(message) => message.clone(),
            AuthError::Transport(_) | AuthError::Storage(_) => TRANSPORT_FAILED.to_string(),
        }
    }
}

/// Login, signup and logout against the backend and the session store
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    session: SessionStore,
}

impl AuthService {
    pub fn new(api: ApiClient, session: SessionStore) -> Self {
        Self { api, session }
    }

    /// Authenticate and persist the issued token pair
    pub async fn login(&self, form: &LoginForm) -> Result<(), AuthError> {
        form.validate()?;

        let outcome = self
            .api
            .login(&form.username, &form.password)
            .await
            .inspect_err(|e| error!(error = %e, "Login request failed"))?;

        match outcome {
            LoginOutcome::Authenticated(pair) => {
                self.session.save_login(&pair).map_err(AuthError::Storage)?;
                info!(username = %form.username, "Login successful");
                Ok(())
            }
            LoginOutcome::Rejected(body) => {
                warn!(username = %form.username, "Login rejected");
                Err(AuthError::Rejected(
                    body.detail.unwrap_or_else(|| LOGIN_FAILED.to_string()),
                ))
            }
        }
    }

    /// Create an account. Does not log the new user in.
    pub async fn signup(&self, form: &SignupForm) -> Result<(), AuthError> {
        form.validate()?;

        let outcome = self
            .api
            .signup(&form.username, &form.email, &form.password)
            .await
            .inspect_err(|e| error!(error = %e, "Signup request failed"))?;

        match outcome {
            SignupOutcome::Created => {
                info!(username = %form.username, "Signup successful");
                Ok(())
            }
            SignupOutcome::Rejected(body) => {
                warn!(username = %form.username, "Signup rejected");
                Err(AuthError::Rejected(
                    body.first_username_error()
                        .unwrap_or(SIGNUP_FAILED)
                        .to_string(),
                ))
            }
        }
    }

    /// Forget both stored credentials
    pub fn logout(&self) -> anyhow::Result<()> {
        self.session.clear()?;
        info!("Logged out");
        Ok(())
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::api::client::{LOGIN_PATH, SIGNUP_PATH};
    use crate::auth::store::MemoryTokenStore;

    fn service(uri: &str) -> AuthService {
        let api = ApiClient::new(uri).unwrap();
        AuthService::new(api, SessionStore::new(Arc::new(MemoryTokenStore::new())))
    }

    fn signup_form(password: &str, confirm: &str) -> SignupForm {
        SignupForm {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[tokio::test]
    async fn login_stores_both_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .and(body_json(json!({ "username": "alice", "password": "pw" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "access": "A1", "refresh": "R1" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let auth = service(&server.uri());
        auth.login(&LoginForm::new("alice", "pw")).await.unwrap();

        let (access, refresh) = auth.session().credentials().unwrap();
        assert_eq!(access.as_str(), "A1");
        assert_eq!(refresh.as_str(), "R1");
    }

    #[tokio::test]
    async fn login_rejection_uses_server_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(
                json!({ "detail": "No active account found with the given credentials" }),
            ))
            .mount(&server)
            .await;

        let auth = service(&server.uri());
        let err = auth.login(&LoginForm::new("alice", "bad")).await.unwrap_err();

        assert_eq!(
            err.user_message(),
            "No active account found with the given credentials"
        );
        assert!(!auth.session().has_session());
    }

    #[tokio::test]
    async fn login_rejection_without_detail_is_generic() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(LOGIN_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = service(&server.uri())
            .login(&LoginForm::new("alice", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Login failed.");
    }

    #[tokio::test]
    async fn login_with_empty_field_never_calls_server() {
        let server = MockServer::start().await;
        let err = service(&server.uri())
            .login(&LoginForm::new("alice", ""))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Validation(ValidationError::MissingFields)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn login_transport_error_is_generic() {
        let err = service("http://127.0.0.1:9")
            .login(&LoginForm::new("alice", "pw"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::Transport(_)));
        assert_eq!(err.user_message(), "Something went wrong. Try again.");
    }

    #[tokio::test]
    async fn signup_created() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SIGNUP_PATH))
            .and(body_json(json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "pw"
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({ "message": "User created successfully" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let auth = service(&server.uri());
        auth.signup(&signup_form("pw", "pw")).await.unwrap();
        // Signup does not log in
        assert!(!auth.session().has_session());
    }

    #[tokio::test]
    async fn signup_only_accepts_201() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SIGNUP_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = service(&server.uri())
            .signup(&signup_form("pw", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Signup failed.");
    }

    #[tokio::test]
    async fn signup_rejection_shows_first_username_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SIGNUP_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "username": ["A user with that username already exists."],
                "email": ["Enter a valid email address."]
            })))
            .mount(&server)
            .await;

        let err = service(&server.uri())
            .signup(&signup_form("pw", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "A user with that username already exists.");
    }

    #[tokio::test]
    async fn signup_password_mismatch_never_calls_server() {
        let server = MockServer::start().await;
        let err = service(&server.uri())
            .signup(&signup_form("pw1", "pw2"))
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Passwords do not match.");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn logout_clears_tokens() {
        let auth = AuthService::new(
            ApiClient::new("http://localhost").unwrap(),
            SessionStore::new(Arc::new(MemoryTokenStore::with_tokens(Some("A1"), Some("R1")))),
        );
        assert!(auth.session().has_session());

        auth.logout().unwrap();
        assert!(!auth.session().has_session());
    }
}
