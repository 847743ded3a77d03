use serde::{Deserialize, Serialize};

/// Body of `POST /api/users/login/`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Access/refresh pair issued by a successful login
#[derive(Clone, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

/// Error body of a rejected login
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginErrorBody {
    pub detail: Option<String>,
}

/// Body of `POST /api/users/signup/`
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// Field validation errors returned by a rejected signup
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupErrorBody {
    #[serde(default)]
    pub username: Vec<String>,
    #[serde(default)]
    pub email: Vec<String>,
    #[serde(default)]
    pub password: Vec<String>,
}

impl SignupErrorBody {
    /// First username validation message, the one shown to the user
    pub fn first_username_error(&self) -> Option<&str> {
        self.username.first().map(String::as_str)
    }
}

/// Body of `POST /api/users/token/refresh/`
#[derive(Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

#[derive(Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pair_debug_is_redacted() {
        let pair: TokenPair =
            serde_json::from_str(r#"{"access":"secret-a","refresh":"secret-r"}"#).unwrap();
        let debug = format!("{:?}", pair);
        assert!(!debug.contains("secret-a"));
        assert!(!debug.contains("secret-r"));
    }

    #[test]
    fn test_signup_error_body_first_username_error() {
        let body: SignupErrorBody = serde_json::from_str(
            r#"{"username":["A user with that username already exists.","second"]}"#,
        )
        .unwrap();
        assert_eq!(
            body.first_username_error(),
            Some("A user with that username already exists.")
        );

        let body: SignupErrorBody =
            serde_json::from_str(r#"{"email":["Enter a valid email address."]}"#).unwrap();
        assert_eq!(body.first_username_error(), None);
    }

    #[test]
    fn test_refresh_request_shape() {
        let json = serde_json::to_value(RefreshRequest { refresh: "R1" }).unwrap();
        assert_eq!(json, serde_json::json!({ "refresh": "R1" }));
    }
}
