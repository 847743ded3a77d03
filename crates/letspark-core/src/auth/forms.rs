use thiserror::Error;

/// Form problems caught before any request is sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please fill in all required fields.")]
    MissingFields,

    #[error("Passwords do not match.")]
    PasswordMismatch,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    /// Required fields first, then the password confirmation
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.is_empty() || self.email.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(username: &str, email: &str, password: &str, confirm: &str) -> SignupForm {
        SignupForm {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_login_form_requires_both_fields() {
        assert_eq!(LoginForm::new("", "pw").validate(), Err(ValidationError::MissingFields));
        assert_eq!(LoginForm::new("alice", "").validate(), Err(ValidationError::MissingFields));
        assert_eq!(LoginForm::new("alice", "pw").validate(), Ok(()));
    }

    #[test]
    fn test_signup_form_requires_email() {
        assert_eq!(
            signup("alice", "", "pw", "pw").validate(),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn test_signup_form_password_mismatch() {
        assert_eq!(
            signup("alice", "a@example.com", "pw1", "pw2").validate(),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(signup("alice", "a@example.com", "pw", "pw").validate(), Ok(()));
    }

    #[test]
    fn test_missing_fields_reported_before_mismatch() {
        assert_eq!(
            signup("", "a@example.com", "pw1", "pw2").validate(),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::MissingFields.to_string(),
            "Please fill in all required fields."
        );
        assert_eq!(ValidationError::PasswordMismatch.to_string(), "Passwords do not match.");
    }
}
