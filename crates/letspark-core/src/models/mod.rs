//! Data models for LetsPark API payloads.
//!
//! This module contains the typed request and response shapes exchanged
//! with the backend:
//!
//! - `LoginRequest`, `TokenPair`, `SignupRequest`, `RefreshRequest`: auth wire types
//! - `Booking`, `Premise`, `BookingStatus`: a user's parking bookings
//! - `Review`, `Star`: public reviews shown on the dashboard
//! - `PaymentVerification`, `PaymentReceipt`: checkout verification result

pub mod auth;
pub mod booking;
pub mod payment;
pub mod review;

pub use auth::{
    LoginErrorBody, LoginRequest, RefreshRequest, RefreshResponse, SignupErrorBody,
    SignupRequest, TokenPair,
};
pub use booking::{Booking, BookingStatus, Premise};
pub use payment::{PaymentReceipt, PaymentVerification, VerifyPaymentBody};
pub use review::{Review, Star};

/// Serde helpers for fields the backend may send either as a JSON number
/// or as a decimal string (Django serialises `DecimalField` as a string).
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    pub fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) => n,
            NumberOrString::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("invalid number: {:?}", s)))?,
        };
        // "NaN" and "inf" parse as f64 but are never valid amounts or ratings
        if !value.is_finite() {
            return Err(serde::de::Error::custom(format!("non-finite number: {}", value)));
        }
        Ok(value)
    }

    #[cfg(test)]
    mod tests {
        use serde::Deserialize;

        #[derive(Deserialize)]
        struct Amount(#[serde(deserialize_with = "super::number_or_string")] f64);

        fn parse(json: &str) -> Result<f64, serde_json::Error> {
            serde_json::from_str::<Amount>(json).map(|a| a.0)
        }

        #[test]
        fn test_number_or_string_accepts_both_forms() {
            assert_eq!(parse("4.5").unwrap(), 4.5);
            assert_eq!(parse(r#"" 12.50 ""#).unwrap(), 12.5);
        }

        #[test]
        fn test_number_or_string_rejects_non_finite() {
            assert!(parse(r#""NaN""#).is_err());
            assert!(parse(r#""inf""#).is_err());
            assert!(parse(r#""-infinity""#).is_err());
            assert!(parse(r#""abc""#).is_err());
        }
    }
}
