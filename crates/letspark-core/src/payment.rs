//! Checkout session verification after a payment redirect.

use thiserror::Error;
use tracing::{error, info, warn};

use crate::api::ApiClient;
use crate::models::{PaymentReceipt, PaymentVerification};

const VERIFICATION_FAILED: &str = "Payment verification failed";
const VERIFICATION_ERROR: &str = "Payment verification error";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    #[error("Missing payment session ID")]
    MissingSessionId,

    #[error("{0}")]
    Failed(String),
}

#[derive(Clone)]
pub struct PaymentService {
    api: ApiClient,
}

impl PaymentService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Confirm the checkout session identified by `session_id`.
    /// A blank or missing id fails without contacting the server.
    pub async fn verify(&self, session_id: Option<&str>) -> Result<PaymentReceipt, PaymentError> {
        let session_id = session_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(PaymentError::MissingSessionId)?;

        match self.api.verify_payment(session_id).await {
            Ok(PaymentVerification::Success(receipt)) => {
                info!(plan = %receipt.plan_id, status = %receipt.payment_status, "Payment verified");
                Ok(receipt)
            }
            Ok(PaymentVerification::Failed { message }) => {
                warn!(message = ?message, "Payment verification rejected");
                Err(PaymentError::Failed(
                    message.unwrap_or_else(|| VERIFICATION_FAILED.to_string()),
                ))
            }
            Err(e) => {
                error!(error = %e, "Payment verification request failed");
                Err(PaymentError::Failed(VERIFICATION_ERROR.to_string()))
            }
        }
    }
}
