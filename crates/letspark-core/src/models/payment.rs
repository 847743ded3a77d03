use serde::{Deserialize, Serialize};

use super::de;
use crate::utils::{format_date, format_optional};

/// Status value the backend uses for a verified checkout session
const SUCCESS_STATUS: &str = "success";

/// Raw body of `GET /api/verify-payment/`. Success and failure share one
/// flat object distinguished by `status`; use `into_verification` to get
/// the tagged form.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentBody {
    pub status: Option<String>,
    pub message: Option<String>,
    pub payment_id: Option<String>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub plan_id: Option<String>,
    pub billing_period: Option<String>,
    pub next_billing_date: Option<String>,
    pub payment_status: Option<String>,
}

fn optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "de::number_or_string")] f64);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|w| w.0))
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct PaymentReceipt {
    pub payment_id: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub plan_id: String,
    pub billing_period: String,
    pub next_billing_date: Option<String>,
    pub payment_status: String,
}

impl PaymentReceipt {
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }

    pub fn payment_id_display(&self) -> String {
        format_optional(&self.payment_id, "N/A")
    }

    pub fn amount_display(&self) -> String {
        format!("{} {}", self.amount, self.currency)
    }

    pub fn plan_display(&self) -> String {
        format!("{} ({})", self.plan_id, self.billing_period)
    }

    pub fn next_billing_display(&self) -> Option<String> {
        self.next_billing_date
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(format_date)
    }
}

#[derive(Debug, Clone)]
pub enum PaymentVerification {
    Success(PaymentReceipt),
    Failed { message: Option<String> },
}

impl VerifyPaymentBody {
    /// Validate the flat body into a tagged result. A `success` body missing
    /// any receipt field is an error, not a partial receipt.
    pub fn into_verification(self) -> Result<PaymentVerification, String> {
        if self.status.as_deref() != Some(SUCCESS_STATUS) {
            return Ok(PaymentVerification::Failed {
                message: self.message,
            });
        }

        fn required<T>(value: Option<T>, field: &str) -> Result<T, String> {
            value.ok_or_else(|| format!("verify-payment success body missing `{}`", field))
        }

        Ok(PaymentVerification::Success(PaymentReceipt {
            payment_id: self.payment_id,
            amount: required(self.amount, "amount")?,
            currency: required(self.currency, "currency")?,
            plan_id: required(self.plan_id, "plan_id")?,
            billing_period: required(self.billing_period, "billing_period")?,
            next_billing_date: self.next_billing_date,
            payment_status: required(self.payment_status, "payment_status")?,
        }))
    }
}
