//! Bridge to the card processor.
//!
//! Only intent creation happens here; the charge itself is confirmed
//! client-side with the returned secret, and no server-side verification
//! of the confirmed amount takes place.

use serde::Deserialize;

use crate::error::{AppError, AppResult};

const PAYMENT_INTENTS_URL: &str = "https://api.stripe.com/v1/payment_intents";

#[derive(Clone)]
pub struct PaymentClient {
    http: reqwest::Client,
    secret_key: Option<String>,
}

#[derive(Deserialize)]
struct IntentBody {
    client_secret: String,
}

impl PaymentClient {
    pub fn new(secret_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
        }
    }

    /// Major currency units to minor units, rounded to the nearest cent.
    pub fn minor_units(amount: f64) -> i64 {
        (amount * 100.0).round() as i64
    }

    pub async fn create_intent(&self, amount_minor: i64) -> AppResult<String> {
        if amount_minor <= 0 {
            return Err(AppError::BadRequest(
                "amount must be greater than 0".to_string(),
            ));
        }
        let Some(key) = self.secret_key.as_deref() else {
            return Err(AppError::Internal(anyhow::anyhow!(
                "STRIPE_SECRET_KEY is not set"
            )));
        };

        let params = [
            ("amount", amount_minor.to_string()),
            ("currency", "usd".to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];
        let resp = self
            .http
            .post(PAYMENT_INTENTS_URL)
            .bearer_auth(key)
            .form(&params)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(%status, body, "payment intent creation failed");
            return Err(AppError::Internal(anyhow::anyhow!(
                "payment processor returned {status}"
            )));
        }

        let body: IntentBody = resp.json().await?;
        Ok(body.client_secret)
    }
}
