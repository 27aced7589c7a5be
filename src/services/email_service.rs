use crate::{dto::payments::PurchaseEmailRequest, error::AppError, error::AppResult};

/// Relays purchase receipts to the outbound email webhook. Delivery itself
/// is someone else's problem; this client only hands the payload over.
#[derive(Clone)]
pub struct EmailClient {
    http: reqwest::Client,
    webhook_url: Option<String>,
}

impl EmailClient {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            webhook_url,
        }
    }

    pub async fn send_purchase_receipt(&self, receipt: &PurchaseEmailRequest) -> AppResult<()> {
        let Some(url) = self.webhook_url.as_deref() else {
            tracing::debug!(email = %receipt.email, "email webhook not configured, skipping receipt");
            return Ok(());
        };

        let resp = self.http.post(url).json(receipt).send().await?;
        if !resp.status().is_success() {
            return Err(AppError::Internal(anyhow::anyhow!(
                "email webhook returned {}",
                resp.status()
            )));
        }
        Ok(())
    }
}
