use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Secret key for the card processor. Payment intents fail when unset.
    pub payment_secret_key: Option<String>,
    /// Webhook that relays purchase receipts. Email dispatch is skipped when unset.
    pub email_webhook_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(5000);
        let payment_secret_key = env::var("STRIPE_SECRET_KEY").ok();
        let email_webhook_url = env::var("EMAIL_WEBHOOK_URL").ok();
        Ok(Self {
            database_url,
            host,
            port,
            payment_secret_key,
            email_webhook_url,
        })
    }
}
