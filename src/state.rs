use crate::db::DbPool;
use crate::services::{email_service::EmailClient, payment_service::PaymentClient};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub payments: PaymentClient,
    pub mailer: EmailClient,
}
