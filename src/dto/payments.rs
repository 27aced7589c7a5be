use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePaymentIntentRequest {
    /// Total in major currency units (dollars).
    pub amount: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PurchaseEmailRequest {
    pub email: String,
    pub store_name: String,
    pub cc_name: String,
    pub cart_total: i64,
    pub items: Vec<ReceiptItem>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReceiptItem {
    pub item_name: String,
    pub price: i64,
    pub quantity: i32,
}
