use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Order, OrderItem};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    /// Cardholder name from the payment form.
    pub cc_name: String,
    /// Caller-supplied key that makes checkout replays no-ops. Becomes the
    /// order mainkey; a fresh key is issued when absent.
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub orders: Vec<OrderWithItems>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub mainkey: String,
    pub order_number: i32,
    /// Patron-side history fragments, one per involved store owner.
    pub orders: Vec<OrderWithItems>,
    /// True when the idempotency key matched an already-persisted checkout.
    pub replayed: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetCompletionRequest {
    pub completed: bool,
}
