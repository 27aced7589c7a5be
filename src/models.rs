use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Store {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Prices are minor currency units (cents).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StoreItem {
    pub id: Uuid,
    pub store_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: i64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// A cart line carries a snapshot of the item and store at add time, so
/// later catalog edits do not change what the patron agreed to pay.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CartLine {
    pub id: Uuid,
    pub user_id: Uuid,
    pub store_id: Uuid,
    pub item_id: Uuid,
    pub store_name: String,
    pub item_name: String,
    pub price: i64,
    pub quantity: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Compliment {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub group_id: String,
    pub title: String,
    pub amount: i64,
    pub start_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub sent: bool,
    pub claimed: bool,
    pub recipient: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One persisted fragment of a checkout. A checkout writes an owner-side
/// fragment per involved store owner plus a patron-side history copy of
/// each, all sharing `mainkey`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub mainkey: String,
    pub order_number: i32,
    pub recipient_id: Uuid,
    pub store_owner_id: Uuid,
    pub patron_id: Uuid,
    pub side: String,
    pub cc_name: String,
    pub cart_total: i64,
    pub status: Option<String>,
    pub placed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub price: i64,
    pub quantity: i32,
    pub notes: Option<String>,
    pub completed: bool,
}

/// The two fixed kitchen transitions. Orders start with no status set and
/// either transition may be re-fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Ready,
    ReadyInTen,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Ready => "Ready",
            OrderStatus::ReadyInTen => "Ready in 10 minutes",
        }
    }
}
