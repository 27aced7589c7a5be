use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::CartLine;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCartLineRequest {
    pub store_id: Uuid,
    pub item_id: Uuid,
    pub quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartList {
    pub cart: Vec<CartLine>,
}
