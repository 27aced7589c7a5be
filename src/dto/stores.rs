use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Store, StoreItem};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplaceStoreRequest {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub items: Vec<NewStoreItem>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewStoreItem {
    pub title: String,
    pub description: Option<String>,
    pub price: i64,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreWithItems {
    pub store: Store,
    pub items: Vec<StoreItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreList {
    pub items: Vec<Store>,
}
