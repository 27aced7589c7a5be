use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Compliment;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateComplimentRequest {
    pub title: String,
    pub amount: i64,
    pub start_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComplimentList {
    pub compliments: Vec<Compliment>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendComplimentsRequest {
    pub assignments: Vec<ComplimentAssignment>,
}

/// One compliment handed to one recipient email.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ComplimentAssignment {
    pub compliment_id: Uuid,
    pub recipient: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SendComplimentsResponse {
    pub sent: i64,
}
