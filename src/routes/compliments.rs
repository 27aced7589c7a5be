use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::compliments::{
        ComplimentList, CreateComplimentRequest, SendComplimentsRequest, SendComplimentsResponse,
    },
    error::AppResult,
    response::ApiResponse,
    routes::params::user_key,
    services::compliment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{user_id}/create-compliment", post(create_compliments))
        .route("/users/{user_id}/send-compliments", post(send_compliments))
        .route("/users/{user_id}/compliments", get(list_compliments))
}

#[utoipa::path(
    post,
    path = "/api/users/{user_id}/create-compliment",
    request_body = CreateComplimentRequest,
    responses(
        (status = 201, description = "Batch created, one group code shared by all records", body = ApiResponse<ComplimentList>),
        (status = 404, description = "User not found"),
    ),
    tag = "Compliments"
)]
pub async fn create_compliments(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<CreateComplimentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ComplimentList>>)> {
    let user_id = user_key(&user_id)?;
    let resp = compliment_service::create_batch(&state.pool, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/users/{user_id}/send-compliments",
    request_body = SendComplimentsRequest,
    responses(
        (status = 200, description = "All assignments applied atomically", body = ApiResponse<SendComplimentsResponse>),
        (status = 404, description = "An assignment did not match; nothing was sent"),
    ),
    tag = "Compliments"
)]
pub async fn send_compliments(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<SendComplimentsRequest>,
) -> AppResult<Json<ApiResponse<SendComplimentsResponse>>> {
    let user_id = user_key(&user_id)?;
    Ok(Json(
        compliment_service::send_compliments(&state.pool, user_id, payload).await?,
    ))
}

#[utoipa::path(get, path = "/api/users/{user_id}/compliments", tag = "Compliments")]
pub async fn list_compliments(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ApiResponse<ComplimentList>>> {
    let user_id = user_key(&user_id)?;
    Ok(Json(
        compliment_service::list_compliments(&state.pool, user_id).await?,
    ))
}
