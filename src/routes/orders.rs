use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};

use crate::{
    dto::orders::{CheckoutRequest, CheckoutResponse, OrderList, SetCompletionRequest},
    error::AppResult,
    models::OrderStatus,
    response::ApiResponse,
    routes::params::{parse_key, user_key},
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{user_id}/checkout", post(checkout))
        .route("/users/{user_id}/orders", get(list_orders))
        .route("/users/{user_id}/patron-orders", get(list_patron_orders))
        .route("/users/{user_id}/orders/{mainkey}", delete(delete_order))
        .route(
            "/users/{user_id}/orders/{mainkey}/status/ready",
            put(mark_ready),
        )
        .route(
            "/users/{user_id}/orders/{mainkey}/status/ready-in-10-minutes",
            put(mark_ready_in_10),
        )
        .route(
            "/users/{user_id}/orders/{mainkey}/items/{item_id}/completed",
            put(set_item_completion),
        )
}

#[utoipa::path(
    post,
    path = "/api/users/{user_id}/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Cart fanned out to per-store-owner order fragments", body = ApiResponse<CheckoutResponse>),
        (status = 400, description = "Empty cart or missing cardholder name"),
    ),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutResponse>>> {
    let user_id = user_key(&user_id)?;
    Ok(Json(order_service::checkout(&state, user_id, payload).await?))
}

#[utoipa::path(get, path = "/api/users/{user_id}/orders", tag = "Orders")]
pub async fn list_orders(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let user_id = user_key(&user_id)?;
    Ok(Json(
        order_service::list_owner_orders(&state.pool, user_id).await?,
    ))
}

#[utoipa::path(get, path = "/api/users/{user_id}/patron-orders", tag = "Orders")]
pub async fn list_patron_orders(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let user_id = user_key(&user_id)?;
    Ok(Json(
        order_service::list_patron_orders(&state.pool, user_id).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/users/{user_id}/orders/{mainkey}",
    responses(
        (status = 200, description = "This recipient's fragments removed"),
        (status = 404, description = "No fragment with that mainkey"),
    ),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path((user_id, mainkey)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let user_id = user_key(&user_id)?;
    Ok(Json(
        order_service::delete_order(&state.pool, user_id, &mainkey).await?,
    ))
}

#[utoipa::path(put, path = "/api/users/{user_id}/orders/{mainkey}/status/ready", tag = "Orders")]
pub async fn mark_ready(
    State(state): State<AppState>,
    Path((user_id, mainkey)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let user_id = user_key(&user_id)?;
    Ok(Json(
        order_service::set_status(&state.pool, user_id, &mainkey, OrderStatus::Ready).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/users/{user_id}/orders/{mainkey}/status/ready-in-10-minutes",
    tag = "Orders"
)]
pub async fn mark_ready_in_10(
    State(state): State<AppState>,
    Path((user_id, mainkey)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let user_id = user_key(&user_id)?;
    Ok(Json(
        order_service::set_status(&state.pool, user_id, &mainkey, OrderStatus::ReadyInTen).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/users/{user_id}/orders/{mainkey}/items/{item_id}/completed",
    request_body = SetCompletionRequest,
    responses(
        (status = 200, description = "Kitchen completion recorded against the stable item id"),
        (status = 404, description = "No matching order item"),
    ),
    tag = "Orders"
)]
pub async fn set_item_completion(
    State(state): State<AppState>,
    Path((user_id, mainkey, item_id)): Path<(String, String, String)>,
    Json(payload): Json<SetCompletionRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let user_id = user_key(&user_id)?;
    let item_id = parse_key(&item_id, "item")?;
    Ok(Json(
        order_service::set_item_completion(
            &state.pool,
            user_id,
            &mainkey,
            item_id,
            payload.completed,
        )
        .await?,
    ))
}
