use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};

use crate::{
    dto::cart::{AddCartLineRequest, CartList},
    error::AppResult,
    models::CartLine,
    response::ApiResponse,
    routes::params::{parse_key, user_key},
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{user_id}/cart", get(cart_list).post(add_to_cart))
        .route("/users/{user_id}/cart/items/{item_id}", delete(remove_from_cart))
        .route("/users/{user_id}/cart/clear", delete(clear_cart))
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}/cart",
    responses(
        (status = 200, description = "List cart lines", body = ApiResponse<CartList>)
    ),
    tag = "Cart"
)]
pub async fn cart_list(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ApiResponse<CartList>>> {
    let user_id = user_key(&user_id)?;
    Ok(Json(cart_service::list_cart(&state.pool, user_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/users/{user_id}/cart",
    request_body = AddCartLineRequest,
    responses(
        (status = 200, description = "Line appended with a server-side price snapshot", body = ApiResponse<CartLine>),
        (status = 400, description = "Bad request"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<AddCartLineRequest>,
) -> AppResult<Json<ApiResponse<CartLine>>> {
    let user_id = user_key(&user_id)?;
    Ok(Json(cart_service::add_line(&state.pool, user_id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/api/users/{user_id}/cart/items/{item_id}",
    responses(
        (status = 200, description = "Line removed"),
        (status = 404, description = "Cart line not found"),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path((user_id, item_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let user_id = user_key(&user_id)?;
    let line_id = parse_key(&item_id, "item")?;
    Ok(Json(
        cart_service::remove_line(&state.pool, user_id, line_id).await?,
    ))
}

#[utoipa::path(delete, path = "/api/users/{user_id}/cart/clear", tag = "Cart")]
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let user_id = user_key(&user_id)?;
    Ok(Json(cart_service::clear_cart(&state.pool, user_id).await?))
}
