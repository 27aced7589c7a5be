use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};

use crate::{
    dto::stores::{NewStoreItem, ReplaceStoreRequest, StoreList, StoreWithItems},
    error::AppResult,
    models::StoreItem,
    response::ApiResponse,
    routes::params::{Pagination, parse_key, user_key},
    services::store_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{user_id}/store",
            get(get_store).put(replace_store).delete(delete_store),
        )
        .route("/users/{user_id}/store/items", post(add_item))
        .route(
            "/users/{user_id}/store/items/{item_id}",
            put(update_item).delete(remove_item),
        )
        .route("/stores", get(list_stores))
        .route("/stores/{store_id}", get(get_store_by_id))
}

#[utoipa::path(get, path = "/api/users/{user_id}/store", tag = "Stores")]
pub async fn get_store(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ApiResponse<StoreWithItems>>> {
    let user_id = user_key(&user_id)?;
    Ok(Json(store_service::get_store(&state.pool, user_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/users/{user_id}/store",
    request_body = ReplaceStoreRequest,
    responses(
        (status = 200, description = "Store replaced wholesale; items get fresh ids", body = ApiResponse<StoreWithItems>),
        (status = 400, description = "Invalid user ID"),
        (status = 404, description = "User not found"),
    ),
    tag = "Stores"
)]
pub async fn replace_store(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<ReplaceStoreRequest>,
) -> AppResult<Json<ApiResponse<StoreWithItems>>> {
    let user_id = user_key(&user_id)?;
    Ok(Json(
        store_service::replace_store(&state.pool, user_id, payload).await?,
    ))
}

#[utoipa::path(delete, path = "/api/users/{user_id}/store", tag = "Stores")]
pub async fn delete_store(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let user_id = user_key(&user_id)?;
    Ok(Json(store_service::delete_store(&state.pool, user_id).await?))
}

#[utoipa::path(
    post,
    path = "/api/users/{user_id}/store/items",
    request_body = NewStoreItem,
    responses(
        (status = 201, description = "Item added", body = ApiResponse<StoreItem>),
        (status = 404, description = "Store not found"),
    ),
    tag = "Stores"
)]
pub async fn add_item(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<NewStoreItem>,
) -> AppResult<(StatusCode, Json<ApiResponse<StoreItem>>)> {
    let user_id = user_key(&user_id)?;
    let resp = store_service::add_item(&state.pool, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/users/{user_id}/store/items/{item_id}",
    request_body = NewStoreItem,
    responses(
        (status = 200, description = "Item replaced in place, id preserved", body = ApiResponse<StoreItem>),
        (status = 404, description = "User or item not found"),
    ),
    tag = "Stores"
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path((user_id, item_id)): Path<(String, String)>,
    Json(payload): Json<NewStoreItem>,
) -> AppResult<Json<ApiResponse<StoreItem>>> {
    let user_id = user_key(&user_id)?;
    let item_id = parse_key(&item_id, "item")?;
    Ok(Json(
        store_service::update_item(&state.pool, user_id, item_id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/users/{user_id}/store/items/{item_id}",
    responses(
        (status = 200, description = "Item removed"),
        (status = 404, description = "User or item not found"),
    ),
    tag = "Stores"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    Path((user_id, item_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let user_id = user_key(&user_id)?;
    let item_id = parse_key(&item_id, "item")?;
    Ok(Json(
        store_service::remove_item(&state.pool, user_id, item_id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/stores",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "Browse stores", body = ApiResponse<StoreList>)
    ),
    tag = "Stores"
)]
pub async fn list_stores(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<StoreList>>> {
    Ok(Json(store_service::list_stores(&state.pool, pagination).await?))
}

#[utoipa::path(get, path = "/api/stores/{store_id}", tag = "Stores")]
pub async fn get_store_by_id(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> AppResult<Json<ApiResponse<StoreWithItems>>> {
    let store_id = parse_key(&store_id, "store")?;
    Ok(Json(
        store_service::get_store_by_id(&state.pool, store_id).await?,
    ))
}
