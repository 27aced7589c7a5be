use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::users::{CreateUserRequest, UserList},
    error::{AppError, AppResult},
    models::User,
    response::{ApiResponse, Meta},
    routes::params::{Pagination, user_key},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", axum::routing::post(create_user))
        .route("/users/all", get(list_users))
        .route("/users/{user_id}", get(get_user).delete(delete_user))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<User>),
        (status = 400, description = "Email already registered"),
    ),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    if payload.email.trim().is_empty() || payload.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "name and email must not be empty".to_string(),
        ));
    }

    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&payload.email)
        .fetch_optional(&state.pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::BadRequest("email already registered".to_string()));
    }

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, name, email) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&payload.name)
    .bind(&payload.email)
    .fetch_one(&state.pool)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("User created", user, Some(Meta::empty()))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/users/all",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "List all users", body = ApiResponse<UserList>)
    ),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let (page, limit, offset) = pagination.normalize();
    let users = sqlx::query_as::<_, User>(
        "SELECT * FROM users ORDER BY created_at LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&state.pool)
        .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(Json(ApiResponse::success("OK", UserList { users }, Some(meta))))
}

#[utoipa::path(get, path = "/api/users/{user_id}", tag = "Users")]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ApiResponse<User>>> {
    let user_id = user_key(&user_id)?;
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await?;

    match user {
        Some(user) => Ok(Json(ApiResponse::success("OK", user, None))),
        None => Err(AppError::NotFound),
    }
}

#[utoipa::path(delete, path = "/api/users/{user_id}", tag = "Users")]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let user_id = user_key(&user_id)?;
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user_id),
        "user_delete",
        Some("users"),
        None,
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(Json(ApiResponse::success(
        "Account deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
