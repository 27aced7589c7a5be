use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::cart::{AddCartLineRequest, CartList},
    error::{AppError, AppResult},
    models::CartLine,
    response::{ApiResponse, Meta},
};

#[derive(FromRow)]
struct ItemSnapshot {
    item_name: String,
    price: i64,
    store_name: String,
}

/// Append a cart line. The price and display names are snapshotted from the
/// referenced item here, so every persisted line has a defined price and
/// quantity and no read-time filtering is needed. Stock is deliberately not
/// checked at add time.
pub async fn add_line(
    pool: &DbPool,
    user_id: Uuid,
    payload: AddCartLineRequest,
) -> AppResult<ApiResponse<CartLine>> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let snapshot: Option<ItemSnapshot> = sqlx::query_as(
        r#"
        SELECT si.title AS item_name, si.price, s.name AS store_name
        FROM store_items si
        JOIN stores s ON s.id = si.store_id
        WHERE si.id = $1 AND s.id = $2
        "#,
    )
    .bind(payload.item_id)
    .bind(payload.store_id)
    .fetch_optional(pool)
    .await?;
    let snapshot = match snapshot {
        Some(s) => s,
        None => return Err(AppError::BadRequest("item not found".to_string())),
    };

    let line = sqlx::query_as::<_, CartLine>(
        r#"
        INSERT INTO cart_items
            (id, user_id, store_id, item_id, store_name, item_name, price, quantity, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(payload.store_id)
    .bind(payload.item_id)
    .bind(&snapshot.store_name)
    .bind(&snapshot.item_name)
    .bind(snapshot.price)
    .bind(payload.quantity)
    .bind(&payload.notes)
    .fetch_one(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        Some(user_id),
        "cart_add",
        Some("cart_items"),
        Some(serde_json::json!({ "item_id": payload.item_id, "quantity": payload.quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("OK", line, None))
}

pub async fn list_cart(pool: &DbPool, user_id: Uuid) -> AppResult<ApiResponse<CartList>> {
    let cart = sqlx::query_as::<_, CartLine>(
        "SELECT * FROM cart_items WHERE user_id = $1 ORDER BY created_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::success("OK", CartList { cart }, Some(Meta::empty())))
}

pub async fn remove_line(
    pool: &DbPool,
    user_id: Uuid,
    line_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
        .bind(line_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn clear_cart(pool: &DbPool, user_id: Uuid) -> AppResult<ApiResponse<serde_json::Value>> {
    sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(ApiResponse::success(
        "Cart cleared",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
