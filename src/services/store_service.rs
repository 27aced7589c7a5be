use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::stores::{NewStoreItem, ReplaceStoreRequest, StoreList, StoreWithItems},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    models::{Store, StoreItem},
};

pub async fn get_store(pool: &DbPool, owner_id: Uuid) -> AppResult<ApiResponse<StoreWithItems>> {
    let store: Option<Store> = sqlx::query_as("SELECT * FROM stores WHERE owner_id = $1")
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;
    let store = match store {
        Some(s) => s,
        None => return Err(AppError::NotFound),
    };

    let items = sqlx::query_as::<_, StoreItem>(
        "SELECT * FROM store_items WHERE store_id = $1 ORDER BY created_at",
    )
    .bind(store.id)
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::success(
        "OK",
        StoreWithItems { store, items },
        Some(Meta::empty()),
    ))
}

/// Wholesale store replacement: the store row is upserted and the item list
/// is rebuilt from the payload, every item receiving a fresh id.
pub async fn replace_store(
    pool: &DbPool,
    owner_id: Uuid,
    payload: ReplaceStoreRequest,
) -> AppResult<ApiResponse<StoreWithItems>> {
    for item in &payload.items {
        validate_item(item)?;
    }

    let user_exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;
    if user_exists.is_none() {
        return Err(AppError::NotFound);
    }

    let mut txn = pool.begin().await?;

    let store = sqlx::query_as::<_, Store>(
        r#"
        INSERT INTO stores (id, owner_id, name, description, location)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (owner_id) DO UPDATE
        SET name = EXCLUDED.name,
            description = EXCLUDED.description,
            location = EXCLUDED.location
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(&payload.location)
    .fetch_one(&mut *txn)
    .await?;

    sqlx::query("DELETE FROM store_items WHERE store_id = $1")
        .bind(store.id)
        .execute(&mut *txn)
        .await?;

    let mut items = Vec::with_capacity(payload.items.len());
    for item in &payload.items {
        let inserted = sqlx::query_as::<_, StoreItem>(
            r#"
            INSERT INTO store_items (id, store_id, title, description, price, quantity)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(store.id)
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.price)
        .bind(item.quantity)
        .fetch_one(&mut *txn)
        .await?;
        items.push(inserted);
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        pool,
        Some(owner_id),
        "store_replace",
        Some("stores"),
        Some(serde_json::json!({ "store_id": store.id, "items": items.len() })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Store information updated successfully",
        StoreWithItems { store, items },
        Some(Meta::empty()),
    ))
}

pub async fn delete_store(pool: &DbPool, owner_id: Uuid) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM stores WHERE owner_id = $1")
        .bind(owner_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Store deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn add_item(
    pool: &DbPool,
    owner_id: Uuid,
    payload: NewStoreItem,
) -> AppResult<ApiResponse<StoreItem>> {
    validate_item(&payload)?;

    let store_id: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM stores WHERE owner_id = $1")
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;
    let store_id = match store_id {
        Some((id,)) => id,
        None => return Err(AppError::NotFound),
    };

    let item = sqlx::query_as::<_, StoreItem>(
        r#"
        INSERT INTO store_items (id, store_id, title, description, price, quantity)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(store_id)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(payload.price)
    .bind(payload.quantity)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success("Item added", item, Some(Meta::empty())))
}

pub async fn update_item(
    pool: &DbPool,
    owner_id: Uuid,
    item_id: Uuid,
    payload: NewStoreItem,
) -> AppResult<ApiResponse<StoreItem>> {
    validate_item(&payload)?;

    let item = sqlx::query_as::<_, StoreItem>(
        r#"
        UPDATE store_items
        SET title = $3, description = $4, price = $5, quantity = $6
        WHERE id = $2
          AND store_id = (SELECT id FROM stores WHERE owner_id = $1)
        RETURNING *
        "#,
    )
    .bind(owner_id)
    .bind(item_id)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(payload.price)
    .bind(payload.quantity)
    .fetch_optional(pool)
    .await?;

    match item {
        Some(item) => Ok(ApiResponse::success(
            "Item updated successfully",
            item,
            Some(Meta::empty()),
        )),
        None => Err(AppError::NotFound),
    }
}

pub async fn remove_item(
    pool: &DbPool,
    owner_id: Uuid,
    item_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query(
        r#"
        DELETE FROM store_items
        WHERE id = $2
          AND store_id = (SELECT id FROM stores WHERE owner_id = $1)
        "#,
    )
    .bind(owner_id)
    .bind(item_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Item removed successfully",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn list_stores(pool: &DbPool, pagination: Pagination) -> AppResult<ApiResponse<StoreList>> {
    let (page, limit, offset) = pagination.normalize();
    let items = sqlx::query_as::<_, Store>(
        "SELECT * FROM stores ORDER BY created_at LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM stores")
        .fetch_one(pool)
        .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success("OK", StoreList { items }, Some(meta)))
}

pub async fn get_store_by_id(pool: &DbPool, store_id: Uuid) -> AppResult<ApiResponse<StoreWithItems>> {
    let store: Option<Store> = sqlx::query_as("SELECT * FROM stores WHERE id = $1")
        .bind(store_id)
        .fetch_optional(pool)
        .await?;
    let store = match store {
        Some(s) => s,
        None => return Err(AppError::NotFound),
    };

    let items = sqlx::query_as::<_, StoreItem>(
        "SELECT * FROM store_items WHERE store_id = $1 ORDER BY created_at",
    )
    .bind(store.id)
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::success(
        "OK",
        StoreWithItems { store, items },
        Some(Meta::empty()),
    ))
}

fn validate_item(item: &NewStoreItem) -> AppResult<()> {
    if item.price < 0 {
        return Err(AppError::BadRequest("price must not be negative".to_string()));
    }
    if item.quantity < 0 {
        return Err(AppError::BadRequest(
            "quantity must not be negative".to_string(),
        ));
    }
    Ok(())
}
