use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::{
        orders::{CheckoutRequest, CheckoutResponse, OrderList, OrderWithItems},
        payments::{PurchaseEmailRequest, ReceiptItem},
    },
    error::{AppError, AppResult},
    models::{CartLine, Order, OrderItem, OrderStatus},
    response::{ApiResponse, Meta},
    state::AppState,
    token,
};

/// Cart-to-order fan-out.
///
/// The patron's cart is partitioned by owning store owner; each partition
/// becomes one owner-side fragment plus one patron-side history copy, all
/// sharing a mainkey. Fragments, items and the cart clear are written in a
/// single transaction, and the unique index on (mainkey, store_owner_id,
/// side) makes a replay with the same idempotency key a read instead of a
/// second write. Receipt emails go out after commit, best effort.
pub async fn checkout(
    state: &AppState,
    patron_id: Uuid,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutResponse>> {
    if payload.cc_name.trim().is_empty() {
        return Err(AppError::BadRequest("cc_name must not be empty".to_string()));
    }

    let mainkey = match payload.idempotency_key.as_deref() {
        Some(key) if !key.trim().is_empty() => key.to_string(),
        _ => token::order_key(),
    };

    if let Some(resp) = load_recorded_checkout(&state.pool, patron_id, &mainkey).await? {
        return Ok(ApiResponse::success(
            "Checkout already recorded",
            resp,
            Some(Meta::empty()),
        ));
    }

    let cart = sqlx::query_as::<_, CartLine>(
        "SELECT * FROM cart_items WHERE user_id = $1 ORDER BY created_at",
    )
    .bind(patron_id)
    .fetch_all(&state.pool)
    .await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }

    let mut store_ids: Vec<Uuid> = cart.iter().map(|line| line.store_id).collect();
    store_ids.sort();
    store_ids.dedup();
    let owner_rows: Vec<(Uuid, Uuid)> =
        sqlx::query_as("SELECT id, owner_id FROM stores WHERE id = ANY($1)")
            .bind(&store_ids)
            .fetch_all(&state.pool)
            .await?;
    let owner_by_store: HashMap<Uuid, Uuid> = owner_rows.into_iter().collect();

    // BTreeMap keeps partition order stable across runs.
    let mut partitions: BTreeMap<Uuid, Vec<CartLine>> = BTreeMap::new();
    for line in &cart {
        let owner_id = owner_by_store.get(&line.store_id).copied().ok_or_else(|| {
            AppError::BadRequest("cart references a store that no longer exists".to_string())
        })?;
        partitions.entry(owner_id).or_default().push(line.clone());
    }

    let order_number = token::order_number();
    let placed_at = Utc::now();

    let mut txn = state.pool.begin().await?;
    for (owner_id, lines) in &partitions {
        let cart_total: i64 = lines
            .iter()
            .map(|line| line.price * i64::from(line.quantity))
            .sum();

        for (recipient_id, side) in [(*owner_id, "owner"), (patron_id, "patron")] {
            let inserted = sqlx::query_as::<_, Order>(
                r#"
                INSERT INTO orders
                    (id, mainkey, order_number, recipient_id, store_owner_id,
                     patron_id, side, cc_name, cart_total, placed_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&mainkey)
            .bind(order_number)
            .bind(recipient_id)
            .bind(owner_id)
            .bind(patron_id)
            .bind(side)
            .bind(&payload.cc_name)
            .bind(cart_total)
            .bind(placed_at)
            .fetch_one(&mut *txn)
            .await;

            let order = match inserted {
                Ok(order) => order,
                Err(err) if is_unique_violation(&err) => {
                    // A concurrent checkout with the same key won the race.
                    drop(txn);
                    let resp = load_recorded_checkout(&state.pool, patron_id, &mainkey)
                        .await?
                        .ok_or(AppError::DbError(err))?;
                    return Ok(ApiResponse::success(
                        "Checkout already recorded",
                        resp,
                        Some(Meta::empty()),
                    ));
                }
                Err(err) => return Err(err.into()),
            };

            for line in lines {
                sqlx::query(
                    r#"
                    INSERT INTO order_items
                        (id, order_id, item_id, item_name, price, quantity, notes)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(order.id)
                .bind(line.item_id)
                .bind(&line.item_name)
                .bind(line.price)
                .bind(line.quantity)
                .bind(&line.notes)
                .execute(&mut *txn)
                .await?;
            }
        }
    }

    sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(patron_id)
        .execute(&mut *txn)
        .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(patron_id),
        "checkout",
        Some("orders"),
        Some(serde_json::json!({ "mainkey": mainkey, "stores": partitions.len() })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    dispatch_receipts(state, patron_id, &payload.cc_name, placed_at, &partitions).await;

    let mut resp = load_recorded_checkout(&state.pool, patron_id, &mainkey)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("checkout fragments missing after commit")))?;
    resp.replayed = false;

    Ok(ApiResponse::success("Checkout success", resp, Some(Meta::empty())))
}

/// Kitchen view: fragments addressed to this store owner.
pub async fn list_owner_orders(pool: &DbPool, owner_id: Uuid) -> AppResult<ApiResponse<OrderList>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE recipient_id = $1 AND side = 'owner' ORDER BY created_at DESC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    let orders = attach_items(pool, orders).await?;
    Ok(ApiResponse::success("Ok", OrderList { orders }, Some(Meta::empty())))
}

/// Patron history: the patron-side copies of every checkout.
pub async fn list_patron_orders(pool: &DbPool, patron_id: Uuid) -> AppResult<ApiResponse<OrderList>> {
    let orders = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE recipient_id = $1 AND side = 'patron' ORDER BY created_at DESC",
    )
    .bind(patron_id)
    .fetch_all(pool)
    .await?;

    let orders = attach_items(pool, orders).await?;
    Ok(ApiResponse::success("Ok", OrderList { orders }, Some(Meta::empty())))
}

/// Remove one recipient's fragments of a checkout. Other recipients keep
/// theirs.
pub async fn delete_order(
    pool: &DbPool,
    recipient_id: Uuid,
    mainkey: &str,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM orders WHERE mainkey = $1 AND recipient_id = $2")
        .bind(mainkey)
        .bind(recipient_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Order deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Apply one of the two fixed transitions to every fragment of a checkout
/// for the given patron, owner-side and patron-side alike. Re-firing a
/// transition is allowed.
pub async fn set_status(
    pool: &DbPool,
    patron_id: Uuid,
    mainkey: &str,
    status: OrderStatus,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("UPDATE orders SET status = $1 WHERE mainkey = $2 AND patron_id = $3")
        .bind(status.as_str())
        .bind(mainkey)
        .bind(patron_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Order status updated",
        serde_json::json!({ "status": status.as_str() }),
        Some(Meta::empty()),
    ))
}

/// Per-item kitchen completion, keyed by the stable item id on the
/// recipient's own fragment.
pub async fn set_item_completion(
    pool: &DbPool,
    recipient_id: Uuid,
    mainkey: &str,
    item_id: Uuid,
    completed: bool,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query(
        r#"
        UPDATE order_items oi
        SET completed = $1
        FROM orders o
        WHERE o.id = oi.order_id
          AND o.mainkey = $2
          AND o.recipient_id = $3
          AND oi.item_id = $4
        "#,
    )
    .bind(completed)
    .bind(mainkey)
    .bind(recipient_id)
    .bind(item_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Item completion updated",
        serde_json::json!({ "completed": completed }),
        Some(Meta::empty()),
    ))
}

async fn load_recorded_checkout(
    pool: &DbPool,
    patron_id: Uuid,
    mainkey: &str,
) -> AppResult<Option<CheckoutResponse>> {
    let orders = sqlx::query_as::<_, Order>(
        r#"
        SELECT * FROM orders
        WHERE mainkey = $1 AND recipient_id = $2 AND side = 'patron'
        ORDER BY created_at
        "#,
    )
    .bind(mainkey)
    .bind(patron_id)
    .fetch_all(pool)
    .await?;

    let Some(first) = orders.first() else {
        return Ok(None);
    };
    let order_number = first.order_number;

    let orders = attach_items(pool, orders).await?;
    Ok(Some(CheckoutResponse {
        mainkey: mainkey.to_string(),
        order_number,
        orders,
        replayed: true,
    }))
}

async fn attach_items(pool: &DbPool, orders: Vec<Order>) -> AppResult<Vec<OrderWithItems>> {
    let ids: Vec<Uuid> = orders.iter().map(|order| order.id).collect();
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT * FROM order_items WHERE order_id = ANY($1)",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id).or_default().push(item);
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            OrderWithItems { order, items }
        })
        .collect())
}

async fn dispatch_receipts(
    state: &AppState,
    patron_id: Uuid,
    cc_name: &str,
    placed_at: chrono::DateTime<Utc>,
    partitions: &BTreeMap<Uuid, Vec<CartLine>>,
) {
    let patron_email: Result<Option<(String,)>, sqlx::Error> =
        sqlx::query_as("SELECT email FROM users WHERE id = $1")
            .bind(patron_id)
            .fetch_optional(&state.pool)
            .await;
    let email = match patron_email {
        Ok(Some((email,))) => email,
        Ok(None) => return,
        Err(err) => {
            tracing::warn!(error = %err, "could not load patron email for receipts");
            return;
        }
    };

    for lines in partitions.values() {
        let Some(first) = lines.first() else { continue };
        let receipt = PurchaseEmailRequest {
            email: email.clone(),
            store_name: first.store_name.clone(),
            cc_name: cc_name.to_string(),
            cart_total: lines
                .iter()
                .map(|line| line.price * i64::from(line.quantity))
                .sum(),
            items: lines
                .iter()
                .map(|line| ReceiptItem {
                    item_name: line.item_name.clone(),
                    price: line.price,
                    quantity: line.quantity,
                })
                .collect(),
            timestamp: placed_at.to_rfc3339(),
        };
        if let Err(err) = state.mailer.send_purchase_receipt(&receipt).await {
            tracing::warn!(error = %err, "purchase email dispatch failed");
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}
