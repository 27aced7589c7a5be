use uuid::Uuid;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::compliments::{
        ComplimentList, CreateComplimentRequest, SendComplimentsRequest, SendComplimentsResponse,
    },
    error::{AppError, AppResult},
    models::Compliment,
    response::{ApiResponse, Meta},
    token,
};

/// Batch-create promotional compliments. All records of one request share a
/// group code; each row gets its own id and starts unsent and unclaimed.
pub async fn create_batch(
    pool: &DbPool,
    owner_id: Uuid,
    payload: CreateComplimentRequest,
) -> AppResult<ApiResponse<ComplimentList>> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let user_exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;
    if user_exists.is_none() {
        return Err(AppError::NotFound);
    }

    let group_id = token::group_code();
    let mut txn = pool.begin().await?;

    let mut compliments = Vec::with_capacity(payload.quantity as usize);
    for _ in 0..payload.quantity {
        let compliment = sqlx::query_as::<_, Compliment>(
            r#"
            INSERT INTO compliments
                (id, owner_id, group_id, title, amount, start_date, start_time, end_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&group_id)
        .bind(&payload.title)
        .bind(payload.amount)
        .bind(&payload.start_date)
        .bind(&payload.start_time)
        .bind(&payload.end_time)
        .fetch_one(&mut *txn)
        .await?;
        compliments.push(compliment);
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        pool,
        Some(owner_id),
        "compliments_create",
        Some("compliments"),
        Some(serde_json::json!({ "group_id": group_id, "quantity": payload.quantity })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Compliments created",
        ComplimentList { compliments },
        Some(Meta::empty()),
    ))
}

pub async fn list_compliments(pool: &DbPool, owner_id: Uuid) -> AppResult<ApiResponse<ComplimentList>> {
    let user_exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;
    if user_exists.is_none() {
        return Err(AppError::NotFound);
    }

    let compliments = sqlx::query_as::<_, Compliment>(
        "SELECT * FROM compliments WHERE owner_id = $1 ORDER BY created_at",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::success(
        "OK",
        ComplimentList { compliments },
        Some(Meta::empty()),
    ))
}

/// Mark compliments sent and stamp their recipients. The whole assignment
/// list is applied in one transaction: either every pair matches a record
/// owned by this user, or nothing is marked sent.
pub async fn send_compliments(
    pool: &DbPool,
    owner_id: Uuid,
    payload: SendComplimentsRequest,
) -> AppResult<ApiResponse<SendComplimentsResponse>> {
    if payload.assignments.is_empty() {
        return Err(AppError::BadRequest("no assignments given".to_string()));
    }

    let mut txn = pool.begin().await?;
    let mut sent: i64 = 0;

    for assignment in &payload.assignments {
        let result = sqlx::query(
            r#"
            UPDATE compliments
            SET sent = TRUE, recipient = $3
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(assignment.compliment_id)
        .bind(owner_id)
        .bind(&assignment.recipient)
        .execute(&mut *txn)
        .await?;

        if result.rows_affected() == 0 {
            // Rolls the transaction back on drop.
            return Err(AppError::NotFound);
        }
        sent += result.rows_affected() as i64;
    }

    txn.commit().await?;

    Ok(ApiResponse::success(
        "Compliments sent successfully",
        SendComplimentsResponse { sent },
        Some(Meta::empty()),
    ))
}
