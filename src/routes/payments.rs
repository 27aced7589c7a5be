use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::payments::{CreatePaymentIntentRequest, PaymentIntentResponse, PurchaseEmailRequest},
    error::AppResult,
    response::{ApiResponse, Meta},
    services::payment_service::PaymentClient,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-payment-intent", post(create_payment_intent))
        .route("/send-purchase-email", post(send_purchase_email))
}

#[utoipa::path(
    post,
    path = "/api/create-payment-intent",
    request_body = CreatePaymentIntentRequest,
    responses(
        (status = 200, description = "Intent created; amount converted to minor units", body = ApiResponse<PaymentIntentResponse>),
        (status = 400, description = "Non-positive amount"),
    ),
    tag = "Payments"
)]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Json(payload): Json<CreatePaymentIntentRequest>,
) -> AppResult<Json<ApiResponse<PaymentIntentResponse>>> {
    let amount_minor = PaymentClient::minor_units(payload.amount);
    let client_secret = state.payments.create_intent(amount_minor).await?;

    Ok(Json(ApiResponse::success(
        "Payment intent created",
        PaymentIntentResponse { client_secret },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/send-purchase-email",
    request_body = PurchaseEmailRequest,
    responses(
        (status = 200, description = "Receipt relayed to the email webhook"),
    ),
    tag = "Payments"
)]
pub async fn send_purchase_email(
    State(state): State<AppState>,
    Json(payload): Json<PurchaseEmailRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    state.mailer.send_purchase_receipt(&payload).await?;

    Ok(Json(ApiResponse::success(
        "Email sent",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}
