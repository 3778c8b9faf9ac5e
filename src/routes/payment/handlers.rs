use actix_web::web;
use sqlx::PgPool;
use utoipa::TupleUnit;

use super::schemas::{
    ConfirmPaymentRequest, GenerateQrRequest, OrderProofUploadRequest, PaymentData,
    PaymentListRequest, PaymentWithOrderData, QrArtifactData, RejectPaymentRequest,
    UploadProofRequest,
};
use super::utils::{
    confirm_payment, fetch_payment_by_order, generate_or_fetch_qr, list_payments, regenerate_qr,
    reject_payment, upload_proof, upload_proof_for_order, verify_payment,
};
use crate::configuration::PaymentSettings;
use crate::errors::GenericError;
use crate::schemas::{GenericResponse, StaffAccount};

#[utoipa::path(
    post,
    path = "/payment/qr/generate",
    tag = "Payment",
    description = "Idempotent generate-or-fetch of the self-issued payment QR for an order. Safe to call from two browser tabs at once.",
    summary = "Generate Payment QR Request",
    request_body(content = GenerateQrRequest, description = "Request Body"),
    responses(
        (status=200, description= "Payment QR Response", body= GenericResponse<QrArtifactData>),
        (status=409, description= "Invalid state", body= GenericResponse<TupleUnit>),
        (status=410, description= "Data not found", body= GenericResponse<TupleUnit>),
        (status=500, description= "Internal Server Error", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "payment qr generate", skip(pool, payment_settings), fields(order_id = body.order_id))]
pub async fn payment_qr_generate(
    body: GenerateQrRequest,
    pool: web::Data<PgPool>,
    payment_settings: web::Data<PaymentSettings>,
) -> Result<web::Json<GenericResponse<QrArtifactData>>, GenericError> {
    let artifact = generate_or_fetch_qr(&pool, body.order_id, &payment_settings.base_url).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully issued payment QR",
        Some(artifact),
    )))
}

#[utoipa::path(
    get,
    path = "/payment/order/{order_id}",
    tag = "Payment",
    params(("order_id" = i64, Path, description = "Order id")),
    responses(
        (status=200, description= "Payment Fetch Response", body= GenericResponse<PaymentData>),
        (status=410, description= "Data not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "payment fetch by order", skip(pool))]
pub async fn payment_fetch_by_order(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<web::Json<GenericResponse<PaymentData>>, GenericError> {
    let order_id = path.into_inner();
    let payment = fetch_payment_by_order(&pool, order_id)
        .await
        .map_err(|e| GenericError::DatabaseError("Failed to fetch the payment".to_string(), e))?
        .ok_or_else(|| {
            GenericError::DataNotFound(format!("No payment was found for order {}", order_id))
        })?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched payment",
        Some(payment.into_schema()),
    )))
}

#[utoipa::path(
    post,
    path = "/payment/list",
    tag = "Payment",
    request_body(content = PaymentListRequest, description = "Request Body"),
    responses(
        (status=200, description= "Payment List Response", body= GenericResponse<Vec<PaymentData>>),
    )
)]
#[tracing::instrument(name = "payment list", skip(pool))]
pub async fn payment_list(
    body: PaymentListRequest,
    pool: web::Data<PgPool>,
    staff: StaffAccount,
) -> Result<web::Json<GenericResponse<Vec<PaymentData>>>, GenericError> {
    let payments = list_payments(&pool, staff.restaurant_id, &body)
        .await
        .map_err(|e| GenericError::DatabaseError("Failed to fetch payment list".to_string(), e))?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched payments",
        Some(payments),
    )))
}

#[utoipa::path(
    post,
    path = "/payment/proof/{id}",
    tag = "Payment",
    description = "Stores a customer comprobante against an existing pending payment.",
    params(("id" = i64, Path, description = "Payment id")),
    request_body(content = UploadProofRequest, description = "Request Body"),
    responses(
        (status=200, description= "Proof Upload Response", body= GenericResponse<PaymentData>),
        (status=403, description= "Insufficient Previlege", body= GenericResponse<TupleUnit>),
        (status=409, description= "Invalid state", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "payment proof upload", skip(pool))]
pub async fn payment_proof_upload(
    path: web::Path<i64>,
    body: UploadProofRequest,
    pool: web::Data<PgPool>,
    staff: StaffAccount,
) -> Result<web::Json<GenericResponse<PaymentData>>, GenericError> {
    if !staff.role.can_manage() {
        return Err(GenericError::InsufficientPrevilege(
            "Only admins and managers can upload payment proofs".to_string(),
        ));
    }
    let payment = upload_proof(
        &pool,
        path.into_inner(),
        staff.restaurant_id,
        &body.proof_image_url,
    )
    .await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully stored comprobante",
        Some(payment),
    )))
}

#[utoipa::path(
    post,
    path = "/payment/proof/order/{order_id}",
    tag = "Payment",
    description = "First-upload path: registers the payment for an order when none exists yet and stores the comprobante.",
    params(("order_id" = i64, Path, description = "Order id")),
    request_body(content = OrderProofUploadRequest, description = "Request Body"),
    responses(
        (status=200, description= "Proof Upload Response", body= GenericResponse<PaymentData>),
        (status=400, description= "Invalid Request body", body= GenericResponse<TupleUnit>),
        (status=403, description= "Insufficient Previlege", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "payment proof upload for order", skip(pool))]
pub async fn payment_proof_upload_for_order(
    path: web::Path<i64>,
    body: OrderProofUploadRequest,
    pool: web::Data<PgPool>,
    staff: StaffAccount,
) -> Result<web::Json<GenericResponse<PaymentData>>, GenericError> {
    if !staff.role.can_manage() {
        return Err(GenericError::InsufficientPrevilege(
            "Only admins and managers can upload payment proofs".to_string(),
        ));
    }
    let payment =
        upload_proof_for_order(&pool, path.into_inner(), staff.restaurant_id, &body).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully stored comprobante",
        Some(payment),
    )))
}

#[utoipa::path(
    post,
    path = "/payment/verify/{id}",
    tag = "Payment",
    params(("id" = i64, Path, description = "Payment id")),
    responses(
        (status=200, description= "Payment Verify Response", body= GenericResponse<PaymentData>),
        (status=409, description= "Invalid state", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "payment verify", skip(pool))]
pub async fn payment_verify(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
    staff: StaffAccount,
) -> Result<web::Json<GenericResponse<PaymentData>>, GenericError> {
    if !staff.role.can_manage() {
        return Err(GenericError::InsufficientPrevilege(
            "Only admins and managers can verify payments".to_string(),
        ));
    }
    let payment = verify_payment(&pool, path.into_inner(), staff.restaurant_id).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully verified payment",
        Some(payment),
    )))
}

#[utoipa::path(
    post,
    path = "/payment/confirm/{id}",
    tag = "Payment",
    description = "Marks the payment completed and mirrors `paid` onto the order in one transaction.",
    params(("id" = i64, Path, description = "Payment id")),
    request_body(content = ConfirmPaymentRequest, description = "Request Body"),
    responses(
        (status=200, description= "Payment Confirm Response", body= GenericResponse<PaymentWithOrderData>),
        (status=403, description= "Insufficient Previlege", body= GenericResponse<TupleUnit>),
        (status=409, description= "Invalid state", body= GenericResponse<TupleUnit>),
        (status=410, description= "Data not found", body= GenericResponse<TupleUnit>),
        (status=500, description= "Internal Server Error", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "payment confirm", skip(pool))]
pub async fn payment_confirm(
    path: web::Path<i64>,
    body: ConfirmPaymentRequest,
    pool: web::Data<PgPool>,
    staff: StaffAccount,
) -> Result<web::Json<GenericResponse<PaymentWithOrderData>>, GenericError> {
    if !staff.role.can_manage() {
        return Err(GenericError::InsufficientPrevilege(
            "Only admins and managers can confirm payments".to_string(),
        ));
    }
    let data = confirm_payment(
        &pool,
        path.into_inner(),
        staff.restaurant_id,
        staff.id,
        body.notes.as_deref(),
    )
    .await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully confirmed payment",
        Some(data),
    )))
}

#[utoipa::path(
    post,
    path = "/payment/reject/{id}",
    tag = "Payment",
    description = "Marks the payment failed and mirrors the failure onto the order. Repeat rejections are no-op successes.",
    params(("id" = i64, Path, description = "Payment id")),
    request_body(content = RejectPaymentRequest, description = "Request Body"),
    responses(
        (status=200, description= "Payment Reject Response", body= GenericResponse<PaymentWithOrderData>),
        (status=403, description= "Insufficient Previlege", body= GenericResponse<TupleUnit>),
        (status=409, description= "Invalid state", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "payment reject", skip(pool))]
pub async fn payment_reject(
    path: web::Path<i64>,
    body: RejectPaymentRequest,
    pool: web::Data<PgPool>,
    staff: StaffAccount,
) -> Result<web::Json<GenericResponse<PaymentWithOrderData>>, GenericError> {
    if !staff.role.can_manage() {
        return Err(GenericError::InsufficientPrevilege(
            "Only admins and managers can reject payments".to_string(),
        ));
    }
    let data = reject_payment(&pool, path.into_inner(), staff.restaurant_id, &body.reason).await?;
    Ok(web::Json(GenericResponse::success(
        "Payment rejected",
        Some(data),
    )))
}

#[utoipa::path(
    post,
    path = "/payment/qr/regenerate/{id}",
    tag = "Payment",
    params(("id" = i64, Path, description = "Payment id")),
    responses(
        (status=200, description= "Payment QR Response", body= GenericResponse<QrArtifactData>),
        (status=409, description= "Invalid state", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "payment qr regenerate", skip(pool, payment_settings))]
pub async fn payment_qr_regenerate(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
    payment_settings: web::Data<PaymentSettings>,
    staff: StaffAccount,
) -> Result<web::Json<GenericResponse<QrArtifactData>>, GenericError> {
    if !staff.role.can_manage() {
        return Err(GenericError::InsufficientPrevilege(
            "Only admins and managers can regenerate payment QRs".to_string(),
        ));
    }
    let artifact = regenerate_qr(
        &pool,
        path.into_inner(),
        staff.restaurant_id,
        &payment_settings.base_url,
    )
    .await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully regenerated payment QR",
        Some(artifact),
    )))
}
