use super::errors::PaymentFlowError;
use super::models::PaymentModel;
use super::schemas::{
    OrderProofUploadRequest, PaymentData, PaymentListRequest, PaymentMethodType, PaymentStageType,
    PaymentWithOrderData, QrArtifactData,
};
use crate::constants::{QR_IMAGE_DIMENSION, TOTAL_EPSILON};
use crate::routes::order::models::OrderModel;
use crate::routes::order::schemas::{OrderPaymentStatus, OrderStatusType};
use crate::routes::order::utils::fetch_order_for_update;
use anyhow::Context;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use qrcode::render::svg;
use qrcode::QrCode;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

/// Self-issued payment URL. The timestamp is cache-busting for QR scanners,
/// not an authentication token.
pub fn generate_payment_url(order_id: i64, base_url: &str) -> String {
    format!(
        "{}/pay/{}?ts={}",
        base_url,
        order_id,
        Utc::now().timestamp_millis()
    )
}

pub fn render_qr_data_url(payment_url: &str) -> Result<String, anyhow::Error> {
    let code = QrCode::new(payment_url.as_bytes())
        .context("Failed to encode the payment URL as a QR code")?;
    let image = code
        .render::<svg::Color>()
        .min_dimensions(QR_IMAGE_DIMENSION, QR_IMAGE_DIMENSION)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();
    Ok(format!(
        "data:image/svg+xml;base64,{}",
        STANDARD.encode(image)
    ))
}

#[tracing::instrument(name = "Fetch payment by order", skip(pool))]
pub async fn fetch_payment_by_order(
    pool: &PgPool,
    order_id: i64,
) -> Result<Option<PaymentModel>, anyhow::Error> {
    let payment = sqlx::query_as::<_, PaymentModel>("SELECT * FROM payments WHERE order_id = $1")
        .bind(order_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while fetching the payment")
        })?;

    Ok(payment)
}

#[tracing::instrument(name = "Fetch payment by order with lock", skip(transaction))]
async fn fetch_payment_by_order_for_update(
    transaction: &mut Transaction<'_, Postgres>,
    order_id: i64,
) -> Result<Option<PaymentModel>, anyhow::Error> {
    let payment = sqlx::query_as::<_, PaymentModel>(
        "SELECT * FROM payments WHERE order_id = $1 FOR UPDATE",
    )
    .bind(order_id)
    .fetch_optional(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while locking the payment row")
    })?;

    Ok(payment)
}

pub struct LockedPaymentOrder {
    pub payment: PaymentModel,
    pub order: OrderModel,
}

/// Locks both rows a settlement operation touches, always order first so
/// that payment-side and order-side flows cannot deadlock each other.
#[tracing::instrument(name = "Lock payment and order", skip(transaction))]
async fn get_payment_with_lock(
    transaction: &mut Transaction<'_, Postgres>,
    payment_id: i64,
) -> Result<Option<LockedPaymentOrder>, anyhow::Error> {
    let preview = sqlx::query_as::<_, PaymentModel>("SELECT * FROM payments WHERE id = $1")
        .bind(payment_id)
        .fetch_optional(&mut **transaction)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while fetching the payment")
        })?;
    let preview = match preview {
        Some(payment) => payment,
        None => return Ok(None),
    };

    let order = fetch_order_for_update(transaction, preview.order_id)
        .await?
        .context("Payment references an order that no longer exists")?;

    // Re-read under the lock; the preview may be stale by now.
    let payment = sqlx::query_as::<_, PaymentModel>(
        "SELECT * FROM payments WHERE id = $1 FOR UPDATE",
    )
    .bind(payment_id)
    .fetch_one(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while locking the payment row")
    })?;

    Ok(Some(LockedPaymentOrder { payment, order }))
}

/// Idempotent generate-or-fetch for the public ordering flow. Two racing
/// calls for the same order produce exactly one payment row: the existence
/// check, the insert and its conflict guard all run under the order lock in
/// one transaction.
#[tracing::instrument(name = "Generate or fetch payment QR", skip(pool))]
pub async fn generate_or_fetch_qr(
    pool: &PgPool,
    order_id: i64,
    base_url: &str,
) -> Result<QrArtifactData, PaymentFlowError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    let order = fetch_order_for_update(&mut transaction, order_id)
        .await
        .map_err(|e| PaymentFlowError::DatabaseError("Failed to fetch the order".to_string(), e))?
        .ok_or_else(|| {
            PaymentFlowError::NotFound(format!("Order {} was not found", order_id))
        })?;

    if order.status == OrderStatusType::Cancelled {
        return Err(PaymentFlowError::InvalidState(
            "cannot issue a payment QR for a cancelled order".to_string(),
        ));
    }

    if let Some(existing) = fetch_payment_by_order_for_update(&mut transaction, order_id)
        .await
        .map_err(|e| {
            PaymentFlowError::DatabaseError("Failed to fetch the payment".to_string(), e)
        })?
    {
        if existing.status != PaymentStageType::Pending {
            return Err(PaymentFlowError::InvalidState(format!(
                "a payment for order {} already exists and is {}",
                order_id, existing.status
            )));
        }
        let payment_url = existing.payment_url.clone().unwrap_or_default();
        let qr_code = existing.qr_image_url.clone().unwrap_or_default();
        transaction
            .commit()
            .await
            .context("Failed to commit SQL transaction for the payment QR")?;
        return Ok(QrArtifactData {
            payment: existing.into_schema(),
            qr_code,
            payment_url,
        });
    }

    let payment_url = generate_payment_url(order_id, base_url);
    let qr_code = render_qr_data_url(&payment_url)?;
    let inserted = sqlx::query_as::<_, PaymentModel>(
        r#"
        INSERT INTO payments (order_id, amount, payment_method, qr_image_url, payment_url, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (order_id)
        DO NOTHING
        RETURNING *
        "#,
    )
    .bind(order_id)
    .bind(&order.total_amount)
    .bind(PaymentMethodType::QrCode)
    .bind(&qr_code)
    .bind(&payment_url)
    .bind(PaymentStageType::Pending)
    .fetch_optional(&mut *transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        PaymentFlowError::DatabaseError(
            "Failed to save the payment".to_string(),
            anyhow::Error::new(e),
        )
    })?;

    let payment = match inserted {
        Some(payment) => payment,
        // Conflict guard fired: another request created the row first.
        None => fetch_payment_by_order_for_update(&mut transaction, order_id)
            .await
            .map_err(|e| {
                PaymentFlowError::DatabaseError("Failed to fetch the payment".to_string(), e)
            })?
            .context("Payment row vanished after a conflicting insert")?,
    };

    let payment_url = payment.payment_url.clone().unwrap_or_default();
    let qr_code = payment.qr_image_url.clone().unwrap_or_default();

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction for the payment QR")?;

    Ok(QrArtifactData {
        payment: payment.into_schema(),
        qr_code,
        payment_url,
    })
}

#[tracing::instrument(name = "Upload payment proof", skip(pool))]
pub async fn upload_proof(
    pool: &PgPool,
    payment_id: i64,
    restaurant_id: i64,
    proof_image_url: &str,
) -> Result<PaymentData, PaymentFlowError> {
    if proof_image_url.trim().is_empty() {
        return Err(PaymentFlowError::ValidationError(
            "A comprobante image reference is required".to_string(),
        ));
    }

    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    let locked = get_payment_with_lock(&mut transaction, payment_id)
        .await
        .map_err(|e| {
            PaymentFlowError::DatabaseError("Failed to fetch the payment".to_string(), e)
        })?;
    let locked = match locked {
        Some(locked) if locked.order.restaurant_id == restaurant_id => locked,
        _ => {
            return Err(PaymentFlowError::NotFound(format!(
                "Payment {} was not found",
                payment_id
            )))
        }
    };

    if !locked.payment.payment_method.supports_proof_upload() {
        return Err(PaymentFlowError::InvalidState(format!(
            "{:?} payments do not take an uploaded comprobante",
            locked.payment.payment_method
        )));
    }
    if !locked
        .payment
        .status
        .can_transition_to(PaymentStageType::QrUploaded)
    {
        return Err(PaymentFlowError::InvalidState(format!(
            "cannot upload a comprobante for a payment that is {}",
            locked.payment.status
        )));
    }

    let updated = sqlx::query_as::<_, PaymentModel>(
        r#"
        UPDATE payments
        SET qr_image_url = $1, status = $2, uploaded_at = now(), updated_at = now()
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(proof_image_url)
    .bind(PaymentStageType::QrUploaded)
    .bind(payment_id)
    .fetch_one(&mut *transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        PaymentFlowError::DatabaseError(
            "Failed to store the comprobante".to_string(),
            anyhow::Error::new(e),
        )
    })?;

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction for the comprobante upload")?;

    Ok(updated.into_schema())
}

/// First-upload path: creates the payment row when the order has none yet.
/// The declared amount must match the order total, re-checked against the
/// row read under the lock rather than trusted from the client.
#[tracing::instrument(name = "Upload payment proof for order", skip(pool))]
pub async fn upload_proof_for_order(
    pool: &PgPool,
    order_id: i64,
    restaurant_id: i64,
    request: &OrderProofUploadRequest,
) -> Result<PaymentData, PaymentFlowError> {
    if request.proof_image_url.trim().is_empty() {
        return Err(PaymentFlowError::ValidationError(
            "A comprobante image reference is required".to_string(),
        ));
    }

    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    let order = fetch_order_for_update(&mut transaction, order_id)
        .await
        .map_err(|e| PaymentFlowError::DatabaseError("Failed to fetch the order".to_string(), e))?;
    let order = match order {
        Some(order) if order.restaurant_id == restaurant_id => order,
        _ => {
            return Err(PaymentFlowError::NotFound(format!(
                "Order {} was not found",
                order_id
            )))
        }
    };
    if order.status == OrderStatusType::Cancelled {
        return Err(PaymentFlowError::InvalidState(
            "cannot register a payment for a cancelled order".to_string(),
        ));
    }

    if (&request.amount - &order.total_amount).abs() > *TOTAL_EPSILON {
        return Err(PaymentFlowError::ValidationError(format!(
            "Declared amount {} does not match the order total {}",
            request.amount, order.total_amount
        )));
    }

    let method = request.payment_method.unwrap_or(PaymentMethodType::QrCode);
    if !method.supports_proof_upload() {
        return Err(PaymentFlowError::InvalidState(format!(
            "{:?} payments do not take an uploaded comprobante",
            method
        )));
    }

    let existing = fetch_payment_by_order_for_update(&mut transaction, order_id)
        .await
        .map_err(|e| {
            PaymentFlowError::DatabaseError("Failed to fetch the payment".to_string(), e)
        })?;

    let updated = match existing {
        None => sqlx::query_as::<_, PaymentModel>(
            r#"
            INSERT INTO payments (order_id, amount, payment_method, qr_image_url, status, uploaded_at)
            VALUES ($1, $2, $3, $4, $5, now())
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(&order.total_amount)
        .bind(method)
        .bind(&request.proof_image_url)
        .bind(PaymentStageType::QrUploaded)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            PaymentFlowError::DatabaseError(
                "Failed to save the payment".to_string(),
                anyhow::Error::new(e),
            )
        })?,
        Some(payment) => {
            if !payment.status.can_transition_to(PaymentStageType::QrUploaded) {
                return Err(PaymentFlowError::InvalidState(format!(
                    "cannot upload a comprobante for a payment that is {}",
                    payment.status
                )));
            }
            sqlx::query_as::<_, PaymentModel>(
                r#"
                UPDATE payments
                SET qr_image_url = $1, payment_method = $2, status = $3, uploaded_at = now(), updated_at = now()
                WHERE id = $4
                RETURNING *
                "#,
            )
            .bind(&request.proof_image_url)
            .bind(method)
            .bind(PaymentStageType::QrUploaded)
            .bind(payment.id)
            .fetch_one(&mut *transaction)
            .await
            .map_err(|e| {
                tracing::error!("Failed to execute query: {:?}", e);
                PaymentFlowError::DatabaseError(
                    "Failed to store the comprobante".to_string(),
                    anyhow::Error::new(e),
                )
            })?
        }
    };

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction for the comprobante upload")?;

    Ok(updated.into_schema())
}

#[tracing::instrument(name = "Verify payment", skip(pool))]
pub async fn verify_payment(
    pool: &PgPool,
    payment_id: i64,
    restaurant_id: i64,
) -> Result<PaymentData, PaymentFlowError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    let locked = get_payment_with_lock(&mut transaction, payment_id)
        .await
        .map_err(|e| {
            PaymentFlowError::DatabaseError("Failed to fetch the payment".to_string(), e)
        })?;
    let locked = match locked {
        Some(locked) if locked.order.restaurant_id == restaurant_id => locked,
        _ => {
            return Err(PaymentFlowError::NotFound(format!(
                "Payment {} was not found",
                payment_id
            )))
        }
    };

    if !locked
        .payment
        .status
        .can_transition_to(PaymentStageType::Verified)
    {
        return Err(PaymentFlowError::InvalidState(format!(
            "cannot verify a payment that is {}",
            locked.payment.status
        )));
    }

    let updated = sqlx::query_as::<_, PaymentModel>(
        "UPDATE payments SET status = $1, verified_at = now(), updated_at = now() WHERE id = $2 RETURNING *",
    )
    .bind(PaymentStageType::Verified)
    .bind(payment_id)
    .fetch_one(&mut *transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        PaymentFlowError::DatabaseError(
            "Failed to verify the payment".to_string(),
            anyhow::Error::new(e),
        )
    })?;

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction for the payment verification")?;

    Ok(updated.into_schema())
}

/// Settles the payment and mirrors `paid` onto the order as one unit: either
/// both rows change or neither does.
#[tracing::instrument(name = "Confirm payment", skip(pool))]
pub async fn confirm_payment(
    pool: &PgPool,
    payment_id: i64,
    restaurant_id: i64,
    confirmed_by: i64,
    notes: Option<&str>,
) -> Result<PaymentWithOrderData, PaymentFlowError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    let locked = get_payment_with_lock(&mut transaction, payment_id)
        .await
        .map_err(|e| {
            PaymentFlowError::DatabaseError("Failed to fetch the payment".to_string(), e)
        })?;
    let locked = match locked {
        Some(locked) if locked.order.restaurant_id == restaurant_id => locked,
        _ => {
            return Err(PaymentFlowError::NotFound(format!(
                "Payment {} was not found",
                payment_id
            )))
        }
    };

    if !locked
        .payment
        .status
        .can_transition_to(PaymentStageType::Completed)
    {
        return Err(PaymentFlowError::InvalidState(format!(
            "cannot confirm a payment that is {}",
            locked.payment.status
        )));
    }
    if (&locked.payment.amount - &locked.order.total_amount).abs() > *TOTAL_EPSILON {
        return Err(PaymentFlowError::ValidationError(format!(
            "Payment amount {} no longer matches the order total {}",
            locked.payment.amount, locked.order.total_amount
        )));
    }

    let payment = sqlx::query_as::<_, PaymentModel>(
        r#"
        UPDATE payments
        SET status = $1, confirmed_by = $2, notes = COALESCE($3, notes), confirmed_at = now(), updated_at = now()
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(PaymentStageType::Completed)
    .bind(confirmed_by)
    .bind(notes)
    .bind(payment_id)
    .fetch_one(&mut *transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        PaymentFlowError::DatabaseError(
            "Failed to confirm the payment".to_string(),
            anyhow::Error::new(e),
        )
    })?;

    let order = sqlx::query_as::<_, OrderModel>(
        "UPDATE orders SET payment_status = $1, updated_at = now() WHERE id = $2 RETURNING *",
    )
    .bind(OrderPaymentStatus::Paid)
    .bind(payment.order_id)
    .fetch_one(&mut *transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        PaymentFlowError::DatabaseError(
            "Failed to mirror the payment status onto the order".to_string(),
            anyhow::Error::new(e),
        )
    })?;

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction for the payment confirmation")?;

    Ok(PaymentWithOrderData {
        payment: payment.into_schema(),
        order: order.into_schema(),
    })
}

/// Rejection, mirrored onto the order like confirmation. Rejecting an
/// already-failed payment is a no-op success: the first recorded reason
/// stays, so client retries are cheap.
#[tracing::instrument(name = "Reject payment", skip(pool))]
pub async fn reject_payment(
    pool: &PgPool,
    payment_id: i64,
    restaurant_id: i64,
    reason: &str,
) -> Result<PaymentWithOrderData, PaymentFlowError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    let locked = get_payment_with_lock(&mut transaction, payment_id)
        .await
        .map_err(|e| {
            PaymentFlowError::DatabaseError("Failed to fetch the payment".to_string(), e)
        })?;
    let locked = match locked {
        Some(locked) if locked.order.restaurant_id == restaurant_id => locked,
        _ => {
            return Err(PaymentFlowError::NotFound(format!(
                "Payment {} was not found",
                payment_id
            )))
        }
    };

    if locked.payment.status == PaymentStageType::Failed {
        transaction
            .commit()
            .await
            .context("Failed to commit SQL transaction for the payment rejection")?;
        return Ok(PaymentWithOrderData {
            payment: locked.payment.into_schema(),
            order: locked.order.into_schema(),
        });
    }

    if !locked
        .payment
        .status
        .can_transition_to(PaymentStageType::Failed)
    {
        return Err(PaymentFlowError::InvalidState(format!(
            "cannot reject a payment that is {}",
            locked.payment.status
        )));
    }

    let payment = sqlx::query_as::<_, PaymentModel>(
        r#"
        UPDATE payments
        SET status = $1, failure_reason = $2, updated_at = now()
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(PaymentStageType::Failed)
    .bind(reason)
    .bind(payment_id)
    .fetch_one(&mut *transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        PaymentFlowError::DatabaseError(
            "Failed to reject the payment".to_string(),
            anyhow::Error::new(e),
        )
    })?;

    let order = sqlx::query_as::<_, OrderModel>(
        "UPDATE orders SET payment_status = $1, updated_at = now() WHERE id = $2 RETURNING *",
    )
    .bind(OrderPaymentStatus::Failed)
    .bind(payment.order_id)
    .fetch_one(&mut *transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        PaymentFlowError::DatabaseError(
            "Failed to mirror the payment status onto the order".to_string(),
            anyhow::Error::new(e),
        )
    })?;

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction for the payment rejection")?;

    Ok(PaymentWithOrderData {
        payment: payment.into_schema(),
        order: order.into_schema(),
    })
}

/// Re-issues the QR artifact for a payment whose first code expired or would
/// not scan. Status is left untouched.
#[tracing::instrument(name = "Regenerate payment QR", skip(pool))]
pub async fn regenerate_qr(
    pool: &PgPool,
    payment_id: i64,
    restaurant_id: i64,
    base_url: &str,
) -> Result<QrArtifactData, PaymentFlowError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    let locked = get_payment_with_lock(&mut transaction, payment_id)
        .await
        .map_err(|e| {
            PaymentFlowError::DatabaseError("Failed to fetch the payment".to_string(), e)
        })?;
    let locked = match locked {
        Some(locked) if locked.order.restaurant_id == restaurant_id => locked,
        _ => {
            return Err(PaymentFlowError::NotFound(format!(
                "Payment {} was not found",
                payment_id
            )))
        }
    };

    if locked.payment.status != PaymentStageType::Pending {
        return Err(PaymentFlowError::InvalidState(format!(
            "only pending payments can get a new QR code, this one is {}",
            locked.payment.status
        )));
    }

    let payment_url = generate_payment_url(locked.payment.order_id, base_url);
    let qr_code = render_qr_data_url(&payment_url)?;

    let payment = sqlx::query_as::<_, PaymentModel>(
        r#"
        UPDATE payments
        SET qr_image_url = $1, payment_url = $2, updated_at = now()
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(&qr_code)
    .bind(&payment_url)
    .bind(payment_id)
    .fetch_one(&mut *transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        PaymentFlowError::DatabaseError(
            "Failed to store the regenerated QR".to_string(),
            anyhow::Error::new(e),
        )
    })?;

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction for the QR regeneration")?;

    Ok(QrArtifactData {
        payment: payment.into_schema(),
        qr_code,
        payment_url,
    })
}

/// Called by order cancellation inside its transaction. The payment row is
/// kept as an audit record; a live payment is closed out as failed, an
/// already-failed one keeps its original reason. Returns the stage the
/// payment was in before the update so the caller can derive the order-side
/// mirror.
#[tracing::instrument(name = "Fail payment on cancellation", skip(transaction))]
pub async fn fail_payment_on_cancellation(
    transaction: &mut Transaction<'_, Postgres>,
    order_id: i64,
    reason: &str,
) -> Result<Option<PaymentStageType>, anyhow::Error> {
    let payment = fetch_payment_by_order_for_update(transaction, order_id).await?;
    let payment = match payment {
        Some(payment) => payment,
        None => return Ok(None),
    };

    let prior_stage = payment.status;
    if prior_stage == PaymentStageType::Failed {
        return Ok(Some(prior_stage));
    }

    let query = sqlx::query(
        "UPDATE payments SET status = $1, failure_reason = $2, updated_at = now() WHERE id = $3",
    )
    .bind(PaymentStageType::Failed)
    .bind(format!("order cancelled: {}", reason))
    .bind(payment.id);

    query.execute(&mut **transaction).await.map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while closing out the payment")
    })?;

    Ok(Some(prior_stage))
}

#[tracing::instrument(name = "List payments", skip(pool))]
pub async fn list_payments(
    pool: &PgPool,
    restaurant_id: i64,
    filter: &PaymentListRequest,
) -> Result<Vec<PaymentData>, anyhow::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT p.* FROM payments p JOIN orders o ON p.order_id = o.id WHERE o.restaurant_id = ",
    );
    builder.push_bind(restaurant_id);
    if let Some(status) = filter.status {
        builder.push(" AND p.status = ").push_bind(status);
    }
    if let Some(start_date) = filter.start_date {
        builder.push(" AND p.created_at >= ").push_bind(start_date);
    }
    if let Some(end_date) = filter.end_date {
        builder.push(" AND p.created_at <= ").push_bind(end_date);
    }
    builder
        .push(" ORDER BY p.created_at DESC LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind(filter.offset);

    let payments = builder
        .build_query_as::<PaymentModel>()
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while listing payments")
        })?;

    Ok(payments.into_iter().map(PaymentModel::into_schema).collect())
}
