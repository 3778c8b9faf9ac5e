use crate::errors::GenericError;
use crate::routes::order::schemas::{OrderData, OrderPaymentStatus};
use crate::utils::pascal_to_snake_case;
use actix_http::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethodType {
    QrCode,
    Cash,
    Card,
    Transfer,
}

impl PaymentMethodType {
    /// Only QR and bank-transfer payments carry an uploaded comprobante;
    /// cash and card settle at the counter and are confirmed directly.
    pub fn supports_proof_upload(self) -> bool {
        matches!(self, PaymentMethodType::QrCode | PaymentMethodType::Transfer)
    }
}

/// Settlement lifecycle of a payment. Two legal routes to `completed`: the
/// manual comprobante path walks qr_uploaded and verified, while a
/// generated-QR payment may be confirmed straight from pending when the
/// settlement signal arrives out of band. The dashboard labels `completed`
/// as `paid`; both spellings deserialize to the same state.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_stage", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStageType {
    Pending,
    QrUploaded,
    Verified,
    #[serde(alias = "paid")]
    Completed,
    Failed,
}

impl PaymentStageType {
    pub fn is_terminal(self) -> bool {
        matches!(self, PaymentStageType::Completed | PaymentStageType::Failed)
    }

    pub fn can_transition_to(self, next: PaymentStageType) -> bool {
        use PaymentStageType::*;
        matches!(
            (self, next),
            (Pending, QrUploaded)
                | (QrUploaded, Verified)
                | (Pending, Completed)
                | (QrUploaded, Completed)
                | (Verified, Completed)
                | (Pending, Failed)
                | (QrUploaded, Failed)
                | (Verified, Failed)
        )
    }

    /// The order-side mirror derived from terminal stages. Non-terminal
    /// stages leave the mirror untouched.
    pub fn as_order_payment_status(self) -> Option<OrderPaymentStatus> {
        match self {
            PaymentStageType::Completed => Some(OrderPaymentStatus::Paid),
            PaymentStageType::Failed => Some(OrderPaymentStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentStageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", pascal_to_snake_case(&format!("{:?}", self)))
    }
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQrRequest {
    pub order_id: i64,
}

impl FromRequest for GenerateQrRequest {
    type Error = GenericError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = web::Json::<Self>::from_request(req, payload);

        Box::pin(async move {
            match fut.await {
                Ok(json) => Ok(json.into_inner()),
                Err(e) => Err(GenericError::ValidationError(e.to_string())),
            }
        })
    }
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadProofRequest {
    pub proof_image_url: String,
}

impl FromRequest for UploadProofRequest {
    type Error = GenericError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = web::Json::<Self>::from_request(req, payload);

        Box::pin(async move {
            match fut.await {
                Ok(json) => Ok(json.into_inner()),
                Err(e) => Err(GenericError::ValidationError(e.to_string())),
            }
        })
    }
}

/// First-upload entry point: creates the payment row for the order when none
/// exists yet. The declared amount is checked against the order total.
#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderProofUploadRequest {
    pub payment_method: Option<PaymentMethodType>,
    #[schema(value_type = String)]
    pub amount: BigDecimal,
    pub proof_image_url: String,
}

impl FromRequest for OrderProofUploadRequest {
    type Error = GenericError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = web::Json::<Self>::from_request(req, payload);

        Box::pin(async move {
            match fut.await {
                Ok(json) => Ok(json.into_inner()),
                Err(e) => Err(GenericError::ValidationError(e.to_string())),
            }
        })
    }
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    pub notes: Option<String>,
}

impl FromRequest for ConfirmPaymentRequest {
    type Error = GenericError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = web::Json::<Self>::from_request(req, payload);

        Box::pin(async move {
            match fut.await {
                Ok(json) => Ok(json.into_inner()),
                Err(e) => Err(GenericError::ValidationError(e.to_string())),
            }
        })
    }
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectPaymentRequest {
    pub reason: String,
}

impl FromRequest for RejectPaymentRequest {
    type Error = GenericError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = web::Json::<Self>::from_request(req, payload);

        Box::pin(async move {
            match fut.await {
                Ok(json) => Ok(json.into_inner()),
                Err(e) => Err(GenericError::ValidationError(e.to_string())),
            }
        })
    }
}

fn default_list_limit() -> i64 {
    50
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentListRequest {
    pub status: Option<PaymentStageType>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl FromRequest for PaymentListRequest {
    type Error = GenericError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = web::Json::<Self>::from_request(req, payload);

        Box::pin(async move {
            match fut.await {
                Ok(json) => Ok(json.into_inner()),
                Err(e) => Err(GenericError::ValidationError(e.to_string())),
            }
        })
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct PaymentData {
    pub id: i64,
    pub order_id: i64,
    #[schema(value_type = String)]
    pub amount: BigDecimal,
    pub payment_method: PaymentMethodType,
    pub qr_image_url: Option<String>,
    pub payment_url: Option<String>,
    pub status: PaymentStageType,
    pub failure_reason: Option<String>,
    pub confirmed_by: Option<i64>,
    pub notes: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub verified_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QrArtifactData {
    pub payment: PaymentData,
    pub qr_code: String,
    pub payment_url: String,
}

/// Returned by the operations that settle a payment and mirror the result
/// onto the order in the same transaction.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentWithOrderData {
    pub payment: PaymentData,
    pub order: OrderData,
}
