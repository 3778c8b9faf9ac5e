use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;

use super::schemas::{PaymentData, PaymentMethodType, PaymentStageType};

#[derive(Deserialize, Debug, FromRow)]
pub struct PaymentModel {
    pub id: i64,
    pub order_id: i64,
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

impl PaymentModel {
    pub fn into_schema(self) -> PaymentData {
        PaymentData {
            id: self.id,
            order_id: self.order_id,
            amount: self.amount,
            payment_method: self.payment_method,
            qr_image_url: self.qr_image_url,
            payment_url: self.payment_url,
            status: self.status,
            failure_reason: self.failure_reason,
            confirmed_by: self.confirmed_by,
            notes: self.notes,
            uploaded_at: self.uploaded_at,
            verified_at: self.verified_at,
            confirmed_at: self.confirmed_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
