use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;

use super::schemas::{OrderData, OrderLineItem, OrderPaymentStatus, OrderStatusType};

#[derive(Deserialize, Debug, FromRow)]
pub struct OrderModel {
    pub id: i64,
    pub restaurant_id: i64,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub items: sqlx::types::Json<Vec<OrderLineItem>>,
    pub total_amount: BigDecimal,
    pub status: OrderStatusType,
    pub payment_status: OrderPaymentStatus,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderModel {
    pub fn into_schema(self) -> OrderData {
        OrderData {
            id: self.id,
            restaurant_id: self.restaurant_id,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            customer_email: self.customer_email,
            items: self.items.0,
            total_amount: self.total_amount,
            status: self.status,
            payment_status: self.payment_status,
            cancellation_reason: self.cancellation_reason,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
