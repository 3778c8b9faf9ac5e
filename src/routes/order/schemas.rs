use std::collections::HashMap;

use crate::catalog_client::CatalogItem;
use crate::constants::{EMAIL_PATTERN, PHONE_PATTERN};
use crate::errors::GenericError;
use crate::utils::{pascal_to_snake_case, round_currency};
use actix_http::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fulfillment workflow of an order. Forward-only: the states model physical
/// kitchen progress, which cannot be undone except by cancelling.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatusType {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatusType {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatusType::Delivered | OrderStatusType::Cancelled)
    }

    /// Transition allow-list: one step forward, or cancel from any
    /// non-terminal state. Everything else is rejected.
    pub fn can_transition_to(self, next: OrderStatusType) -> bool {
        use OrderStatusType::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Confirmed, Preparing) | (Preparing, Ready) | (Ready, Delivered)
        ) || (!self.is_terminal() && next == Cancelled)
    }
}

impl std::fmt::Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", pascal_to_snake_case(&format!("{:?}", self)))
    }
}

/// Settlement mirror kept on the order row for fast filtering. Terminal
/// values are only ever derived from the linked payment's transitions.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderPaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl std::fmt::Display for OrderPaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", pascal_to_snake_case(&format!("{:?}", self)))
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct OrderLineItem {
    pub menu_item_id: i64,
    pub quantity: i32,
    #[schema(value_type = String)]
    pub unit_price: BigDecimal,
    pub notes: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub restaurant_id: i64,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub items: Vec<OrderLineItem>,
    #[schema(value_type = String)]
    pub total_amount: BigDecimal,
}

impl CreateOrderRequest {
    /// Field-level checks. Returns every violation at once so the ordering
    /// page can surface the full list instead of one error per round trip.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = vec![];

        if self.customer_name.trim().is_empty() {
            errors.push("Customer name is required".to_string());
        }

        if self.items.is_empty() {
            errors.push("An order needs at least one line item".to_string());
        }

        for item in &self.items {
            if item.quantity < 1 {
                errors.push(format!(
                    "Quantity for menu item {} must be at least 1",
                    item.menu_item_id
                ));
            }
            if item.unit_price < BigDecimal::from(0) {
                errors.push(format!(
                    "Unit price for menu item {} cannot be negative",
                    item.menu_item_id
                ));
            }
        }

        if self.total_amount <= BigDecimal::from(0) {
            errors.push("Order total must be greater than 0".to_string());
        }

        if let Some(phone) = &self.customer_phone {
            if !PHONE_PATTERN.is_match(phone) {
                errors.push("Phone number format is invalid".to_string());
            }
        }

        if let Some(email) = &self.customer_email {
            if !EMAIL_PATTERN.is_match(email) {
                errors.push("Email format is invalid".to_string());
            }
        }

        errors
    }
}

impl FromRequest for CreateOrderRequest {
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

/// Sum of unit_price x quantity across the cart. The two-decimal currency
/// rounding is applied once at the end, not per line.
pub fn calculate_order_total(items: &[OrderLineItem]) -> BigDecimal {
    let total = items
        .iter()
        .map(|item| &item.unit_price * BigDecimal::from(item.quantity))
        .sum::<BigDecimal>();
    round_currency(total)
}

/// Checks every line item against what the catalog advertises right now.
/// A missing row, an unavailable item, and a stale unit price are all
/// collected so the client sees the complete damage in one response.
pub fn validate_items_against_catalog(
    items: &[OrderLineItem],
    catalog: &HashMap<i64, CatalogItem>,
) -> Vec<String> {
    let mut errors = vec![];

    for item in items {
        match catalog.get(&item.menu_item_id) {
            None => errors.push(format!("Menu item {} was not found", item.menu_item_id)),
            Some(catalog_item) if !catalog_item.available => {
                errors.push(format!("{} is not available", catalog_item.name));
            }
            Some(catalog_item) if catalog_item.price != item.unit_price => {
                errors.push(format!(
                    "Price mismatch for menu item {} ({}): current price is {}",
                    item.menu_item_id, catalog_item.name, catalog_item.price
                ));
            }
            Some(_) => {}
        }
    }

    errors
}

#[derive(Serialize, Debug, ToSchema)]
pub struct OrderData {
    pub id: i64,
    pub restaurant_id: i64,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub items: Vec<OrderLineItem>,
    #[schema(value_type = String)]
    pub total_amount: BigDecimal,
    pub status: OrderStatusType,
    pub payment_status: OrderPaymentStatus,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdateRequest {
    pub status: OrderStatusType,
}

impl FromRequest for OrderStatusUpdateRequest {
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
pub struct CancelOrderRequest {
    pub reason: String,
}

impl FromRequest for CancelOrderRequest {
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
pub struct EditOrderRequest {
    pub items: Vec<OrderLineItem>,
}

impl FromRequest for EditOrderRequest {
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
pub struct OrderListRequest {
    pub status: Option<OrderStatusType>,
    pub payment_status: Option<OrderPaymentStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl FromRequest for OrderListRequest {
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
