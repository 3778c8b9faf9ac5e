use std::collections::HashMap;

use super::errors::{EditOrderError, OrderCreationError, OrderStatusError};
use super::models::OrderModel;
use super::schemas::{
    calculate_order_total, validate_items_against_catalog, CreateOrderRequest, OrderData,
    OrderLineItem, OrderListRequest, OrderPaymentStatus, OrderStatusType,
};
use crate::catalog_client::CatalogService;
use crate::constants::TOTAL_EPSILON;
use crate::routes::payment::schemas::PaymentStageType;
use crate::routes::payment::utils::fail_payment_on_cancellation;
use anyhow::Context;
use bigdecimal::BigDecimal;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

#[tracing::instrument(name = "Save order", skip(transaction))]
pub async fn save_order(
    transaction: &mut Transaction<'_, Postgres>,
    request: &CreateOrderRequest,
    total_amount: &BigDecimal,
) -> Result<OrderModel, anyhow::Error> {
    let order = sqlx::query_as::<_, OrderModel>(
        r#"
        INSERT INTO orders (restaurant_id, customer_name, customer_phone, customer_email, items, total_amount, status, payment_status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(request.restaurant_id)
    .bind(&request.customer_name)
    .bind(&request.customer_phone)
    .bind(&request.customer_email)
    .bind(sqlx::types::Json(&request.items))
    .bind(total_amount)
    .bind(OrderStatusType::Pending)
    .bind(OrderPaymentStatus::Pending)
    .fetch_one(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while saving the order")
    })?;

    Ok(order)
}

#[tracing::instrument(name = "Fetch order", skip(pool))]
pub async fn fetch_order_by_id(
    pool: &PgPool,
    order_id: i64,
) -> Result<Option<OrderModel>, anyhow::Error> {
    let order = sqlx::query_as::<_, OrderModel>("SELECT * FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while fetching the order")
        })?;

    Ok(order)
}

#[tracing::instrument(name = "Fetch order with lock", skip(transaction))]
pub async fn fetch_order_for_update(
    transaction: &mut Transaction<'_, Postgres>,
    order_id: i64,
) -> Result<Option<OrderModel>, anyhow::Error> {
    let order = sqlx::query_as::<_, OrderModel>("SELECT * FROM orders WHERE id = $1 FOR UPDATE")
        .bind(order_id)
        .fetch_optional(&mut **transaction)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e)
                .context("A database failure occurred while locking the order row")
        })?;

    Ok(order)
}

/// Order intake: field validation, catalog re-validation, total gate, insert.
/// Everything runs before the write, and the write is transactional, so a
/// rejected order leaves nothing behind.
#[tracing::instrument(name = "Create order", skip(pool, catalog))]
pub async fn create_order(
    pool: &PgPool,
    catalog: &dyn CatalogService,
    request: &CreateOrderRequest,
) -> Result<OrderData, OrderCreationError> {
    let violations = request.validate();
    if !violations.is_empty() {
        return Err(OrderCreationError::ValidationError(violations.join("; ")));
    }

    let item_ids: Vec<i64> = request.items.iter().map(|i| i.menu_item_id).collect();
    let catalog_items = catalog
        .lookup_items(request.restaurant_id, &item_ids)
        .await
        .map_err(|e| {
            OrderCreationError::DatabaseError("Failed to fetch catalog items".to_string(), e)
        })?;
    let catalog_map: HashMap<i64, _> = catalog_items
        .into_iter()
        .map(|item| (item.id, item))
        .collect();

    let mismatches = validate_items_against_catalog(&request.items, &catalog_map);
    if !mismatches.is_empty() {
        return Err(OrderCreationError::ItemUnavailable(mismatches.join("; ")));
    }

    let calculated_total = calculate_order_total(&request.items);
    if (&calculated_total - &request.total_amount).abs() > *TOTAL_EPSILON {
        return Err(OrderCreationError::TotalMismatch(format!(
            "Declared total {} does not match the calculated total {}",
            request.total_amount, calculated_total
        )));
    }

    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;
    let order = save_order(&mut transaction, request, &calculated_total)
        .await
        .map_err(|e| OrderCreationError::DatabaseError("Failed to save the order".to_string(), e))?;
    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to store the order")?;

    Ok(order.into_schema())
}

#[tracing::instrument(name = "Get scoped order", skip(pool))]
pub async fn get_scoped_order(
    pool: &PgPool,
    order_id: i64,
    restaurant_id: i64,
) -> Result<OrderData, OrderStatusError> {
    let order = fetch_order_by_id(pool, order_id)
        .await
        .map_err(|e| OrderStatusError::DatabaseError("Failed to fetch the order".to_string(), e))?;

    match order {
        Some(order) if order.restaurant_id == restaurant_id => Ok(order.into_schema()),
        _ => Err(OrderStatusError::NotFound(format!(
            "Order {} was not found",
            order_id
        ))),
    }
}

#[tracing::instrument(name = "List orders", skip(pool))]
pub async fn list_orders(
    pool: &PgPool,
    restaurant_id: i64,
    filter: &OrderListRequest,
) -> Result<Vec<OrderData>, anyhow::Error> {
    let mut builder =
        QueryBuilder::<Postgres>::new("SELECT * FROM orders WHERE restaurant_id = ");
    builder.push_bind(restaurant_id);
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status);
    }
    if let Some(payment_status) = filter.payment_status {
        builder
            .push(" AND payment_status = ")
            .push_bind(payment_status);
    }
    if let Some(start_date) = filter.start_date {
        builder.push(" AND created_at >= ").push_bind(start_date);
    }
    if let Some(end_date) = filter.end_date {
        builder.push(" AND created_at <= ").push_bind(end_date);
    }
    builder
        .push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(filter.limit)
        .push(" OFFSET ")
        .push_bind(filter.offset);

    let orders = builder
        .build_query_as::<OrderModel>()
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            anyhow::Error::new(e).context("A database failure occurred while listing orders")
        })?;

    Ok(orders.into_iter().map(OrderModel::into_schema).collect())
}

/// Kitchen queue: everything that still needs attention, oldest first.
#[tracing::instrument(name = "Fetch pending orders", skip(pool))]
pub async fn fetch_pending_orders(
    pool: &PgPool,
    restaurant_id: i64,
) -> Result<Vec<OrderData>, anyhow::Error> {
    let orders = sqlx::query_as::<_, OrderModel>(
        r#"
        SELECT * FROM orders
        WHERE restaurant_id = $1
        AND status = ANY(ARRAY['pending', 'confirmed', 'preparing']::order_status[])
        ORDER BY created_at ASC
        "#,
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e).context("A database failure occurred while fetching pending orders")
    })?;

    Ok(orders.into_iter().map(OrderModel::into_schema).collect())
}

/// Compare-and-set transition. The row is locked, the allow-list is checked
/// against the status read under that lock, and only then is the new status
/// written, so two staff members racing on the same order cannot both win.
#[tracing::instrument(name = "Update order status", skip(pool))]
pub async fn update_order_status(
    pool: &PgPool,
    order_id: i64,
    restaurant_id: i64,
    next: OrderStatusType,
) -> Result<OrderData, OrderStatusError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    let order = fetch_order_for_update(&mut transaction, order_id)
        .await
        .map_err(|e| OrderStatusError::DatabaseError("Failed to fetch the order".to_string(), e))?;
    let order = match order {
        Some(order) if order.restaurant_id == restaurant_id => order,
        _ => {
            return Err(OrderStatusError::NotFound(format!(
                "Order {} was not found",
                order_id
            )))
        }
    };

    if !order.status.can_transition_to(next) {
        return Err(OrderStatusError::InvalidTransition(format!(
            "cannot move from {} to {}",
            order.status, next
        )));
    }

    let updated = sqlx::query_as::<_, OrderModel>(
        "UPDATE orders SET status = $1, updated_at = now() WHERE id = $2 RETURNING *",
    )
    .bind(next)
    .bind(order_id)
    .fetch_one(&mut *transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        OrderStatusError::DatabaseError(
            "Failed to update the order status".to_string(),
            anyhow::Error::new(e),
        )
    })?;

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to update the order status")?;

    Ok(updated.into_schema())
}

/// Cancellation. The order flips to cancelled and, in the same transaction,
/// any live payment is closed out by the payment side. The payment_status
/// mirror becomes `refunded` when the order had already been paid and
/// `failed` when a payment attempt was still in flight.
#[tracing::instrument(name = "Cancel order", skip(pool))]
pub async fn cancel_order(
    pool: &PgPool,
    order_id: i64,
    restaurant_id: i64,
    reason: &str,
) -> Result<OrderData, OrderStatusError> {
    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    let order = fetch_order_for_update(&mut transaction, order_id)
        .await
        .map_err(|e| OrderStatusError::DatabaseError("Failed to fetch the order".to_string(), e))?;
    let order = match order {
        Some(order) if order.restaurant_id == restaurant_id => order,
        _ => {
            return Err(OrderStatusError::NotFound(format!(
                "Order {} was not found",
                order_id
            )))
        }
    };

    if order.status.is_terminal() {
        return Err(OrderStatusError::InvalidState(format!(
            "cannot cancel an order that is already {}",
            order.status
        )));
    }

    let prior_payment_stage =
        fail_payment_on_cancellation(&mut transaction, order_id, reason)
            .await
            .map_err(|e| {
                OrderStatusError::DatabaseError(
                    "Failed to close out the linked payment".to_string(),
                    e,
                )
            })?;
    let mirrored_payment_status = match prior_payment_stage {
        Some(PaymentStageType::Completed) => Some(OrderPaymentStatus::Refunded),
        Some(stage) if !stage.is_terminal() => Some(OrderPaymentStatus::Failed),
        _ => None,
    };

    let updated = sqlx::query_as::<_, OrderModel>(
        r#"
        UPDATE orders
        SET status = $1, cancellation_reason = $2, payment_status = COALESCE($3, payment_status), updated_at = now()
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(OrderStatusType::Cancelled)
    .bind(reason)
    .bind(mirrored_payment_status)
    .bind(order_id)
    .fetch_one(&mut *transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        OrderStatusError::DatabaseError(
            "Failed to cancel the order".to_string(),
            anyhow::Error::new(e),
        )
    })?;

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to cancel the order")?;

    Ok(updated.into_schema())
}

/// Staff edit: the replacement items run through the same validation
/// pipeline as order intake and the stored total is recomputed, never
/// patched directly.
#[tracing::instrument(name = "Edit order items", skip(pool, catalog))]
pub async fn edit_order_items(
    pool: &PgPool,
    catalog: &dyn CatalogService,
    order_id: i64,
    restaurant_id: i64,
    items: &[OrderLineItem],
) -> Result<OrderData, EditOrderError> {
    if items.is_empty() {
        return Err(EditOrderError::ValidationError(
            "An order needs at least one line item".to_string(),
        ));
    }
    let mut violations = vec![];
    for item in items {
        if item.quantity < 1 {
            violations.push(format!(
                "Quantity for menu item {} must be at least 1",
                item.menu_item_id
            ));
        }
        if item.unit_price < BigDecimal::from(0) {
            violations.push(format!(
                "Unit price for menu item {} cannot be negative",
                item.menu_item_id
            ));
        }
    }
    if !violations.is_empty() {
        return Err(EditOrderError::ValidationError(violations.join("; ")));
    }

    let item_ids: Vec<i64> = items.iter().map(|i| i.menu_item_id).collect();
    let catalog_items = catalog
        .lookup_items(restaurant_id, &item_ids)
        .await
        .map_err(|e| {
            EditOrderError::DatabaseError("Failed to fetch catalog items".to_string(), e)
        })?;
    let catalog_map: HashMap<i64, _> = catalog_items
        .into_iter()
        .map(|item| (item.id, item))
        .collect();
    let mismatches = validate_items_against_catalog(items, &catalog_map);
    if !mismatches.is_empty() {
        return Err(EditOrderError::ItemUnavailable(mismatches.join("; ")));
    }

    let total_amount = calculate_order_total(items);

    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;

    let order = fetch_order_for_update(&mut transaction, order_id)
        .await
        .map_err(|e| EditOrderError::DatabaseError("Failed to fetch the order".to_string(), e))?;
    let order = match order {
        Some(order) if order.restaurant_id == restaurant_id => order,
        _ => {
            return Err(EditOrderError::NotFound(format!(
                "Order {} was not found",
                order_id
            )))
        }
    };

    if order.status.is_terminal() {
        return Err(EditOrderError::InvalidState(format!(
            "cannot edit an order that is already {}",
            order.status
        )));
    }

    let updated = sqlx::query_as::<_, OrderModel>(
        "UPDATE orders SET items = $1, total_amount = $2, updated_at = now() WHERE id = $3 RETURNING *",
    )
    .bind(sqlx::types::Json(items))
    .bind(&total_amount)
    .bind(order_id)
    .fetch_one(&mut *transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        EditOrderError::DatabaseError(
            "Failed to update the order items".to_string(),
            anyhow::Error::new(e),
        )
    })?;

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to edit the order")?;

    Ok(updated.into_schema())
}
