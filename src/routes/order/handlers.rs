use actix_web::web;
use sqlx::PgPool;
use utoipa::TupleUnit;

use super::schemas::{
    CancelOrderRequest, CreateOrderRequest, EditOrderRequest, OrderData, OrderListRequest,
    OrderStatusUpdateRequest,
};
use super::utils::{
    cancel_order, create_order, edit_order_items, fetch_pending_orders, get_scoped_order,
    list_orders, update_order_status,
};
use crate::catalog_client::CatalogService;
use crate::errors::GenericError;
use crate::schemas::{GenericResponse, StaffAccount};

#[utoipa::path(
    post,
    path = "/order/create",
    tag = "Order",
    description = "Public order intake for the customer-facing ordering page.",
    summary = "Create Order Request",
    request_body(content = CreateOrderRequest, description = "Request Body"),
    responses(
        (status=200, description= "Order Create Response", body= GenericResponse<OrderData>),
        (status=400, description= "Invalid Request body", body= GenericResponse<TupleUnit>),
        (status=500, description= "Internal Server Error", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "order create", skip(pool, catalog), fields(restaurant_id = body.restaurant_id))]
pub async fn order_create(
    body: CreateOrderRequest,
    pool: web::Data<PgPool>,
    catalog: web::Data<dyn CatalogService>,
) -> Result<web::Json<GenericResponse<OrderData>>, GenericError> {
    let order = create_order(&pool, catalog.get_ref(), &body).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully created order",
        Some(order),
    )))
}

#[utoipa::path(
    get,
    path = "/order/fetch/{id}",
    tag = "Order",
    params(("id" = i64, Path, description = "Order id")),
    responses(
        (status=200, description= "Order Fetch Response", body= GenericResponse<OrderData>),
        (status=410, description= "Data not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "order fetch", skip(pool))]
pub async fn order_fetch(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
    staff: StaffAccount,
) -> Result<web::Json<GenericResponse<OrderData>>, GenericError> {
    let order = get_scoped_order(&pool, path.into_inner(), staff.restaurant_id).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched order",
        Some(order),
    )))
}

#[utoipa::path(
    post,
    path = "/order/list",
    tag = "Order",
    request_body(content = OrderListRequest, description = "Request Body"),
    responses(
        (status=200, description= "Order List Response", body= GenericResponse<Vec<OrderData>>),
    )
)]
#[tracing::instrument(name = "order list", skip(pool))]
pub async fn order_list(
    body: OrderListRequest,
    pool: web::Data<PgPool>,
    staff: StaffAccount,
) -> Result<web::Json<GenericResponse<Vec<OrderData>>>, GenericError> {
    let orders = list_orders(&pool, staff.restaurant_id, &body)
        .await
        .map_err(|e| GenericError::DatabaseError("Failed to fetch order list".to_string(), e))?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched orders",
        Some(orders),
    )))
}

#[utoipa::path(
    get,
    path = "/order/pending",
    tag = "Order",
    responses(
        (status=200, description= "Pending Order Response", body= GenericResponse<Vec<OrderData>>),
    )
)]
#[tracing::instrument(name = "order pending", skip(pool))]
pub async fn order_pending(
    pool: web::Data<PgPool>,
    staff: StaffAccount,
) -> Result<web::Json<GenericResponse<Vec<OrderData>>>, GenericError> {
    let orders = fetch_pending_orders(&pool, staff.restaurant_id)
        .await
        .map_err(|e| {
            GenericError::DatabaseError("Failed to fetch pending orders".to_string(), e)
        })?;
    Ok(web::Json(GenericResponse::success(
        "Successfully fetched pending orders",
        Some(orders),
    )))
}

#[utoipa::path(
    post,
    path = "/order/status/{id}",
    tag = "Order",
    description = "Advances the fulfillment workflow one step, or cancels. Illegal jumps are rejected with the offending pair of states.",
    params(("id" = i64, Path, description = "Order id")),
    request_body(content = OrderStatusUpdateRequest, description = "Request Body"),
    responses(
        (status=200, description= "Order Status Response", body= GenericResponse<OrderData>),
        (status=409, description= "Invalid transition", body= GenericResponse<TupleUnit>),
        (status=410, description= "Data not found", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "order status update", skip(pool))]
pub async fn order_status_update(
    path: web::Path<i64>,
    body: OrderStatusUpdateRequest,
    pool: web::Data<PgPool>,
    staff: StaffAccount,
) -> Result<web::Json<GenericResponse<OrderData>>, GenericError> {
    let order =
        update_order_status(&pool, path.into_inner(), staff.restaurant_id, body.status).await?;
    Ok(web::Json(GenericResponse::success(
        &format!("Order status updated to {}", order.status),
        Some(order),
    )))
}

#[utoipa::path(
    post,
    path = "/order/cancel/{id}",
    tag = "Order",
    params(("id" = i64, Path, description = "Order id")),
    request_body(content = CancelOrderRequest, description = "Request Body"),
    responses(
        (status=200, description= "Order Cancel Response", body= GenericResponse<OrderData>),
        (status=403, description= "Insufficient Previlege", body= GenericResponse<TupleUnit>),
        (status=409, description= "Invalid state", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "order cancel", skip(pool))]
pub async fn order_cancel(
    path: web::Path<i64>,
    body: CancelOrderRequest,
    pool: web::Data<PgPool>,
    staff: StaffAccount,
) -> Result<web::Json<GenericResponse<OrderData>>, GenericError> {
    if !staff.role.can_manage() {
        return Err(GenericError::InsufficientPrevilege(
            "Only admins and managers can cancel orders".to_string(),
        ));
    }
    let order = cancel_order(&pool, path.into_inner(), staff.restaurant_id, &body.reason).await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully cancelled order",
        Some(order),
    )))
}

#[utoipa::path(
    post,
    path = "/order/edit/{id}",
    tag = "Order",
    description = "Replaces the line items of an open order. The new items are re-validated against the live catalog and the total is recomputed.",
    params(("id" = i64, Path, description = "Order id")),
    request_body(content = EditOrderRequest, description = "Request Body"),
    responses(
        (status=200, description= "Order Edit Response", body= GenericResponse<OrderData>),
        (status=403, description= "Insufficient Previlege", body= GenericResponse<TupleUnit>),
        (status=409, description= "Invalid state", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "order edit", skip(pool, catalog))]
pub async fn order_edit(
    path: web::Path<i64>,
    body: EditOrderRequest,
    pool: web::Data<PgPool>,
    catalog: web::Data<dyn CatalogService>,
    staff: StaffAccount,
) -> Result<web::Json<GenericResponse<OrderData>>, GenericError> {
    if !staff.role.can_manage() {
        return Err(GenericError::InsufficientPrevilege(
            "Only admins and managers can edit orders".to_string(),
        ));
    }
    let order = edit_order_items(
        &pool,
        catalog.get_ref(),
        path.into_inner(),
        staff.restaurant_id,
        &body.items,
    )
    .await?;
    Ok(web::Json(GenericResponse::success(
        "Successfully updated order",
        Some(order),
    )))
}
