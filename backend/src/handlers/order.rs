//! HTTP handlers for order endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentOrg;
use crate::services::order::{CreateOrderInput, OrderService};
use crate::AppState;
use shared::{ApiResponse, BillType, Order};

#[derive(Debug, Deserialize)]
pub struct UpdateBillTypeInput {
    pub bill_type: BillType,
}

/// Create an order
pub async fn create_order(
    State(state): State<AppState>,
    org: CurrentOrg,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let service = OrderService::new(state.db);
    let order = service.create(org.0.organization_id, input).await?;
    Ok(Json(ApiResponse::ok("Order created", order)))
}

/// List orders
pub async fn list_orders(
    State(state): State<AppState>,
    org: CurrentOrg,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    let service = OrderService::new(state.db);
    let orders = service.list(org.0.organization_id).await?;
    Ok(Json(ApiResponse::ok("Orders fetched", orders)))
}

/// Get an order with its lines
pub async fn get_order(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let service = OrderService::new(state.db);
    let order = service.get(org.0.organization_id, order_id).await?;
    Ok(Json(ApiResponse::ok("Order fetched", order)))
}

/// Switch an order's bill type
pub async fn update_order_bill_type(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdateBillTypeInput>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let service = OrderService::new(state.db);
    let order = service
        .update_bill_type(org.0.organization_id, order_id, input.bill_type)
        .await?;
    Ok(Json(ApiResponse::ok("Order bill type updated", order)))
}

/// Delete an order
pub async fn delete_order(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = OrderService::new(state.db);
    service.delete(org.0.organization_id, order_id).await?;
    Ok(Json(ApiResponse::ok("Order deleted", ())))
}
