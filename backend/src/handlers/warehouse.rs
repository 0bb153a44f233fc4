//! HTTP handlers for warehouse, stock and price endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentOrg;
use crate::services::warehouse::{
    AdjustStockInput, CreateWarehouseInput, PriceInput, UpdateWarehouseInput, WarehouseService,
};
use crate::AppState;
use shared::{ApiResponse, PriceRecord, Warehouse, WarehouseStock};

#[derive(Debug, Deserialize)]
pub struct WarehouseFilter {
    pub state: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AsOfQuery {
    pub date: Option<NaiveDate>,
}

/// Price rows submitted for a warehouse
#[derive(Debug, Deserialize)]
pub struct UpdatePricesInput {
    pub items: Vec<PriceInput>,
}

/// Create a warehouse
pub async fn create_warehouse(
    State(state): State<AppState>,
    org: CurrentOrg,
    Json(input): Json<CreateWarehouseInput>,
) -> AppResult<Json<ApiResponse<Warehouse>>> {
    let service = WarehouseService::new(state.db);
    let warehouse = service.create(org.0.organization_id, input).await?;
    Ok(Json(ApiResponse::ok("Warehouse created", warehouse)))
}

/// List warehouses
pub async fn list_warehouses(
    State(state): State<AppState>,
    org: CurrentOrg,
) -> AppResult<Json<ApiResponse<Vec<Warehouse>>>> {
    let service = WarehouseService::new(state.db);
    let warehouses = service.list(org.0.organization_id).await?;
    Ok(Json(ApiResponse::ok("Warehouses fetched", warehouses)))
}

/// List warehouses filtered by state and/or city
pub async fn filter_warehouses(
    State(state): State<AppState>,
    org: CurrentOrg,
    Query(filter): Query<WarehouseFilter>,
) -> AppResult<Json<ApiResponse<Vec<Warehouse>>>> {
    let service = WarehouseService::new(state.db);
    let warehouses = service
        .filter(org.0.organization_id, filter.state, filter.city)
        .await?;
    Ok(Json(ApiResponse::ok("Warehouses fetched", warehouses)))
}

/// Get a warehouse
pub async fn get_warehouse(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(warehouse_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Warehouse>>> {
    let service = WarehouseService::new(state.db);
    let warehouse = service.get(org.0.organization_id, warehouse_id).await?;
    Ok(Json(ApiResponse::ok("Warehouse fetched", warehouse)))
}

/// Update a warehouse
pub async fn update_warehouse(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(warehouse_id): Path<Uuid>,
    Json(input): Json<UpdateWarehouseInput>,
) -> AppResult<Json<ApiResponse<Warehouse>>> {
    let service = WarehouseService::new(state.db);
    let warehouse = service
        .update(org.0.organization_id, warehouse_id, input)
        .await?;
    Ok(Json(ApiResponse::ok("Warehouse updated", warehouse)))
}

/// Delete a warehouse
pub async fn delete_warehouse(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(warehouse_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = WarehouseService::new(state.db);
    service.delete(org.0.organization_id, warehouse_id).await?;
    Ok(Json(ApiResponse::ok("Warehouse deleted", ())))
}

/// List stock rows for a warehouse
pub async fn list_stock(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(warehouse_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<WarehouseStock>>>> {
    let service = WarehouseService::new(state.db);
    let stock = service.list_stock(org.0.organization_id, warehouse_id).await?;
    Ok(Json(ApiResponse::ok("Stock fetched", stock)))
}

/// Administrative adjustment of one stock row
pub async fn adjust_stock(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path((warehouse_id, item_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<AdjustStockInput>,
) -> AppResult<Json<ApiResponse<WarehouseStock>>> {
    let service = WarehouseService::new(state.db);
    let stock = service
        .adjust_stock(org.0.organization_id, warehouse_id, item_id, input)
        .await?;
    Ok(Json(ApiResponse::ok("Stock adjusted", stock)))
}

/// Append new price rows for a warehouse
pub async fn update_prices(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(warehouse_id): Path<Uuid>,
    Json(input): Json<UpdatePricesInput>,
) -> AppResult<Json<ApiResponse<Vec<PriceRecord>>>> {
    let service = WarehouseService::new(state.db);
    let records = service
        .update_prices(org.0.organization_id, warehouse_id, input.items)
        .await?;
    Ok(Json(ApiResponse::ok("Prices recorded", records)))
}

/// Current prices per item, optionally as of a past date
pub async fn get_prices(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(warehouse_id): Path<Uuid>,
    Query(query): Query<AsOfQuery>,
) -> AppResult<Json<ApiResponse<Vec<PriceRecord>>>> {
    let service = WarehouseService::new(state.db);
    let records = service
        .prices_as_of(org.0.organization_id, warehouse_id, query.date)
        .await?;
    Ok(Json(ApiResponse::ok("Prices fetched", records)))
}

/// Full price history for one item at a warehouse
pub async fn get_price_history(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path((warehouse_id, item_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<Vec<PriceRecord>>>> {
    let service = WarehouseService::new(state.db);
    let records = service
        .price_history(org.0.organization_id, warehouse_id, item_id)
        .await?;
    Ok(Json(ApiResponse::ok("Price history fetched", records)))
}
