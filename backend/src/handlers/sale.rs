//! HTTP handlers for sale endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentOrg;
use crate::services::sale::{RecordSaleInput, SaleService, UpdateSaleInput};
use crate::AppState;
use shared::{ApiResponse, Sale};

/// Record a sale against a booking
pub async fn record_sale(
    State(state): State<AppState>,
    org: CurrentOrg,
    Json(input): Json<RecordSaleInput>,
) -> AppResult<Json<ApiResponse<Sale>>> {
    let service = SaleService::new(state.db);
    let sale = service.record(org.0.organization_id, input).await?;
    Ok(Json(ApiResponse::ok("Sale recorded", sale)))
}

/// List sales
pub async fn list_sales(
    State(state): State<AppState>,
    org: CurrentOrg,
) -> AppResult<Json<ApiResponse<Vec<Sale>>>> {
    let service = SaleService::new(state.db);
    let sales = service.list(org.0.organization_id).await?;
    Ok(Json(ApiResponse::ok("Sales fetched", sales)))
}

/// List sales for one booking
pub async fn list_booking_sales(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<Sale>>>> {
    let service = SaleService::new(state.db);
    let sales = service
        .list_by_booking(org.0.organization_id, booking_id)
        .await?;
    Ok(Json(ApiResponse::ok("Sales fetched", sales)))
}

/// Get a sale with its lines
pub async fn get_sale(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(sale_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Sale>>> {
    let service = SaleService::new(state.db);
    let sale = service.get(org.0.organization_id, sale_id).await?;
    Ok(Json(ApiResponse::ok("Sale fetched", sale)))
}

/// Update invoice metadata on a sale
pub async fn update_sale(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(sale_id): Path<Uuid>,
    Json(input): Json<UpdateSaleInput>,
) -> AppResult<Json<ApiResponse<Sale>>> {
    let service = SaleService::new(state.db);
    let sale = service.update(org.0.organization_id, sale_id, input).await?;
    Ok(Json(ApiResponse::ok("Sale updated", sale)))
}
