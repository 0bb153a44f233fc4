//! HTTP handlers for purchase endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentOrg;
use crate::services::purchase::{PurchaseService, RecordPurchaseInput, UpdatePurchaseInput};
use crate::AppState;
use shared::{ApiResponse, Purchase};

/// Record a purchase against an order
pub async fn record_purchase(
    State(state): State<AppState>,
    org: CurrentOrg,
    Json(input): Json<RecordPurchaseInput>,
) -> AppResult<Json<ApiResponse<Purchase>>> {
    let service = PurchaseService::new(state.db);
    let purchase = service.record(org.0.organization_id, input).await?;
    Ok(Json(ApiResponse::ok("Purchase recorded", purchase)))
}

/// List purchases
pub async fn list_purchases(
    State(state): State<AppState>,
    org: CurrentOrg,
) -> AppResult<Json<ApiResponse<Vec<Purchase>>>> {
    let service = PurchaseService::new(state.db);
    let purchases = service.list(org.0.organization_id).await?;
    Ok(Json(ApiResponse::ok("Purchases fetched", purchases)))
}

/// List purchases for one order
pub async fn list_order_purchases(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<Purchase>>>> {
    let service = PurchaseService::new(state.db);
    let purchases = service
        .list_by_order(org.0.organization_id, order_id)
        .await?;
    Ok(Json(ApiResponse::ok("Purchases fetched", purchases)))
}

/// Get a purchase with its lines
pub async fn get_purchase(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(purchase_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Purchase>>> {
    let service = PurchaseService::new(state.db);
    let purchase = service.get(org.0.organization_id, purchase_id).await?;
    Ok(Json(ApiResponse::ok("Purchase fetched", purchase)))
}

/// Update invoice metadata on a purchase
pub async fn update_purchase(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(purchase_id): Path<Uuid>,
    Json(input): Json<UpdatePurchaseInput>,
) -> AppResult<Json<ApiResponse<Purchase>>> {
    let service = PurchaseService::new(state.db);
    let purchase = service
        .update(org.0.organization_id, purchase_id, input)
        .await?;
    Ok(Json(ApiResponse::ok("Purchase updated", purchase)))
}
