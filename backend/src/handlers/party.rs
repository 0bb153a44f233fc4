//! HTTP handlers for buyer and manufacturer endpoints
//!
//! Both party kinds share one service; the handlers pin the kind so the
//! routes stay explicit.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentOrg;
use crate::services::party::{CreatePartyInput, PartyService, UpdatePartyInput};
use crate::AppState;
use shared::{ApiResponse, Party, PartyKind};

/// Create a buyer
pub async fn create_buyer(
    State(state): State<AppState>,
    org: CurrentOrg,
    Json(input): Json<CreatePartyInput>,
) -> AppResult<Json<ApiResponse<Party>>> {
    let service = PartyService::new(state.db);
    let buyer = service
        .create(org.0.organization_id, PartyKind::Buyer, input)
        .await?;
    Ok(Json(ApiResponse::ok("Buyer created", buyer)))
}

/// List buyers
pub async fn list_buyers(
    State(state): State<AppState>,
    org: CurrentOrg,
) -> AppResult<Json<ApiResponse<Vec<Party>>>> {
    let service = PartyService::new(state.db);
    let buyers = service.list(org.0.organization_id, PartyKind::Buyer).await?;
    Ok(Json(ApiResponse::ok("Buyers fetched", buyers)))
}

/// Get a buyer
pub async fn get_buyer(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(buyer_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Party>>> {
    let service = PartyService::new(state.db);
    let buyer = service
        .get(org.0.organization_id, PartyKind::Buyer, buyer_id)
        .await?;
    Ok(Json(ApiResponse::ok("Buyer fetched", buyer)))
}

/// Update a buyer
pub async fn update_buyer(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(buyer_id): Path<Uuid>,
    Json(input): Json<UpdatePartyInput>,
) -> AppResult<Json<ApiResponse<Party>>> {
    let service = PartyService::new(state.db);
    let buyer = service
        .update(org.0.organization_id, PartyKind::Buyer, buyer_id, input)
        .await?;
    Ok(Json(ApiResponse::ok("Buyer updated", buyer)))
}

/// Delete a buyer
pub async fn delete_buyer(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(buyer_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = PartyService::new(state.db);
    service
        .delete(org.0.organization_id, PartyKind::Buyer, buyer_id)
        .await?;
    Ok(Json(ApiResponse::ok("Buyer deleted", ())))
}

/// Create a manufacturer
pub async fn create_manufacturer(
    State(state): State<AppState>,
    org: CurrentOrg,
    Json(input): Json<CreatePartyInput>,
) -> AppResult<Json<ApiResponse<Party>>> {
    let service = PartyService::new(state.db);
    let manufacturer = service
        .create(org.0.organization_id, PartyKind::Manufacturer, input)
        .await?;
    Ok(Json(ApiResponse::ok("Manufacturer created", manufacturer)))
}

/// List manufacturers
pub async fn list_manufacturers(
    State(state): State<AppState>,
    org: CurrentOrg,
) -> AppResult<Json<ApiResponse<Vec<Party>>>> {
    let service = PartyService::new(state.db);
    let manufacturers = service
        .list(org.0.organization_id, PartyKind::Manufacturer)
        .await?;
    Ok(Json(ApiResponse::ok("Manufacturers fetched", manufacturers)))
}

/// Get a manufacturer
pub async fn get_manufacturer(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(manufacturer_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Party>>> {
    let service = PartyService::new(state.db);
    let manufacturer = service
        .get(org.0.organization_id, PartyKind::Manufacturer, manufacturer_id)
        .await?;
    Ok(Json(ApiResponse::ok("Manufacturer fetched", manufacturer)))
}

/// Update a manufacturer
pub async fn update_manufacturer(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(manufacturer_id): Path<Uuid>,
    Json(input): Json<UpdatePartyInput>,
) -> AppResult<Json<ApiResponse<Party>>> {
    let service = PartyService::new(state.db);
    let manufacturer = service
        .update(
            org.0.organization_id,
            PartyKind::Manufacturer,
            manufacturer_id,
            input,
        )
        .await?;
    Ok(Json(ApiResponse::ok("Manufacturer updated", manufacturer)))
}

/// Delete a manufacturer
pub async fn delete_manufacturer(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(manufacturer_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = PartyService::new(state.db);
    service
        .delete(org.0.organization_id, PartyKind::Manufacturer, manufacturer_id)
        .await?;
    Ok(Json(ApiResponse::ok("Manufacturer deleted", ())))
}
