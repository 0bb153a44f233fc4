//! HTTP handlers for organization endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::organization::{
    OrganizationCheck, OrganizationService, RegisterOrganizationInput, UpdateOrganizationInput,
};
use crate::AppState;
use shared::{ApiResponse, Organization};

#[derive(Debug, Deserialize)]
pub struct CheckOrganizationInput {
    pub external_id: String,
}

/// Register an organization, upserting on the external id
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterOrganizationInput>,
) -> AppResult<Json<ApiResponse<Organization>>> {
    let service = OrganizationService::new(state.db);
    let organization = service.register(input).await?;
    Ok(Json(ApiResponse::ok("Organization registered", organization)))
}

/// Create an organization; fails when the external id is taken
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<RegisterOrganizationInput>,
) -> AppResult<Json<ApiResponse<Organization>>> {
    let service = OrganizationService::new(state.db);
    let organization = service.create(input).await?;
    Ok(Json(ApiResponse::ok("Organization created", organization)))
}

/// Check whether an external id is already registered
pub async fn check(
    State(state): State<AppState>,
    Json(input): Json<CheckOrganizationInput>,
) -> AppResult<Json<ApiResponse<OrganizationCheck>>> {
    let service = OrganizationService::new(state.db);
    let check = service.check(&input.external_id).await?;
    Ok(Json(ApiResponse::ok("Organization checked", check)))
}

/// Get an organization
pub async fn get(
    State(state): State<AppState>,
    Path(organization_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Organization>>> {
    let service = OrganizationService::new(state.db);
    let organization = service.get(organization_id).await?;
    Ok(Json(ApiResponse::ok("Organization fetched", organization)))
}

/// Update an organization's contact details
pub async fn update(
    State(state): State<AppState>,
    Path(organization_id): Path<Uuid>,
    Json(input): Json<UpdateOrganizationInput>,
) -> AppResult<Json<ApiResponse<Organization>>> {
    let service = OrganizationService::new(state.db);
    let organization = service.update(organization_id, input).await?;
    Ok(Json(ApiResponse::ok("Organization updated", organization)))
}
