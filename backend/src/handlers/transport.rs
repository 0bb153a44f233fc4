//! HTTP handlers for transport endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentOrg;
use crate::services::transport::{CreateTransportInput, TransportService, UpdateTransportInput};
use crate::AppState;
use shared::{ApiResponse, Transport};

/// Create a transport
pub async fn create_transport(
    State(state): State<AppState>,
    org: CurrentOrg,
    Json(input): Json<CreateTransportInput>,
) -> AppResult<Json<ApiResponse<Transport>>> {
    let service = TransportService::new(state.db);
    let transport = service.create(org.0.organization_id, input).await?;
    Ok(Json(ApiResponse::ok("Transport created", transport)))
}

/// List transports
pub async fn list_transports(
    State(state): State<AppState>,
    org: CurrentOrg,
) -> AppResult<Json<ApiResponse<Vec<Transport>>>> {
    let service = TransportService::new(state.db);
    let transports = service.list(org.0.organization_id).await?;
    Ok(Json(ApiResponse::ok("Transports fetched", transports)))
}

/// Get a transport
pub async fn get_transport(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(transport_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Transport>>> {
    let service = TransportService::new(state.db);
    let transport = service.get(org.0.organization_id, transport_id).await?;
    Ok(Json(ApiResponse::ok("Transport fetched", transport)))
}

/// Update a transport
pub async fn update_transport(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(transport_id): Path<Uuid>,
    Json(input): Json<UpdateTransportInput>,
) -> AppResult<Json<ApiResponse<Transport>>> {
    let service = TransportService::new(state.db);
    let transport = service
        .update(org.0.organization_id, transport_id, input)
        .await?;
    Ok(Json(ApiResponse::ok("Transport updated", transport)))
}

/// Delete a transport
pub async fn delete_transport(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(transport_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = TransportService::new(state.db);
    service.delete(org.0.organization_id, transport_id).await?;
    Ok(Json(ApiResponse::ok("Transport deleted", ())))
}
