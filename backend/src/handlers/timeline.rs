//! HTTP handlers for the timeline endpoint

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentOrg;
use crate::services::timeline::{TimelineQuery, TimelineService};
use crate::AppState;
use shared::{ApiResponse, InventoryType, MovementGroup};

/// Movement timeline for one item and stock bucket
pub async fn get_item_timeline(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path((item_id, inventory_type)): Path<(Uuid, String)>,
    Query(query): Query<TimelineQuery>,
) -> AppResult<Json<ApiResponse<Vec<MovementGroup>>>> {
    let inventory_type = InventoryType::parse(&inventory_type).ok_or_else(|| {
        AppError::validation(
            "inventory_type",
            "Inventory type must be 'virtual' or 'billed'",
        )
    })?;

    let service = TimelineService::new(state.db);
    let groups = service
        .item_timeline(org.0.organization_id, item_id, inventory_type, query)
        .await?;
    Ok(Json(ApiResponse::ok("Timeline fetched", groups)))
}
