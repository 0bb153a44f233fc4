//! HTTP handlers for item master-data endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentOrg;
use crate::services::item::{CreateItemInput, ItemService, UpdateItemInput};
use crate::AppState;
use shared::{ApiResponse, Item};

/// Create an item
pub async fn create_item(
    State(state): State<AppState>,
    org: CurrentOrg,
    Json(input): Json<CreateItemInput>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let service = ItemService::new(state.db);
    let item = service.create(org.0.organization_id, input).await?;
    Ok(Json(ApiResponse::ok("Item created", item)))
}

/// List items
pub async fn list_items(
    State(state): State<AppState>,
    org: CurrentOrg,
) -> AppResult<Json<ApiResponse<Vec<Item>>>> {
    let service = ItemService::new(state.db);
    let items = service.list(org.0.organization_id).await?;
    Ok(Json(ApiResponse::ok("Items fetched", items)))
}

/// Get an item
pub async fn get_item(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let service = ItemService::new(state.db);
    let item = service.get(org.0.organization_id, item_id).await?;
    Ok(Json(ApiResponse::ok("Item fetched", item)))
}

/// Update an item
pub async fn update_item(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateItemInput>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let service = ItemService::new(state.db);
    let item = service.update(org.0.organization_id, item_id, input).await?;
    Ok(Json(ApiResponse::ok("Item updated", item)))
}

/// Delete an item
pub async fn delete_item(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = ItemService::new(state.db);
    service.delete(org.0.organization_id, item_id).await?;
    Ok(Json(ApiResponse::ok("Item deleted", ())))
}
