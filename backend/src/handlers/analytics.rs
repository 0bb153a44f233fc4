//! HTTP handlers for the analytics endpoint

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentOrg;
use crate::services::analytics::{AnalyticsService, AnalyticsSummary};
use crate::AppState;
use shared::ApiResponse;

/// Dashboard summary for the calling organization
pub async fn get_summary(
    State(state): State<AppState>,
    org: CurrentOrg,
) -> AppResult<Json<ApiResponse<AnalyticsSummary>>> {
    let service = AnalyticsService::new(state.db);
    let summary = service.summary(org.0.organization_id).await?;
    Ok(Json(ApiResponse::ok("Summary fetched", summary)))
}
