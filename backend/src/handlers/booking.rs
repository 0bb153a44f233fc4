//! HTTP handlers for booking endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentOrg;
use crate::services::booking::{BookingService, CreateBookingInput};
use crate::AppState;
use shared::{ApiResponse, Booking};

/// Create a booking
pub async fn create_booking(
    State(state): State<AppState>,
    org: CurrentOrg,
    Json(input): Json<CreateBookingInput>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let service = BookingService::new(state.db);
    let booking = service.create(org.0.organization_id, input).await?;
    Ok(Json(ApiResponse::ok("Booking created", booking)))
}

/// List bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    org: CurrentOrg,
) -> AppResult<Json<ApiResponse<Vec<Booking>>>> {
    let service = BookingService::new(state.db);
    let bookings = service.list(org.0.organization_id).await?;
    Ok(Json(ApiResponse::ok("Bookings fetched", bookings)))
}

/// Get a booking with its lines
pub async fn get_booking(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Booking>>> {
    let service = BookingService::new(state.db);
    let booking = service.get(org.0.organization_id, booking_id).await?;
    Ok(Json(ApiResponse::ok("Booking fetched", booking)))
}

/// Delete a booking
pub async fn delete_booking(
    State(state): State<AppState>,
    org: CurrentOrg,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let service = BookingService::new(state.db);
    service.delete(org.0.organization_id, booking_id).await?;
    Ok(Json(ApiResponse::ok("Booking deleted", ())))
}
