use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{AssignDriverRequest, ChangeStatusRequest, GratuityRequest, UpdateAssignmentsRequest};
use crate::api::extractors::auth::AdminUser;
use crate::domain::services::booking_service::UpdateAssignmentsCommand;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

// ---- Customer-facing management (by booking token) ----

pub async fn get_booking_by_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_token(&token).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    Ok(Json(booking))
}

pub async fn cancel_booking_by_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_token(&token).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    let cancelled = state.booking_service.cancel(&booking.id).await?;
    info!("Booking cancelled via management token: {}", cancelled.id);
    Ok(Json(cancelled))
}

pub async fn add_gratuity_by_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    Json(payload): Json<GratuityRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_token(&token).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    let updated = state.booking_service.add_gratuity(&booking.id, payload).await?;
    Ok(Json(updated))
}

// ---- Admin lifecycle operations ----

pub async fn change_status(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<ChangeStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.booking_service.change_status(&booking_id, &payload.status).await?;
    Ok(Json(updated))
}

pub async fn assign_driver(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<AssignDriverRequest>,
) -> Result<impl IntoResponse, AppError> {
    let notify = payload.notify.unwrap_or(true);
    let updated = state.booking_service.assign_driver(&booking_id, &payload.driver_id, notify).await?;
    Ok(Json(updated))
}

pub async fn update_assignments(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateAssignmentsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.booking_service
        .update_assignments(&booking_id, UpdateAssignmentsCommand {
            driver_id: payload.driver_id,
            vehicle_id: payload.vehicle_id,
        })
        .await?;
    Ok(Json(updated))
}

/// Bookings are never physically deleted in normal flow; admin "delete" is a
/// cancellation.
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cancelled = state.booking_service.cancel(&booking_id).await?;
    Ok(Json(cancelled))
}
