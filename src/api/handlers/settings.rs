use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::UpdateSettingsRequest;
use crate::api::extractors::auth::AdminUser;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let settings = state.settings_repo.get().await?;
    Ok(Json(settings))
}

pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut settings = state.settings_repo.get().await?;

    if let Some(v) = payload.distance_fee_enabled { settings.distance_fee_enabled = v; }
    if let Some(v) = payload.distance_threshold_miles {
        if v < 0.0 {
            return Err(AppError::Validation("Distance threshold cannot be negative".into()));
        }
        settings.distance_threshold_miles = v;
    }
    if let Some(v) = payload.distance_fee_cents { settings.distance_fee_cents = v; }
    if let Some(v) = payload.per_mile_fee_enabled { settings.per_mile_fee_enabled = v; }
    if let Some(v) = payload.per_mile_fee_cents { settings.per_mile_fee_cents = v; }
    if let Some(v) = payload.min_fee_cents { settings.min_fee_cents = v; }
    if let Some(v) = payload.max_fee_cents { settings.max_fee_cents = v; }
    if let Some(v) = payload.stop_price_cents { settings.stop_price_cents = v; }
    if let Some(v) = payload.car_seat_price_cents { settings.car_seat_price_cents = v; }
    if let Some(v) = payload.booster_seat_price_cents { settings.booster_seat_price_cents = v; }

    let negatives = [
        settings.distance_fee_cents,
        settings.per_mile_fee_cents,
        settings.min_fee_cents,
        settings.max_fee_cents,
        settings.stop_price_cents,
        settings.car_seat_price_cents,
        settings.booster_seat_price_cents,
    ];
    if negatives.iter().any(|v| *v < 0) {
        return Err(AppError::Validation("Fees cannot be negative".into()));
    }
    if settings.min_fee_cents > settings.max_fee_cents {
        return Err(AppError::Validation("min_fee cannot exceed max_fee".into()));
    }

    let updated = state.settings_repo.update(&settings).await?;
    info!("Pricing settings updated");
    Ok(Json(updated))
}
