use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CreateDriverRequest, UpdateAvailabilityRequest};
use crate::api::dtos::responses::EarningsResponse;
use crate::api::extractors::auth::{AdminUser, DriverUser};
use crate::domain::models::user::{
    User, AVAILABILITY_AVAILABLE, AVAILABILITY_BUSY, AVAILABILITY_OFFLINE, ROLE_DRIVER,
};
use crate::domain::ports::BookingFilter;
use crate::domain::services::lifecycle::BookingStatus;
use crate::error::AppError;
use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use rand::rngs::OsRng;
use std::sync::Arc;
use tracing::info;

pub async fn create_driver(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateDriverRequest>,
) -> Result<impl IntoResponse, AppError> {
    if state.user_repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string();

    let driver = User::new(payload.email, password_hash, payload.name, payload.phone, ROLE_DRIVER);
    let created = state.user_repo.create(&driver).await?;

    info!("Created driver account: {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_drivers(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let drivers = state.user_repo.list_by_role(ROLE_DRIVER).await?;
    Ok(Json(drivers))
}

pub async fn my_rides(
    State(state): State<Arc<AppState>>,
    DriverUser(driver): DriverUser,
) -> Result<impl IntoResponse, AppError> {
    let filter = BookingFilter { driver_id: Some(driver.id), ..Default::default() };
    let rides = state.booking_repo.list(&filter).await?;
    Ok(Json(rides))
}

pub async fn my_earnings(
    State(state): State<Arc<AppState>>,
    DriverUser(driver): DriverUser,
) -> Result<impl IntoResponse, AppError> {
    let filter = BookingFilter { driver_id: Some(driver.id), ..Default::default() };
    let rides = state.booking_repo.list(&filter).await?;

    let completed: Vec<_> = rides.iter()
        .filter(|b| BookingStatus::parse(&b.status) == Some(BookingStatus::Completed))
        .collect();
    let earnings_cents = completed.iter()
        .map(|b| b.base_price_cents + b.gratuity_cents)
        .sum();

    Ok(Json(EarningsResponse {
        completed_rides: completed.len(),
        earnings_cents,
    }))
}

pub async fn update_availability(
    State(state): State<Arc<AppState>>,
    DriverUser(driver): DriverUser,
    Json(payload): Json<UpdateAvailabilityRequest>,
) -> Result<impl IntoResponse, AppError> {
    if ![AVAILABILITY_AVAILABLE, AVAILABILITY_BUSY, AVAILABILITY_OFFLINE]
        .contains(&payload.availability.as_str())
    {
        return Err(AppError::Validation(format!("Unknown availability '{}'", payload.availability)));
    }

    // The extractor only carries claims; load the stored profile to mutate it.
    let mut user = state.user_repo.find_by_id(&driver.id).await?
        .ok_or(AppError::Unauthorized)?;
    user.availability = payload.availability;

    let updated = state.user_repo.update(&user).await?;
    Ok(Json(updated))
}
