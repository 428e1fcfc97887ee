use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CreateVehicleRequest, UpdateVehicleRequest};
use crate::api::extractors::auth::AdminUser;
use crate::domain::models::vehicle::{NewVehicleParams, Vehicle, VEHICLE_ACTIVE, VEHICLE_INACTIVE, VEHICLE_MAINTENANCE};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn list_vehicles(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let vehicles = state.vehicle_repo.list(Some(VEHICLE_ACTIVE)).await?;
    Ok(Json(vehicles))
}

pub async fn get_vehicle(
    State(state): State<Arc<AppState>>,
    Path(vehicle_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = state.vehicle_repo.find_by_id(&vehicle_id).await?
        .ok_or(AppError::NotFound("Vehicle not found".into()))?;
    Ok(Json(vehicle))
}

pub async fn list_all_vehicles(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let vehicles = state.vehicle_repo.list(None).await?;
    Ok(Json(vehicles))
}

pub async fn create_vehicle(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateVehicleRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.capacity < 1 {
        return Err(AppError::Validation("Capacity must be at least 1".into()));
    }
    if payload.price_per_hour_cents < 0 {
        return Err(AppError::Validation("Hourly rate cannot be negative".into()));
    }

    let vehicle = Vehicle::new(NewVehicleParams {
        name: payload.name,
        make: payload.make,
        model: payload.model,
        year: payload.year,
        capacity: payload.capacity,
        price_per_hour_cents: payload.price_per_hour_cents,
        license_plate: payload.license_plate,
        vin: payload.vin,
        image_url: payload.image_url,
    });

    let created = state.vehicle_repo.create(&vehicle).await?;
    info!("Vehicle created: {} ({})", created.id, created.name);
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_vehicle(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(vehicle_id): Path<String>,
    Json(payload): Json<UpdateVehicleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut vehicle = state.vehicle_repo.find_by_id(&vehicle_id).await?
        .ok_or(AppError::NotFound("Vehicle not found".into()))?;

    if let Some(name) = payload.name { vehicle.name = name; }
    if let Some(make) = payload.make { vehicle.make = make; }
    if let Some(model) = payload.model { vehicle.model = model; }
    if let Some(year) = payload.year { vehicle.year = year; }
    if let Some(capacity) = payload.capacity {
        if capacity < 1 {
            return Err(AppError::Validation("Capacity must be at least 1".into()));
        }
        vehicle.capacity = capacity;
    }
    if let Some(rate) = payload.price_per_hour_cents {
        if rate < 0 {
            return Err(AppError::Validation("Hourly rate cannot be negative".into()));
        }
        vehicle.price_per_hour_cents = rate;
    }
    if let Some(plate) = payload.license_plate { vehicle.license_plate = plate; }
    if let Some(vin) = payload.vin { vehicle.vin = vin; }
    if let Some(status) = payload.status {
        if ![VEHICLE_ACTIVE, VEHICLE_MAINTENANCE, VEHICLE_INACTIVE].contains(&status.as_str()) {
            return Err(AppError::Validation(format!("Unknown vehicle status '{}'", status)));
        }
        vehicle.status = status;
    }
    if let Some(image_url) = payload.image_url {
        vehicle.image_url = if image_url.is_empty() { None } else { Some(image_url) };
    }

    let updated = state.vehicle_repo.update(&vehicle).await?;
    Ok(Json(updated))
}

pub async fn delete_vehicle(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(vehicle_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.vehicle_repo.delete(&vehicle_id).await?;
    info!("Vehicle deleted: {}", vehicle_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
