use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{CreateBookingRequest, ListBookingsQuery, QuoteRequest, StopRequest, UpdateBookingRequest};
use crate::api::dtos::responses::QuoteResponse;
use crate::api::extractors::{auth::{AdminUser, AuthUser}, maybe_auth::MaybeAuthUser};
use crate::domain::models::booking::Stop;
use crate::domain::ports::BookingFilter;
use crate::domain::services::booking_service::{CreateBookingCommand, CustomerIdentity};
use crate::domain::services::lifecycle::PaymentStatus;
use crate::domain::services::pricing::{self, QuoteInput};
use crate::error::AppError;
use std::sync::Arc;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(user): MaybeAuthUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Explicit customer payload wins; otherwise a live session books against
    // the account; otherwise this must be a complete guest checkout.
    let identity = match (payload.customer, user) {
        (Some(identity), _) => identity,
        (None, Some(user)) => CustomerIdentity::Account { user_id: user.id },
        (None, None) => return Err(AppError::Validation("Customer details are required".into())),
    };

    let pickup_at = parse_pickup_at(payload.pickup_at.as_deref())?;

    let cmd = CreateBookingCommand {
        identity,
        vehicle_id: payload.vehicle_id,
        vehicle_name: payload.vehicle_name,
        package_name: payload.package_name,
        package_price_cents: payload.package_price_cents,
        pickup_address: payload.pickup_address.unwrap_or_default(),
        dropoff_address: payload.dropoff_address.unwrap_or_default(),
        stops: to_stops(payload.stops),
        pickup_at,
        duration_hours: payload.duration_hours,
        passenger_count: payload.passenger_count.unwrap_or(1),
        car_seats: payload.car_seats.unwrap_or(0),
        booster_seats: payload.booster_seats.unwrap_or(0),
        distance_miles: payload.distance_miles,
        payment: payload.payment,
    };

    let created = state.booking_service.create_booking(cmd).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<QuoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    let base_cents = if let Some(price) = payload.package_price_cents {
        if price < 0 {
            return Err(AppError::Validation("Package price cannot be negative".into()));
        }
        price
    } else if let Some(vehicle_id) = &payload.vehicle_id {
        let vehicle = state.vehicle_repo.find_by_id(vehicle_id).await?
            .ok_or(AppError::Validation("Selected vehicle is no longer available".into()))?;
        let hours = payload.duration_hours
            .ok_or(AppError::Validation("Duration in hours is required for hourly rides".into()))?;
        if hours < 1 {
            return Err(AppError::Validation("Duration must be at least one hour".into()));
        }
        pricing::base_for_hourly(vehicle.price_per_hour_cents, hours)
    } else {
        return Err(AppError::Validation("A package price or a fleet vehicle is required".into()));
    };

    let stops = to_stops(payload.stops);
    let settings = state.settings_repo.get().await?;
    let total_cents = pricing::compute_total(
        &QuoteInput {
            base_cents,
            stops: &stops,
            car_seats: payload.car_seats.unwrap_or(0),
            booster_seats: payload.booster_seats.unwrap_or(0),
            distance_miles: payload.distance_miles,
        },
        &settings,
    );

    Ok(Json(QuoteResponse { base_cents, total_cents }))
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(query): Query<ListBookingsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = match query.date.as_deref() {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::Validation("Invalid date filter (YYYY-MM-DD)".into()))?,
        ),
        None => None,
    };

    let filter = BookingFilter {
        email: query.email,
        driver_id: query.driver_id,
        date,
    };

    let bookings = state.booking_repo.list(&filter).await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;
    Ok(Json(booking))
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut booking = state.booking_repo.find_by_id(&booking_id).await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if let Some(name) = payload.customer_name { booking.customer_name = name; }
    if let Some(email) = payload.customer_email { booking.customer_email = email; }
    if let Some(phone) = payload.customer_phone { booking.customer_phone = phone; }
    if let Some(pickup) = payload.pickup_address { booking.pickup_address = pickup; }
    if let Some(dropoff) = payload.dropoff_address { booking.dropoff_address = dropoff; }
    if let Some(count) = payload.passenger_count {
        if count < 1 {
            return Err(AppError::Validation("Passenger count must be at least 1".into()));
        }
        booking.passenger_count = count;
    }
    if let Some(raw) = payload.pickup_at {
        booking.pickup_at = parse_pickup_at(Some(raw.as_str()))?;
    }
    if let Some(raw) = payload.payment_status {
        let status = PaymentStatus::parse(&raw)
            .ok_or_else(|| AppError::Validation(format!("Unknown payment status '{}'", raw)))?;
        booking.payment_status = status.as_str().to_string();
    }

    let updated = state.booking_repo.update(&booking).await?;
    info!("Booking updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_by_customer(&user.id).await?;
    Ok(Json(bookings))
}

fn parse_pickup_at(raw: Option<&str>) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.ok_or(AppError::Validation("Pickup time is required".into()))?;
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|_| AppError::Validation("Invalid pickup time (expected RFC 3339)".into()))?;
    Ok(parsed.with_timezone(&Utc))
}

fn to_stops(stops: Option<Vec<StopRequest>>) -> Vec<Stop> {
    stops
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(idx, s)| Stop {
            location: s.location,
            order: s.order.unwrap_or(idx as i32),
            price_cents: s.price_cents,
        })
        .collect()
}
