use crate::domain::services::booking_service::{CustomerIdentity, PaymentDetails};
use crate::domain::services::pricing::GratuityInput;
use serde::Deserialize;

/// Booking creation payload. Presence of the individually required fields is
/// checked in the handler/service so a missing address comes back as a 400
/// validation error instead of a deserialization rejection.
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub customer: Option<CustomerIdentity>,
    pub vehicle_id: Option<String>,
    pub vehicle_name: Option<String>,
    pub package_name: Option<String>,
    pub package_price_cents: Option<i64>,
    pub pickup_address: Option<String>,
    pub dropoff_address: Option<String>,
    /// RFC 3339 timestamp.
    pub pickup_at: Option<String>,
    pub stops: Option<Vec<StopRequest>>,
    pub duration_hours: Option<i32>,
    pub passenger_count: Option<i32>,
    pub car_seats: Option<i32>,
    pub booster_seats: Option<i32>,
    pub distance_miles: Option<f64>,
    pub payment: Option<PaymentDetails>,
}

#[derive(Deserialize)]
pub struct StopRequest {
    pub location: String,
    pub order: Option<i32>,
    pub price_cents: Option<i64>,
}

#[derive(Deserialize)]
pub struct QuoteRequest {
    pub vehicle_id: Option<String>,
    pub package_price_cents: Option<i64>,
    pub duration_hours: Option<i32>,
    pub stops: Option<Vec<StopRequest>>,
    pub car_seats: Option<i32>,
    pub booster_seats: Option<i32>,
    pub distance_miles: Option<f64>,
}

#[derive(Deserialize)]
pub struct UpdateBookingRequest {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub pickup_address: Option<String>,
    pub dropoff_address: Option<String>,
    pub pickup_at: Option<String>,
    pub passenger_count: Option<i32>,
    pub payment_status: Option<String>,
}

#[derive(Deserialize)]
pub struct ChangeStatusRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct AssignDriverRequest {
    pub driver_id: String,
    pub notify: Option<bool>,
}

#[derive(Deserialize)]
pub struct UpdateAssignmentsRequest {
    pub driver_id: Option<String>,
    pub vehicle_id: Option<String>,
}

pub type GratuityRequest = GratuityInput;

#[derive(Deserialize)]
pub struct ListBookingsQuery {
    pub email: Option<String>,
    pub driver_id: Option<String>,
    /// Calendar day of the pickup, "YYYY-MM-DD".
    pub date: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateVehicleRequest {
    pub name: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub capacity: i32,
    pub price_per_hour_cents: i64,
    pub license_plate: String,
    pub vin: String,
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateVehicleRequest {
    pub name: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub capacity: Option<i32>,
    pub price_per_hour_cents: Option<i64>,
    pub license_plate: Option<String>,
    pub vin: Option<String>,
    pub status: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateDriverRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
}

#[derive(Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub availability: String,
}

#[derive(Deserialize)]
pub struct UpdateSettingsRequest {
    pub distance_fee_enabled: Option<bool>,
    pub distance_threshold_miles: Option<f64>,
    pub distance_fee_cents: Option<i64>,
    pub per_mile_fee_enabled: Option<bool>,
    pub per_mile_fee_cents: Option<i64>,
    pub min_fee_cents: Option<i64>,
    pub max_fee_cents: Option<i64>,
    pub stop_price_cents: Option<i64>,
    pub car_seat_price_cents: Option<i64>,
    pub booster_seat_price_cents: Option<i64>,
}
