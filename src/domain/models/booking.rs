use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;
use rand::{distributions::Alphanumeric, Rng};

/// Intermediate stop on a ride. A stop without an explicit price falls back
/// to the per-stop price from the pricing settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Stop {
    pub location: String,
    pub order: i32,
    pub price_cents: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub customer_user_id: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub vehicle_id: Option<String>,
    pub vehicle_name: Option<String>,
    pub package_name: String,
    pub package_price_cents: Option<i64>,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub stops: Json<Vec<Stop>>,
    pub pickup_at: DateTime<Utc>,
    pub duration_hours: Option<i32>,
    pub passenger_count: i32,
    pub car_seats: i32,
    pub booster_seats: i32,
    pub distance_miles: Option<f64>,
    pub base_price_cents: i64,
    pub gratuity_kind: String,
    pub gratuity_percent: Option<f64>,
    pub gratuity_cents: i64,
    pub status: String,
    pub payment_status: String,
    pub payment_transaction_id: Option<String>,
    pub driver_id: Option<String>,
    pub management_token: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub customer_user_id: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub vehicle_id: Option<String>,
    pub vehicle_name: Option<String>,
    pub package_name: Option<String>,
    pub package_price_cents: Option<i64>,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub stops: Vec<Stop>,
    pub pickup_at: DateTime<Utc>,
    pub duration_hours: Option<i32>,
    pub passenger_count: i32,
    pub car_seats: i32,
    pub booster_seats: i32,
    pub distance_miles: Option<f64>,
    pub base_price_cents: i64,
    pub payment_status: String,
    pub payment_transaction_id: Option<String>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(48)
            .map(char::from)
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            customer_user_id: params.customer_user_id,
            customer_name: params.customer_name,
            customer_email: params.customer_email,
            customer_phone: params.customer_phone,
            vehicle_id: params.vehicle_id,
            vehicle_name: params.vehicle_name,
            package_name: params.package_name.unwrap_or_else(|| "custom ride".to_string()),
            package_price_cents: params.package_price_cents,
            pickup_address: params.pickup_address,
            dropoff_address: params.dropoff_address,
            stops: Json(params.stops),
            pickup_at: params.pickup_at,
            duration_hours: params.duration_hours,
            passenger_count: params.passenger_count,
            car_seats: params.car_seats,
            booster_seats: params.booster_seats,
            distance_miles: params.distance_miles,
            base_price_cents: params.base_price_cents,
            gratuity_kind: "none".to_string(),
            gratuity_percent: None,
            gratuity_cents: 0,
            status: "pending".to_string(),
            payment_status: params.payment_status,
            payment_transaction_id: params.payment_transaction_id,
            driver_id: None,
            management_token: token,
            created_at: Utc::now(),
        }
    }

    /// Customer-facing grand total: clamped ride price plus gratuity.
    pub fn grand_total_cents(&self) -> i64 {
        self.base_price_cents + self.gratuity_cents
    }
}
