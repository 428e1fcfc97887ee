use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Singleton pricing configuration (row id "default"). Read by the pricing
/// calculator, mutated only through the admin settings endpoints.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct PricingSettings {
    pub id: String,
    pub distance_fee_enabled: bool,
    pub distance_threshold_miles: f64,
    pub distance_fee_cents: i64,
    pub per_mile_fee_enabled: bool,
    pub per_mile_fee_cents: i64,
    pub min_fee_cents: i64,
    pub max_fee_cents: i64,
    pub stop_price_cents: i64,
    pub car_seat_price_cents: i64,
    pub booster_seat_price_cents: i64,
    pub updated_at: DateTime<Utc>,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            id: "default".to_string(),
            distance_fee_enabled: false,
            distance_threshold_miles: 40.0,
            distance_fee_cents: 2000,
            per_mile_fee_enabled: false,
            per_mile_fee_cents: 200,
            min_fee_cents: 0,
            max_fee_cents: 100_000,
            stop_price_cents: 2500,
            car_seat_price_cents: 1500,
            booster_seat_price_cents: 1000,
            updated_at: Utc::now(),
        }
    }
}
