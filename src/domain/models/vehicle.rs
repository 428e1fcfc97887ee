use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const VEHICLE_ACTIVE: &str = "ACTIVE";
pub const VEHICLE_MAINTENANCE: &str = "MAINTENANCE";
pub const VEHICLE_INACTIVE: &str = "INACTIVE";

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Vehicle {
    pub id: String,
    pub name: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub capacity: i32,
    pub price_per_hour_cents: i64,
    pub license_plate: String,
    pub vin: String,
    pub status: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewVehicleParams {
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

impl Vehicle {
    pub fn new(params: NewVehicleParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            make: params.make,
            model: params.model,
            year: params.year,
            capacity: params.capacity,
            price_per_hour_cents: params.price_per_hour_cents,
            license_plate: params.license_plate,
            vin: params.vin,
            status: VEHICLE_ACTIVE.to_string(),
            image_url: params.image_url,
            created_at: Utc::now(),
        }
    }

    pub fn is_bookable(&self) -> bool {
        self.status == VEHICLE_ACTIVE
    }
}
