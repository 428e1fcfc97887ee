use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_DRIVER: &str = "DRIVER";
pub const ROLE_CUSTOMER: &str = "CUSTOMER";

pub const AVAILABILITY_AVAILABLE: &str = "AVAILABLE";
pub const AVAILABILITY_BUSY: &str = "BUSY";
pub const AVAILABILITY_OFFLINE: &str = "OFFLINE";

/// One account table for all roles. `availability` only means something for
/// drivers and stays OFFLINE for everyone else.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub phone: String,
    pub role: String,
    pub availability: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String, password_hash: String, name: String, phone: String, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            name,
            phone,
            role: role.to_string(),
            availability: AVAILABILITY_OFFLINE.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn is_driver(&self) -> bool {
        self.role == ROLE_DRIVER
    }
}
