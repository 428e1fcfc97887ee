use crate::domain::{models::settings::PricingSettings, ports::SettingsRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteSettingsRepo {
    pool: SqlitePool,
}

impl SqliteSettingsRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for SqliteSettingsRepo {
    async fn get(&self) -> Result<PricingSettings, AppError> {
        // The migration seeds the singleton row; a missing row is a broken
        // deployment, not a user error.
        sqlx::query_as::<_, PricingSettings>("SELECT * FROM pricing_settings WHERE id = 'default'")
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::InternalWithMsg("Pricing settings row missing".into()))
    }

    async fn update(&self, settings: &PricingSettings) -> Result<PricingSettings, AppError> {
        sqlx::query_as::<_, PricingSettings>(
            "UPDATE pricing_settings SET distance_fee_enabled=?, distance_threshold_miles=?,
                distance_fee_cents=?, per_mile_fee_enabled=?, per_mile_fee_cents=?,
                min_fee_cents=?, max_fee_cents=?, stop_price_cents=?,
                car_seat_price_cents=?, booster_seat_price_cents=?, updated_at=?
             WHERE id = 'default'
             RETURNING *"
        )
            .bind(settings.distance_fee_enabled).bind(settings.distance_threshold_miles)
            .bind(settings.distance_fee_cents).bind(settings.per_mile_fee_enabled)
            .bind(settings.per_mile_fee_cents).bind(settings.min_fee_cents)
            .bind(settings.max_fee_cents).bind(settings.stop_price_cents)
            .bind(settings.car_seat_price_cents).bind(settings.booster_seat_price_cents)
            .bind(Utc::now())
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
