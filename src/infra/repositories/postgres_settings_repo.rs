use crate::domain::{models::settings::PricingSettings, ports::SettingsRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresSettingsRepo {
    pool: PgPool,
}

impl PostgresSettingsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PostgresSettingsRepo {
    async fn get(&self) -> Result<PricingSettings, AppError> {
        sqlx::query_as::<_, PricingSettings>("SELECT * FROM pricing_settings WHERE id = 'default'")
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or(AppError::InternalWithMsg("Pricing settings row missing".into()))
    }

    async fn update(&self, settings: &PricingSettings) -> Result<PricingSettings, AppError> {
        sqlx::query_as::<_, PricingSettings>(
            "UPDATE pricing_settings SET distance_fee_enabled=$1, distance_threshold_miles=$2,
                distance_fee_cents=$3, per_mile_fee_enabled=$4, per_mile_fee_cents=$5,
                min_fee_cents=$6, max_fee_cents=$7, stop_price_cents=$8,
                car_seat_price_cents=$9, booster_seat_price_cents=$10, updated_at=$11
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
