use crate::domain::{models::booking::Booking, ports::{BookingFilter, BookingRepository}};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, customer_user_id, customer_name, customer_email, customer_phone,
                vehicle_id, vehicle_name, package_name, package_price_cents,
                pickup_address, dropoff_address, stops, pickup_at, duration_hours,
                passenger_count, car_seats, booster_seats, distance_miles, base_price_cents,
                gratuity_kind, gratuity_percent, gratuity_cents,
                status, payment_status, payment_transaction_id, driver_id, management_token, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                     $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.customer_user_id).bind(&booking.customer_name)
            .bind(&booking.customer_email).bind(&booking.customer_phone)
            .bind(&booking.vehicle_id).bind(&booking.vehicle_name)
            .bind(&booking.package_name).bind(booking.package_price_cents)
            .bind(&booking.pickup_address).bind(&booking.dropoff_address)
            .bind(&booking.stops).bind(booking.pickup_at).bind(booking.duration_hours)
            .bind(booking.passenger_count).bind(booking.car_seats).bind(booking.booster_seats)
            .bind(booking.distance_miles).bind(booking.base_price_cents)
            .bind(&booking.gratuity_kind).bind(booking.gratuity_percent).bind(booking.gratuity_cents)
            .bind(&booking.status).bind(&booking.payment_status).bind(&booking.payment_transaction_id)
            .bind(&booking.driver_id).bind(&booking.management_token).bind(booking.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE management_token = $1")
            .bind(token).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, AppError> {
        let mut sql = String::from("SELECT * FROM bookings WHERE 1=1");
        let mut idx = 0;
        if filter.email.is_some() { idx += 1; sql.push_str(&format!(" AND customer_email = ${}", idx)); }
        if filter.driver_id.is_some() { idx += 1; sql.push_str(&format!(" AND driver_id = ${}", idx)); }
        if filter.date.is_some() { idx += 1; sql.push_str(&format!(" AND pickup_at::date = ${}", idx)); }
        sql.push_str(" ORDER BY pickup_at ASC");

        let mut query = sqlx::query_as::<_, Booking>(&sql);
        if let Some(email) = &filter.email { query = query.bind(email); }
        if let Some(driver_id) = &filter.driver_id { query = query.bind(driver_id); }
        if let Some(date) = filter.date { query = query.bind(date); }

        query.fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_customer(&self, user_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE customer_user_id = $1 ORDER BY pickup_at DESC")
            .bind(user_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET customer_name=$1, customer_email=$2, customer_phone=$3,
                vehicle_id=$4, vehicle_name=$5, pickup_address=$6, dropoff_address=$7, stops=$8,
                pickup_at=$9, duration_hours=$10, passenger_count=$11, car_seats=$12, booster_seats=$13,
                distance_miles=$14, base_price_cents=$15, gratuity_kind=$16, gratuity_percent=$17,
                gratuity_cents=$18, status=$19, payment_status=$20, payment_transaction_id=$21, driver_id=$22
             WHERE id=$23
             RETURNING *"
        )
            .bind(&booking.customer_name).bind(&booking.customer_email).bind(&booking.customer_phone)
            .bind(&booking.vehicle_id).bind(&booking.vehicle_name)
            .bind(&booking.pickup_address).bind(&booking.dropoff_address).bind(&booking.stops)
            .bind(booking.pickup_at).bind(booking.duration_hours).bind(booking.passenger_count)
            .bind(booking.car_seats).bind(booking.booster_seats).bind(booking.distance_miles)
            .bind(booking.base_price_cents).bind(&booking.gratuity_kind).bind(booking.gratuity_percent)
            .bind(booking.gratuity_cents).bind(&booking.status).bind(&booking.payment_status)
            .bind(&booking.payment_transaction_id).bind(&booking.driver_id)
            .bind(&booking.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
