use crate::domain::models::{
    auth::RefreshTokenRecord,
    booking::Booking,
    settings::PricingSettings,
    user::User,
    vehicle::Vehicle,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

/// Admin listing filter; supplied fields are ANDed together. `date` matches
/// the calendar day of the pickup time.
#[derive(Debug, Default, Clone)]
pub struct BookingFilter {
    pub email: Option<String>,
    pub driver_id: Option<String>,
    pub date: Option<NaiveDate>,
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<Booking>, AppError>;
    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, AppError>;
    async fn list_by_customer(&self, user_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn update(&self, booking: &Booking) -> Result<Booking, AppError>;
}

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Vehicle>, AppError>;
    async fn list(&self, status: Option<&str>) -> Result<Vec<Vehicle>, AppError>;
    async fn update(&self, vehicle: &Vehicle) -> Result<Vehicle, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn list_by_role(&self, role: &str) -> Result<Vec<User>, AppError>;
    async fn update(&self, user: &User) -> Result<User, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn get(&self) -> Result<PricingSettings, AppError>;
    async fn update(&self, settings: &PricingSettings) -> Result<PricingSettings, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
}

/// What a gateway reported for one authorization attempt. `success` without a
/// transaction id is treated as a failure by the orchestrator, never here.
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    pub success: bool,
    pub transaction_id: Option<String>,
    pub error: Option<String>,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Submit a client-side tokenized payment for the given amount. Exactly
    /// one network attempt; a gateway-reported decline comes back as
    /// `Ok(PaymentOutcome { success: false, .. })`, transport and
    /// missing-credential problems as `Err`.
    async fn authorize(&self, amount_cents: i64, token: &str) -> Result<PaymentOutcome, AppError>;
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        text_body: Option<&str>,
        attachment_name: Option<&str>,
        attachment_data: Option<&[u8]>,
    ) -> Result<(), AppError>;
}

#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, phone: &str, message: &str) -> Result<(), AppError>;
}
