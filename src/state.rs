use std::sync::Arc;
use crate::domain::ports::{
    AuthRepository, BookingRepository, EmailSender, SettingsRepository,
    SmsSender, UserRepository, VehicleRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::booking_service::BookingService;
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub vehicle_repo: Arc<dyn VehicleRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub settings_repo: Arc<dyn SettingsRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub auth_service: Arc<AuthService>,
    pub booking_service: Arc<BookingService>,
    pub email_sender: Arc<dyn EmailSender>,
    pub sms_sender: Arc<dyn SmsSender>,
    pub templates: Arc<Tera>,
}
