use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::domain::models::booking::{Booking, NewBookingParams, Stop};
use crate::domain::models::user::ROLE_DRIVER;
use crate::domain::ports::{
    BookingRepository, PaymentGateway, SettingsRepository, UserRepository, VehicleRepository,
};
use crate::domain::services::lifecycle::{BookingStatus, PaymentStatus};
use crate::domain::services::pricing::{self, GratuityInput, QuoteInput};
use crate::error::AppError;
use crate::notify::{Notification, NotificationOutbox};

/// Who the ride is for. Resolved at the API boundary into exactly one of the
/// two shapes; the loosely-typed mixed payload of older clients never makes
/// it past deserialization.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CustomerIdentity {
    Account { user_id: String },
    Guest { name: String, email: String, phone: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentDetails {
    pub token: String,
}

pub struct CreateBookingCommand {
    pub identity: CustomerIdentity,
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
    pub payment: Option<PaymentDetails>,
}

pub struct UpdateAssignmentsCommand {
    pub driver_id: Option<String>,
    pub vehicle_id: Option<String>,
}

/// Coordinates validation, payment authorization, persistence and post-commit
/// notifications for the booking lifecycle. Authorization always completes
/// (or fails) before anything is written; notifications are emitted only
/// after the write and can never fail the request.
pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    users: Arc<dyn UserRepository>,
    vehicles: Arc<dyn VehicleRepository>,
    settings: Arc<dyn SettingsRepository>,
    gateway: Arc<dyn PaymentGateway>,
    outbox: NotificationOutbox,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        users: Arc<dyn UserRepository>,
        vehicles: Arc<dyn VehicleRepository>,
        settings: Arc<dyn SettingsRepository>,
        gateway: Arc<dyn PaymentGateway>,
        outbox: NotificationOutbox,
    ) -> Self {
        Self { bookings, users, vehicles, settings, gateway, outbox }
    }

    pub async fn create_booking(&self, cmd: CreateBookingCommand) -> Result<Booking, AppError> {
        let (customer_user_id, name, email, phone) = self.resolve_identity(&cmd.identity).await?;

        if cmd.pickup_address.trim().is_empty() {
            return Err(AppError::Validation("Pickup address is required".into()));
        }
        if cmd.dropoff_address.trim().is_empty() {
            return Err(AppError::Validation("Dropoff address is required".into()));
        }
        if cmd.pickup_at <= Utc::now() {
            return Err(AppError::Validation("Pickup time must be in the future".into()));
        }
        if cmd.vehicle_id.is_none() && cmd.vehicle_name.is_none() && cmd.package_name.is_none() {
            return Err(AppError::Validation("Select a vehicle or a package".into()));
        }
        if cmd.passenger_count < 1 {
            return Err(AppError::Validation("Passenger count must be at least 1".into()));
        }
        if cmd.car_seats < 0 || cmd.booster_seats < 0 {
            return Err(AppError::Validation("Seat counts cannot be negative".into()));
        }
        if let Some(price) = cmd.package_price_cents {
            if price < 0 {
                return Err(AppError::Validation("Package price cannot be negative".into()));
            }
        }
        if cmd.stops.iter().any(|s| s.price_cents.is_some_and(|p| p < 0)) {
            return Err(AppError::Validation("Stop price cannot be negative".into()));
        }

        let base_cents = self.resolve_base_price(&cmd).await?;

        let settings = self.settings.get().await?;
        let total_cents = pricing::compute_total(
            &QuoteInput {
                base_cents,
                stops: &cmd.stops,
                car_seats: cmd.car_seats,
                booster_seats: cmd.booster_seats,
                distance_miles: cmd.distance_miles,
            },
            &settings,
        );

        // The one ordering guarantee of this flow: the charge settles before
        // the booking exists. A declined card leaves no trace.
        let (payment_status, transaction_id) = match &cmd.payment {
            Some(details) => {
                let outcome = self.gateway.authorize(total_cents, &details.token).await?;
                if !outcome.success {
                    return Err(AppError::Payment(
                        outcome.error.unwrap_or_else(|| "Card was declined".to_string()),
                    ));
                }
                match outcome.transaction_id.as_deref() {
                    Some(id) if !id.is_empty() => {
                        (PaymentStatus::Paid, Some(id.to_string()))
                    }
                    _ => {
                        return Err(AppError::Payment(
                            "Gateway reported success without a transaction id".into(),
                        ))
                    }
                }
            }
            None => (PaymentStatus::Pending, None),
        };

        let booking = Booking::new(NewBookingParams {
            customer_user_id,
            customer_name: name,
            customer_email: email,
            customer_phone: phone,
            vehicle_id: cmd.vehicle_id,
            vehicle_name: cmd.vehicle_name,
            package_name: cmd.package_name,
            package_price_cents: cmd.package_price_cents,
            pickup_address: cmd.pickup_address,
            dropoff_address: cmd.dropoff_address,
            stops: cmd.stops,
            pickup_at: cmd.pickup_at,
            duration_hours: cmd.duration_hours,
            passenger_count: cmd.passenger_count,
            car_seats: cmd.car_seats,
            booster_seats: cmd.booster_seats,
            distance_miles: cmd.distance_miles,
            base_price_cents: total_cents,
            payment_status: payment_status.as_str().to_string(),
            payment_transaction_id: transaction_id,
        });

        let created = self.bookings.create(&booking).await?;
        info!("Booking created: {} ({} cents, payment {})", created.id, created.base_price_cents, created.payment_status);

        self.outbox.emit(Notification::BookingConfirmed { booking: created.clone() });

        Ok(created)
    }

    pub async fn assign_driver(&self, booking_id: &str, driver_id: &str, notify: bool) -> Result<Booking, AppError> {
        let mut booking = self.bookings.find_by_id(booking_id).await?
            .ok_or(AppError::NotFound("Booking not found".into()))?;

        let driver = self.users.find_by_id(driver_id).await?
            .filter(|u| u.role == ROLE_DRIVER)
            .ok_or(AppError::NotFound("Driver not found".into()))?;

        // Re-assignment simply overwrites the previous reference.
        booking.driver_id = Some(driver.id.clone());
        let updated = self.bookings.update(&booking).await?;
        info!("Driver {} assigned to booking {}", driver.id, updated.id);

        if notify {
            self.outbox.emit(Notification::DriverAssigned {
                booking: updated.clone(),
                driver,
            });
        }

        Ok(updated)
    }

    pub async fn update_assignments(&self, booking_id: &str, cmd: UpdateAssignmentsCommand) -> Result<Booking, AppError> {
        if cmd.driver_id.is_none() && cmd.vehicle_id.is_none() {
            return Err(AppError::Validation("Provide driver_id or vehicle_id".into()));
        }

        let mut booking = self.bookings.find_by_id(booking_id).await?
            .ok_or(AppError::NotFound("Booking not found".into()))?;

        if let Some(driver_id) = cmd.driver_id {
            let driver = self.users.find_by_id(&driver_id).await?
                .filter(|u| u.role == ROLE_DRIVER)
                .ok_or(AppError::NotFound("Driver not found".into()))?;
            booking.driver_id = Some(driver.id);
        }

        if let Some(vehicle_id) = cmd.vehicle_id {
            let vehicle = self.vehicles.find_by_id(&vehicle_id).await?
                .ok_or(AppError::NotFound("Vehicle not found".into()))?;
            booking.vehicle_id = Some(vehicle.id);
            booking.vehicle_name = Some(vehicle.name);
        }

        self.bookings.update(&booking).await
    }

    pub async fn change_status(&self, booking_id: &str, new_status: &str) -> Result<Booking, AppError> {
        let target = BookingStatus::parse(new_status)
            .ok_or_else(|| AppError::Validation(format!("Unknown status '{}'", new_status)))?;

        let mut booking = self.bookings.find_by_id(booking_id).await?
            .ok_or(AppError::NotFound("Booking not found".into()))?;

        let current = BookingStatus::parse(&booking.status).ok_or(AppError::Internal)?;

        if current == target {
            return Ok(booking);
        }
        if !current.can_transition_to(target) {
            return Err(AppError::InvalidTransition(
                format!("Cannot move booking from {} to {}", current, target),
            ));
        }

        booking.status = target.as_str().to_string();
        let updated = self.bookings.update(&booking).await?;
        info!("Booking {} status: {} -> {}", updated.id, current, target);
        Ok(updated)
    }

    /// Gratuity is a post-ride action; anything other than a completed
    /// booking rejects it regardless of payload.
    pub async fn add_gratuity(&self, booking_id: &str, gratuity: GratuityInput) -> Result<Booking, AppError> {
        let mut booking = self.bookings.find_by_id(booking_id).await?
            .ok_or(AppError::NotFound("Booking not found".into()))?;

        let current = BookingStatus::parse(&booking.status).ok_or(AppError::Internal)?;
        if current != BookingStatus::Completed {
            return Err(AppError::InvalidState(
                "Gratuity can only be added to a completed ride".into(),
            ));
        }

        let amount = pricing::gratuity_amount(&gratuity, booking.base_price_cents)?;
        booking.gratuity_kind = gratuity.kind_str().to_string();
        booking.gratuity_percent = gratuity.percent();
        booking.gratuity_cents = amount;

        let updated = self.bookings.update(&booking).await?;
        info!("Gratuity ({}) of {} cents added to booking {}", updated.gratuity_kind, amount, updated.id);
        Ok(updated)
    }

    pub async fn cancel(&self, booking_id: &str) -> Result<Booking, AppError> {
        let mut booking = self.bookings.find_by_id(booking_id).await?
            .ok_or(AppError::NotFound("Booking not found".into()))?;

        let current = BookingStatus::parse(&booking.status).ok_or(AppError::Internal)?;
        if current == BookingStatus::Cancelled {
            return Ok(booking);
        }
        if !current.can_transition_to(BookingStatus::Cancelled) {
            return Err(AppError::InvalidTransition(
                format!("Cannot cancel a {} booking", current),
            ));
        }

        booking.status = BookingStatus::Cancelled.as_str().to_string();
        let updated = self.bookings.update(&booking).await?;
        info!("Booking cancelled: {}", updated.id);
        Ok(updated)
    }

    async fn resolve_identity(
        &self,
        identity: &CustomerIdentity,
    ) -> Result<(Option<String>, String, String, String), AppError> {
        match identity {
            CustomerIdentity::Account { user_id } => {
                let user = self.users.find_by_id(user_id).await?
                    .ok_or(AppError::Validation("Unknown customer account".into()))?;
                Ok((Some(user.id), user.name, user.email, user.phone))
            }
            CustomerIdentity::Guest { name, email, phone } => {
                if name.trim().is_empty() || email.trim().is_empty() || phone.trim().is_empty() {
                    return Err(AppError::Validation(
                        "Guest bookings need name, email and phone".into(),
                    ));
                }
                if !email.contains('@') {
                    return Err(AppError::Validation("Invalid email address".into()));
                }
                Ok((None, name.clone(), email.clone(), phone.clone()))
            }
        }
    }

    /// Fixed package price when one is given, otherwise the referenced
    /// vehicle's hourly rate times the requested hours. A referenced vehicle
    /// is checked even for package rides so a stale selection never reaches
    /// the payment gateway or the insert.
    async fn resolve_base_price(&self, cmd: &CreateBookingCommand) -> Result<i64, AppError> {
        let vehicle = match &cmd.vehicle_id {
            Some(vehicle_id) => {
                let vehicle = self.vehicles.find_by_id(vehicle_id).await?
                    .filter(|v| v.is_bookable())
                    .ok_or(AppError::Validation("Selected vehicle is no longer available".into()))?;
                if cmd.passenger_count > vehicle.capacity {
                    return Err(AppError::Validation(
                        format!("Vehicle seats {} passengers", vehicle.capacity),
                    ));
                }
                Some(vehicle)
            }
            None => None,
        };

        if let Some(price) = cmd.package_price_cents {
            return Ok(price);
        }

        let Some(vehicle) = vehicle else {
            return Err(AppError::Validation(
                "A package price or a fleet vehicle is required to price this ride".into(),
            ));
        };

        let hours = cmd.duration_hours
            .ok_or(AppError::Validation("Duration in hours is required for hourly rides".into()))?;
        if hours < 1 {
            return Err(AppError::Validation("Duration must be at least one hour".into()));
        }

        Ok(pricing::base_for_hourly(vehicle.price_per_hour_cents, hours))
    }
}
