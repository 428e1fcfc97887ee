use std::sync::Arc;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{error, info, info_span, warn, Instrument};

use crate::domain::models::{booking::Booking, user::User};
use crate::domain::services::calendar::generate_ics;
use crate::error::AppError;
use crate::state::AppState;

/// Events emitted after a state-changing write has committed. Consumed by a
/// single dispatcher task; a full channel or a dead consumer only ever costs
/// a log line, never the request that emitted the event.
#[derive(Debug)]
pub enum Notification {
    BookingConfirmed { booking: Booking },
    DriverAssigned { booking: Booking, driver: User },
}

impl Notification {
    fn kind(&self) -> &'static str {
        match self {
            Notification::BookingConfirmed { .. } => "booking_confirmed",
            Notification::DriverAssigned { .. } => "driver_assigned",
        }
    }
}

#[derive(Clone)]
pub struct NotificationOutbox {
    tx: UnboundedSender<Notification>,
}

impl NotificationOutbox {
    pub fn new(tx: UnboundedSender<Notification>) -> Self {
        Self { tx }
    }

    pub fn emit(&self, event: Notification) {
        if self.tx.send(event).is_err() {
            warn!("Notification channel closed; event dropped");
        }
    }
}

pub async fn start_notification_worker(mut rx: UnboundedReceiver<Notification>, state: Arc<AppState>) {
    info!("Starting notification dispatch worker...");

    while let Some(event) = rx.recv().await {
        let span = info_span!("notification", kind = event.kind());

        async {
            dispatch(&state, event).await;
        }
            .instrument(span)
            .await;
    }
}

// Email and SMS are dispatched independently: one channel failing must not
// starve the other, and neither outcome reaches the original caller.
async fn dispatch(state: &Arc<AppState>, event: Notification) {
    match event {
        Notification::BookingConfirmed { booking } => {
            if let Err(e) = send_confirmation_email(state, &booking).await {
                error!("Confirmation email failed for booking {}: {}", booking.id, e);
            }
            let sms = format!(
                "Your ride on {} is booked. Pickup: {}. Total: {}.",
                booking.pickup_at.format("%Y-%m-%d %H:%M UTC"),
                booking.pickup_address,
                format_cents(booking.base_price_cents),
            );
            if let Err(e) = state.sms_sender.send(&booking.customer_phone, &sms).await {
                error!("Confirmation SMS failed for booking {}: {}", booking.id, e);
            }
        }
        Notification::DriverAssigned { booking, driver } => {
            if let Err(e) = send_driver_assigned_email(state, &booking, &driver).await {
                error!("Driver-assignment email failed for booking {}: {}", booking.id, e);
            }
            let sms = format!(
                "New ride assigned: pickup {} at {} for {}.",
                booking.pickup_address,
                booking.pickup_at.format("%Y-%m-%d %H:%M UTC"),
                booking.customer_name,
            );
            if let Err(e) = state.sms_sender.send(&driver.phone, &sms).await {
                error!("Driver-assignment SMS failed for booking {}: {}", booking.id, e);
            }
        }
    }
}

async fn send_confirmation_email(state: &Arc<AppState>, booking: &Booking) -> Result<(), AppError> {
    let mut context = tera::Context::new();
    context.insert("customer_name", &booking.customer_name);
    context.insert("package_name", &booking.package_name);
    context.insert("pickup_address", &booking.pickup_address);
    context.insert("dropoff_address", &booking.dropoff_address);
    context.insert("pickup_at", &booking.pickup_at.format("%Y-%m-%d %H:%M UTC").to_string());
    context.insert("total", &format_cents(booking.base_price_cents));
    context.insert("payment_status", &booking.payment_status);

    let manage_link = format!("{}/manage/{}", state.config.frontend_url, booking.management_token);
    context.insert("manage_link", &manage_link);

    let html = state.templates.render("booking_confirmation.html", &context)
        .map_err(|e| AppError::InternalWithMsg(format!("Template render error: {:?}", e)))?;

    let ics = generate_ics(booking);

    state.email_sender
        .send(
            &booking.customer_email,
            "Your limo booking is confirmed",
            &html,
            None,
            Some("ride.ics"),
            Some(ics.as_bytes()),
        )
        .await
}

async fn send_driver_assigned_email(state: &Arc<AppState>, booking: &Booking, driver: &User) -> Result<(), AppError> {
    let mut context = tera::Context::new();
    context.insert("customer_name", &booking.customer_name);
    context.insert("driver_name", &driver.name);
    context.insert("driver_phone", &driver.phone);
    context.insert("pickup_address", &booking.pickup_address);
    context.insert("pickup_at", &booking.pickup_at.format("%Y-%m-%d %H:%M UTC").to_string());

    let html = state.templates.render("driver_assignment.html", &context)
        .map_err(|e| AppError::InternalWithMsg(format!("Template render error: {:?}", e)))?;

    state.email_sender
        .send(
            &booking.customer_email,
            "Your driver has been assigned",
            &html,
            None,
            None,
            None,
        )
        .await
}

fn format_cents(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}
