use crate::domain::models::booking::Booking;
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};

/// Generates an iCalendar (.ics) string for a booked ride
pub fn generate_ics(booking: &Booking) -> String {
    let mut calendar = Calendar::new();

    let duration_hours = booking.duration_hours.unwrap_or(1).max(1);
    let end = booking.pickup_at + chrono::Duration::hours(duration_hours as i64);

    let description = format!(
        "Pickup: {}\nDropoff: {}",
        booking.pickup_address, booking.dropoff_address
    );

    let ical_event = IcalEvent::new()
        .summary(&format!("Limo ride: {}", booking.package_name))
        .description(&description)
        .location(&booking.pickup_address)
        .starts(booking.pickup_at)
        .ends(end)
        .uid(&booking.id)
        .done();

    calendar.push(ical_event);
    calendar.to_string()
}
