use crate::domain::models::{booking::Stop, settings::PricingSettings};
use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Everything the calculator needs for one quote. All amounts are integer
/// cents; the caller resolves the base (package price or hourly rate x hours)
/// before coming here.
#[derive(Debug, Clone)]
pub struct QuoteInput<'a> {
    pub base_cents: i64,
    pub stops: &'a [Stop],
    pub car_seats: i32,
    pub booster_seats: i32,
    pub distance_miles: Option<f64>,
}

/// Gratuity selection as submitted by the customer. The stored amount is
/// always derived from this, never taken from the client directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GratuityInput {
    None,
    Percentage { percent: f64 },
    Custom { amount_cents: i64 },
    Cash { amount_cents: i64 },
}

impl GratuityInput {
    pub fn kind_str(&self) -> &'static str {
        match self {
            GratuityInput::None => "none",
            GratuityInput::Percentage { .. } => "percentage",
            GratuityInput::Custom { .. } => "custom",
            GratuityInput::Cash { .. } => "cash",
        }
    }

    pub fn percent(&self) -> Option<f64> {
        match self {
            GratuityInput::Percentage { percent } => Some(*percent),
            _ => None,
        }
    }
}

pub fn base_for_hourly(rate_cents: i64, hours: i32) -> i64 {
    rate_cents * hours as i64
}

/// Total ride price in cents: base + stops + child seats + distance
/// surcharges, clamped to the configured fee window.
///
/// The flat over-threshold fee and the per-mile fee stack when both are
/// enabled; they are independent toggles, not alternatives.
pub fn compute_total(quote: &QuoteInput, settings: &PricingSettings) -> i64 {
    let mut total = quote.base_cents.max(0);

    for stop in quote.stops {
        total += stop.price_cents.unwrap_or(settings.stop_price_cents).max(0);
    }

    total += quote.car_seats.max(0) as i64 * settings.car_seat_price_cents;
    total += quote.booster_seats.max(0) as i64 * settings.booster_seat_price_cents;

    if let Some(distance) = quote.distance_miles {
        if settings.distance_fee_enabled && distance > settings.distance_threshold_miles {
            total += settings.distance_fee_cents;
        }
        if settings.per_mile_fee_enabled {
            total += (settings.per_mile_fee_cents as f64 * distance).round() as i64;
        }
    }

    total.clamp(settings.min_fee_cents, settings.max_fee_cents)
}

/// Gratuity in cents, computed on the already-clamped total. Gratuity itself
/// is never clamped.
pub fn gratuity_amount(input: &GratuityInput, base_cents: i64) -> Result<i64, AppError> {
    match input {
        GratuityInput::None => Ok(0),
        GratuityInput::Percentage { percent } => {
            if *percent < 0.0 {
                return Err(AppError::Validation("Gratuity percentage cannot be negative".into()));
            }
            Ok((base_cents as f64 * percent / 100.0).round() as i64)
        }
        GratuityInput::Custom { amount_cents } | GratuityInput::Cash { amount_cents } => {
            if *amount_cents < 0 {
                return Err(AppError::Validation("Gratuity amount cannot be negative".into()));
            }
            Ok(*amount_cents)
        }
    }
}
