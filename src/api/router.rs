use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, booking, booking_management, driver, health, settings, vehicle};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Public fleet & quoting
        .route("/api/v1/vehicles", get(vehicle::list_vehicles))
        .route("/api/v1/vehicles/{vehicle_id}", get(vehicle::get_vehicle))
        .route("/api/v1/quotes", post(booking::get_quote))

        // Public booking flow
        .route("/api/v1/bookings", post(booking::create_booking).get(booking::list_bookings))
        .route("/api/v1/my/bookings", get(booking::my_bookings))

        // Customer booking management
        .route("/api/v1/bookings/manage/{token}", get(booking_management::get_booking_by_token))
        .route("/api/v1/bookings/manage/{token}/cancel", post(booking_management::cancel_booking_by_token))
        .route("/api/v1/bookings/manage/{token}/gratuity", put(booking_management::add_gratuity_by_token))

        // Admin booking management
        .route("/api/v1/bookings/{booking_id}", get(booking::get_booking).put(booking::update_booking).delete(booking_management::cancel_booking))
        .route("/api/v1/bookings/{booking_id}/status", put(booking_management::change_status))
        .route("/api/v1/bookings/{booking_id}/assign-driver", put(booking_management::assign_driver))
        .route("/api/v1/bookings/{booking_id}/update-assignments", put(booking_management::update_assignments))

        // Admin fleet
        .route("/api/v1/admin/vehicles", get(vehicle::list_all_vehicles).post(vehicle::create_vehicle))
        .route("/api/v1/admin/vehicles/{vehicle_id}", put(vehicle::update_vehicle).delete(vehicle::delete_vehicle))

        // Admin drivers & settings
        .route("/api/v1/drivers", get(driver::list_drivers).post(driver::create_driver))
        .route("/api/v1/settings/pricing", get(settings::get_settings).put(settings::update_settings))

        // Driver portal
        .route("/api/v1/driver/rides", get(driver::my_rides))
        .route("/api/v1/driver/earnings", get(driver::my_earnings))
        .route("/api/v1/driver/availability", put(driver::update_availability))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
