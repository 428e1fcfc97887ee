mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::TestApp;
use limo_backend::domain::ports::PaymentOutcome;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn future_iso(days: i64) -> String {
    (Utc::now() + Duration::days(days)).to_rfc3339()
}

fn guest_payload(email: &str) -> Value {
    json!({
        "customer": {"kind": "guest", "name": "Ava Brooks", "email": email, "phone": "+1-555-0100"},
        "package_name": "Airport Transfer",
        "package_price_cents": 20000,
        "pickup_address": "12 Main St",
        "dropoff_address": "JFK Terminal 4",
        "pickup_at": future_iso(3),
        "payment": {"token": "tok_visa"}
    })
}

async fn post_booking(app: &TestApp, payload: &Value) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/bookings")
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_guest_booking_success_sets_pending_and_paid() {
    let app = TestApp::new().await;

    let res = post_booking(&app, &guest_payload("ava@example.com")).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let booking = parse_body(res).await;
    assert_eq!(booking["status"], "pending");
    assert_eq!(booking["payment_status"], "paid");
    assert_eq!(booking["payment_transaction_id"], "txn_mock_1");
    assert_eq!(booking["base_price_cents"], 20000);
    assert_eq!(booking["package_name"], "Airport Transfer");

    assert_eq!(app.gateway.call_count(), 1);
    assert_eq!(app.gateway.last_amount(), Some(20000));

    // Confirmation goes out on both channels, best-effort.
    app.settle_notifications().await;
    assert_eq!(app.emails.count(), 1);
    assert_eq!(app.sms.count(), 1);
    assert_eq!(app.emails.sent.lock().unwrap()[0].0, "ava@example.com");
}

#[tokio::test]
async fn test_booking_without_payment_details_is_pay_on_arrival() {
    let app = TestApp::new().await;

    let mut payload = guest_payload("cash@example.com");
    payload.as_object_mut().unwrap().remove("payment");

    let res = post_booking(&app, &payload).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let booking = parse_body(res).await;
    assert_eq!(booking["status"], "pending");
    assert_eq!(booking["payment_status"], "pending");
    assert!(booking["payment_transaction_id"].is_null());
    assert_eq!(app.gateway.call_count(), 0);
}

#[tokio::test]
async fn test_success_without_transaction_id_fails_and_persists_nothing() {
    let app = TestApp::new().await;

    app.gateway.set_outcome(PaymentOutcome {
        success: true,
        transaction_id: None,
        error: None,
    });

    let res = post_booking(&app, &guest_payload("ghost@example.com")).await;
    assert_eq!(res.status(), StatusCode::PAYMENT_REQUIRED);
    assert_eq!(app.gateway.call_count(), 1);

    // The booking must not exist after the failed confirmation.
    let auth = app.login_admin().await;
    let list_res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/bookings?email=ghost@example.com")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(list_res.status(), StatusCode::OK);
    let list = parse_body(list_res).await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_empty_transaction_id_is_also_a_payment_error() {
    let app = TestApp::new().await;

    app.gateway.set_outcome(PaymentOutcome {
        success: true,
        transaction_id: Some("".to_string()),
        error: None,
    });

    let res = post_booking(&app, &guest_payload("empty-id@example.com")).await;
    assert_eq!(res.status(), StatusCode::PAYMENT_REQUIRED);
}

#[tokio::test]
async fn test_declined_card_returns_402_and_persists_nothing() {
    let app = TestApp::new().await;

    app.gateway.set_outcome(PaymentOutcome {
        success: false,
        transaction_id: None,
        error: Some("Your card was declined.".to_string()),
    });

    let res = post_booking(&app, &guest_payload("declined@example.com")).await;
    assert_eq!(res.status(), StatusCode::PAYMENT_REQUIRED);
    let body = parse_body(res).await;
    assert!(body["error"].as_str().unwrap().contains("declined"));

    let auth = app.login_admin().await;
    let list_res = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/bookings?email=declined@example.com")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    let list = parse_body(list_res).await;
    assert_eq!(list.as_array().unwrap().len(), 0);

    app.settle_notifications().await;
    assert_eq!(app.emails.count(), 0);
    assert_eq!(app.sms.count(), 0);
}

#[tokio::test]
async fn test_missing_required_fields_fail_before_any_gateway_call() {
    let app = TestApp::new().await;

    for missing in ["pickup_address", "dropoff_address", "pickup_at", "customer"] {
        let mut payload = guest_payload("incomplete@example.com");
        payload.as_object_mut().unwrap().remove(missing);

        let res = post_booking(&app, &payload).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "expected 400 when '{}' is missing", missing);
    }

    assert_eq!(app.gateway.call_count(), 0);
}

#[tokio::test]
async fn test_past_pickup_time_rejected() {
    let app = TestApp::new().await;

    let mut payload = guest_payload("late@example.com");
    payload["pickup_at"] = json!((Utc::now() - Duration::hours(2)).to_rfc3339());

    let res = post_booking(&app, &payload).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.gateway.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_pickup_time_rejected() {
    let app = TestApp::new().await;

    let mut payload = guest_payload("garbled@example.com");
    payload["pickup_at"] = json!("tomorrow at noon");

    let res = post_booking(&app, &payload).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_incomplete_guest_contact_rejected() {
    let app = TestApp::new().await;

    let mut payload = guest_payload("no-phone@example.com");
    payload["customer"] = json!({"kind": "guest", "name": "Ava", "email": "no-phone@example.com", "phone": ""});

    let res = post_booking(&app, &payload).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.gateway.call_count(), 0);
}

#[tokio::test]
async fn test_account_booking_uses_profile_contact() {
    let app = TestApp::new().await;

    let register = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/auth/register")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "email": "member@example.com",
                "password": "hunter2hunter2",
                "name": "Morgan Lee",
                "phone": "+1-555-0188"
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(register.status(), StatusCode::CREATED);

    let auth = app.login("member@example.com", "hunter2hunter2").await;

    let mut payload = guest_payload("ignored@example.com");
    payload.as_object_mut().unwrap().remove("customer");

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/bookings")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let booking = parse_body(res).await;
    assert!(!booking["customer_user_id"].is_null());
    assert_eq!(booking["customer_email"], "member@example.com");
    assert_eq!(booking["customer_name"], "Morgan Lee");

    // The account's booking history sees it.
    let mine = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/my/bookings")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    let list = parse_body(mine).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_hourly_vehicle_pricing_charges_rate_times_hours() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;

    let vehicle_res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/admin/vehicles")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": "Executive Sedan",
                "make": "Cadillac", "model": "XTS", "year": 2022,
                "capacity": 3,
                "price_per_hour_cents": 5000,
                "license_plate": "LIMO-01", "vin": "1G6KD57Y86U100001"
            }).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(vehicle_res.status(), StatusCode::CREATED);
    let vehicle = parse_body(vehicle_res).await;
    let vehicle_id = vehicle["id"].as_str().unwrap();

    let payload = json!({
        "customer": {"kind": "guest", "name": "Ava", "email": "hourly@example.com", "phone": "+1-555-0100"},
        "vehicle_id": vehicle_id,
        "duration_hours": 4,
        "stops": [{"location": "Hotel lobby"}],
        "pickup_address": "12 Main St",
        "dropoff_address": "Convention Center",
        "pickup_at": future_iso(2),
        "passenger_count": 3,
        "payment": {"token": "tok_visa"}
    });

    let res = post_booking(&app, &payload).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let booking = parse_body(res).await;

    // 4h x $50 + default $25 stop
    assert_eq!(booking["base_price_cents"], 22500);
    assert_eq!(app.gateway.last_amount(), Some(22500));
}

#[tokio::test]
async fn test_passenger_count_over_vehicle_capacity_rejected() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;

    let vehicle_res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/admin/vehicles")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": "Sedan", "make": "Lincoln", "model": "MKT", "year": 2021,
                "capacity": 3, "price_per_hour_cents": 5000,
                "license_plate": "LIMO-02", "vin": "1G6KD57Y86U100002"
            }).to_string())).unwrap()
    ).await.unwrap();
    let vehicle = parse_body(vehicle_res).await;

    let payload = json!({
        "customer": {"kind": "guest", "name": "Ava", "email": "crowd@example.com", "phone": "+1-555-0100"},
        "vehicle_id": vehicle["id"],
        "duration_hours": 2,
        "pickup_address": "12 Main St",
        "dropoff_address": "Stadium",
        "pickup_at": future_iso(2),
        "passenger_count": 6,
        "payment": {"token": "tok_visa"}
    });

    let res = post_booking(&app, &payload).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.gateway.call_count(), 0);
}

#[tokio::test]
async fn test_hourly_booking_without_duration_rejected() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;

    let vehicle_res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/admin/vehicles")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({
                "name": "Stretch", "make": "Lincoln", "model": "Town Car", "year": 2020,
                "capacity": 8, "price_per_hour_cents": 9000,
                "license_plate": "LIMO-03", "vin": "1G6KD57Y86U100003"
            }).to_string())).unwrap()
    ).await.unwrap();
    let vehicle = parse_body(vehicle_res).await;

    let payload = json!({
        "customer": {"kind": "guest", "name": "Ava", "email": "nohours@example.com", "phone": "+1-555-0100"},
        "vehicle_id": vehicle["id"],
        "pickup_address": "12 Main St",
        "dropoff_address": "Winery",
        "pickup_at": future_iso(2),
        "payment": {"token": "tok_visa"}
    });

    let res = post_booking(&app, &payload).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_list_filters_by_email_and_date() {
    let app = TestApp::new().await;

    let mut first = guest_payload("first@example.com");
    first["pickup_at"] = json!(future_iso(3));
    let mut second = guest_payload("second@example.com");
    second["pickup_at"] = json!(future_iso(10));

    assert_eq!(post_booking(&app, &first).await.status(), StatusCode::CREATED);
    assert_eq!(post_booking(&app, &second).await.status(), StatusCode::CREATED);

    let auth = app.login_admin().await;

    let by_email = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/bookings?email=first@example.com")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    let list = parse_body(by_email).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["customer_email"], "first@example.com");

    let day = (Utc::now() + Duration::days(10)).format("%Y-%m-%d").to_string();
    let by_date = app.router.clone().oneshot(
        Request::builder().method("GET").uri(format!("/api/v1/bookings?date={}", day))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    let list = parse_body(by_date).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["customer_email"], "second@example.com");

    let bad_date = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/bookings?date=next-tuesday")
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(bad_date.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listing_requires_admin() {
    let app = TestApp::new().await;

    let anon = app.router.clone().oneshot(
        Request::builder().method("GET").uri("/api/v1/bookings")
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(anon.status(), StatusCode::UNAUTHORIZED);
}
