mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::{AuthHeaders, TestApp};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn create_booking(app: &TestApp, email: &str, price_cents: i64) -> Value {
    let payload = json!({
        "customer": {"kind": "guest", "name": "Ava Brooks", "email": email, "phone": "+1-555-0100"},
        "package_name": "Wine Tour",
        "package_price_cents": price_cents,
        "pickup_address": "12 Main St",
        "dropoff_address": "Valley Vineyards",
        "pickup_at": (Utc::now() + Duration::days(5)).to_rfc3339(),
        "payment": {"token": "tok_visa"}
    });

    let res = app.router.clone().oneshot(
        Request::builder().method("POST").uri("/api/v1/bookings")
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await
}

async fn complete_booking(app: &TestApp, auth: &AuthHeaders, booking_id: &str) {
    for next in ["confirmed", "in_progress", "completed"] {
        let res = app.router.clone().oneshot(
            Request::builder().method("PUT").uri(format!("/api/v1/bookings/{}/status", booking_id))
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token)
                .header("Content-Type", "application/json")
                .body(Body::from(json!({"status": next}).to_string())).unwrap()
        ).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}

async fn put_gratuity(app: &TestApp, token: &str, payload: Value) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/bookings/manage/{}/gratuity", token))
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_gratuity_rejected_before_completion() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let booking = create_booking(&app, "early-tip@example.com", 20000).await;
    let token = booking["management_token"].as_str().unwrap();
    let id = booking["id"].as_str().unwrap();

    // Still pending.
    let res = put_gratuity(&app, token, json!({"kind": "percentage", "percent": 20.0})).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Confirmed is still not completed.
    let confirm = app.router.clone().oneshot(
        Request::builder().method("PUT").uri(format!("/api/v1/bookings/{}/status", id))
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({"status": "confirmed"}).to_string())).unwrap()
    ).await.unwrap();
    assert_eq!(confirm.status(), StatusCode::OK);

    let res = put_gratuity(&app, token, json!({"kind": "cash", "amount_cents": 500})).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_percentage_gratuity_on_completed_ride() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;

    // The worked example: $245 ride, 20% tip -> $49, $294 all in.
    let booking = create_booking(&app, "tip@example.com", 24500).await;
    let token = booking["management_token"].as_str().unwrap();
    complete_booking(&app, &auth, booking["id"].as_str().unwrap()).await;

    let res = put_gratuity(&app, token, json!({"kind": "percentage", "percent": 20.0})).await;
    assert_eq!(res.status(), StatusCode::OK);

    let updated = parse_body(res).await;
    assert_eq!(updated["gratuity_kind"], "percentage");
    assert_eq!(updated["gratuity_percent"], 20.0);
    assert_eq!(updated["gratuity_cents"], 4900);
    assert_eq!(updated["base_price_cents"], 24500);
}

#[tokio::test]
async fn test_custom_and_cash_gratuity_overwrite() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let booking = create_booking(&app, "re-tip@example.com", 20000).await;
    let token = booking["management_token"].as_str().unwrap();
    complete_booking(&app, &auth, booking["id"].as_str().unwrap()).await;

    let res = put_gratuity(&app, token, json!({"kind": "custom", "amount_cents": 1500})).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["gratuity_kind"], "custom");
    assert_eq!(body["gratuity_cents"], 1500);

    let res = put_gratuity(&app, token, json!({"kind": "cash", "amount_cents": 1000})).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["gratuity_kind"], "cash");
    assert_eq!(body["gratuity_cents"], 1000);
    assert!(body["gratuity_percent"].is_null());
}

#[tokio::test]
async fn test_negative_gratuity_rejected_even_when_completed() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let booking = create_booking(&app, "negative@example.com", 20000).await;
    let token = booking["management_token"].as_str().unwrap();
    complete_booking(&app, &auth, booking["id"].as_str().unwrap()).await;

    let res = put_gratuity(&app, token, json!({"kind": "custom", "amount_cents": -500})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = put_gratuity(&app, token, json!({"kind": "percentage", "percent": -10.0})).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_gratuity_none_resets_to_zero() {
    let app = TestApp::new().await;
    let auth = app.login_admin().await;
    let booking = create_booking(&app, "reset@example.com", 20000).await;
    let token = booking["management_token"].as_str().unwrap();
    complete_booking(&app, &auth, booking["id"].as_str().unwrap()).await;

    put_gratuity(&app, token, json!({"kind": "custom", "amount_cents": 2000})).await;
    let res = put_gratuity(&app, token, json!({"kind": "none"})).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["gratuity_kind"], "none");
    assert_eq!(body["gratuity_cents"], 0);
}

#[tokio::test]
async fn test_gratuity_with_unknown_token_is_not_found() {
    let app = TestApp::new().await;

    let res = put_gratuity(&app, "not-a-real-token", json!({"kind": "none"})).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
