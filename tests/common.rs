use limo_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::repositories::{
        sqlite_auth_repo::SqliteAuthRepo,
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_settings_repo::SqliteSettingsRepo,
        sqlite_user_repo::SqliteUserRepo,
        sqlite_vehicle_repo::SqliteVehicleRepo,
    },
    domain::models::user::{User, ROLE_ADMIN},
    domain::ports::{EmailSender, PaymentGateway, PaymentOutcome, SmsSender, UserRepository},
    domain::services::auth_service::AuthService,
    domain::services::booking_service::BookingService,
    notify::{start_notification_worker, NotificationOutbox},
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use async_trait::async_trait;
use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use tera::Tera;
use tower::ServiceExt;
use serde_json::Value;

pub const ADMIN_EMAIL: &str = "admin@test.local";
pub const ADMIN_PASSWORD: &str = "admin-secret-123";

/// Payment gateway double: records every authorize call and replays a
/// configurable outcome.
pub struct MockPaymentGateway {
    pub amounts: Mutex<Vec<i64>>,
    pub next_outcome: Mutex<PaymentOutcome>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self {
            amounts: Mutex::new(Vec::new()),
            next_outcome: Mutex::new(PaymentOutcome {
                success: true,
                transaction_id: Some("txn_mock_1".to_string()),
                error: None,
            }),
        }
    }

    pub fn set_outcome(&self, outcome: PaymentOutcome) {
        *self.next_outcome.lock().unwrap() = outcome;
    }

    pub fn call_count(&self) -> usize {
        self.amounts.lock().unwrap().len()
    }

    pub fn last_amount(&self) -> Option<i64> {
        self.amounts.lock().unwrap().last().copied()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn authorize(&self, amount_cents: i64, _token: &str) -> Result<PaymentOutcome, AppError> {
        self.amounts.lock().unwrap().push(amount_cents);
        Ok(self.next_outcome.lock().unwrap().clone())
    }
}

pub struct MockEmailSender {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self { sent: Mutex::new(Vec::new()) }
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        _html_body: &str,
        _text_body: Option<&str>,
        _attachment_name: Option<&str>,
        _attachment_data: Option<&[u8]>,
    ) -> Result<(), AppError> {
        self.sent.lock().unwrap().push((recipient.to_string(), subject.to_string()));
        Ok(())
    }
}

pub struct MockSmsSender {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl MockSmsSender {
    pub fn new() -> Self {
        Self { sent: Mutex::new(Vec::new()) }
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl SmsSender for MockSmsSender {
    async fn send(&self, phone: &str, message: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push((phone.to_string(), message.to_string()));
        Ok(())
    }
}

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub gateway: Arc<MockPaymentGateway>,
    pub emails: Arc<MockEmailSender>,
    pub sms: Arc<MockSmsSender>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut tera = Tera::default();
        tera.add_raw_template("booking_confirmation.html", "<html>Ride for {{ customer_name }}: {{ manage_link }}</html>").unwrap();
        tera.add_raw_template("driver_assignment.html", "<html>Driver {{ driver_name }} for {{ customer_name }}</html>").unwrap();
        let templates = Arc::new(tera);

        let priv_key_pem = include_str!("keys/test_private.pem");
        let pub_key_pem = include_str!("keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            frontend_url: "http://localhost:5173".to_string(),
            payment_provider: "stripe".to_string(),
            stripe_secret_key: None,
            authnet_api_login_id: None,
            authnet_transaction_key: None,
            authnet_api_url: "http://localhost".to_string(),
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            sms_service_url: "http://localhost".to_string(),
            sms_service_token: "token".to_string(),
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            admin_email: ADMIN_EMAIL.to_string(),
            admin_password: Some(ADMIN_PASSWORD.to_string()),
        };

        let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
        let vehicle_repo = Arc::new(SqliteVehicleRepo::new(pool.clone()));
        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
        let settings_repo = Arc::new(SqliteSettingsRepo::new(pool.clone()));
        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));

        let gateway = Arc::new(MockPaymentGateway::new());
        let emails = Arc::new(MockEmailSender::new());
        let sms = Arc::new(MockSmsSender::new());

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let outbox = NotificationOutbox::new(tx);

        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
        let booking_service = Arc::new(BookingService::new(
            booking_repo.clone(),
            user_repo.clone(),
            vehicle_repo.clone(),
            settings_repo.clone(),
            gateway.clone(),
            outbox,
        ));

        // Seed the admin account the way the bootstrap factory does.
        let salt = SaltString::generate(&mut rand::rngs::OsRng);
        let password_hash = Argon2::default()
            .hash_password(ADMIN_PASSWORD.as_bytes(), &salt)
            .unwrap()
            .to_string();
        let admin = User::new(
            ADMIN_EMAIL.to_string(),
            password_hash,
            "Administrator".to_string(),
            "".to_string(),
            ROLE_ADMIN,
        );
        user_repo.create(&admin).await.expect("Failed to seed admin");

        let state = Arc::new(AppState {
            config: config.clone(),
            booking_repo,
            vehicle_repo,
            user_repo,
            settings_repo,
            auth_repo,
            auth_service,
            booking_service,
            email_sender: emails.clone(),
            sms_sender: sms.clone(),
            templates,
        });

        // Start Notification Worker
        let worker_state = state.clone();
        tokio::spawn(async move {
            start_notification_worker(rx, worker_state).await;
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            gateway,
            emails,
            sms,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthHeaders {
        let payload = serde_json::json!({
            "email": email,
            "password": password
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let cookies: Vec<String> = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let access_token_cookie = cookies.iter()
            .find(|c| c.contains("access_token="))
            .expect("No access_token cookie returned");

        let start = access_token_cookie.find("access_token=").unwrap() + 13;
        let end = access_token_cookie[start..].find(';').unwrap_or(access_token_cookie.len() - start);
        let access_token = access_token_cookie[start..start+end].to_string();

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_json: Value = serde_json::from_slice(&body_bytes).unwrap();
        let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();

        AuthHeaders {
            access_token,
            csrf_token
        }
    }

    pub async fn login_admin(&self) -> AuthHeaders {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// The notification worker runs on its own task; give it a beat to drain
    /// the channel before asserting on dispatch counts.
    pub async fn settle_notifications(&self) {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
