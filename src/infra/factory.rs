use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use rand::{distributions::Alphanumeric, Rng};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::domain::models::user::{User, ROLE_ADMIN};
use crate::domain::ports::{PaymentGateway, UserRepository};
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::booking_service::BookingService;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::payments::{authnet_gateway::AuthorizeNetGateway, stripe_gateway::StripeGateway};
use crate::infra::sms::http_sms_service::HttpSmsService;
use crate::notify::{Notification, NotificationOutbox};
use crate::state::AppState;
use crate::infra::repositories::{
    postgres_auth_repo::PostgresAuthRepo, postgres_booking_repo::PostgresBookingRepo,
    postgres_settings_repo::PostgresSettingsRepo, postgres_user_repo::PostgresUserRepo,
    postgres_vehicle_repo::PostgresVehicleRepo,
    sqlite_auth_repo::SqliteAuthRepo, sqlite_booking_repo::SqliteBookingRepo,
    sqlite_settings_repo::SqliteSettingsRepo, sqlite_user_repo::SqliteUserRepo,
    sqlite_vehicle_repo::SqliteVehicleRepo,
};

pub async fn bootstrap_state(config: &Config) -> (AppState, UnboundedReceiver<Notification>) {
    let database_url = &config.database_url;

    let email_sender = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));
    let sms_sender = Arc::new(HttpSmsService::new(
        config.sms_service_url.clone(),
        config.sms_service_token.clone(),
    ));

    let gateway = select_gateway(config);

    let mut tera = Tera::default();
    tera.add_raw_template("booking_confirmation.html", include_str!("../templates/booking_confirmation.html"))
        .expect("Failed to load confirmation template");
    tera.add_raw_template("driver_assignment.html", include_str!("../templates/driver_assignment.html"))
        .expect("Failed to load driver assignment template");
    let templates = Arc::new(tera);

    let (tx, rx) = mpsc::unbounded_channel();
    let outbox = NotificationOutbox::new(tx);

    let state = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let booking_repo = Arc::new(PostgresBookingRepo::new(pool.clone()));
        let vehicle_repo = Arc::new(PostgresVehicleRepo::new(pool.clone()));
        let user_repo: Arc<dyn UserRepository> = Arc::new(PostgresUserRepo::new(pool.clone()));
        let settings_repo = Arc::new(PostgresSettingsRepo::new(pool.clone()));
        let auth_repo = Arc::new(PostgresAuthRepo::new(pool.clone()));

        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
        let booking_service = Arc::new(BookingService::new(
            booking_repo.clone(),
            user_repo.clone(),
            vehicle_repo.clone(),
            settings_repo.clone(),
            gateway,
            outbox,
        ));

        ensure_admin(&user_repo, config).await;

        AppState {
            config: config.clone(),
            booking_repo,
            vehicle_repo,
            user_repo,
            settings_repo,
            auth_repo,
            auth_service,
            booking_service,
            email_sender,
            sms_sender,
            templates,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
        let vehicle_repo = Arc::new(SqliteVehicleRepo::new(pool.clone()));
        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepo::new(pool.clone()));
        let settings_repo = Arc::new(SqliteSettingsRepo::new(pool.clone()));
        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));

        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
        let booking_service = Arc::new(BookingService::new(
            booking_repo.clone(),
            user_repo.clone(),
            vehicle_repo.clone(),
            settings_repo.clone(),
            gateway,
            outbox,
        ));

        ensure_admin(&user_repo, config).await;

        AppState {
            config: config.clone(),
            booking_repo,
            vehicle_repo,
            user_repo,
            settings_repo,
            auth_repo,
            auth_service,
            booking_service,
            email_sender,
            sms_sender,
            templates,
        }
    };

    (state, rx)
}

fn select_gateway(config: &Config) -> Arc<dyn PaymentGateway> {
    match config.payment_provider.as_str() {
        "authorize_net" => {
            info!("Payment provider: Authorize.Net");
            Arc::new(AuthorizeNetGateway::new(
                config.authnet_api_url.clone(),
                config.authnet_api_login_id.clone(),
                config.authnet_transaction_key.clone(),
            ))
        }
        _ => {
            info!("Payment provider: Stripe");
            Arc::new(StripeGateway::new(config.stripe_secret_key.clone()))
        }
    }
}

async fn ensure_admin(users: &Arc<dyn UserRepository>, config: &Config) {
    let existing = users.find_by_email(&config.admin_email).await
        .expect("Failed to look up admin account");
    if existing.is_some() {
        return;
    }

    let (password, generated) = match &config.admin_password {
        Some(p) => (p.clone(), false),
        None => {
            let p: String = rand::thread_rng().sample_iter(&Alphanumeric).take(16).map(char::from).collect();
            (p, true)
        }
    };

    let salt = SaltString::generate(&mut rand::rngs::OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .expect("Failed to hash admin password")
        .to_string();

    let admin = User::new(
        config.admin_email.clone(),
        password_hash,
        "Administrator".to_string(),
        "".to_string(),
        ROLE_ADMIN,
    );
    users.create(&admin).await.expect("Failed to seed admin account");

    if generated {
        info!("Seeded admin account {} with generated password: {}", config.admin_email, password);
    } else {
        info!("Seeded admin account {}", config.admin_email);
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
