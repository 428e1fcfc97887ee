use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub frontend_url: String,

    // Payment gateways. Credentials stay optional here and are checked at
    // charge time so a misconfigured provider surfaces as MISSING_CONFIG on
    // the request that needed it.
    pub payment_provider: String,
    pub stripe_secret_key: Option<String>,
    pub authnet_api_login_id: Option<String>,
    pub authnet_transaction_key: Option<String>,
    pub authnet_api_url: String,

    pub mail_service_url: String,
    pub mail_service_token: String,
    pub sms_service_url: String,
    pub sms_service_token: String,

    pub jwt_secret_key: String, // Private key (PEM)
    pub jwt_public_key: String, // Public key (PEM)
    pub auth_issuer: String,

    pub admin_email: String,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:5173".to_string()),
            payment_provider: env::var("PAYMENT_PROVIDER").unwrap_or_else(|_| "stripe".to_string()),
            stripe_secret_key: env::var("STRIPE_SECRET_KEY").ok(),
            authnet_api_login_id: env::var("AUTHNET_API_LOGIN_ID").ok(),
            authnet_transaction_key: env::var("AUTHNET_TRANSACTION_KEY").ok(),
            authnet_api_url: env::var("AUTHNET_API_URL").unwrap_or_else(|_| "https://api.authorize.net/xml/v1/request.api".to_string()),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            sms_service_url: env::var("SMS_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8001/api/v1/sms".to_string()),
            sms_service_token: env::var("SMS_SERVICE_TOKEN").unwrap_or_else(|_| "test-token-1".to_string()),
            jwt_secret_key: env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set (Ed25519 Private Key)"),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.limo-service.local".to_string()),
            admin_email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@limo-service.local".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").ok(),
        }
    }
}
