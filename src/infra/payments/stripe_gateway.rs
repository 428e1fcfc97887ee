use crate::domain::ports::{PaymentGateway, PaymentOutcome};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::error;

const STRIPE_CHARGES_URL: &str = "https://api.stripe.com/v1/charges";

/// Stripe card charges. The card itself was tokenized in the browser; this
/// side only ever sees the opaque token.
pub struct StripeGateway {
    client: Client,
    secret_key: Option<String>,
}

impl StripeGateway {
    pub fn new(secret_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            secret_key,
        }
    }
}

#[derive(Deserialize)]
struct ChargeResponse {
    id: Option<String>,
    status: Option<String>,
}

#[derive(Deserialize)]
struct ChargeErrorResponse {
    error: Option<ChargeError>,
}

#[derive(Deserialize)]
struct ChargeError {
    message: Option<String>,
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn authorize(&self, amount_cents: i64, token: &str) -> Result<PaymentOutcome, AppError> {
        let key = self.secret_key.as_deref().filter(|k| !k.is_empty())
            .ok_or(AppError::Configuration("MISSING_CONFIG: STRIPE_SECRET_KEY is not set".into()))?;

        let amount = amount_cents.to_string();
        let params = [
            ("amount", amount.as_str()),
            ("currency", "usd"),
            ("source", token),
            ("description", "Limo ride booking"),
        ];

        let res = self.client.post(STRIPE_CHARGES_URL)
            .bearer_auth(key)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Stripe connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if res.status().is_success() {
            let body: ChargeResponse = res.json().await
                .map_err(|e| AppError::InternalWithMsg(format!("Stripe response parse error: {}", e)))?;

            let succeeded = body.status.as_deref() == Some("succeeded");
            return Ok(PaymentOutcome {
                success: succeeded,
                transaction_id: body.id,
                error: if succeeded { None } else { Some("Charge did not succeed".to_string()) },
            });
        }

        // Card declines come back as 402 with a structured error body.
        let status = res.status();
        let body: ChargeErrorResponse = res.json().await.unwrap_or(ChargeErrorResponse { error: None });
        let message = body.error
            .and_then(|e| e.message)
            .unwrap_or_else(|| format!("Stripe returned status {}", status));

        Ok(PaymentOutcome {
            success: false,
            transaction_id: None,
            error: Some(message),
        })
    }
}
