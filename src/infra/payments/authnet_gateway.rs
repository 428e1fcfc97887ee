use crate::domain::ports::{PaymentGateway, PaymentOutcome};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

const OPAQUE_DATA_DESCRIPTOR: &str = "COMMON.ACCEPT.INAPP.PAYMENT";

/// Authorize.Net auth-capture transactions against Accept.js opaque data.
pub struct AuthorizeNetGateway {
    client: Client,
    api_url: String,
    api_login_id: Option<String>,
    transaction_key: Option<String>,
}

impl AuthorizeNetGateway {
    pub fn new(api_url: String, api_login_id: Option<String>, transaction_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_login_id,
            transaction_key,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MerchantAuthentication<'a> {
    name: &'a str,
    transaction_key: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTransactionResponse {
    transaction_response: Option<TransactionResponse>,
    messages: Option<Messages>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionResponse {
    response_code: Option<String>,
    trans_id: Option<String>,
    errors: Option<Vec<TransactionError>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionError {
    error_text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Messages {
    result_code: Option<String>,
    message: Option<Vec<Message>>,
}

#[derive(Deserialize)]
struct Message {
    text: Option<String>,
}

#[async_trait]
impl PaymentGateway for AuthorizeNetGateway {
    async fn authorize(&self, amount_cents: i64, token: &str) -> Result<PaymentOutcome, AppError> {
        let login = self.api_login_id.as_deref().filter(|v| !v.is_empty())
            .ok_or(AppError::Configuration("MISSING_CONFIG: AUTHNET_API_LOGIN_ID is not set".into()))?;
        let key = self.transaction_key.as_deref().filter(|v| !v.is_empty())
            .ok_or(AppError::Configuration("MISSING_CONFIG: AUTHNET_TRANSACTION_KEY is not set".into()))?;

        let payload = json!({
            "createTransactionRequest": {
                "merchantAuthentication": MerchantAuthentication { name: login, transaction_key: key },
                "transactionRequest": {
                    "transactionType": "authCaptureTransaction",
                    "amount": format!("{}.{:02}", amount_cents / 100, amount_cents % 100),
                    "payment": {
                        "opaqueData": {
                            "dataDescriptor": OPAQUE_DATA_DESCRIPTOR,
                            "dataValue": token,
                        }
                    }
                }
            }
        });

        let res = self.client.post(&self.api_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Authorize.Net connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        let body: CreateTransactionResponse = res.json().await
            .map_err(|e| AppError::InternalWithMsg(format!("Authorize.Net response parse error: {}", e)))?;

        let result_ok = body.messages.as_ref()
            .and_then(|m| m.result_code.as_deref())
            == Some("Ok");
        let approved = body.transaction_response.as_ref()
            .and_then(|t| t.response_code.as_deref())
            == Some("1");

        if result_ok && approved {
            let trans_id = body.transaction_response.and_then(|t| t.trans_id);
            return Ok(PaymentOutcome {
                success: true,
                transaction_id: trans_id,
                error: None,
            });
        }

        let message = body.transaction_response.as_ref()
            .and_then(|t| t.errors.as_ref())
            .and_then(|errs| errs.first())
            .and_then(|e| e.error_text.clone())
            .or_else(|| {
                body.messages
                    .and_then(|m| m.message)
                    .and_then(|msgs| msgs.into_iter().next())
                    .and_then(|m| m.text)
            })
            .unwrap_or_else(|| "Transaction was not approved".to_string());

        Ok(PaymentOutcome {
            success: false,
            transaction_id: None,
            error: Some(message),
        })
    }
}
