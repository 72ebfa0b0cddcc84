use crate::domain::{ChargePayload, GatewayCallError, PaymentGateway};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

// Client credentials exchanged for a bearer token.
#[derive(Clone, Debug, Serialize)]
pub struct GatewayCredentials {
    pub client_id: String,
    pub private_key: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
}

// Thin wrapper around reqwest for payment gateway calls.
#[derive(Clone)]
pub struct GatewayClient {
    http: Client,
    base_url: String,
    credentials: GatewayCredentials,
    auth_timeout: Duration,
    charge_timeout: Duration,
}

impl GatewayClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: GatewayCredentials,
        auth_timeout: Duration,
        charge_timeout: Duration,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            auth_timeout,
            charge_timeout,
        }
    }
}

// Timeouts must stay distinguishable from other transport failures.
fn send_error(err: reqwest::Error) -> GatewayCallError {
    if err.is_timeout() {
        GatewayCallError::Timeout
    } else {
        GatewayCallError::Transport(err.to_string())
    }
}

fn body_error(err: reqwest::Error) -> GatewayCallError {
    if err.is_timeout() {
        GatewayCallError::Timeout
    } else {
        GatewayCallError::Malformed(err.to_string())
    }
}

// Keep upstream status and raw body so callers can report what the gateway said.
async fn reject_unless_success(res: Response) -> Result<Response, GatewayCallError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    // A rejection whose body cannot be read is reported by the read failure itself.
    let body = res.text().await.map_err(|err| {
        tracing::warn!(%status, error = %err, "failed to read gateway rejection body.");
        body_error(err)
    })?;
    Err(GatewayCallError::Rejected {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl PaymentGateway for GatewayClient {
    async fn request_token(&self) -> Result<String, GatewayCallError> {
        let url = format!("{}/bt/token", self.base_url);
        let res = self
            .http
            .post(url)
            .timeout(self.auth_timeout)
            .json(&self.credentials)
            .send()
            .await
            .map_err(send_error)?;
        let res = reject_unless_success(res).await?;

        res.json::<TokenResponse>()
            .await
            .map_err(body_error)?
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| GatewayCallError::Malformed("reply carried no token".to_string()))
    }

    async fn create_charge(
        &self,
        token: &str,
        payload: &ChargePayload,
    ) -> Result<Value, GatewayCallError> {
        let url = format!("{}/bt/pix", self.base_url);
        let res = self
            .http
            .post(url)
            .timeout(self.charge_timeout)
            .bearer_auth(token)
            .json(payload)
            .send()
            .await
            .map_err(send_error)?;
        let res = reject_unless_success(res).await?;

        res.json::<Value>().await.map_err(body_error)
    }
}
