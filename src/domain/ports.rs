use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde_json::Value;

use crate::domain::entities::{ChargePayload, Reservation};
use crate::domain::errors::{GatewayCallError, PixError};

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
    // Wall-clock time in the server's local zone, used for due dates.
    fn now_local(&self) -> NaiveDateTime;
}

// Port for the payment gateway HTTP API.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    // Exchange client credentials for a bearer token.
    async fn request_token(&self) -> Result<String, GatewayCallError>;

    // Create a charge and hand back the raw reply body for normalization.
    async fn create_charge(
        &self,
        token: &str,
        payload: &ChargePayload,
    ) -> Result<Value, GatewayCallError>;
}

// Port for whatever hands out a usable bearer token.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn get_token(&self) -> Result<String, PixError>;
}

// Port for the confirmation email. Errors are only ever logged by callers.
#[async_trait]
pub trait ConfirmationMailer: Send + Sync {
    async fn send(&self, reservation: &Reservation, payment_code: &str) -> Result<(), String>;
}
