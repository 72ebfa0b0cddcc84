use chrono::Duration;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    ChargePayload, ChargeReply, Clock, ConfirmationMailer, GatewayCallError, PaymentGateway,
    PixCharge, PixError, Reservation, TimeoutStage, TokenSource,
};

// Longest slice of the requester's name that goes into the charge description.
pub const DESCRIPTION_NAME_MAX_CHARS: usize = 20;
pub const DUE_IN_HOURS: i64 = 24;
// Local time, no offset.
const DUE_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// Fixed charge parameters loaded from configuration.
#[derive(Clone, Debug)]
pub struct ChargeSettings {
    pub amount: String,
    pub transaction_type: String,
    pub description_prefix: String,
}

// Charge creation use case with injected dependencies.
pub struct CreateChargeUseCase {
    pub tokens: Arc<dyn TokenSource>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub mailer: Arc<dyn ConfirmationMailer>,
    pub clock: Arc<dyn Clock>,
    pub settings: Arc<ChargeSettings>,
}

impl CreateChargeUseCase {
    pub async fn execute(&self, reservation: Reservation) -> Result<PixCharge, PixError> {
        let token = self.tokens.get_token().await?;
        let payload = self.build_payload(&reservation);

        let body = self
            .gateway
            .create_charge(&token, &payload)
            .await
            .map_err(map_charge_error)?;

        let reply = ChargeReply::from_json(&body);
        let Some(payment_code) = reply.payment_code else {
            tracing::warn!(reply = %body, "gateway produced no payment code.");
            return Err(PixError::Gateway {
                status: None,
                detail: "no code produced".to_string(),
            });
        };

        tracing::info!(external_id = %payload.external_id, "pix charge created.");
        dispatch_confirmation(self.mailer.clone(), reservation, payment_code.clone());

        Ok(PixCharge {
            payment_code,
            qr_image: reply.qr_image,
        })
    }

    fn build_payload(&self, reservation: &Reservation) -> ChargePayload {
        let due_at = self.clock.now_local() + Duration::hours(DUE_IN_HOURS);

        ChargePayload {
            amount: self.settings.amount.clone(),
            transaction_type: self.settings.transaction_type.clone(),
            due_at: due_at.format(DUE_AT_FORMAT).to_string(),
            description: describe(&self.settings.description_prefix, &reservation.name),
            external_id: Uuid::new_v4().to_string(),
            movement_id: Uuid::new_v4().to_string(),
            send_qr_code: true,
        }
    }
}

fn describe(prefix: &str, name: &str) -> String {
    let name: String = name.chars().take(DESCRIPTION_NAME_MAX_CHARS).collect();
    format!("{prefix}{name}")
}

fn map_charge_error(err: GatewayCallError) -> PixError {
    match err {
        GatewayCallError::Timeout => PixError::Timeout(TimeoutStage::Charge),
        GatewayCallError::Rejected { status, body } => {
            tracing::warn!(status, body = %body, "gateway rejected charge.");
            PixError::Gateway {
                status: Some(status),
                detail: body,
            }
        }
        GatewayCallError::Transport(cause) | GatewayCallError::Malformed(cause) => {
            tracing::warn!(error = %cause, "gateway charge call failed.");
            PixError::GatewayUnavailable(cause)
        }
    }
}

// Fire-and-forget: the request path never waits on, or hears about, the email.
fn dispatch_confirmation(
    mailer: Arc<dyn ConfirmationMailer>,
    reservation: Reservation,
    payment_code: String,
) {
    tokio::spawn(async move {
        if let Err(err) = mailer.send(&reservation, &payment_code).await {
            tracing::warn!(error = %err, "confirmation email failed.");
        }
    });
}
