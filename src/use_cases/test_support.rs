use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use serde_json::{Value, json};
use tokio::sync::mpsc;

use crate::domain::{
    ChargePayload, Clock, ConfirmationMailer, GatewayCallError, PaymentGateway, PixError,
    Reservation, TokenSource,
};

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.0
    }

    fn now_local(&self) -> NaiveDateTime {
        DateTime::from_timestamp(self.0 as i64, 0)
            .expect("expected a representable timestamp")
            .naive_utc()
    }
}

// Gateway double with canned replies and call counters.
pub(crate) struct ScriptedGateway {
    token_value: Option<String>,
    token_failure: Option<GatewayCallError>,
    charge_reply: Result<Value, GatewayCallError>,
    token_calls: AtomicUsize,
    charges: Mutex<Vec<(String, ChargePayload)>>,
}

impl ScriptedGateway {
    pub(crate) fn new() -> Self {
        Self {
            token_value: None,
            token_failure: None,
            charge_reply: Ok(json!({ "data": { "brcode": "pix-code", "qrcode": "qr-image" } })),
            token_calls: AtomicUsize::new(0),
            charges: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_token_value(mut self, value: &str) -> Self {
        self.token_value = Some(value.to_string());
        self
    }

    pub(crate) fn with_token_failure(mut self, err: GatewayCallError) -> Self {
        self.token_failure = Some(err);
        self
    }

    pub(crate) fn with_charge_reply(mut self, reply: Value) -> Self {
        self.charge_reply = Ok(reply);
        self
    }

    pub(crate) fn with_charge_failure(mut self, err: GatewayCallError) -> Self {
        self.charge_reply = Err(err);
        self
    }

    pub(crate) fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn charges(&self) -> Vec<(String, ChargePayload)> {
        self.charges.lock().expect("charges mutex poisoned").clone()
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn request_token(&self) -> Result<String, GatewayCallError> {
        let call = self.token_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(err) = &self.token_failure {
            return Err(err.clone());
        }
        Ok(self
            .token_value
            .clone()
            .unwrap_or_else(|| format!("token-{call}")))
    }

    async fn create_charge(
        &self,
        token: &str,
        payload: &ChargePayload,
    ) -> Result<Value, GatewayCallError> {
        self.charges
            .lock()
            .expect("charges mutex poisoned")
            .push((token.to_string(), payload.clone()));
        self.charge_reply.clone()
    }
}

// Token source that always answers the same way.
pub(crate) struct StaticTokens {
    result: Result<String, PixError>,
    calls: AtomicUsize,
}

impl StaticTokens {
    pub(crate) fn ok(token: &str) -> Self {
        Self {
            result: Ok(token.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing(err: PixError) -> Self {
        Self {
            result: Err(err),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenSource for StaticTokens {
    async fn get_token(&self) -> Result<String, PixError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

// What the mailer was asked to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SentMail {
    pub name: String,
    pub email: Option<String>,
    pub payment_code: String,
}

// Mailer that reports every send attempt on a channel, optionally failing it.
pub(crate) struct RecordingMailer {
    sent: mpsc::UnboundedSender<SentMail>,
    should_fail: bool,
}

impl RecordingMailer {
    pub(crate) fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<SentMail>) {
        let (sent, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                sent,
                should_fail: false,
            }),
            rx,
        )
    }

    pub(crate) fn failing() -> (Arc<Self>, mpsc::UnboundedReceiver<SentMail>) {
        let (sent, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                sent,
                should_fail: true,
            }),
            rx,
        )
    }
}

#[async_trait]
impl ConfirmationMailer for RecordingMailer {
    async fn send(&self, reservation: &Reservation, payment_code: &str) -> Result<(), String> {
        let _ = self.sent.send(SentMail {
            name: reservation.name.clone(),
            email: reservation.email.clone(),
            payment_code: payment_code.to_string(),
        });
        if self.should_fail {
            return Err("535 authentication failed".to_string());
        }
        Ok(())
    }
}
