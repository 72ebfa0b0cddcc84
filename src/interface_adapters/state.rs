use chrono::{Local, NaiveDateTime};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::{Clock, ConfirmationMailer, PaymentGateway, TokenSource};
use crate::use_cases::create_charge::ChargeSettings;

#[derive(Clone)]
pub struct AppState {
    // We use Arc<dyn Trait> to hold any implementation (dependency injection).
    pub tokens: Arc<dyn TokenSource>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub mailer: Arc<dyn ConfirmationMailer>,
    pub clock: Arc<dyn Clock>,
    pub charge_settings: Arc<ChargeSettings>,
}

// System clock adapter used by the use cases.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
