use std::{env, fmt, str::FromStr, time::Duration};

use crate::interface_adapters::clients::GatewayCredentials;
use crate::interface_adapters::mailer::{SenderCredentials, SmtpSettings};
use crate::use_cases::create_charge::ChargeSettings;

// Runtime defaults; every one of them can be overridden from the environment.
pub const DEFAULT_GATEWAY_URL: &str = "https://gateway-production.service-canvi.com.br";
pub const DEFAULT_PORT: u16 = 5000;
// Forward offset applied to a fresh gateway token (~22h).
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 80_000;
pub const DEFAULT_AUTH_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_CHARGE_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_AMOUNT: &str = "990.00";
pub const DEFAULT_TRANSACTION_TYPE: &str = "pixCashin";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_EMAIL_SUBJECT: &str = "Reserva Confirmada";

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "{name} must be set"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub base_url: String,
    pub credentials: GatewayCredentials,
    pub auth_timeout: Duration,
    pub charge_timeout: Duration,
    pub token_ttl_seconds: u64,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub gateway: GatewayConfig,
    pub charge: ChargeSettings,
    pub smtp: SmtpSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    // Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));
        let text = |name: &str, default: &str| get(name).unwrap_or_else(|| default.to_string());

        let credentials = GatewayCredentials {
            client_id: required("CANVI_CLIENT_ID")?,
            private_key: required("CANVI_PRIVATE_KEY")?,
        };

        let gateway = GatewayConfig {
            base_url: text("CANVI_API_URL", DEFAULT_GATEWAY_URL),
            credentials,
            auth_timeout: Duration::from_millis(parsed(
                get("GATEWAY_AUTH_TIMEOUT_MS"),
                DEFAULT_AUTH_TIMEOUT_MS,
            )),
            charge_timeout: Duration::from_millis(parsed(
                get("GATEWAY_CHARGE_TIMEOUT_MS"),
                DEFAULT_CHARGE_TIMEOUT_MS,
            )),
            token_ttl_seconds: parsed(get("TOKEN_TTL_SECONDS"), DEFAULT_TOKEN_TTL_SECONDS),
        };

        let charge = ChargeSettings {
            amount: text("PIX_AMOUNT", DEFAULT_AMOUNT),
            transaction_type: text("PIX_TRANSACTION_TYPE", DEFAULT_TRANSACTION_TYPE),
            description_prefix: lookup("PIX_DESCRIPTION_PREFIX").unwrap_or_default(),
        };

        // Email is optional: both halves of the login must be present to enable it.
        let sender = match (get("EMAIL_USER"), get("EMAIL_PASS")) {
            (Some(address), Some(password)) => Some(SenderCredentials { address, password }),
            _ => None,
        };

        let smtp = SmtpSettings {
            host: text("SMTP_HOST", DEFAULT_SMTP_HOST),
            port: parsed(get("SMTP_PORT"), DEFAULT_SMTP_PORT),
            sender,
            subject: text("EMAIL_SUBJECT", DEFAULT_EMAIL_SUBJECT),
            amount: charge.amount.clone(),
        };

        Ok(Self {
            port: parsed(get("PORT"), DEFAULT_PORT),
            gateway,
            charge,
            smtp,
        })
    }
}

fn parsed<T: FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
