use crate::frameworks::config::Config;
use crate::interface_adapters::clients::GatewayClient;
use crate::interface_adapters::mailer::SmtpMailer;
use crate::interface_adapters::routes;
use crate::interface_adapters::state::{AppState, SystemClock};
use crate::use_cases::token_provider::TokenProvider;
use std::net::SocketAddr;
use std::sync::Arc;

// Log output selected by `LOG_FORMAT`; anything other than "json" stays compact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Json,
    Compact,
}

impl LogFormat {
    fn from_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match format {
        LogFormat::Json => subscriber.json().with_current_span(true).init(),
        LogFormat::Compact => subscriber.compact().init(),
    }

    // Route panics in detached email tasks through the same log sink.
    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// Wire the real adapters together behind the application state.
pub fn build_state(config: &Config) -> AppState {
    let clock = Arc::new(SystemClock);
    let gateway = Arc::new(GatewayClient::new(
        config.gateway.base_url.clone(),
        config.gateway.credentials.clone(),
        config.gateway.auth_timeout,
        config.gateway.charge_timeout,
    ));
    let tokens = Arc::new(TokenProvider::new(
        gateway.clone(),
        clock.clone(),
        config.gateway.token_ttl_seconds,
    ));

    let mailer = SmtpMailer::new(config.smtp.clone());
    if !mailer.is_configured() {
        tracing::warn!("EMAIL_USER/EMAIL_PASS not set, confirmation emails are disabled.");
    }

    AppState {
        tokens,
        gateway,
        mailer: Arc::new(mailer),
        clock,
        charge_settings: Arc::new(config.charge.clone()),
    }
}

pub async fn run() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing(LogFormat::from_value(
        std::env::var("LOG_FORMAT").ok().as_deref(),
    ));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return;
        }
    };
    tracing::debug!(gateway_url = %config.gateway.base_url, "gateway client configured.");

    let app = routes::app(build_state(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    // Bind TCP listener with error handling.
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind");
            return; // Abort startup on bind failure.
        }
    };
    tracing::info!(%addr, "listening");

    // Serve app and report errors rather than panicking.
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
    }
}
