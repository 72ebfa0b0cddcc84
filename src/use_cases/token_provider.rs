use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::{
    CachedToken, Clock, GatewayCallError, PaymentGateway, PixError, TimeoutStage, TokenSource,
};

/// Hands out the gateway bearer token, refreshing it only when the cached one
/// has expired.
///
/// The lock is never held across the auth call, so two requests that miss the
/// cache at the same time both refresh and the last writer wins. The gateway
/// accepts either token.
pub struct TokenProvider {
    gateway: Arc<dyn PaymentGateway>,
    clock: Arc<dyn Clock>,
    // Fixed forward offset applied on refresh; the gateway's own expiry is ignored.
    ttl_seconds: u64,
    cache: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(gateway: Arc<dyn PaymentGateway>, clock: Arc<dyn Clock>, ttl_seconds: u64) -> Self {
        Self {
            gateway,
            clock,
            ttl_seconds,
            cache: Mutex::new(None),
        }
    }

    pub fn cached(&self) -> Option<CachedToken> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store(&self, token: CachedToken) {
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    fn valid_at(&self, now: u64) -> Option<String> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|token| token.is_valid_at(now))
            .map(|token| token.value.clone())
    }
}

#[async_trait]
impl TokenSource for TokenProvider {
    async fn get_token(&self) -> Result<String, PixError> {
        let now = self.clock.now_epoch_seconds();
        if let Some(token) = self.valid_at(now) {
            return Ok(token);
        }

        let token = self.gateway.request_token().await.map_err(|err| {
            tracing::warn!(error = %err, "gateway token request failed.");
            match err {
                GatewayCallError::Timeout => PixError::Timeout(TimeoutStage::Auth),
                other => PixError::Auth(other.to_string()),
            }
        })?;

        if token.is_empty() {
            tracing::warn!("gateway returned an empty token.");
            return Err(PixError::Auth("gateway returned an empty token".to_string()));
        }

        // Huge configured TTLs pin the expiry at the far future instead of overflowing.
        let expires_at = now.saturating_add(self.ttl_seconds);
        self.store(CachedToken {
            value: token.clone(),
            expires_at,
        });
        tracing::info!(expires_at, "gateway token refreshed.");

        Ok(token)
    }
}
