mod entities;
mod errors;
mod ports;

// Re-export the domain boundary types and ports.
pub use entities::{CachedToken, ChargePayload, ChargeReply, PixCharge, Reservation};
pub use errors::{GatewayCallError, PixError, TimeoutStage};
pub use ports::{Clock, ConfirmationMailer, PaymentGateway, TokenSource};
