// Interface adapters: HTTP surface and outbound clients.

pub mod clients;
pub mod handlers;
pub mod mailer;
pub mod protocol;
pub mod routes;
pub mod state;
