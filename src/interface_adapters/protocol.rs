use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Reservation payload posted by the front end.
#[derive(Debug, Deserialize)]
pub struct PixRequest {
    // Older front ends send the Portuguese key.
    #[serde(default, alias = "nome")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    // Anything else the form sends is passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Response payload for a created charge.
#[derive(Debug, Serialize)]
pub struct PixResponse {
    pub status: &'static str,
    pub copia_cola: String,
    pub imagem_qr: Option<String>,
}

// Simple error envelope for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}
