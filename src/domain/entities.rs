use serde::Serialize;
use serde_json::{Map, Value};

// Bearer token held by the token provider between requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedToken {
    pub value: String,
    pub expires_at: u64,
}

impl CachedToken {
    pub fn is_valid_at(&self, now_epoch_seconds: u64) -> bool {
        self.expires_at > now_epoch_seconds
    }
}

// Reservation submitted by the front end. Fields we do not interpret are kept as-is.
#[derive(Clone, Debug, Default)]
pub struct Reservation {
    pub name: String,
    pub email: Option<String>,
    pub extra: Map<String, Value>,
}

// The serialization within this layer is a dependency leak, but the field names
// are the gateway contract and nothing else maps them.
// Charge creation payload sent to the gateway.
#[derive(Clone, Debug, Serialize)]
pub struct ChargePayload {
    #[serde(rename = "valor")]
    pub amount: String,
    #[serde(rename = "tipo_transacao")]
    pub transaction_type: String,
    #[serde(rename = "vencimento")]
    pub due_at: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "identificador_externo")]
    pub external_id: String,
    #[serde(rename = "identificador_movimento")]
    pub movement_id: String,
    #[serde(rename = "enviar_qr_code")]
    pub send_qr_code: bool,
}

/// Normalized view over the charge reply.
///
/// The gateway has answered with two layouts over time: the payment code nested
/// at `data.brcode`, or flat at `emv_payload`. The nested location wins when
/// both are present. Empty strings and non-object `data` values count as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChargeReply {
    pub payment_code: Option<String>,
    pub qr_image: Option<String>,
}

impl ChargeReply {
    pub fn from_json(body: &Value) -> Self {
        let data = body.get("data").filter(|value| value.is_object());

        let payment_code = data
            .and_then(|data| non_empty_str(data.get("brcode")))
            .or_else(|| non_empty_str(body.get("emv_payload")));
        let qr_image = data.and_then(|data| non_empty_str(data.get("qrcode")));

        Self {
            payment_code,
            qr_image,
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

// Charge handed back to the caller once the gateway produced a payment code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixCharge {
    pub payment_code: String,
    pub qr_image: Option<String>,
}
