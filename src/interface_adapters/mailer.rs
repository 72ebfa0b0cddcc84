use crate::domain::{ConfirmationMailer, Reservation};
use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde_json::{Map, Value};

// Account used to log into the relay and sign the message.
#[derive(Clone, Debug)]
pub struct SenderCredentials {
    pub address: String,
    pub password: String,
}

#[derive(Clone, Debug)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    // None disables confirmation emails entirely.
    pub sender: Option<SenderCredentials>,
    pub subject: String,
    // Charge amount as sent to the gateway, e.g. "990.00".
    pub amount: String,
}

// STARTTLS SMTP sender for reservation confirmations.
pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    pub fn is_configured(&self) -> bool {
        self.settings.sender.is_some()
    }

    fn transport(
        &self,
        sender: &SenderCredentials,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, String> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.host)
            .map_err(|err| format!("smtp relay setup failed: {err}"))?
            .port(self.settings.port)
            .credentials(Credentials::new(
                sender.address.clone(),
                sender.password.clone(),
            ))
            .build();
        Ok(transport)
    }
}

#[async_trait]
impl ConfirmationMailer for SmtpMailer {
    async fn send(&self, reservation: &Reservation, payment_code: &str) -> Result<(), String> {
        let Some(sender) = &self.settings.sender else {
            tracing::info!("email not configured, skipping confirmation.");
            return Ok(());
        };
        let Some(recipient) = reservation
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
        else {
            tracing::warn!("reservation has no email, skipping confirmation.");
            return Ok(());
        };

        tracing::info!(recipient, "sending confirmation email.");

        let from = sender
            .address
            .parse::<Mailbox>()
            .map_err(|err| format!("invalid sender address: {err}"))?;
        let to = recipient
            .parse::<Mailbox>()
            .map_err(|err| format!("invalid recipient address: {err}"))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(self.settings.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(confirmation_html(
                reservation,
                payment_code,
                &self.settings.amount,
            ))
            .map_err(|err| format!("failed to build message: {err}"))?;

        self.transport(sender)?
            .send(message)
            .await
            .map_err(|err| format!("smtp send failed: {err}"))?;

        tracing::info!(recipient, "confirmation email sent.");
        Ok(())
    }
}

pub fn confirmation_html(reservation: &Reservation, payment_code: &str, amount: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; color: #333; max-width: 600px; margin: 0 auto;">
    <div style="background-color: #000; padding: 20px; text-align: center;">
        <h2 style="color: #fff; margin: 0;">Confirmação de Pedido</h2>
    </div>
    <div style="padding: 20px; border: 1px solid #ddd;">
        <p>Olá, <strong>{name}</strong>!</p>
        <p>Recebemos sua reserva.</p>
        <p>Se ainda não pagou, use o código Pix abaixo:</p>
        <div style="background-color: #f4f4f4; padding: 15px; border-radius: 8px; word-wrap: break-word; font-family: monospace; font-size: 12px; color: #555;">
            {payment_code}
        </div>
        <p style="margin-top: 20px;"><strong>Valor:</strong> {amount}</p>{details}
        <p>Assim que compensar, entraremos em contato.</p>
    </div>
</div>"#,
        name = escape_html(&reservation.name),
        payment_code = escape_html(payment_code),
        amount = brl(amount),
        details = reservation_details(&reservation.extra),
    )
}

// Extra form fields echoed back as a list so the customer can check what was sent.
fn reservation_details(extra: &Map<String, Value>) -> String {
    let items: String = extra
        .iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Null => return None,
                Value::String(text) if text.trim().is_empty() => return None,
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            Some(format!(
                "\n            <li><strong>{}:</strong> {}</li>",
                escape_html(key),
                escape_html(&value)
            ))
        })
        .collect();

    if items.is_empty() {
        return String::new();
    }
    format!("\n        <p>Dados da reserva:</p>\n        <ul>{items}\n        </ul>")
}

// "990.00" -> "R$ 990,00"
fn brl(amount: &str) -> String {
    format!("R$ {}", amount.replace('.', ","))
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
