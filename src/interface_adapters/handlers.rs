use crate::domain::{PixError, Reservation};
use crate::interface_adapters::protocol::{ErrorResponse, PixRequest, PixResponse};
use crate::interface_adapters::state::AppState;
use crate::use_cases::create_charge::CreateChargeUseCase;
use axum::extract::rejection::JsonRejection;
use axum::{Json, extract::State, http::StatusCode};

// Name used on the charge and email when the form leaves it out.
const DEFAULT_CUSTOMER_NAME: &str = "Cliente";

// Liveness probe.
pub async fn home() -> &'static str {
    "API Pix Relay Online"
}

#[tracing::instrument(name = "create_pix", skip_all)]
pub async fn create_pix(
    State(state): State<AppState>,
    body: Result<Json<PixRequest>, JsonRejection>,
) -> Result<Json<PixResponse>, (StatusCode, Json<ErrorResponse>)> {
    // Missing or unreadable bodies are a caller mistake, never an upstream call.
    let Json(body) = body.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "rejected pix request body.");
        map_pix_error(PixError::Validation(rejection.body_text()))
    })?;

    let use_case = CreateChargeUseCase {
        tokens: state.tokens.clone(),
        gateway: state.gateway.clone(),
        mailer: state.mailer.clone(),
        clock: state.clock.clone(),
        settings: state.charge_settings.clone(),
    };

    let charge = use_case
        .execute(into_reservation(body))
        .await
        .map_err(map_pix_error)?;

    Ok(Json(PixResponse {
        status: "success",
        copia_cola: charge.payment_code,
        imagem_qr: charge.qr_image,
    }))
}

fn into_reservation(body: PixRequest) -> Reservation {
    let name = body
        .name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_CUSTOMER_NAME.to_string());

    Reservation {
        name,
        email: body.email,
        extra: body.extra,
    }
}

// Helper to build a JSON error response.
fn error_response(status: StatusCode, message: String) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            status: "error",
            message,
        }),
    )
}

fn map_pix_error(err: PixError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &err {
        PixError::Validation(_) | PixError::Gateway { .. } => StatusCode::BAD_REQUEST,
        PixError::Auth(_) | PixError::GatewayUnavailable(_) => StatusCode::BAD_GATEWAY,
        PixError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
    };

    if status.is_server_error() {
        tracing::error!(error = %err, %status, "pix charge failed.");
    }

    error_response(status, err.to_string())
}
