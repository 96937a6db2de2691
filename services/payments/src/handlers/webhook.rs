use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
use serde::Serialize;

use crate::domain::types::{WebhookEvent, WebhookOutcome};
use crate::error::PaymentsServiceError;
use crate::handlers::payout::PayoutResponse;
use crate::infra::signature::{self, SIGNATURE_HEADER};
use crate::state::AppState;
use crate::usecase::webhook::HandlePayoutWebhookUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct WebhookAck {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_record: Option<PayoutResponse>,
}

impl From<WebhookOutcome> for WebhookAck {
    fn from(outcome: WebhookOutcome) -> Self {
        let (message, record) = match outcome {
            WebhookOutcome::Applied(record) => (None, Some(record)),
            WebhookOutcome::AlreadyTerminal(record) => {
                (Some("payout already in a terminal state"), Some(record))
            }
            WebhookOutcome::UnknownPayout => (Some("unknown payout; ignored"), None),
            WebhookOutcome::Ignored => (Some("event ignored"), None),
        };
        Self {
            success: true,
            message,
            payout_record: record.map(PayoutResponse::from),
        }
    }
}

// ── POST /payments/webhooks/payout ───────────────────────────────────────────

/// The signature covers the raw body, so it is checked before the JSON is parsed.
pub async fn payout_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>, PaymentsServiceError> {
    let provided = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(PaymentsServiceError::InvalidSignature)?;
    signature::verify(&state.webhook_secret, &body, provided)?;

    let event: WebhookEvent =
        serde_json::from_slice(&body).map_err(|_| PaymentsServiceError::InvalidPayload)?;

    let usecase = HandlePayoutWebhookUseCase {
        payouts: state.payout_repo(),
    };
    let outcome = usecase.execute(event).await?;
    Ok(Json(outcome.into()))
}
