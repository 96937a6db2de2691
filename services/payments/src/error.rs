use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Payments service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum PaymentsServiceError {
    #[error("recipient not found")]
    RecipientNotFound,
    #[error("missing bank details")]
    MissingBankDetails,
    #[error("invalid amount")]
    InvalidAmount,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid payload")]
    InvalidPayload,
    #[error("distribution not found")]
    DistributionNotFound,
    #[error("distribution in progress")]
    DistributionInProgress,
    #[error("platform account not found")]
    PlatformAccountNotFound,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl PaymentsServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RecipientNotFound => "RECIPIENT_NOT_FOUND",
            Self::MissingBankDetails => "MISSING_BANK_DETAILS",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::InvalidPayload => "INVALID_PAYLOAD",
            Self::DistributionNotFound => "DISTRIBUTION_NOT_FOUND",
            Self::DistributionInProgress => "DISTRIBUTION_IN_PROGRESS",
            Self::PlatformAccountNotFound => "PLATFORM_ACCOUNT_NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Fails only the current recipient's transfer; the rest of the distribution goes on.
    pub fn is_recipient_scoped(&self) -> bool {
        matches!(
            self,
            Self::RecipientNotFound | Self::MissingBankDetails | Self::InvalidAmount
        )
    }

    /// Log line detail: the message plus the `anyhow` context chain for internal errors.
    pub fn detail(&self) -> String {
        match self {
            Self::Internal(e) => format!("{e:#}"),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for PaymentsServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::RecipientNotFound | Self::DistributionNotFound => StatusCode::NOT_FOUND,
            Self::MissingBankDetails
            | Self::InvalidAmount
            | Self::InvalidSignature
            | Self::InvalidPayload => StatusCode::BAD_REQUEST,
            Self::DistributionInProgress => StatusCode::CONFLICT,
            Self::PlatformAccountNotFound | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

/// Failure talking to the payout gateway. Never fatal: the transfer falls back to a
/// balance credit.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("payout gateway timed out")]
    Timeout,
    #[error("payout gateway unreachable: {0}")]
    Transport(String),
    #[error("payout gateway rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("unexpected payout gateway response: {0}")]
    Decode(String),
}
