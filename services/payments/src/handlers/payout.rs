use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tiffin_domain::id::{OrderId, RecipientId};
use tiffin_domain::money::Money;
use tiffin_domain::pagination::PageRequest;
use tiffin_domain::recipient::RecipientType;

use crate::domain::types::{PayoutFilter, PayoutMethod, PayoutRecord, PayoutStatus};
use crate::error::PaymentsServiceError;
use crate::state::AppState;
use crate::usecase::query::ListPayoutsUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct PayoutResponse {
    pub id: Uuid,
    pub external_payout_id: Option<String>,
    pub reference_id: String,
    pub recipient_type: RecipientType,
    pub recipient_id: RecipientId,
    pub order_id: OrderId,
    pub amount: Money,
    pub status: PayoutStatus,
    pub method: PayoutMethod,
    pub failure_reason: Option<String>,
    #[serde(serialize_with = "tiffin_core::serde::to_rfc3339_ms_opt")]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "tiffin_core::serde::to_rfc3339_ms_opt")]
    pub failed_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "tiffin_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "tiffin_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<PayoutRecord> for PayoutResponse {
    fn from(r: PayoutRecord) -> Self {
        Self {
            id: r.id,
            external_payout_id: r.external_payout_id,
            reference_id: r.reference_id,
            recipient_type: r.recipient_type,
            recipient_id: r.recipient_id,
            order_id: r.order_id,
            amount: r.amount,
            status: r.status,
            method: r.method,
            failure_reason: r.failure_reason,
            processed_at: r.processed_at,
            failed_at: r.failed_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

// ── Query params ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct PayoutListQuery {
    pub recipient_type: Option<String>,
    pub recipient_id: Option<String>,
    pub status: Option<String>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

impl PayoutListQuery {
    fn filter(&self) -> Result<PayoutFilter, PaymentsServiceError> {
        let recipient_type = self
            .recipient_type
            .as_deref()
            .map(str::parse::<RecipientType>)
            .transpose()
            .map_err(|_| PaymentsServiceError::InvalidPayload)?;
        let recipient_id = self
            .recipient_id
            .as_deref()
            .map(str::parse::<RecipientId>)
            .transpose()
            .map_err(|_| PaymentsServiceError::InvalidPayload)?;
        let status = self
            .status
            .as_deref()
            .map(str::parse::<PayoutStatus>)
            .transpose()
            .map_err(|_| PaymentsServiceError::InvalidPayload)?;
        Ok(PayoutFilter {
            recipient_type,
            recipient_id,
            status,
        })
    }

    fn page(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest {
            per_page: self.per_page.unwrap_or(defaults.per_page),
            page: self.page.unwrap_or(defaults.page),
        }
    }
}

// ── GET /payments/payouts ────────────────────────────────────────────────────

pub async fn list_payouts(
    State(state): State<AppState>,
    Query(query): Query<PayoutListQuery>,
) -> Result<Json<Vec<PayoutResponse>>, PaymentsServiceError> {
    let usecase = ListPayoutsUseCase {
        payouts: state.payout_repo(),
    };
    let payouts = usecase.execute(query.filter()?, query.page()).await?;
    Ok(Json(payouts.into_iter().map(PayoutResponse::from).collect()))
}
