use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use tiffin_domain::id::{OrderId, RecipientId};
use tiffin_domain::money::Money;

use crate::domain::types::DistributionStatus;
use crate::error::PaymentsServiceError;
use crate::handlers::payout::PayoutResponse;
use crate::state::AppState;
use crate::usecase::query::GetDistributionUseCase;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct DistributionResponse {
    pub order_id: OrderId,
    pub restaurant_id: RecipientId,
    pub delivery_rider_id: Option<RecipientId>,
    pub total_amount: Money,
    pub restaurant_amount: Money,
    pub delivery_amount: Money,
    pub platform_amount: Money,
    /// Net amount credited to the platform so far, including the held rider share.
    pub platform_credited: Money,
    pub status: DistributionStatus,
    pub payouts: Vec<PayoutResponse>,
    #[serde(serialize_with = "tiffin_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "tiffin_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

// ── GET /payments/orders/{order_id}/distribution ─────────────────────────────

pub async fn get_distribution(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<DistributionResponse>, PaymentsServiceError> {
    let order_id: OrderId = order_id
        .parse()
        .map_err(|_| PaymentsServiceError::InvalidPayload)?;
    let usecase = GetDistributionUseCase {
        distributions: state.distribution_repo(),
        payouts: state.payout_repo(),
    };
    let (distribution, payouts) = usecase.execute(order_id).await?;
    Ok(Json(DistributionResponse {
        order_id: distribution.order_id,
        restaurant_id: distribution.restaurant_id,
        delivery_rider_id: distribution.delivery_rider_id,
        total_amount: distribution.total_amount,
        restaurant_amount: distribution.split.restaurant_amount,
        delivery_amount: distribution.split.delivery_amount,
        platform_amount: distribution.split.platform_amount,
        platform_credited: distribution.platform_credited,
        status: distribution.status,
        payouts: payouts.into_iter().map(PayoutResponse::from).collect(),
        created_at: distribution.created_at,
        updated_at: distribution.updated_at,
    }))
}
