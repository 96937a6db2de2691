use chrono::Utc;
use uuid::Uuid;

use tiffin_domain::commission;
use tiffin_domain::id::{OrderId, RecipientId};
use tiffin_domain::money::Money;
use tiffin_domain::recipient::RecipientType;

use crate::domain::repository::{
    DistributionRepository, PayoutGateway, PayoutRecordRepository, RecipientAccountRepository,
};
use crate::domain::types::{
    DistributeRequest, DistributionEntry, DistributionKind, DistributionResult,
    DistributionStatus, EntryMethod, OrderDistribution, PayoutStatus, TransferReceipt,
};
use crate::error::PaymentsServiceError;
use crate::usecase::transfer::TransferUseCase;

// ── DistributePayment ────────────────────────────────────────────────────────

/// Splits a paid order between restaurant, rider and platform.
///
/// Every call performs only the steps not yet settled for the order, so the same order
/// can be distributed again after a rider is assigned or after a failed step.
pub struct DistributePaymentUseCase<A, P, D, G>
where
    A: RecipientAccountRepository,
    P: PayoutRecordRepository,
    D: DistributionRepository,
    G: PayoutGateway,
{
    pub transfer: TransferUseCase<A, P, G>,
    pub distributions: D,
    pub platform_account_id: RecipientId,
    /// How long one call may hold the order before another call can take over.
    pub claim_lease: chrono::Duration,
}

impl<A, P, D, G> DistributePaymentUseCase<A, P, D, G>
where
    A: RecipientAccountRepository,
    P: PayoutRecordRepository,
    D: DistributionRepository,
    G: PayoutGateway,
{
    pub async fn execute(
        &self,
        request: DistributeRequest,
    ) -> Result<DistributionResult, PaymentsServiceError> {
        let split = commission::split(request.total_amount)
            .map_err(|_| PaymentsServiceError::InvalidAmount)?;
        let order_id = request.order.order_id;
        let now = Utc::now();
        let claimed_until = now + self.claim_lease;
        let token = Uuid::now_v7();

        // Settle only from the row as read under our own claim.
        let claimed = if self.distributions.find(order_id).await?.is_some() {
            self.distributions
                .try_claim(order_id, token, now, claimed_until)
                .await?
        } else {
            let created = OrderDistribution {
                order_id,
                restaurant_id: request.restaurant_id,
                delivery_rider_id: request.delivery_rider_id,
                total_amount: request.total_amount,
                split,
                platform_credited: Money::ZERO,
                status: DistributionStatus::PartiallyDistributed,
                order_data: request.order.clone(),
                claimed_until: Some(claimed_until),
                claim_token: Some(token),
                created_at: now,
                updated_at: now,
            };
            self.distributions
                .create_claimed(&created)
                .await?
                .then_some(created)
        };
        let Some(distribution) = claimed else {
            self.remember_rider(order_id, request.delivery_rider_id).await?;
            return Err(PaymentsServiceError::DistributionInProgress);
        };

        if distribution.total_amount != request.total_amount
            || distribution.restaurant_id != request.restaurant_id
        {
            tracing::warn!(
                order_id = %order_id,
                stored_total = %distribution.total_amount,
                requested_total = %request.total_amount,
                "distribution request differs from the stored order; using stored amounts"
            );
        }

        match self.settle(&distribution, token, request.delivery_rider_id).await {
            Ok((result, rider_id)) => {
                self.distributions
                    .complete(order_id, token, result.status, rider_id)
                    .await?;
                tracing::info!(
                    order_id = %order_id,
                    status = result.status.as_str(),
                    steps = result.distributions.len(),
                    "order distribution finished"
                );
                Ok(result)
            }
            Err(e) => {
                if let Err(release_err) = self.distributions.release(order_id, token).await {
                    tracing::warn!(
                        order_id = %order_id,
                        error = %release_err.detail(),
                        "failed to release distribution claim"
                    );
                }
                Err(e)
            }
        }
    }

    /// Keep a rider named by a call that lost the claim, so the next run pays them.
    async fn remember_rider(
        &self,
        order_id: OrderId,
        rider: Option<RecipientId>,
    ) -> Result<(), PaymentsServiceError> {
        if let Some(rider) = rider {
            self.distributions.assign_rider(order_id, rider).await?;
        }
        Ok(())
    }

    /// Runs the missing steps while the claim is held.
    async fn settle(
        &self,
        distribution: &OrderDistribution,
        token: Uuid,
        requested_rider: Option<RecipientId>,
    ) -> Result<(DistributionResult, Option<RecipientId>), PaymentsServiceError> {
        let order_id = distribution.order_id;
        let split = distribution.split;
        let settled = self.transfer.payouts.list_by_order(order_id).await?;
        let mut entries = Vec::new();

        let restaurant_settled = settled
            .iter()
            .any(|r| r.recipient_type == RecipientType::Restaurant);
        let restaurant_done = if restaurant_settled {
            true
        } else {
            // A failed restaurant share is not reallocated; it is retried.
            self.pay(
                DistributionKind::Restaurant,
                RecipientType::Restaurant,
                distribution.restaurant_id,
                split.restaurant_amount,
                distribution,
                &mut entries,
            )
            .await?
        };

        let paid_rider = settled
            .iter()
            .find(|r| r.recipient_type == RecipientType::DeliveryRider)
            .map(|r| r.recipient_id);
        let rider_id = paid_rider
            .or(requested_rider)
            .or(distribution.delivery_rider_id);
        let rider_done = match (paid_rider, rider_id) {
            (Some(paid), _) => {
                if requested_rider.is_some_and(|r| r != paid) {
                    tracing::warn!(
                        order_id = %order_id,
                        paid_rider = %paid,
                        "order rider share already paid to another rider; ignoring new rider"
                    );
                }
                true
            }
            (None, Some(rider)) => {
                self.pay(
                    DistributionKind::DeliveryRider,
                    RecipientType::DeliveryRider,
                    rider,
                    split.delivery_amount,
                    distribution,
                    &mut entries,
                )
                .await?
            }
            (None, None) => false,
        };

        // The platform holds the rider share until a rider is paid.
        let platform_target = if rider_done {
            split.platform_amount
        } else {
            split.platform_amount + split.delivery_amount
        };
        let delta = platform_target - distribution.platform_credited;
        if !delta.is_zero() {
            self.distributions
                .adjust_platform(order_id, token, self.platform_account_id, delta)
                .await?;
            let kind = if distribution.platform_credited.is_zero() {
                DistributionKind::Platform
            } else {
                DistributionKind::PlatformAdjustment
            };
            entries.push(DistributionEntry {
                kind,
                amount: delta,
                recipient: self.platform_account_id,
                method: Some(EntryMethod::BalanceUpdate),
                status: Some(PayoutStatus::Processed),
                payout_id: None,
                error: None,
            });
        }

        let status = if restaurant_done && rider_done {
            DistributionStatus::FullyDistributed
        } else {
            DistributionStatus::PartiallyDistributed
        };
        let result = DistributionResult {
            success: true,
            order_id,
            status,
            distributions: entries,
        };
        Ok((result, rider_id))
    }

    /// Transfer one share. Recipient-level failures become a failed entry; anything else
    /// aborts the run.
    async fn pay(
        &self,
        kind: DistributionKind,
        recipient_type: RecipientType,
        recipient_id: RecipientId,
        amount: Money,
        distribution: &OrderDistribution,
        entries: &mut Vec<DistributionEntry>,
    ) -> Result<bool, PaymentsServiceError> {
        match self
            .transfer
            .execute(recipient_type, recipient_id, amount, &distribution.order_data)
            .await
        {
            Ok(receipt) => {
                entries.push(entry_from_receipt(kind, receipt));
                Ok(true)
            }
            Err(e) if e.is_recipient_scoped() => {
                tracing::warn!(
                    order_id = %distribution.order_id,
                    recipient_type = %recipient_type,
                    recipient_id = %recipient_id,
                    error = %e,
                    "recipient transfer failed"
                );
                entries.push(DistributionEntry::failed(
                    kind,
                    amount,
                    recipient_id,
                    e.to_string(),
                ));
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

fn entry_from_receipt(kind: DistributionKind, receipt: TransferReceipt) -> DistributionEntry {
    let record = receipt.record;
    DistributionEntry {
        kind,
        amount: record.amount,
        recipient: record.recipient_id,
        method: Some(record.method.into()),
        status: Some(record.status),
        payout_id: record.external_payout_id,
        error: receipt.gateway_error,
    }
}
