use chrono::Utc;

use crate::domain::repository::PayoutRecordRepository;
use crate::domain::types::{PayoutStatus, TerminalUpdate, WebhookEvent, WebhookOutcome};
use crate::error::PaymentsServiceError;

pub const EVENT_PAYOUT_PROCESSED: &str = "payout.processed";
pub const EVENT_PAYOUT_FAILED: &str = "payout.failed";

// ── HandlePayoutWebhook ──────────────────────────────────────────────────────

/// Applies a verified gateway event to its payout record.
///
/// Terminal statuses are final: replays and out-of-order events leave the record alone.
pub struct HandlePayoutWebhookUseCase<P: PayoutRecordRepository> {
    pub payouts: P,
}

impl<P: PayoutRecordRepository> HandlePayoutWebhookUseCase<P> {
    pub async fn execute(
        &self,
        event: WebhookEvent,
    ) -> Result<WebhookOutcome, PaymentsServiceError> {
        let now = Utc::now();
        let update = match event.event.as_str() {
            EVENT_PAYOUT_PROCESSED => TerminalUpdate {
                status: PayoutStatus::Processed,
                at: now,
                failure_reason: None,
            },
            EVENT_PAYOUT_FAILED => TerminalUpdate {
                status: PayoutStatus::Failed,
                at: now,
                failure_reason: Some(
                    event
                        .payload
                        .payout
                        .failure_reason
                        .clone()
                        .unwrap_or_else(|| "unknown".to_owned()),
                ),
            },
            other => {
                tracing::debug!(event = other, "ignoring payout webhook event");
                return Ok(WebhookOutcome::Ignored);
            }
        };

        let payout_id = event.payload.payout.id.as_str();
        let mut found = self.payouts.find_by_external_id(payout_id).await?;
        let reference_id = event.payload.payout.reference_id.as_deref();
        if let (true, Some(reference_id)) = (found.is_none(), reference_id) {
            // The create call may have timed out after the gateway accepted it.
            found = self.payouts.find_by_reference_id(reference_id).await?;
            if let Some(ref mut record) = found {
                tracing::warn!(
                    payout_id,
                    reference_id,
                    method = record.method.as_str(),
                    "gateway payout matched by reference id; create response was lost"
                );
                if record.external_payout_id.is_none() {
                    self.payouts.attach_external_id(record.id, payout_id).await?;
                    record.external_payout_id = Some(payout_id.to_owned());
                }
            }
        }
        let Some(record) = found else {
            tracing::warn!(
                payout_id,
                event = %event.event,
                "payout webhook for unknown payout id"
            );
            return Ok(WebhookOutcome::UnknownPayout);
        };

        if record.status.is_terminal() {
            if record.status != update.status {
                tracing::warn!(
                    payout_id,
                    current = %record.status,
                    event = %event.event,
                    "payout already terminal; ignoring conflicting event"
                );
            }
            return Ok(WebhookOutcome::AlreadyTerminal(record));
        }

        if !self.payouts.apply_terminal(&record, &update).await? {
            // Another delivery of the event won the race.
            return Ok(WebhookOutcome::AlreadyTerminal(record));
        }

        tracing::info!(
            payout_id,
            order_id = %record.order_id,
            recipient_type = %record.recipient_type,
            status = %update.status,
            "payout reconciled"
        );
        Ok(WebhookOutcome::Applied(record.with_terminal(&update)))
    }
}
