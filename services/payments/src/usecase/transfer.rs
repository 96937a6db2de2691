use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use tiffin_domain::id::RecipientId;
use tiffin_domain::money::Money;
use tiffin_domain::recipient::RecipientType;

use crate::domain::repository::{
    PayoutGateway, PayoutRecordRepository, RecipientAccountRepository,
};
use crate::domain::types::{
    OrderSnapshot, PayoutMethod, PayoutRecord, PayoutRequest, PayoutStatus, TransferReceipt,
};
use crate::error::{GatewayError, PaymentsServiceError};

/// `{recipientType}_{recipientId}_{orderId}_{unix millis}`
pub fn reference_id(
    recipient_type: RecipientType,
    recipient_id: RecipientId,
    order: &OrderSnapshot,
    at: chrono::DateTime<Utc>,
) -> String {
    format!(
        "{}_{}_{}_{}",
        recipient_type.as_str(),
        recipient_id,
        order.order_id,
        at.timestamp_millis()
    )
}

// ── TransferToRecipient ──────────────────────────────────────────────────────

/// Pays one recipient's share: gateway payout when possible, balance credit otherwise.
/// Either way the recipient is credited exactly once and a payout record is written.
pub struct TransferUseCase<A, P, G>
where
    A: RecipientAccountRepository,
    P: PayoutRecordRepository,
    G: PayoutGateway,
{
    pub accounts: A,
    pub payouts: P,
    pub gateway: G,
    pub gateway_timeout: Duration,
}

impl<A, P, G> TransferUseCase<A, P, G>
where
    A: RecipientAccountRepository,
    P: PayoutRecordRepository,
    G: PayoutGateway,
{
    pub async fn execute(
        &self,
        recipient_type: RecipientType,
        recipient_id: RecipientId,
        amount: Money,
        order: &OrderSnapshot,
    ) -> Result<TransferReceipt, PaymentsServiceError> {
        if amount.is_negative() {
            return Err(PaymentsServiceError::InvalidAmount);
        }
        let account = self
            .accounts
            .find(recipient_type, recipient_id)
            .await?
            .ok_or(PaymentsServiceError::RecipientNotFound)?;
        let bank_details = account
            .bank_details
            .ok_or(PaymentsServiceError::MissingBankDetails)?;

        let now = Utc::now();
        let request = PayoutRequest {
            reference_id: reference_id(recipient_type, recipient_id, order, now),
            amount,
            bank_details,
            recipient_type,
            recipient_id,
            order_id: order.order_id,
            narration: format!("Order {} payout", order.order_id),
        };

        let attempt =
            match tokio::time::timeout(self.gateway_timeout, self.gateway.create_payout(&request))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(GatewayError::Timeout),
            };

        let mut record = PayoutRecord {
            id: Uuid::now_v7(),
            external_payout_id: None,
            reference_id: request.reference_id,
            recipient_type,
            recipient_id,
            order_id: order.order_id,
            amount,
            status: PayoutStatus::Processing,
            method: PayoutMethod::Gateway,
            order_data: order.clone(),
            bank_details: request.bank_details,
            gateway_response: None,
            failure_reason: None,
            processed_at: None,
            failed_at: None,
            created_at: now,
            updated_at: now,
        };

        let gateway_error = match attempt {
            Ok(payout) => {
                let status = PayoutStatus::from_gateway(&payout.status);
                record.external_payout_id = Some(payout.id);
                record.gateway_response = Some(payout.raw);
                if status.is_failure() {
                    Some(format!("payout gateway returned status {}", payout.status))
                } else {
                    record.status = status;
                    if status == PayoutStatus::Processed {
                        record.processed_at = Some(now);
                    }
                    None
                }
            }
            Err(e) => {
                record.gateway_response = Some(serde_json::json!({ "error": e.to_string() }));
                Some(e.to_string())
            }
        };

        // Settled locally: the money sits in the internal balance.
        if let Some(ref error) = gateway_error {
            tracing::warn!(
                recipient_type = %recipient_type,
                recipient_id = %recipient_id,
                order_id = %order.order_id,
                error = %error,
                "payout gateway failed, crediting balance instead"
            );
            record.method = PayoutMethod::BalanceUpdateFallback;
            record.status = PayoutStatus::Processed;
            record.processed_at = Some(now);
            record.failure_reason = Some(error.clone());
        }

        self.payouts.insert_with_credit(&record).await?;

        tracing::info!(
            recipient_type = %recipient_type,
            recipient_id = %recipient_id,
            order_id = %order.order_id,
            amount = %amount,
            method = record.method.as_str(),
            status = %record.status,
            "recipient credited"
        );

        Ok(TransferReceipt {
            record,
            gateway_error,
        })
    }
}
