#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use tiffin_domain::id::{OrderId, RecipientId};
use tiffin_domain::money::Money;
use tiffin_domain::pagination::PageRequest;
use tiffin_domain::recipient::RecipientType;

use crate::domain::types::{
    DistributeRequest, DistributionStatus, GatewayPayout, OrderDistribution, PayoutFilter,
    PayoutRecord, PayoutRequest, RecipientAccount, RetryJob, TerminalUpdate,
};
use crate::error::{GatewayError, PaymentsServiceError};

/// Read access to recipient earnings accounts. Balances are only changed through the
/// payout and distribution repositories, inside their transactions.
pub trait RecipientAccountRepository: Send + Sync {
    async fn find(
        &self,
        recipient_type: RecipientType,
        recipient_id: RecipientId,
    ) -> Result<Option<RecipientAccount>, PaymentsServiceError>;
}

/// Repository for payout attempts.
pub trait PayoutRecordRepository: Send + Sync {
    /// Insert the record and add its amount to the recipient's `balance` and
    /// `total_earnings` in one transaction.
    async fn insert_with_credit(&self, record: &PayoutRecord) -> Result<(), PaymentsServiceError>;

    async fn find_by_external_id(
        &self,
        external_payout_id: &str,
    ) -> Result<Option<PayoutRecord>, PaymentsServiceError>;

    async fn find_by_reference_id(
        &self,
        reference_id: &str,
    ) -> Result<Option<PayoutRecord>, PaymentsServiceError>;

    async fn list_by_order(&self, order_id: OrderId)
    -> Result<Vec<PayoutRecord>, PaymentsServiceError>;

    /// Newest first.
    async fn list(
        &self,
        filter: &PayoutFilter,
        page: PageRequest,
    ) -> Result<Vec<PayoutRecord>, PaymentsServiceError>;

    /// Record the gateway's payout id on a record that has none yet.
    async fn attach_external_id(
        &self,
        id: Uuid,
        external_payout_id: &str,
    ) -> Result<(), PaymentsServiceError>;

    /// Apply a terminal transition while the record is still queued/processing.
    ///
    /// A `failed` transition of a gateway payout also moves the optimistic credit from the
    /// recipient's `balance` to `pending_amount` in the same transaction, never taking
    /// `balance` below zero.
    /// Returns `false` if the record had already reached a terminal status.
    async fn apply_terminal(
        &self,
        record: &PayoutRecord,
        update: &TerminalUpdate,
    ) -> Result<bool, PaymentsServiceError>;
}

/// Repository for per-order distribution state.
pub trait DistributionRepository: Send + Sync {
    async fn find(
        &self,
        order_id: OrderId,
    ) -> Result<Option<OrderDistribution>, PaymentsServiceError>;

    /// Insert a new distribution holding the claim in `distribution.claimed_until` and
    /// `distribution.claim_token`. Returns `false` if the order already has one.
    async fn create_claimed(
        &self,
        distribution: &OrderDistribution,
    ) -> Result<bool, PaymentsServiceError>;

    /// Take the claim for `token` unless another call holds an unexpired one, and return
    /// the distribution as it stands under the new claim. `None` if the claim is held.
    async fn try_claim(
        &self,
        order_id: OrderId,
        token: Uuid,
        now: DateTime<Utc>,
        claimed_until: DateTime<Utc>,
    ) -> Result<Option<OrderDistribution>, PaymentsServiceError>;

    /// Remember a rider for the order unless one is already set.
    async fn assign_rider(
        &self,
        order_id: OrderId,
        delivery_rider_id: RecipientId,
    ) -> Result<(), PaymentsServiceError>;

    /// Store the outcome of a run and drop the claim. A `None` rider keeps the stored one.
    /// Fails with `DistributionInProgress` if `token` no longer holds the claim.
    async fn complete(
        &self,
        order_id: OrderId,
        token: Uuid,
        status: DistributionStatus,
        delivery_rider_id: Option<RecipientId>,
    ) -> Result<(), PaymentsServiceError>;

    /// Drop the claim if `token` still holds it.
    async fn release(&self, order_id: OrderId, token: Uuid) -> Result<(), PaymentsServiceError>;

    /// Add `delta` (negative for a debit) to the platform account's `balance` and
    /// `total_earnings` and to the order's `platform_credited`, in one transaction.
    /// Fails with `DistributionInProgress`, changing nothing, if `token` no longer holds
    /// the claim.
    async fn adjust_platform(
        &self,
        order_id: OrderId,
        token: Uuid,
        platform_account_id: RecipientId,
        delta: Money,
    ) -> Result<(), PaymentsServiceError>;
}

/// Durable queue of distributions to run again.
pub trait DistributionRetryQueue: Send + Sync {
    /// Queue a retry for the order. An existing job for the order is reset with the new
    /// request.
    async fn enqueue(
        &self,
        request: &DistributeRequest,
        reason: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> Result<(), PaymentsServiceError>;

    /// Jobs neither completed nor failed whose next attempt is due, oldest first.
    async fn due(&self, now: DateTime<Utc>, limit: u64)
    -> Result<Vec<RetryJob>, PaymentsServiceError>;

    async fn complete(&self, id: Uuid, now: DateTime<Utc>) -> Result<(), PaymentsServiceError>;

    async fn reschedule(
        &self,
        id: Uuid,
        attempts: i32,
        error: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> Result<(), PaymentsServiceError>;

    /// Give up on the job.
    async fn fail(
        &self,
        id: Uuid,
        attempts: i32,
        error: &str,
        now: DateTime<Utc>,
    ) -> Result<(), PaymentsServiceError>;
}

/// Port to the external bank-transfer API.
pub trait PayoutGateway: Send + Sync {
    async fn create_payout(&self, request: &PayoutRequest) -> Result<GatewayPayout, GatewayError>;
}
