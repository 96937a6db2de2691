use tiffin_domain::id::{OrderId, RecipientId};
use tiffin_domain::pagination::PageRequest;
use tiffin_domain::recipient::RecipientType;

use crate::domain::repository::{
    DistributionRepository, PayoutRecordRepository, RecipientAccountRepository,
};
use crate::domain::types::{OrderDistribution, PayoutFilter, PayoutRecord, RecipientAccount};
use crate::error::PaymentsServiceError;

// ── GetDistribution ──────────────────────────────────────────────────────────

pub struct GetDistributionUseCase<D: DistributionRepository, P: PayoutRecordRepository> {
    pub distributions: D,
    pub payouts: P,
}

impl<D: DistributionRepository, P: PayoutRecordRepository> GetDistributionUseCase<D, P> {
    pub async fn execute(
        &self,
        order_id: OrderId,
    ) -> Result<(OrderDistribution, Vec<PayoutRecord>), PaymentsServiceError> {
        let distribution = self
            .distributions
            .find(order_id)
            .await?
            .ok_or(PaymentsServiceError::DistributionNotFound)?;
        let payouts = self.payouts.list_by_order(order_id).await?;
        Ok((distribution, payouts))
    }
}

// ── GetAccount ───────────────────────────────────────────────────────────────

pub struct GetAccountUseCase<A: RecipientAccountRepository> {
    pub accounts: A,
}

impl<A: RecipientAccountRepository> GetAccountUseCase<A> {
    pub async fn execute(
        &self,
        recipient_type: RecipientType,
        recipient_id: RecipientId,
    ) -> Result<RecipientAccount, PaymentsServiceError> {
        self.accounts
            .find(recipient_type, recipient_id)
            .await?
            .ok_or(PaymentsServiceError::RecipientNotFound)
    }
}

// ── ListPayouts ──────────────────────────────────────────────────────────────

pub struct ListPayoutsUseCase<P: PayoutRecordRepository> {
    pub payouts: P,
}

impl<P: PayoutRecordRepository> ListPayoutsUseCase<P> {
    pub async fn execute(
        &self,
        filter: PayoutFilter,
        page: PageRequest,
    ) -> Result<Vec<PayoutRecord>, PaymentsServiceError> {
        self.payouts.list(&filter, page.clamped()).await
    }
}
