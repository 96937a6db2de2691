use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;

use tiffin_domain::id::RecipientId;

use crate::infra::db::{
    DbDistributionRepository, DbDistributionRetryQueue, DbPayoutRecordRepository,
    DbRecipientAccountRepository,
};
use crate::infra::gateway::HttpPayoutGateway;
use crate::usecase::distribute::DistributePaymentUseCase;
use crate::usecase::transfer::TransferUseCase;

/// Concrete distribution use case wired to Postgres and the HTTP gateway.
pub type DbDistributePaymentUseCase = DistributePaymentUseCase<
    DbRecipientAccountRepository,
    DbPayoutRecordRepository,
    DbDistributionRepository,
    HttpPayoutGateway,
>;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub gateway: HttpPayoutGateway,
    pub platform_account_id: RecipientId,
    pub payout_timeout: Duration,
    pub distribution_lease: Duration,
    pub webhook_secret: Arc<str>,
    /// Delay before the first retry of a failed distribution.
    pub retry_delay: Duration,
}

impl AppState {
    pub fn account_repo(&self) -> DbRecipientAccountRepository {
        DbRecipientAccountRepository {
            db: self.db.clone(),
        }
    }

    pub fn payout_repo(&self) -> DbPayoutRecordRepository {
        DbPayoutRecordRepository {
            db: self.db.clone(),
        }
    }

    pub fn distribution_repo(&self) -> DbDistributionRepository {
        DbDistributionRepository {
            db: self.db.clone(),
        }
    }

    pub fn retry_queue(&self) -> DbDistributionRetryQueue {
        DbDistributionRetryQueue {
            db: self.db.clone(),
        }
    }

    pub fn distribute_usecase(&self) -> DbDistributePaymentUseCase {
        DistributePaymentUseCase {
            transfer: TransferUseCase {
                accounts: self.account_repo(),
                payouts: self.payout_repo(),
                gateway: self.gateway.clone(),
                gateway_timeout: self.payout_timeout,
            },
            distributions: self.distribution_repo(),
            platform_account_id: self.platform_account_id,
            claim_lease: chrono::Duration::from_std(self.distribution_lease)
                .unwrap_or(chrono::Duration::seconds(120)),
        }
    }
}
