use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    TransactionError, TransactionTrait, UpdateMany,
    sea_query::{Expr, Func, OnConflict},
};
use uuid::Uuid;

use tiffin_domain::commission::CommissionSplit;
use tiffin_domain::id::{OrderId, RecipientId};
use tiffin_domain::money::Money;
use tiffin_domain::pagination::PageRequest;
use tiffin_domain::recipient::RecipientType;
use tiffin_payments_schema::{
    distribution_retries, order_distributions, payout_records, recipient_accounts,
};

use crate::domain::repository::{
    DistributionRepository, DistributionRetryQueue, PayoutRecordRepository,
    RecipientAccountRepository,
};
use crate::domain::types::{
    BankDetails, DistributeRequest, DistributionStatus, OrderDistribution, PayoutFilter,
    PayoutMethod, PayoutRecord, PayoutStatus, RecipientAccount, RetryJob, TerminalUpdate,
};
use crate::error::PaymentsServiceError;

// ── Recipient account repository ─────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecipientAccountRepository {
    pub db: DatabaseConnection,
}

impl RecipientAccountRepository for DbRecipientAccountRepository {
    async fn find(
        &self,
        recipient_type: RecipientType,
        recipient_id: RecipientId,
    ) -> Result<Option<RecipientAccount>, PaymentsServiceError> {
        let key = (recipient_type.as_str().to_owned(), recipient_id.0);
        let model = recipient_accounts::Entity::find_by_id(key)
            .one(&self.db)
            .await
            .context("find recipient account")?;
        model.map(account_from_model).transpose()
    }
}

fn account_from_model(
    model: recipient_accounts::Model,
) -> Result<RecipientAccount, PaymentsServiceError> {
    let recipient_type = model
        .recipient_type
        .parse::<RecipientType>()
        .context("decode recipient type")?;
    let bank_details = model
        .bank_account_number
        .filter(|number| !number.is_empty())
        .map(|account_number| BankDetails {
            account_number,
            ifsc_code: model.bank_ifsc_code,
            account_holder_name: model.bank_account_holder_name,
            bank_name: model.bank_name,
            is_verified: model.bank_is_verified,
        });
    Ok(RecipientAccount {
        recipient_type,
        recipient_id: RecipientId(model.recipient_id),
        balance: Money(model.balance),
        total_earnings: Money(model.total_earnings),
        pending_amount: Money(model.pending_amount),
        bank_details,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

/// `balance += amount, total_earnings += amount` on one account.
async fn credit_account(
    txn: &DatabaseTransaction,
    recipient_type: RecipientType,
    recipient_id: RecipientId,
    amount: i64,
    now: DateTime<Utc>,
) -> Result<u64, DbErr> {
    let result = recipient_accounts::Entity::update_many()
        .col_expr(
            recipient_accounts::Column::Balance,
            Expr::col(recipient_accounts::Column::Balance).add(amount),
        )
        .col_expr(
            recipient_accounts::Column::TotalEarnings,
            Expr::col(recipient_accounts::Column::TotalEarnings).add(amount),
        )
        .col_expr(recipient_accounts::Column::UpdatedAt, Expr::value(now))
        .filter(recipient_accounts::Column::RecipientType.eq(recipient_type.as_str()))
        .filter(recipient_accounts::Column::RecipientId.eq(recipient_id.0))
        .exec(txn)
        .await?;
    Ok(result.rows_affected)
}

// ── Payout record repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPayoutRecordRepository {
    pub db: DatabaseConnection,
}

impl PayoutRecordRepository for DbPayoutRecordRepository {
    async fn insert_with_credit(&self, record: &PayoutRecord) -> Result<(), PaymentsServiceError> {
        let model = payout_active_model(record)?;
        let recipient_type = record.recipient_type;
        let recipient_id = record.recipient_id;
        let amount = record.amount.minor();
        let now = record.created_at;
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    model.insert(txn).await?;
                    let credited =
                        credit_account(txn, recipient_type, recipient_id, amount, now).await?;
                    if credited == 0 {
                        return Err(DbErr::RecordNotFound(format!(
                            "{recipient_type} account {recipient_id}"
                        )));
                    }
                    Ok(())
                })
            })
            .await
            .context("insert payout record with credit")?;
        Ok(())
    }

    async fn find_by_external_id(
        &self,
        external_payout_id: &str,
    ) -> Result<Option<PayoutRecord>, PaymentsServiceError> {
        let model = payout_records::Entity::find()
            .filter(payout_records::Column::ExternalPayoutId.eq(external_payout_id))
            .one(&self.db)
            .await
            .context("find payout record by external id")?;
        model.map(payout_from_model).transpose()
    }

    async fn find_by_reference_id(
        &self,
        reference_id: &str,
    ) -> Result<Option<PayoutRecord>, PaymentsServiceError> {
        let model = payout_records::Entity::find()
            .filter(payout_records::Column::ReferenceId.eq(reference_id))
            .one(&self.db)
            .await
            .context("find payout record by reference id")?;
        model.map(payout_from_model).transpose()
    }

    async fn list_by_order(
        &self,
        order_id: OrderId,
    ) -> Result<Vec<PayoutRecord>, PaymentsServiceError> {
        let models = payout_records::Entity::find()
            .filter(payout_records::Column::OrderId.eq(order_id.0))
            .order_by_asc(payout_records::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list payout records by order")?;
        models.into_iter().map(payout_from_model).collect()
    }

    async fn list(
        &self,
        filter: &PayoutFilter,
        page: PageRequest,
    ) -> Result<Vec<PayoutRecord>, PaymentsServiceError> {
        let models = payout_list_query(filter, page)
            .all(&self.db)
            .await
            .context("list payout records")?;
        models.into_iter().map(payout_from_model).collect()
    }

    async fn attach_external_id(
        &self,
        id: Uuid,
        external_payout_id: &str,
    ) -> Result<(), PaymentsServiceError> {
        payout_records::Entity::update_many()
            .col_expr(
                payout_records::Column::ExternalPayoutId,
                Expr::value(Some(external_payout_id.to_owned())),
            )
            .col_expr(payout_records::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(payout_records::Column::Id.eq(id))
            .filter(payout_records::Column::ExternalPayoutId.is_null())
            .exec(&self.db)
            .await
            .context("attach external payout id")?;
        Ok(())
    }

    async fn apply_terminal(
        &self,
        record: &PayoutRecord,
        update: &TerminalUpdate,
    ) -> Result<bool, PaymentsServiceError> {
        let id = record.id;
        let recipient_type = record.recipient_type;
        let recipient_id = record.recipient_id;
        let amount = record.amount.minor();
        let compensate =
            update.status == PayoutStatus::Failed && record.method == PayoutMethod::Gateway;
        let update = update.clone();
        let applied = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    let mut query = payout_records::Entity::update_many()
                        .col_expr(
                            payout_records::Column::Status,
                            Expr::value(update.status.as_str()),
                        )
                        .col_expr(payout_records::Column::UpdatedAt, Expr::value(update.at));
                    query = match update.status {
                        PayoutStatus::Processed => query
                            .col_expr(payout_records::Column::ProcessedAt, Expr::value(update.at)),
                        _ => query
                            .col_expr(payout_records::Column::FailedAt, Expr::value(update.at))
                            .col_expr(
                                payout_records::Column::FailureReason,
                                Expr::value(update.failure_reason.clone()),
                            ),
                    };
                    let result = query
                        .filter(payout_records::Column::Id.eq(id))
                        .filter(payout_records::Column::Status.is_in([
                            PayoutStatus::Queued.as_str(),
                            PayoutStatus::Processing.as_str(),
                        ]))
                        .exec(txn)
                        .await?;
                    if result.rows_affected == 0 {
                        return Ok(false);
                    }

                    // The optimistic credit never reached the bank: park it as pending.
                    if compensate {
                        compensation_update(recipient_type, recipient_id, amount, update.at)
                            .exec(txn)
                            .await?;
                    }
                    Ok(true)
                })
            })
            .await
            .context("apply terminal payout status")?;
        Ok(applied)
    }
}

/// Newest-first page of payout records matching `filter`.
fn payout_list_query(filter: &PayoutFilter, page: PageRequest) -> Select<payout_records::Entity> {
    let page = page.clamped();
    let mut query = payout_records::Entity::find();
    if let Some(recipient_type) = filter.recipient_type {
        query = query.filter(payout_records::Column::RecipientType.eq(recipient_type.as_str()));
    }
    if let Some(recipient_id) = filter.recipient_id {
        query = query.filter(payout_records::Column::RecipientId.eq(recipient_id.0));
    }
    if let Some(status) = filter.status {
        query = query.filter(payout_records::Column::Status.eq(status.as_str()));
    }
    query
        .order_by_desc(payout_records::Column::CreatedAt)
        .offset(page.offset())
        .limit(u64::from(page.per_page))
}

/// Moves up to `amount` from `balance` to `pending_amount`. Whatever the recipient has
/// already drawn out of `balance` is not parked again.
fn compensation_update(
    recipient_type: RecipientType,
    recipient_id: RecipientId,
    amount: i64,
    at: DateTime<Utc>,
) -> UpdateMany<recipient_accounts::Entity> {
    let moved = || {
        Func::least([
            Expr::col(recipient_accounts::Column::Balance).into(),
            Expr::value(amount),
        ])
    };
    recipient_accounts::Entity::update_many()
        .col_expr(
            recipient_accounts::Column::Balance,
            Expr::col(recipient_accounts::Column::Balance).sub(moved()),
        )
        .col_expr(
            recipient_accounts::Column::PendingAmount,
            Expr::col(recipient_accounts::Column::PendingAmount).add(moved()),
        )
        .col_expr(recipient_accounts::Column::UpdatedAt, Expr::value(at))
        .filter(recipient_accounts::Column::RecipientType.eq(recipient_type.as_str()))
        .filter(recipient_accounts::Column::RecipientId.eq(recipient_id.0))
}

fn payout_active_model(
    record: &PayoutRecord,
) -> Result<payout_records::ActiveModel, PaymentsServiceError> {
    Ok(payout_records::ActiveModel {
        id: Set(record.id),
        external_payout_id: Set(record.external_payout_id.clone()),
        reference_id: Set(record.reference_id.clone()),
        recipient_type: Set(record.recipient_type.as_str().to_owned()),
        recipient_id: Set(record.recipient_id.0),
        order_id: Set(record.order_id.0),
        amount: Set(record.amount.minor()),
        status: Set(record.status.as_str().to_owned()),
        method: Set(record.method.as_str().to_owned()),
        order_data: Set(serde_json::to_value(&record.order_data).context("encode order data")?),
        bank_details: Set(
            serde_json::to_value(&record.bank_details).context("encode bank details")?
        ),
        gateway_response: Set(record.gateway_response.clone()),
        failure_reason: Set(record.failure_reason.clone()),
        processed_at: Set(record.processed_at),
        failed_at: Set(record.failed_at),
        created_at: Set(record.created_at),
        updated_at: Set(record.updated_at),
    })
}

fn payout_from_model(model: payout_records::Model) -> Result<PayoutRecord, PaymentsServiceError> {
    Ok(PayoutRecord {
        id: model.id,
        external_payout_id: model.external_payout_id,
        reference_id: model.reference_id,
        recipient_type: model
            .recipient_type
            .parse::<RecipientType>()
            .context("decode payout recipient type")?,
        recipient_id: RecipientId(model.recipient_id),
        order_id: OrderId(model.order_id),
        amount: Money(model.amount),
        status: model
            .status
            .parse::<PayoutStatus>()
            .context("decode payout status")?,
        method: model
            .method
            .parse::<PayoutMethod>()
            .context("decode payout method")?,
        order_data: serde_json::from_value(model.order_data).context("decode order data")?,
        bank_details: serde_json::from_value(model.bank_details)
            .context("decode bank details")?,
        gateway_response: model.gateway_response,
        failure_reason: model.failure_reason,
        processed_at: model.processed_at,
        failed_at: model.failed_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Distribution repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDistributionRepository {
    pub db: DatabaseConnection,
}

impl DistributionRepository for DbDistributionRepository {
    async fn find(
        &self,
        order_id: OrderId,
    ) -> Result<Option<OrderDistribution>, PaymentsServiceError> {
        let model = order_distributions::Entity::find_by_id(order_id.0)
            .one(&self.db)
            .await
            .context("find order distribution")?;
        model.map(distribution_from_model).transpose()
    }

    async fn create_claimed(
        &self,
        distribution: &OrderDistribution,
    ) -> Result<bool, PaymentsServiceError> {
        let model = order_distributions::ActiveModel {
            order_id: Set(distribution.order_id.0),
            restaurant_id: Set(distribution.restaurant_id.0),
            delivery_rider_id: Set(distribution.delivery_rider_id.map(|id| id.0)),
            total_amount: Set(distribution.total_amount.minor()),
            restaurant_amount: Set(distribution.split.restaurant_amount.minor()),
            delivery_amount: Set(distribution.split.delivery_amount.minor()),
            platform_amount: Set(distribution.split.platform_amount.minor()),
            platform_credited: Set(distribution.platform_credited.minor()),
            status: Set(distribution.status.as_str().to_owned()),
            order_data: Set(
                serde_json::to_value(&distribution.order_data).context("encode order data")?
            ),
            claimed_until: Set(distribution.claimed_until),
            claim_token: Set(distribution.claim_token),
            created_at: Set(distribution.created_at),
            updated_at: Set(distribution.updated_at),
        };
        let inserted = order_distributions::Entity::insert(model)
            .on_conflict(
                OnConflict::column(order_distributions::Column::OrderId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("create order distribution")?;
        Ok(inserted == 1)
    }

    async fn try_claim(
        &self,
        order_id: OrderId,
        token: Uuid,
        now: DateTime<Utc>,
        claimed_until: DateTime<Utc>,
    ) -> Result<Option<OrderDistribution>, PaymentsServiceError> {
        let result = order_distributions::Entity::update_many()
            .col_expr(
                order_distributions::Column::ClaimedUntil,
                Expr::value(Some(claimed_until)),
            )
            .col_expr(order_distributions::Column::ClaimToken, Expr::value(Some(token)))
            .col_expr(order_distributions::Column::UpdatedAt, Expr::value(now))
            .filter(order_distributions::Column::OrderId.eq(order_id.0))
            .filter(
                Condition::any()
                    .add(order_distributions::Column::ClaimedUntil.is_null())
                    .add(order_distributions::Column::ClaimedUntil.lt(now)),
            )
            .exec(&self.db)
            .await
            .context("claim order distribution")?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        let model = order_distributions::Entity::find_by_id(order_id.0)
            .filter(order_distributions::Column::ClaimToken.eq(token))
            .one(&self.db)
            .await
            .context("read claimed order distribution")?;
        model.map(distribution_from_model).transpose()
    }

    async fn assign_rider(
        &self,
        order_id: OrderId,
        delivery_rider_id: RecipientId,
    ) -> Result<(), PaymentsServiceError> {
        order_distributions::Entity::update_many()
            .col_expr(
                order_distributions::Column::DeliveryRiderId,
                Expr::value(Some(delivery_rider_id.0)),
            )
            .col_expr(order_distributions::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(order_distributions::Column::OrderId.eq(order_id.0))
            .filter(order_distributions::Column::DeliveryRiderId.is_null())
            .exec(&self.db)
            .await
            .context("assign order distribution rider")?;
        Ok(())
    }

    async fn complete(
        &self,
        order_id: OrderId,
        token: Uuid,
        status: DistributionStatus,
        delivery_rider_id: Option<RecipientId>,
    ) -> Result<(), PaymentsServiceError> {
        let mut query = release_claim(order_id, token)
            .col_expr(order_distributions::Column::Status, Expr::value(status.as_str()));
        if let Some(rider) = delivery_rider_id {
            query = query.col_expr(
                order_distributions::Column::DeliveryRiderId,
                Expr::value(Some(rider.0)),
            );
        }
        let result = query
            .exec(&self.db)
            .await
            .context("complete order distribution")?;
        if result.rows_affected == 0 {
            return Err(PaymentsServiceError::DistributionInProgress);
        }
        Ok(())
    }

    async fn release(&self, order_id: OrderId, token: Uuid) -> Result<(), PaymentsServiceError> {
        release_claim(order_id, token)
            .exec(&self.db)
            .await
            .context("release order distribution claim")?;
        Ok(())
    }

    async fn adjust_platform(
        &self,
        order_id: OrderId,
        token: Uuid,
        platform_account_id: RecipientId,
        delta: Money,
    ) -> Result<(), PaymentsServiceError> {
        let delta = delta.minor();
        let now = Utc::now();
        let result = self
            .db
            .transaction::<_, (), ClaimedWriteError>(|txn| {
                Box::pin(async move {
                    let fenced = order_distributions::Entity::update_many()
                        .col_expr(
                            order_distributions::Column::PlatformCredited,
                            Expr::col(order_distributions::Column::PlatformCredited).add(delta),
                        )
                        .col_expr(order_distributions::Column::UpdatedAt, Expr::value(now))
                        .filter(order_distributions::Column::OrderId.eq(order_id.0))
                        .filter(order_distributions::Column::ClaimToken.eq(token))
                        .exec(txn)
                        .await?;
                    if fenced.rows_affected == 0 {
                        return Err(ClaimedWriteError::ClaimLost);
                    }
                    let credited = credit_account(
                        txn,
                        RecipientType::Platform,
                        platform_account_id,
                        delta,
                        now,
                    )
                    .await?;
                    if credited == 0 {
                        return Err(ClaimedWriteError::PlatformAccountMissing);
                    }
                    Ok(())
                })
            })
            .await;
        match result {
            Ok(()) => Ok(()),
            Err(TransactionError::Transaction(ClaimedWriteError::ClaimLost)) => {
                Err(PaymentsServiceError::DistributionInProgress)
            }
            Err(TransactionError::Transaction(ClaimedWriteError::PlatformAccountMissing)) => {
                Err(PaymentsServiceError::PlatformAccountNotFound)
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context("adjust platform credit")
                .into()),
        }
    }
}

/// Failure inside a transaction that writes under a distribution claim.
#[derive(Debug, thiserror::Error)]
enum ClaimedWriteError {
    #[error("distribution claim no longer held")]
    ClaimLost,
    #[error("platform account not found")]
    PlatformAccountMissing,
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Clears the claim, but only while `token` still holds it.
fn release_claim(order_id: OrderId, token: Uuid) -> UpdateMany<order_distributions::Entity> {
    order_distributions::Entity::update_many()
        .col_expr(
            order_distributions::Column::ClaimedUntil,
            Expr::value(Option::<DateTime<Utc>>::None),
        )
        .col_expr(
            order_distributions::Column::ClaimToken,
            Expr::value(Option::<Uuid>::None),
        )
        .col_expr(order_distributions::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(order_distributions::Column::OrderId.eq(order_id.0))
        .filter(order_distributions::Column::ClaimToken.eq(token))
}

fn distribution_from_model(
    model: order_distributions::Model,
) -> Result<OrderDistribution, PaymentsServiceError> {
    Ok(OrderDistribution {
        order_id: OrderId(model.order_id),
        restaurant_id: RecipientId(model.restaurant_id),
        delivery_rider_id: model.delivery_rider_id.map(RecipientId),
        total_amount: Money(model.total_amount),
        split: CommissionSplit {
            restaurant_amount: Money(model.restaurant_amount),
            delivery_amount: Money(model.delivery_amount),
            platform_amount: Money(model.platform_amount),
        },
        platform_credited: Money(model.platform_credited),
        status: model
            .status
            .parse::<DistributionStatus>()
            .context("decode distribution status")?,
        order_data: serde_json::from_value(model.order_data).context("decode order data")?,
        claimed_until: model.claimed_until,
        claim_token: model.claim_token,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Distribution retry queue ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDistributionRetryQueue {
    pub db: DatabaseConnection,
}

impl DistributionRetryQueue for DbDistributionRetryQueue {
    async fn enqueue(
        &self,
        request: &DistributeRequest,
        reason: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> Result<(), PaymentsServiceError> {
        let job = distribution_retries::ActiveModel {
            id: Set(Uuid::now_v7()),
            order_id: Set(request.order.order_id.0),
            payload: Set(serde_json::to_value(request).context("encode retry payload")?),
            attempts: Set(0),
            last_error: Set(Some(reason.to_owned())),
            created_at: Set(Utc::now()),
            next_attempt_at: Set(next_attempt_at),
            processed_at: Set(None),
            failed_at: Set(None),
        };
        distribution_retries::Entity::insert(job)
            .on_conflict(
                OnConflict::column(distribution_retries::Column::OrderId)
                    .update_columns([
                        distribution_retries::Column::Payload,
                        distribution_retries::Column::Attempts,
                        distribution_retries::Column::LastError,
                        distribution_retries::Column::NextAttemptAt,
                        distribution_retries::Column::ProcessedAt,
                        distribution_retries::Column::FailedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("enqueue distribution retry")?;
        Ok(())
    }

    async fn due(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<RetryJob>, PaymentsServiceError> {
        let models = distribution_retries::Entity::find()
            .filter(distribution_retries::Column::ProcessedAt.is_null())
            .filter(distribution_retries::Column::FailedAt.is_null())
            .filter(distribution_retries::Column::NextAttemptAt.lte(now))
            .order_by_asc(distribution_retries::Column::NextAttemptAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list due distribution retries")?;
        models.into_iter().map(retry_from_model).collect()
    }

    async fn complete(&self, id: Uuid, now: DateTime<Utc>) -> Result<(), PaymentsServiceError> {
        distribution_retries::Entity::update_many()
            .col_expr(distribution_retries::Column::ProcessedAt, Expr::value(Some(now)))
            .filter(distribution_retries::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("complete distribution retry")?;
        Ok(())
    }

    async fn reschedule(
        &self,
        id: Uuid,
        attempts: i32,
        error: &str,
        next_attempt_at: DateTime<Utc>,
    ) -> Result<(), PaymentsServiceError> {
        distribution_retries::Entity::update_many()
            .col_expr(distribution_retries::Column::Attempts, Expr::value(attempts))
            .col_expr(distribution_retries::Column::LastError, Expr::value(error))
            .col_expr(
                distribution_retries::Column::NextAttemptAt,
                Expr::value(next_attempt_at),
            )
            .filter(distribution_retries::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("reschedule distribution retry")?;
        Ok(())
    }

    async fn fail(
        &self,
        id: Uuid,
        attempts: i32,
        error: &str,
        now: DateTime<Utc>,
    ) -> Result<(), PaymentsServiceError> {
        distribution_retries::Entity::update_many()
            .col_expr(distribution_retries::Column::Attempts, Expr::value(attempts))
            .col_expr(distribution_retries::Column::LastError, Expr::value(error))
            .col_expr(distribution_retries::Column::FailedAt, Expr::value(Some(now)))
            .filter(distribution_retries::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("fail distribution retry")?;
        Ok(())
    }
}

fn retry_from_model(model: distribution_retries::Model) -> Result<RetryJob, PaymentsServiceError> {
    Ok(RetryJob {
        id: model.id,
        order_id: OrderId(model.order_id),
        request: serde_json::from_value(model.payload).context("decode retry payload")?,
        attempts: model.attempts,
        last_error: model.last_error,
        created_at: model.created_at,
        next_attempt_at: model.next_attempt_at,
    })
}
