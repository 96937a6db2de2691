use chrono::{DateTime, Utc};

use crate::domain::repository::{
    DistributionRepository, DistributionRetryQueue, PayoutGateway, PayoutRecordRepository,
    RecipientAccountRepository,
};
use crate::domain::types::{DistributeRequest, RetryJob, RetryReport};
use crate::error::PaymentsServiceError;
use crate::usecase::distribute::DistributePaymentUseCase;

/// Longest wait between two attempts of the same job.
const MAX_BACKOFF_SECS: i64 = 6 * 60 * 60;

/// `base * 2^(attempts - 1)`, capped at six hours.
pub fn backoff(base: chrono::Duration, attempts: i32) -> chrono::Duration {
    let exponent = attempts.saturating_sub(1).clamp(0, 20) as u32;
    let secs = base.num_seconds().max(1).saturating_mul(1_i64 << exponent);
    chrono::Duration::seconds(secs.min(MAX_BACKOFF_SECS))
}

// ── ScheduleRetry ────────────────────────────────────────────────────────────

pub struct ScheduleRetryUseCase<Q: DistributionRetryQueue> {
    pub queue: Q,
    pub delay: chrono::Duration,
}

impl<Q: DistributionRetryQueue> ScheduleRetryUseCase<Q> {
    pub async fn execute(
        &self,
        request: &DistributeRequest,
        reason: &str,
    ) -> Result<(), PaymentsServiceError> {
        self.queue
            .enqueue(request, reason, Utc::now() + self.delay)
            .await?;
        tracing::info!(
            order_id = %request.order.order_id,
            reason,
            "distribution queued for retry"
        );
        Ok(())
    }
}

// ── ProcessRetries ───────────────────────────────────────────────────────────

/// Runs due retry jobs through the distribution use case.
pub struct ProcessRetriesUseCase<Q, A, P, D, G>
where
    Q: DistributionRetryQueue,
    A: RecipientAccountRepository,
    P: PayoutRecordRepository,
    D: DistributionRepository,
    G: PayoutGateway,
{
    pub queue: Q,
    pub distribute: DistributePaymentUseCase<A, P, D, G>,
    pub max_attempts: i32,
    pub base_backoff: chrono::Duration,
    pub batch_size: u64,
}

impl<Q, A, P, D, G> ProcessRetriesUseCase<Q, A, P, D, G>
where
    Q: DistributionRetryQueue,
    A: RecipientAccountRepository,
    P: PayoutRecordRepository,
    D: DistributionRepository,
    G: PayoutGateway,
{
    pub async fn execute(&self, now: DateTime<Utc>) -> Result<RetryReport, PaymentsServiceError> {
        let jobs = self.queue.due(now, self.batch_size).await?;
        let mut report = RetryReport::default();
        for job in jobs {
            let order_id = job.order_id;
            let error = match self.distribute.execute(job.request.clone()).await {
                Ok(result) if !result.needs_retry() => {
                    self.queue.complete(job.id, now).await?;
                    tracing::info!(
                        order_id = %order_id,
                        attempts = job.attempts + 1,
                        status = result.status.as_str(),
                        "retried distribution settled"
                    );
                    report.completed += 1;
                    continue;
                }
                Ok(result) => result
                    .error_summary()
                    .unwrap_or_else(|| "distribution incomplete".to_owned()),
                Err(e) => e.detail(),
            };
            if self.give_up_or_reschedule(&job, &error, now).await? {
                report.failed += 1;
            } else {
                report.rescheduled += 1;
            }
        }
        Ok(report)
    }

    /// Returns `true` when the job ran out of attempts.
    async fn give_up_or_reschedule(
        &self,
        job: &RetryJob,
        error: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, PaymentsServiceError> {
        let attempts = job.attempts + 1;
        if attempts >= self.max_attempts {
            self.queue.fail(job.id, attempts, error, now).await?;
            tracing::error!(
                order_id = %job.order_id,
                attempts,
                error,
                "distribution retry exhausted"
            );
            return Ok(true);
        }
        let next_attempt_at = now + backoff(self.base_backoff, attempts);
        self.queue
            .reschedule(job.id, attempts, error, next_attempt_at)
            .await?;
        tracing::warn!(
            order_id = %job.order_id,
            attempts,
            error,
            next_attempt_at = %next_attempt_at,
            "distribution retry rescheduled"
        );
        Ok(false)
    }
}
