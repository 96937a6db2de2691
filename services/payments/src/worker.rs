use std::time::Duration;

use chrono::Utc;
use tokio::time::MissedTickBehavior;

use crate::domain::types::RetryReport;
use crate::state::AppState;
use crate::usecase::retry::ProcessRetriesUseCase;

/// Jobs pulled per tick.
const RETRY_BATCH_SIZE: u64 = 50;

/// Poll the retry queue forever. `poll_interval` doubles as the base backoff.
pub async fn run_retry_worker(state: AppState, poll_interval: Duration, max_attempts: i32) {
    let base_backoff =
        chrono::Duration::from_std(poll_interval).unwrap_or(chrono::Duration::seconds(30));
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tracing::info!(
        poll_interval_secs = poll_interval.as_secs(),
        max_attempts,
        "distribution retry worker started"
    );

    loop {
        ticker.tick().await;
        let uc = ProcessRetriesUseCase {
            queue: state.retry_queue(),
            distribute: state.distribute_usecase(),
            max_attempts,
            base_backoff,
            batch_size: RETRY_BATCH_SIZE,
        };
        match uc.execute(Utc::now()).await {
            Ok(report) if report == RetryReport::default() => {}
            Ok(report) => tracing::info!(
                completed = report.completed,
                rescheduled = report.rescheduled,
                failed = report.failed,
                "distribution retry batch processed"
            ),
            Err(e) => tracing::error!(error = %e.detail(), "distribution retry batch failed"),
        }
    }
}
