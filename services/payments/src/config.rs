use std::time::Duration;

use tiffin_domain::id::RecipientId;

/// Payments service configuration loaded from environment variables.
#[derive(Debug)]
pub struct PaymentsConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3120). Env var: `PAYMENTS_PORT`.
    pub payments_port: u16,
    /// TCP port for the gRPC server (default 50061). Env var: `PAYMENTS_GRPC_PORT`.
    pub payments_grpc_port: u16,
    /// Admin account that receives the platform share. Env var: `PLATFORM_ACCOUNT_ID`.
    pub platform_account_id: RecipientId,
    /// Base URL of the payout gateway API.
    pub payout_api_url: String,
    pub payout_api_key_id: String,
    pub payout_api_key_secret: String,
    /// Business account payouts are debited from.
    pub payout_source_account: String,
    /// Bound on one create-payout call (default 10s). Env var: `PAYOUT_TIMEOUT_MS`.
    pub payout_timeout: Duration,
    /// Shared secret for `x-payout-signature`.
    pub payout_webhook_secret: String,
    /// Claim lease per distribution call (default 120s). Env var: `DISTRIBUTION_LEASE_SECS`.
    pub distribution_lease: Duration,
    /// Retry worker poll interval and base backoff (default 30s).
    /// Env var: `RETRY_POLL_INTERVAL_SECS`.
    pub retry_poll_interval: Duration,
    /// Attempts before a retry job is marked failed (default 5). Env var: `RETRY_MAX_ATTEMPTS`.
    pub retry_max_attempts: i32,
}

impl PaymentsConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            payments_port: env_or("PAYMENTS_PORT", 3120),
            payments_grpc_port: env_or("PAYMENTS_GRPC_PORT", 50061),
            platform_account_id: std::env::var("PLATFORM_ACCOUNT_ID")
                .expect("PLATFORM_ACCOUNT_ID")
                .parse()
                .expect("PLATFORM_ACCOUNT_ID must be a UUID"),
            payout_api_url: std::env::var("PAYOUT_API_URL").expect("PAYOUT_API_URL"),
            payout_api_key_id: std::env::var("PAYOUT_API_KEY_ID").expect("PAYOUT_API_KEY_ID"),
            payout_api_key_secret: std::env::var("PAYOUT_API_KEY_SECRET")
                .expect("PAYOUT_API_KEY_SECRET"),
            payout_source_account: std::env::var("PAYOUT_SOURCE_ACCOUNT")
                .expect("PAYOUT_SOURCE_ACCOUNT"),
            payout_timeout: Duration::from_millis(env_or("PAYOUT_TIMEOUT_MS", 10_000)),
            payout_webhook_secret: std::env::var("PAYOUT_WEBHOOK_SECRET")
                .expect("PAYOUT_WEBHOOK_SECRET"),
            distribution_lease: Duration::from_secs(env_or("DISTRIBUTION_LEASE_SECS", 120)),
            retry_poll_interval: Duration::from_secs(env_or("RETRY_POLL_INTERVAL_SECS", 30)),
            retry_max_attempts: env_or("RETRY_MAX_ATTEMPTS", 5),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    parse_or(std::env::var(name).ok().as_deref(), default)
}

fn parse_or<T: std::str::FromStr>(value: Option<&str>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}
