//! sea-orm entities for the payments service.

pub mod distribution_retries;
pub mod order_distributions;
pub mod payout_records;
pub mod recipient_accounts;
