pub mod account;
pub mod distribution;
pub mod payout;
pub mod webhook;
