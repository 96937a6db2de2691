pub mod distribute;
pub mod query;
pub mod retry;
pub mod transfer;
pub mod webhook;
