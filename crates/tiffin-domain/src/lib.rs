//! Domain types shared across Tiffin services.
//!
//! Pure types and arithmetic only: no I/O, no web or database dependencies.

pub mod commission;
pub mod id;
pub mod money;
pub mod pagination;
pub mod recipient;
