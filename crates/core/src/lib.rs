//! SignBank core types
//!
//! The only type that lives here is `Amount`: every balance and transfer
//! value in the system is an `Amount`, so "balance can never be negative"
//! is enforced by construction rather than by scattered checks.

pub mod amount;

pub use amount::{Amount, AmountError};
