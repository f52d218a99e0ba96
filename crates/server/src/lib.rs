//! SignBank server
//!
//! Owns the locking boundary around the bank: one task per client
//! connection, all sharing a single `Bank` behind a `tokio::sync::RwLock`.
//! Signature verification runs outside the lock; settlement and history
//! append run inside one write-lock critical section.

pub mod dispatch;
pub mod engine;
pub mod server;
pub mod state;

pub use state::AppState;
