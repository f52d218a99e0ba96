//! SignBank client library
//!
//! Key custody and the request/response exchange. Signing keys are
//! generated and stored here, on the client side only; the server never
//! sees anything but the public half.

pub mod client;
pub mod keystore;

pub use client::{BankClient, ClientError};
pub use keystore::{Keystore, KeystoreError};
