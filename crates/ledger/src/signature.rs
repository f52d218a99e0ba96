//! Signature verification
//!
//! The server only ever verifies; signing keys never leave the client. The
//! verification outcome is a plain bool: malformed key or signature bytes
//! read as "does not verify", never as a fatal error.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::error::BankError;

/// Parse a hex-encoded 32-byte Ed25519 public key.
pub fn parse_verifying_key(key_hex: &str) -> Result<VerifyingKey, BankError> {
    let bytes = hex::decode(key_hex)
        .map_err(|e| BankError::InvalidKey(format!("bad hex: {e}")))?;

    let array: [u8; 32] = bytes
        .try_into()
        .map_err(|_| BankError::InvalidKey("key must be 32 bytes".to_string()))?;

    VerifyingKey::from_bytes(&array).map_err(|e| BankError::InvalidKey(e.to_string()))
}

/// Check a hex-encoded signature over the canonical claims bytes.
///
/// Deterministic for a given (key, message, signature) triple. Returns
/// false for malformed hex, wrong-length signatures, and signatures that
/// simply do not verify.
pub fn verify_transfer(key: &VerifyingKey, message: &[u8], signature_hex: &str) -> bool {
    let Ok(bytes) = hex::decode(signature_hex) else {
        return false;
    };

    let Ok(array) = <[u8; 64]>::try_from(bytes) else {
        return false;
    };

    key.verify(message, &Signature::from_bytes(&array)).is_ok()
}
