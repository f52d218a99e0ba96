//! On-disk key custody
//!
//! One file per account name under the keystore root, holding the
//! hex-encoded 32-byte Ed25519 seed. Present key file means the account was
//! registered from this machine before.

use ed25519_dalek::SigningKey;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeystoreError {
    #[error("keystore io error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed key file for {0}")]
    Malformed(String),
}

/// Directory of signing-key seeds, one per account name.
pub struct Keystore {
    root: PathBuf,
}

impl Keystore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn key_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.key"))
    }

    /// Whether a key already exists for this account name.
    pub fn contains(&self, name: &str) -> bool {
        self.key_path(name).exists()
    }

    /// Generate a fresh keypair and persist its seed.
    pub fn generate(&self, name: &str) -> Result<SigningKey, KeystoreError> {
        fs::create_dir_all(&self.root)?;

        let key = SigningKey::generate(&mut rand::thread_rng());
        fs::write(self.key_path(name), hex::encode(key.to_bytes()))?;
        Ok(key)
    }

    /// Load the signing key for an account.
    pub fn load(&self, name: &str) -> Result<SigningKey, KeystoreError> {
        let raw = fs::read_to_string(self.key_path(name))?;

        let bytes = hex::decode(raw.trim())
            .map_err(|_| KeystoreError::Malformed(name.to_string()))?;
        let seed: [u8; 32] = bytes
            .try_into()
            .map_err(|_| KeystoreError::Malformed(name.to_string()))?;

        Ok(SigningKey::from_bytes(&seed))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
