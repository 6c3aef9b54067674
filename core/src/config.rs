//! config.rs
//! Runtime configuration for key derivation and key-file naming.
//!
//! Defaults reproduce the shipped application: default pepper, 65536 PBKDF2
//! rounds, 256-bit keys and the `.KEY` key-file suffix. Any of them can be
//! overridden from JSON, e.g.
//!
//! ```json
//! { "kdf": { "pepper": "000102030405060708090a0b0c0d0e0f", "iterations": 1000 } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_KDF_ITERATIONS, DEFAULT_KEY_FILE_SUFFIX, KEY_BITS_256};
use crate::crypto::{CryptoError, KeyDerivation, Pepper};
use crate::types::OpError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfConfig {
    pub pepper: Pepper,
    pub iterations: u32,
    pub key_bits: u32,
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self {
            pepper: Pepper::default(),
            iterations: DEFAULT_KDF_ITERATIONS,
            key_bits: KEY_BITS_256,
        }
    }
}

impl KdfConfig {
    pub fn validate(&self) -> Result<(), CryptoError> {
        if self.iterations == 0 {
            return Err(CryptoError::InvalidKeySpec("iteration count must be >= 1".into()));
        }
        if self.key_bits != KEY_BITS_256 {
            return Err(CryptoError::InvalidKeySpec(format!(
                "key length must be {} bits, got {}", KEY_BITS_256, self.key_bits
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptrConfig {
    pub kdf: KdfConfig,
    /// Appended to an encrypted file's path to name its key file.
    pub key_file_suffix: String,
}

impl Default for CryptrConfig {
    fn default() -> Self {
        Self {
            kdf: KdfConfig::default(),
            key_file_suffix: DEFAULT_KEY_FILE_SUFFIX.to_string(),
        }
    }
}

impl CryptrConfig {
    pub fn from_json_str(s: &str) -> Result<Self, OpError> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| OpError::InvalidInput(format!("config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, OpError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| OpError::InvalidInput(format!("config {}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), OpError> {
        self.kdf.validate()?;
        if self.key_file_suffix.is_empty() {
            return Err(OpError::InvalidInput("key_file_suffix must not be empty".into()));
        }
        Ok(())
    }

    pub fn key_derivation(&self) -> KeyDerivation {
        KeyDerivation::new(self.kdf.clone())
    }
}
