// ## src/crypto/kdf.rs

//! crypto/kdf.rs
//! PBKDF2-HMAC-SHA256 password-to-key derivation.
//!
//! Design:
//! - PBKDF2(password, salt = pepper, iterations) -> 32-byte AES key
//! - Pepper and iteration count come from `KdfConfig`, never from a static.
//!
//! Security notes:
//! - The pepper is application-wide, not per file. Identical password + plaintext
//!   therefore yields identical ciphertext in password mode.

use std::fmt;

use hmac::Hmac;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::KdfConfig;
use crate::constants::{DEFAULT_PEPPER, PEPPER_LEN};
use crate::crypto::types::{CryptoError, KEY_BITS_256, KEY_LEN_32};

/// Application secret used as the PBKDF2 salt.
#[derive(Clone, PartialEq, Eq)]
pub struct Pepper([u8; PEPPER_LEN]);

impl Pepper {
    pub const fn new(bytes: [u8; PEPPER_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PEPPER_LEN] {
        &self.0
    }

    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let raw = hex::decode(s)
            .map_err(|e| CryptoError::InvalidKeySpec(format!("pepper is not hex: {}", e)))?;
        let bytes: [u8; PEPPER_LEN] = raw.as_slice().try_into().map_err(|_| {
            CryptoError::InvalidKeySpec(format!("pepper must be {} bytes, got {}", PEPPER_LEN, raw.len()))
        })?;
        Ok(Self(bytes))
    }
}

impl Default for Pepper {
    fn default() -> Self {
        Self(DEFAULT_PEPPER)
    }
}

impl fmt::Debug for Pepper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pepper(..)")
    }
}

impl Serialize for Pepper {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Pepper {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Pepper::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Password-derived AES-256 key. Lives only for one cipher call.
#[derive(Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct DerivedKey([u8; KEY_LEN_32]);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_LEN_32] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Summary: Derive a 256-bit key from `password` with PBKDF2-HMAC-SHA256.
/// - `pepper` is the salt, `iterations` the round count.
/// - Same inputs always produce the same key.
///
/// Errors:
/// - `InvalidKeySpec` for `key_bits != 256`, zero iterations or an empty password.
pub fn derive_key(
    password: &str,
    pepper: &Pepper,
    iterations: u32,
    key_bits: u32,
) -> Result<DerivedKey, CryptoError> {
    if key_bits != KEY_BITS_256 {
        return Err(CryptoError::InvalidKeySpec(format!(
            "key length must be {} bits, got {}", KEY_BITS_256, key_bits
        )));
    }
    if iterations == 0 {
        return Err(CryptoError::InvalidKeySpec("iteration count must be >= 1".into()));
    }
    if password.is_empty() {
        return Err(CryptoError::InvalidKeySpec("password must not be empty".into()));
    }

    let mut key = DerivedKey([0u8; KEY_LEN_32]);
    pbkdf2::pbkdf2::<Hmac<Sha256>>(password.as_bytes(), pepper.as_bytes(), iterations, &mut key.0)
        .map_err(|e| CryptoError::UnsupportedAlgorithm(format!("PBKDF2-HMAC-SHA256 failed: {}", e)))?;
    Ok(key)
}

/// Key derivation bound to one configuration (pepper, rounds, key size).
#[derive(Clone, Debug)]
pub struct KeyDerivation {
    config: KdfConfig,
}

impl KeyDerivation {
    pub fn new(config: KdfConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KdfConfig {
        &self.config
    }

    #[inline]
    pub fn derive(&self, password: &str) -> Result<DerivedKey, CryptoError> {
        derive_key(password, &self.config.pepper, self.config.iterations, self.config.key_bits)
    }
}

impl Default for KeyDerivation {
    fn default() -> Self {
        Self::new(KdfConfig::default())
    }
}
