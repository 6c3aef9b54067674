//! crypto/key_material.rs
//! Generated AES-256 key plus CBC IV for key-file mode.
//!
//! Security notes:
//! - One `KeyMaterial` per encryption; never reuse it for a second file.
//! - No Clone/Copy; bytes are wiped on drop.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::types::{CryptoError, IV_LEN_16, KEY_LEN_32};

#[derive(Zeroize, ZeroizeOnDrop, PartialEq, Eq)]
pub struct KeyMaterial {
    key: [u8; KEY_LEN_32],
    iv: [u8; IV_LEN_16],
}

impl KeyMaterial {
    /// Fresh random key and IV from the OS CSPRNG.
    ///
    /// Errors:
    /// - `UnsupportedAlgorithm` if the entropy source cannot be read.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut material = Self { key: [0u8; KEY_LEN_32], iv: [0u8; IV_LEN_16] };
        OsRng
            .try_fill_bytes(&mut material.key)
            .map_err(|e| CryptoError::UnsupportedAlgorithm(format!("OS RNG unavailable: {}", e)))?;
        OsRng
            .try_fill_bytes(&mut material.iv)
            .map_err(|e| CryptoError::UnsupportedAlgorithm(format!("OS RNG unavailable: {}", e)))?;
        Ok(material)
    }

    pub fn from_parts(key: [u8; KEY_LEN_32], iv: [u8; IV_LEN_16]) -> Self {
        Self { key, iv }
    }

    pub fn key(&self) -> &[u8; KEY_LEN_32] {
        &self.key
    }

    pub fn iv(&self) -> &[u8; IV_LEN_16] {
        &self.iv
    }

    /// Short public identifier: first 4 bytes of SHA-256(key || iv), hex.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.key);
        hasher.update(self.iv);
        hex::encode(&hasher.finalize()[..4])
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("fingerprint", &self.fingerprint())
            .finish_non_exhaustive()
    }
}
