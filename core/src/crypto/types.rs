// ## 📂 File: `src/crypto/types.rs`

use std::fmt;

pub use crate::constants::{BLOCK_LEN, IV_LEN_16, KEY_BITS_256, KEY_LEN_32};

/// Direction of a block cipher transform.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CipherMode {
    Encrypt,
    Decrypt,
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherMode::Encrypt => f.write_str("encrypt"),
            CipherMode::Decrypt => f.write_str("decrypt"),
        }
    }
}

/// Block chaining used by an engine instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChainingMode {
    /// AES-256-CBC, PKCS#7, caller-supplied IV (key-file mode).
    Cbc,
    /// AES-256-ECB, PKCS#7, no IV (password mode).
    Ecb,
}

#[derive(Debug)]
pub enum CryptoError {
    /// A required primitive (cipher, KDF, OS entropy) is unavailable.
    UnsupportedAlgorithm(String),

    /// Requested key length, iteration count or password is not usable.
    InvalidKeySpec(String),

    /// Key length mismatch (must be 32 bytes).
    InvalidKeyLen { expected: usize, actual: usize },

    /// IV length mismatch (must be 16 bytes).
    InvalidIvLen { expected: usize, actual: usize },

    /// Unpadding failed: wrong key, truncated or corrupted ciphertext.
    PaddingOrAuth { mode: ChainingMode, len: usize },
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CryptoError::*;
        match self {
            UnsupportedAlgorithm(msg) =>
                write!(f, "unsupported algorithm: {}", msg),
            InvalidKeySpec(msg) =>
                write!(f, "invalid key spec: {}", msg),
            InvalidKeyLen { expected, actual } =>
                write!(f, "invalid key length: expected={}, actual={}", expected, actual),
            InvalidIvLen { expected, actual } =>
                write!(f, "invalid iv length: expected={}, actual={}", expected, actual),
            PaddingOrAuth { mode, len } =>
                write!(f, "bad padding or wrong key ({:?} over {} bytes)", mode, len),
        }
    }
}

impl std::error::Error for CryptoError {}
