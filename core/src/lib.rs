//! cryptr-core
//!
//! AES-256 file encryption with generated key files or passwords, plus an
//! optional ZIP packing step before encryption.
//! Whole files are processed in memory. Synchronous, no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;

// Building blocks
pub mod crypto;
pub mod keyfile;
pub mod compression;
pub mod archive;
pub mod telemetry;

// File operations
pub mod ops;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::{CryptrConfig, KdfConfig};
    pub use crate::crypto::{CipherMode, KeyDerivation, KeyMaterial, Pepper};
    pub use crate::ops::{
        cipher_with_password, decrypt_with_key, encrypt_with_key, BatchReport, Cryptr,
        DecryptKey, DecryptRequest, EncryptRequest, KeyMode, NoProgress, ProgressSink,
    };
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::{OpError, Outcome};
}
