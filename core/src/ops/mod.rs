//! ops/mod.rs
//! File-level operations consumed by a front-end.
//!
//! - `file`: single-file entry points (key file or password).
//! - `batch`: ordered multi-file runs with progress and optional archive step.
//! - `context`: `Cryptr`, the configured entry point.
//!
//! All operations are synchronous and keep no state between calls.

pub mod types;
pub mod io;
pub mod file;
pub mod batch;
pub mod context;

pub use types::*;
pub use file::{cipher_with_password, decrypt_with_key, encrypt_with_key};
pub use batch::{decrypt_files, encrypt_files};
pub use context::Cryptr;
