//! keyfile/mod.rs
//! Persistent storage of generated key material.
//!
//! Notes:
//! - Fixed-size, versioned record (64 bytes) with magic and CRC32, so foreign
//!   or damaged files are rejected instead of yielding a wrong key.
//! - Little-endian for every multi-byte integer.

pub mod types;
pub mod encode;
pub mod decode;
pub mod store;

pub use types::*;
pub use encode::*;
pub use decode::*;
pub use store::*;
