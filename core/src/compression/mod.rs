//! compression/mod.rs
//! Whole-entry compression codecs used by the archive writer and reader.
//!
//! Notes:
//! - Codec ids are the ZIP method numbers, so the registry maps wire values directly.
//! - Each call handles one complete entry; there is no cross-entry state.

pub mod constants;
pub mod types;
pub mod registry;
pub mod codecs;

pub use constants::*;
pub use types::*;
pub use registry::*;
