//! archive/mod.rs
//! Multi-file ZIP packing ahead of encryption.
//!
//! Notes:
//! - Output is a plain PKWARE ZIP (stored/deflate, CRC32, UTF-8 names), readable
//!   by unzip, 7z and similar tools.
//! - Entry names are base file names. Same-named sources from different
//!   directories collide and the last one wins.
//! - `unpack` is an in-memory reader for verification; extracting to disk is
//!   left to the caller.

pub mod types;
pub mod writer;
pub mod reader;
pub mod pack;

pub use types::*;
pub use writer::*;
pub use reader::*;
pub use pack::*;
