// ## 📂 File: `src/keyfile/types.rs`

//! keyfile/types.rs
//! Key file record layout and errors.
//!
//! Layout (64 bytes, little-endian):
//!
//! | offset | size | field              |
//! |--------|------|--------------------|
//! | 0      | 4    | magic `CKF1`       |
//! | 4      | 2    | version            |
//! | 6      | 2    | key length (32)    |
//! | 8      | 2    | iv length (16)     |
//! | 10     | 2    | flags (zero in v1) |
//! | 12     | 32   | key                |
//! | 44     | 16   | iv                 |
//! | 60     | 4    | CRC32 of 0..60     |

use std::fmt;
use std::io;
use std::path::PathBuf;
use num_enum::TryFromPrimitive;

use crate::constants::KEY_FILE_V1;
use crate::utils::{enum_name_or_hex, fmt_bytes};

/// Fixed key file size in bytes.
pub const KEY_FILE_LEN_V1: usize = 64;
/// Bytes covered by the trailing CRC32.
pub const KEY_FILE_CRC_SPAN: usize = KEY_FILE_LEN_V1 - 4;

#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum KeyFileVersion {
    V1 = KEY_FILE_V1,
}

impl KeyFileVersion {
    pub fn verify(raw: u16) -> Result<Self, KeyFileError> {
        Self::try_from_primitive(raw).map_err(|_| KeyFileError::UnknownVersion { raw })
    }
}

#[derive(Debug)]
pub enum KeyFileError {
    /// Record length differs from the fixed layout (truncated or trailing data).
    BadLength { have: usize, need: usize },

    /// Not a key file (expected "CKF1").
    InvalidMagic { have: [u8; 4], need: [u8; 4] },

    /// Written by a newer or foreign implementation.
    UnknownVersion { raw: u16 },

    /// Declared key or IV length does not match AES-256/CBC.
    FieldLength { field: &'static str, have: u16, need: u16 },

    /// Reserved flag bits set.
    FlagsNonZero { flags: u16 },

    /// Stored CRC32 does not match the record.
    InvalidCrc32 { have: u32, need: u32 },

    /// Opening, reading or writing the key file failed.
    Io { path: PathBuf, source: io::Error },
}

impl KeyFileError {
    /// True for structural mismatches, false for filesystem failures.
    pub fn is_deserialization(&self) -> bool {
        !matches!(self, KeyFileError::Io { .. })
    }
}

impl fmt::Display for KeyFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use KeyFileError::*;
        match self {
            BadLength { have, need } =>
                write!(f, "key file length mismatch: {} != {}", have, need),
            InvalidMagic { have, need } =>
                write!(f, "invalid key file magic: expected {}, got {}", fmt_bytes(need), fmt_bytes(have)),
            UnknownVersion { raw } =>
                write!(f, "unknown key file version: {}", enum_name_or_hex::<KeyFileVersion>(*raw)),
            FieldLength { field, have, need } =>
                write!(f, "invalid {} length in key file: {} != {}", field, have, need),
            FlagsNonZero { flags } =>
                write!(f, "reserved key file flags set: 0x{:04x}", flags),
            InvalidCrc32 { have, need } =>
                write!(f, "key file checksum mismatch: stored 0x{:08x}, computed 0x{:08x}", have, need),
            Io { path, source } =>
                write!(f, "key file I/O error ({}): {}", path.display(), source),
        }
    }
}

impl std::error::Error for KeyFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KeyFileError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
