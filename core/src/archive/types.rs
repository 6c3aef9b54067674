//! archive/types.rs
//! ZIP record signatures, entry types and archive errors.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::compression::{CompressionCodec, CompressionError};

/// ZIP record signatures (APPNOTE 4.3).
pub mod signatures {
    pub const LOCAL_FILE_HEADER: u32 = 0x0403_4b50;
    pub const CENTRAL_DIRECTORY: u32 = 0x0201_4b50;
    pub const END_OF_CENTRAL_DIRECTORY: u32 = 0x0605_4b50;
}

/// "Version needed to extract": 2.0 (deflate).
pub const ZIP_VERSION_20: u16 = 20;
/// General purpose flag bit 11: file name is UTF-8.
pub const FLAG_UTF8_NAME: u16 = 0x0800;

pub const LOCAL_HEADER_LEN: usize = 30;
pub const CENTRAL_HEADER_LEN: usize = 46;
pub const EOCD_LEN: usize = 22;
/// Entry count limit without ZIP64.
pub const MAX_ENTRIES: usize = u16::MAX as usize;

/// One decoded archive member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub data: Vec<u8>,
}

/// Central directory record kept by the writer until `finish`.
#[derive(Debug, Clone)]
pub struct CentralRecord {
    pub name: String,
    pub codec: CompressionCodec,
    pub dos_time: u16,
    pub dos_date: u16,
    pub crc32: u32,
    pub compressed_size: u32,
    pub uncompressed_size: u32,
    pub local_header_offset: u32,
}

/// Result of a successful `pack`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackReport {
    /// Entries listed in the central directory.
    pub entries: usize,
    /// Earlier entries superseded by a later file with the same base name.
    pub replaced: usize,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

#[derive(Debug)]
pub enum ArchiveError {
    /// Archive target could not be created or finalized.
    Creation { path: PathBuf, source: io::Error },

    /// Source file `index` could not be read or added. Entries before it were kept.
    Entry { index: usize, path: PathBuf, source: io::Error },

    /// Archive could not be opened for reading.
    Read { path: PathBuf, source: io::Error },

    /// Structure is not a ZIP archive this reader understands.
    Format(String),

    /// An entry failed to decompress or verify.
    Compression { name: String, source: CompressionError },
}

impl ArchiveError {
    /// Zero-based index of the failing source file, if this is a per-file failure.
    pub fn failed_index(&self) -> Option<usize> {
        match self {
            ArchiveError::Entry { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ArchiveError::*;
        match self {
            Creation { path, source } =>
                write!(f, "cannot create archive {}: {}", path.display(), source),
            Entry { index, path, source } =>
                write!(f, "cannot archive file #{} ({}): {}", index, path.display(), source),
            Read { path, source } =>
                write!(f, "cannot read archive {}: {}", path.display(), source),
            Format(msg) =>
                write!(f, "malformed archive: {}", msg),
            Compression { name, source } =>
                write!(f, "archive entry {:?}: {}", name, source),
        }
    }
}

impl std::error::Error for ArchiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArchiveError::Creation { source, .. }
            | ArchiveError::Entry { source, .. }
            | ArchiveError::Read { source, .. } => Some(source),
            ArchiveError::Compression { source, .. } => Some(source),
            ArchiveError::Format(_) => None,
        }
    }
}
