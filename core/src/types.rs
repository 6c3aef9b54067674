use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    archive::ArchiveError,
    crypto::CryptoError,
    keyfile::KeyFileError,
};

/// Result category handed to the front-end for a whole operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Success,
    /// A required cryptographic primitive or entropy source is missing.
    UnsupportedEnvironment,
    /// Wrong key or password, or corrupted ciphertext.
    CryptoFailure,
    /// Bad key spec, empty password or malformed request.
    InvalidInput,
    SourceReadFailure,
    DestinationWriteFailure,
    /// Key file could not be written, read or parsed.
    KeyFileFailure,
    ArchiveCreationFailure,
    /// The progress sink asked to stop between files.
    Cancelled,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::Success => "success",
            Outcome::UnsupportedEnvironment => "unsupported environment",
            Outcome::CryptoFailure => "crypto failure",
            Outcome::InvalidInput => "invalid input",
            Outcome::SourceReadFailure => "source read failure",
            Outcome::DestinationWriteFailure => "destination write failure",
            Outcome::KeyFileFailure => "key file failure",
            Outcome::ArchiveCreationFailure => "archive creation failure",
            Outcome::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Unified operation error covering crypto, key file, archive and file I/O.
/// - `From<T>` impls let `?` lift module errors into the operation layer.
/// - `outcome()` collapses each variant onto the caller-facing taxonomy.
#[derive(Debug)]
pub enum OpError {
    /// Cipher, KDF or entropy source unavailable.
    UnsupportedEnvironment(String),

    /// Bad key spec, password or configuration.
    InvalidInput(String),

    /// Decryption failed (wrong key, corrupted data, padding mismatch) or key/IV shape rejected.
    Crypto(CryptoError),

    /// Input file could not be read.
    SourceRead { path: PathBuf, source: io::Error },

    /// Output file could not be written.
    DestinationWrite { path: PathBuf, source: io::Error },

    /// Key file could not be opened, read or written.
    KeyFile(KeyFileError),

    /// Key file content is not a key record this implementation understands.
    Deserialization(KeyFileError),

    /// Archive target could not be created or finalized.
    ArchiveCreation(ArchiveError),

    /// Source file `index` could not be archived.
    ArchiveEntry { index: usize, source: ArchiveError },
}

impl OpError {
    pub fn outcome(&self) -> Outcome {
        match self {
            OpError::UnsupportedEnvironment(_) => Outcome::UnsupportedEnvironment,
            OpError::InvalidInput(_) => Outcome::InvalidInput,
            OpError::Crypto(_) => Outcome::CryptoFailure,
            OpError::SourceRead { .. } => Outcome::SourceReadFailure,
            OpError::DestinationWrite { .. } => Outcome::DestinationWriteFailure,
            OpError::KeyFile(_) | OpError::Deserialization(_) => Outcome::KeyFileFailure,
            OpError::ArchiveCreation(_) => Outcome::ArchiveCreationFailure,
            OpError::ArchiveEntry { .. } => Outcome::SourceReadFailure,
        }
    }

    /// Index of the failing archive source, if the error came from packing.
    pub fn archive_index(&self) -> Option<usize> {
        match self {
            OpError::ArchiveEntry { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpError::UnsupportedEnvironment(msg) => write!(f, "unsupported environment: {}", msg),
            OpError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            OpError::Crypto(e) => write!(f, "crypto error: {}", e),
            OpError::SourceRead { path, source } =>
                write!(f, "cannot read {}: {}", path.display(), source),
            OpError::DestinationWrite { path, source } =>
                write!(f, "cannot write {}: {}", path.display(), source),
            OpError::KeyFile(e) => write!(f, "key file error: {}", e),
            OpError::Deserialization(e) => write!(f, "key file deserialization error: {}", e),
            OpError::ArchiveCreation(e) => write!(f, "archive creation error: {}", e),
            OpError::ArchiveEntry { index, source } =>
                write!(f, "archive entry #{} error: {}", index, source),
        }
    }
}

impl std::error::Error for OpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OpError::Crypto(e) => Some(e),
            OpError::SourceRead { source, .. } | OpError::DestinationWrite { source, .. } => Some(source),
            OpError::KeyFile(e) | OpError::Deserialization(e) => Some(e),
            OpError::ArchiveCreation(e) | OpError::ArchiveEntry { source: e, .. } => Some(e),
            OpError::UnsupportedEnvironment(_) | OpError::InvalidInput(_) => None,
        }
    }
}

impl From<CryptoError> for OpError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::UnsupportedAlgorithm(msg) => OpError::UnsupportedEnvironment(msg),
            CryptoError::InvalidKeySpec(msg) => OpError::InvalidInput(msg),
            other => OpError::Crypto(other),
        }
    }
}

impl From<KeyFileError> for OpError {
    fn from(e: KeyFileError) -> Self {
        if e.is_deserialization() {
            OpError::Deserialization(e)
        } else {
            OpError::KeyFile(e)
        }
    }
}

impl From<ArchiveError> for OpError {
    fn from(e: ArchiveError) -> Self {
        match e.failed_index() {
            Some(index) => OpError::ArchiveEntry { index, source: e },
            None => OpError::ArchiveCreation(e),
        }
    }
}
