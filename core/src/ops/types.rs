//! ops/types.rs
//! Immutable request structs, progress sink and batch report.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::telemetry::TelemetrySnapshot;
use crate::types::{OpError, Outcome};

/// How encryption obtains its key.
#[derive(Clone, PartialEq, Eq)]
pub enum KeyMode {
    /// Fresh random key + IV per output, saved next to it as a key file (CBC).
    GeneratedKey,
    /// Key derived from the password (ECB, no IV, nothing persisted).
    Password(String),
}

/// How decryption obtains its key.
#[derive(Clone, PartialEq, Eq)]
pub enum DecryptKey {
    /// `Some(path)`: one key file for every input.
    /// `None`: each input uses its own `<input><suffix>` key file.
    KeyFile(Option<PathBuf>),
    Password(String),
}

impl fmt::Debug for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyMode::GeneratedKey => f.write_str("GeneratedKey"),
            KeyMode::Password(_) => f.write_str("Password(<redacted>)"),
        }
    }
}

impl fmt::Debug for DecryptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecryptKey::KeyFile(path) => f.debug_tuple("KeyFile").field(path).finish(),
            DecryptKey::Password(_) => f.write_str("Password(<redacted>)"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptRequest {
    /// Files to encrypt in place, processed in order.
    pub paths: Vec<PathBuf>,
    /// Pack `paths` into this archive first and encrypt only the archive.
    pub compress: Option<PathBuf>,
    pub key_mode: KeyMode,
}

impl EncryptRequest {
    pub fn new(paths: Vec<PathBuf>, key_mode: KeyMode) -> Self {
        Self { paths, compress: None, key_mode }
    }

    pub fn with_archive(mut self, archive_path: impl Into<PathBuf>) -> Self {
        self.compress = Some(archive_path.into());
        self
    }

    pub fn validate(&self) -> Result<(), OpError> {
        validate_password(match &self.key_mode {
            KeyMode::Password(p) => Some(p),
            KeyMode::GeneratedKey => None,
        })?;
        reject_duplicates(&self.paths)?;
        if let Some(archive) = &self.compress {
            if self.paths.is_empty() {
                return Err(OpError::InvalidInput(format!(
                    "no files to pack into {}", archive.display()
                )));
            }
            let archive_id = path_identity(archive);
            if self.paths.iter().any(|p| path_identity(p) == archive_id) {
                return Err(OpError::InvalidInput(format!(
                    "archive {} is also listed as an input", archive.display()
                )));
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecryptRequest {
    /// Files to decrypt in place, processed in order.
    pub paths: Vec<PathBuf>,
    pub key_mode: DecryptKey,
}

impl DecryptRequest {
    pub fn new(paths: Vec<PathBuf>, key_mode: DecryptKey) -> Self {
        Self { paths, key_mode }
    }

    pub fn validate(&self) -> Result<(), OpError> {
        validate_password(match &self.key_mode {
            DecryptKey::Password(p) => Some(p),
            DecryptKey::KeyFile(_) => None,
        })?;
        reject_duplicates(&self.paths)
    }
}

/// Canonical form when the path resolves, the path as given otherwise.
fn path_identity(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Each input may appear once. Paths are compared by `path_identity`, so
/// `dir/a` and `dir/sub/../a` collide when both resolve.
fn reject_duplicates(paths: &[PathBuf]) -> Result<(), OpError> {
    let mut seen: HashMap<PathBuf, usize> = HashMap::with_capacity(paths.len());
    for (index, path) in paths.iter().enumerate() {
        if let Some(first) = seen.insert(path_identity(path), index) {
            return Err(OpError::InvalidInput(format!(
                "{} is listed twice (#{} and #{})", path.display(), first, index
            )));
        }
    }
    Ok(())
}

fn validate_password(password: Option<&String>) -> Result<(), OpError> {
    match password {
        Some(p) if p.is_empty() => Err(OpError::InvalidInput("password must not be empty".into())),
        _ => Ok(()),
    }
}

/// Caller-owned progress notifications.
///
/// `on_progress` fires after each completed item. `should_continue` is polled
/// before the next item starts; returning `false` ends the batch as `Cancelled`.
/// A file transform that has started always runs to completion.
pub trait ProgressSink {
    fn on_progress(&mut self, done: usize, total: usize);

    fn should_continue(&mut self) -> bool {
        true
    }
}

/// Sink that ignores progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&mut self, _done: usize, _total: usize) {}
}

impl<F: FnMut(usize, usize)> ProgressSink for F {
    fn on_progress(&mut self, done: usize, total: usize) {
        self(done, total)
    }
}

/// Result of `encrypt_files` / `decrypt_files`.
#[derive(Debug)]
pub struct BatchReport {
    pub outcome: Outcome,
    /// Zero-based index of the input that failed (per-file failure or archive entry).
    pub failed_index: Option<usize>,
    /// Underlying failure, `None` on success or cancellation.
    pub error: Option<OpError>,
    /// Items completed before the batch ended.
    pub completed: usize,
    pub telemetry: TelemetrySnapshot,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    pub(crate) fn success(completed: usize, telemetry: TelemetrySnapshot) -> Self {
        Self { outcome: Outcome::Success, failed_index: None, error: None, completed, telemetry }
    }

    pub(crate) fn cancelled(completed: usize, telemetry: TelemetrySnapshot) -> Self {
        Self { outcome: Outcome::Cancelled, failed_index: None, error: None, completed, telemetry }
    }

    pub(crate) fn failed(
        error: OpError,
        failed_index: Option<usize>,
        completed: usize,
        telemetry: TelemetrySnapshot,
    ) -> Self {
        Self { outcome: error.outcome(), failed_index, error: Some(error), completed, telemetry }
    }
}

