//! ops/batch.rs
//! Multi-file encrypt/decrypt with progress, cancellation and first-failure stop.
//!
//! Notes:
//! - Files are processed in input order, one at a time, in place.
//! - The batch stops at the first failure and reports its index. Outputs of
//!   earlier items stay on disk.
//! - In compress mode the inputs are packed first and only the archive is
//!   encrypted; progress is then reported as two steps.

use std::path::Path;

use crate::archive::pack;
use crate::crypto::{CipherMode, DerivedKey, KeyMaterial};
use crate::ops::context::Cryptr;
use crate::ops::file::{
    cipher_file_with_derived, decrypt_file_with_material, derive, encrypt_file_generated,
    load_material, Tracker,
};
use crate::ops::types::{BatchReport, DecryptKey, DecryptRequest, EncryptRequest, KeyMode, ProgressSink};
use crate::telemetry::{Stage, TelemetrySnapshot};
use crate::types::OpError;

/// Encryption key source, resolved once per batch.
enum EncryptKey {
    Generated,
    Derived(DerivedKey),
}

/// Decryption key source, resolved once per batch.
enum DecryptSource {
    Shared(KeyMaterial),
    PerFileKeyFile,
    Derived(DerivedKey),
}

struct BatchRun<'p> {
    tracker: Tracker,
    total: usize,
    completed: usize,
    progress: &'p mut dyn ProgressSink,
}

impl<'p> BatchRun<'p> {
    fn new(total: usize, progress: &'p mut dyn ProgressSink) -> Self {
        Self { tracker: Tracker::default(), total, completed: 0, progress }
    }

    fn advance(&mut self) {
        self.completed += 1;
        self.progress.on_progress(self.completed, self.total);
    }

    /// Close the timer and emit the snapshot as JSON at debug level.
    fn snapshot(&mut self) -> TelemetrySnapshot {
        let snapshot = self.tracker.snapshot();
        if log::log_enabled!(log::Level::Debug) {
            match snapshot.to_json() {
                Ok(json) => log::debug!(
                    "batch telemetry ({:?} in stages): {}", snapshot.total_stage_time(), json
                ),
                Err(e) => log::debug!("batch telemetry not serializable: {}", e),
            }
        }
        snapshot
    }

    fn success(mut self) -> BatchReport {
        let telemetry = self.snapshot();
        BatchReport::success(self.completed, telemetry)
    }

    fn cancelled(mut self) -> BatchReport {
        log::info!("batch cancelled after {} of {} item(s)", self.completed, self.total);
        let telemetry = self.snapshot();
        BatchReport::cancelled(self.completed, telemetry)
    }

    fn failed(mut self, error: OpError, index: Option<usize>) -> BatchReport {
        match index {
            Some(i) => log::warn!("batch stopped at item #{}: {}", i, error),
            None => log::warn!("batch failed: {}", error),
        }
        let telemetry = self.snapshot();
        BatchReport::failed(error, index, self.completed, telemetry)
    }
}

fn encrypt_one(
    cryptr: &Cryptr,
    key: &EncryptKey,
    path: &Path,
    t: &mut Tracker,
) -> Result<(), OpError> {
    match key {
        EncryptKey::Generated => encrypt_file_generated(path, path, &cryptr.key_file_for(path), t),
        EncryptKey::Derived(k) => cipher_file_with_derived(k, path, path, CipherMode::Encrypt, t),
    }
}

fn decrypt_one(
    cryptr: &Cryptr,
    key: &DecryptSource,
    path: &Path,
    t: &mut Tracker,
) -> Result<(), OpError> {
    match key {
        DecryptSource::Derived(k) => cipher_file_with_derived(k, path, path, CipherMode::Decrypt, t),
        DecryptSource::Shared(material) => decrypt_file_with_material(material, path, path, t),
        DecryptSource::PerFileKeyFile => {
            let material = load_material(&cryptr.key_file_for(path), t)?;
            decrypt_file_with_material(&material, path, path, t)
        }
    }
}

/// 🔐 Encrypt every file in `request.paths` in place, or pack them into
/// `request.compress` and encrypt that archive in place.
///
/// Key mode writes `<output><suffix>` next to each encrypted output.
/// Password mode derives the key once for the whole batch.
pub fn encrypt_files(
    cryptr: &Cryptr,
    request: &EncryptRequest,
    progress: &mut dyn ProgressSink,
) -> BatchReport {
    let total = if request.compress.is_some() { 2 } else { request.paths.len() };
    let mut run = BatchRun::new(total, progress);

    if let Err(e) = request.validate() {
        return run.failed(e, None);
    }

    let key = match &request.key_mode {
        KeyMode::GeneratedKey => EncryptKey::Generated,
        KeyMode::Password(p) => match derive(cryptr.kdf(), p, &mut run.tracker) {
            Ok(k) => EncryptKey::Derived(k),
            Err(e) => return run.failed(e, None),
        },
    };

    // ---- Compress-then-encrypt ----
    if let Some(archive) = &request.compress {
        if !run.progress.should_continue() {
            return run.cancelled();
        }
        let packed = run.tracker.timer.time(Stage::Archive, || pack(request.paths.as_slice(), archive));
        match packed {
            Ok(report) => run.tracker.counters.add_archive(report.entries, report.bytes_out),
            Err(e) => {
                let e = OpError::from(e);
                let index = e.archive_index();
                return run.failed(e, index);
            }
        }
        run.advance();

        if !run.progress.should_continue() {
            return run.cancelled();
        }
        if let Err(e) = encrypt_one(cryptr, &key, archive, &mut run.tracker) {
            return run.failed(e, None);
        }
        run.advance();
        return run.success();
    }

    // ---- Per-file ----
    for (index, path) in request.paths.iter().enumerate() {
        if !run.progress.should_continue() {
            return run.cancelled();
        }
        if let Err(e) = encrypt_one(cryptr, &key, path, &mut run.tracker) {
            return run.failed(e, Some(index));
        }
        run.advance();
    }

    log::info!("encrypted {} file(s)", run.completed);
    run.success()
}

/// 🔓 Decrypt every file in `request.paths` in place.
///
/// `DecryptKey::KeyFile(Some(path))` loads that key file once for all inputs.
/// `DecryptKey::KeyFile(None)` loads `<input><suffix>` for each input.
/// Archives produced by compress mode are decrypted but not unpacked.
pub fn decrypt_files(
    cryptr: &Cryptr,
    request: &DecryptRequest,
    progress: &mut dyn ProgressSink,
) -> BatchReport {
    let mut run = BatchRun::new(request.paths.len(), progress);

    if let Err(e) = request.validate() {
        return run.failed(e, None);
    }

    let resolved = match &request.key_mode {
        DecryptKey::KeyFile(Some(path)) => load_material(path, &mut run.tracker).map(DecryptSource::Shared),
        DecryptKey::KeyFile(None) => Ok(DecryptSource::PerFileKeyFile),
        DecryptKey::Password(p) => derive(cryptr.kdf(), p, &mut run.tracker).map(DecryptSource::Derived),
    };
    let key = match resolved {
        Ok(k) => k,
        Err(e) => return run.failed(e, None),
    };

    for (index, path) in request.paths.iter().enumerate() {
        if !run.progress.should_continue() {
            return run.cancelled();
        }
        if let Err(e) = decrypt_one(cryptr, &key, path, &mut run.tracker) {
            return run.failed(e, Some(index));
        }
        run.advance();
    }

    log::info!("decrypted {} file(s)", run.completed);
    run.success()
}
