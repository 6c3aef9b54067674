// ## 📂 File: `src/ops/file.rs`

//! ops/file.rs
//! Single-file encrypt/decrypt entry points.
//!
//! Each call reads the whole input, transforms it in memory and writes the
//! output, so `output` may equal `input`. Encrypted files are raw ciphertext
//! with no header: the IV lives only in the key file, and password mode
//! stores none.

use std::path::Path;

use crate::crypto::{BlockCipherEngine, CipherMode, DerivedKey, KeyDerivation, KeyMaterial};
use crate::keyfile::{load_key_file, save_key_file};
use crate::ops::io::{read_source, write_output};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::OpError;

/// Counters and stage timings for one single-file call or a whole batch.
#[derive(Debug, Default)]
pub(crate) struct Tracker {
    pub counters: TelemetryCounters,
    pub timer: TelemetryTimer,
}

impl Tracker {
    pub fn snapshot(&mut self) -> TelemetrySnapshot {
        self.timer.finish();
        TelemetrySnapshot::from(&self.counters, &self.timer)
    }
}

/// Fresh key + IV, CBC encrypt, key file first, then the ciphertext.
/// The key file is persisted before `output` is touched so an in-place
/// encryption never leaves ciphertext without its key.
pub(crate) fn encrypt_file_generated(
    input: &Path,
    output: &Path,
    key_file: &Path,
    t: &mut Tracker,
) -> Result<(), OpError> {
    let plaintext = t.timer.time(Stage::Read, || read_source(input))?;

    let material = KeyMaterial::generate()?;
    let ciphertext = t.timer.time(Stage::Encrypt, || {
        BlockCipherEngine::from_key_material(&material).encrypt(&plaintext)
    });

    t.timer.time(Stage::KeyFile, || save_key_file(&material, key_file))?;
    t.counters.add_key_file_write();

    t.timer.time(Stage::Write, || write_output(output, &ciphertext))?;
    t.counters.add_encrypt(plaintext.len(), ciphertext.len());

    log::info!(
        "encrypted {} -> {} ({} bytes, key file {}, fingerprint {})",
        input.display(), output.display(), ciphertext.len(), key_file.display(), material.fingerprint()
    );
    Ok(())
}

pub(crate) fn load_material(key_file: &Path, t: &mut Tracker) -> Result<KeyMaterial, OpError> {
    let material = t.timer.time(Stage::KeyFile, || load_key_file(key_file))?;
    t.counters.add_key_file_read();
    Ok(material)
}

pub(crate) fn decrypt_file_with_material(
    material: &KeyMaterial,
    input: &Path,
    output: &Path,
    t: &mut Tracker,
) -> Result<(), OpError> {
    let ciphertext = t.timer.time(Stage::Read, || read_source(input))?;
    let plaintext = t.timer.time(Stage::Decrypt, || {
        BlockCipherEngine::from_key_material(material).decrypt(&ciphertext)
    })?;

    t.timer.time(Stage::Write, || write_output(output, &plaintext))?;
    t.counters.add_decrypt(ciphertext.len(), plaintext.len());

    log::info!("decrypted {} -> {} ({} bytes)", input.display(), output.display(), plaintext.len());
    Ok(())
}

pub(crate) fn derive(kdf: &KeyDerivation, password: &str, t: &mut Tracker) -> Result<DerivedKey, OpError> {
    let key = t.timer.time(Stage::Derive, || kdf.derive(password))?;
    Ok(key)
}

/// ECB transform with an already derived key.
pub(crate) fn cipher_file_with_derived(
    key: &DerivedKey,
    input: &Path,
    output: &Path,
    mode: CipherMode,
    t: &mut Tracker,
) -> Result<(), OpError> {
    let data = t.timer.time(Stage::Read, || read_source(input))?;

    let stage = match mode {
        CipherMode::Encrypt => Stage::Encrypt,
        CipherMode::Decrypt => Stage::Decrypt,
    };
    let out = t.timer.time(stage, || BlockCipherEngine::from_derived_key(key).apply(&data, mode))?;

    t.timer.time(Stage::Write, || write_output(output, &out))?;
    match mode {
        CipherMode::Encrypt => t.counters.add_encrypt(data.len(), out.len()),
        CipherMode::Decrypt => t.counters.add_decrypt(data.len(), out.len()),
    }

    log::info!(
        "password {} {} -> {} ({} bytes)",
        mode, input.display(), output.display(), out.len()
    );
    Ok(())
}

/// 🔐 Encrypt `input` with a freshly generated key.
/// - Output: AES-256-CBC/PKCS#7 ciphertext written to `output`.
/// - Key and IV are written to `key_file` (created owner-only on Unix).
///
/// Errors:
/// - `SourceRead` / `DestinationWrite` for file I/O.
/// - `KeyFile` when the key file cannot be written; `output` is then untouched.
/// - `UnsupportedEnvironment` when the OS entropy source fails.
pub fn encrypt_with_key(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    key_file: impl AsRef<Path>,
) -> Result<TelemetrySnapshot, OpError> {
    let mut t = Tracker::default();
    encrypt_file_generated(input.as_ref(), output.as_ref(), key_file.as_ref(), &mut t)?;
    Ok(t.snapshot())
}

/// 🔓 Decrypt `encrypted` with the key and IV stored in `key_file`.
///
/// Errors:
/// - `KeyFile` / `Deserialization` when the key file is unreadable or malformed.
/// - `Crypto` for a wrong key or corrupted ciphertext. Nothing is written then.
pub fn decrypt_with_key(
    encrypted: impl AsRef<Path>,
    output: impl AsRef<Path>,
    key_file: impl AsRef<Path>,
) -> Result<TelemetrySnapshot, OpError> {
    let mut t = Tracker::default();
    let material = load_material(key_file.as_ref(), &mut t)?;
    decrypt_file_with_material(&material, encrypted.as_ref(), output.as_ref(), &mut t)?;
    Ok(t.snapshot())
}

/// Password mode, both directions. The key is derived with `kdf` (PBKDF2 over
/// the configured pepper) and used with AES-256-ECB/PKCS#7.
///
/// Identical plaintext and password always give identical ciphertext.
pub fn cipher_with_password(
    kdf: &KeyDerivation,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    password: &str,
    mode: CipherMode,
) -> Result<TelemetrySnapshot, OpError> {
    let mut t = Tracker::default();
    let key = derive(kdf, password, &mut t)?;
    cipher_file_with_derived(&key, input.as_ref(), output.as_ref(), mode, &mut t)?;
    Ok(t.snapshot())
}
