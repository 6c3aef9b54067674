//! ops/context.rs
//! `Cryptr`: configuration-bound entry point for all file operations.

use std::path::{Path, PathBuf};

use crate::config::CryptrConfig;
use crate::crypto::{CipherMode, KeyDerivation};
use crate::ops::batch;
use crate::ops::file;
use crate::ops::types::{BatchReport, DecryptRequest, EncryptRequest, ProgressSink};
use crate::telemetry::TelemetrySnapshot;
use crate::types::OpError;
use crate::utils::with_suffix;

/// Holds the validated configuration and the key derivation built from it.
/// Carries no mutable state; one instance can serve any number of operations.
#[derive(Debug, Clone)]
pub struct Cryptr {
    config: CryptrConfig,
    kdf: KeyDerivation,
}

impl Default for Cryptr {
    fn default() -> Self {
        let config = CryptrConfig::default();
        let kdf = config.key_derivation();
        Self { config, kdf }
    }
}

impl Cryptr {
    pub fn new(config: CryptrConfig) -> Result<Self, OpError> {
        config.validate()?;
        let kdf = config.key_derivation();
        Ok(Self { config, kdf })
    }

    pub fn config(&self) -> &CryptrConfig {
        &self.config
    }

    pub fn kdf(&self) -> &KeyDerivation {
        &self.kdf
    }

    /// Key file path for an encrypted file: `<path><suffix>`.
    pub fn key_file_for(&self, path: &Path) -> PathBuf {
        with_suffix(path, &self.config.key_file_suffix)
    }

    pub fn encrypt_with_key(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        key_file: impl AsRef<Path>,
    ) -> Result<TelemetrySnapshot, OpError> {
        file::encrypt_with_key(input, output, key_file)
    }

    pub fn decrypt_with_key(
        &self,
        encrypted: impl AsRef<Path>,
        output: impl AsRef<Path>,
        key_file: impl AsRef<Path>,
    ) -> Result<TelemetrySnapshot, OpError> {
        file::decrypt_with_key(encrypted, output, key_file)
    }

    pub fn cipher_with_password(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        password: &str,
        mode: CipherMode,
    ) -> Result<TelemetrySnapshot, OpError> {
        file::cipher_with_password(&self.kdf, input, output, password, mode)
    }

    pub fn encrypt_files(&self, request: &EncryptRequest, progress: &mut dyn ProgressSink) -> BatchReport {
        batch::encrypt_files(self, request, progress)
    }

    pub fn decrypt_files(&self, request: &DecryptRequest, progress: &mut dyn ProgressSink) -> BatchReport {
        batch::decrypt_files(self, request, progress)
    }
}
