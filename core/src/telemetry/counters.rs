// ### `src/telemetry/counters.rs`

//! telemetry/counters.rs
//! Mutable counters collected while an operation runs.
//!
//! Summary: file and byte counts for encrypt/decrypt/pack.
//! Converted into an immutable TelemetrySnapshot when the operation ends.
use serde::{Serialize, Deserialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub files_encrypted: u64,
    pub files_decrypted: u64,
    pub files_archived: u64,
    pub key_files_written: u64,
    pub key_files_read: u64,
    pub bytes_plaintext: u64,
    pub bytes_ciphertext: u64,
    pub bytes_archive: u64,
}

impl TelemetryCounters {
    /// Record one encrypted file.
    pub fn add_encrypt(&mut self, pt_len: usize, ct_len: usize) {
        self.files_encrypted += 1;
        self.bytes_plaintext += pt_len as u64;
        self.bytes_ciphertext += ct_len as u64;
    }

    /// Record one decrypted file.
    pub fn add_decrypt(&mut self, ct_len: usize, pt_len: usize) {
        self.files_decrypted += 1;
        self.bytes_plaintext += pt_len as u64;
        self.bytes_ciphertext += ct_len as u64;
    }

    /// Record a finished archive of `entries` files and `archive_len` bytes.
    pub fn add_archive(&mut self, entries: usize, archive_len: u64) {
        self.files_archived += entries as u64;
        self.bytes_archive += archive_len;
    }

    pub fn add_key_file_write(&mut self) {
        self.key_files_written += 1;
    }

    pub fn add_key_file_read(&mut self) {
        self.key_files_read += 1;
    }
}
