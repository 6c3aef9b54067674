//! keyfile/store.rs
//! Save/load key material to disk. The record is stored in the clear;
//! protecting the file is left to filesystem permissions.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use crate::crypto::KeyMaterial;
use crate::keyfile::decode::decode_key_file;
use crate::keyfile::encode::encode_key_file;
use crate::keyfile::types::{KeyFileError, KEY_FILE_LEN_V1};

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> KeyFileError + '_ {
    move |source| KeyFileError::Io { path: path.to_path_buf(), source }
}

/// Write `material` to `path`, replacing any existing file.
/// On Unix the file is created owner-read/write only.
pub fn save_key_file(material: &KeyMaterial, path: impl AsRef<Path>) -> Result<(), KeyFileError> {
    let path = path.as_ref();
    let record = encode_key_file(material);

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(io_err(path))?;
    file.write_all(&record).map_err(io_err(path))?;
    file.sync_all().map_err(io_err(path))?;

    log::debug!("saved key file {} (fingerprint {})", path.display(), material.fingerprint());
    Ok(())
}

/// Read and validate a key file.
///
/// Errors:
/// - `Io` when the file cannot be opened or read.
/// - Any structural variant when the content is not a v1 record.
pub fn load_key_file(path: impl AsRef<Path>) -> Result<KeyMaterial, KeyFileError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(io_err(path))?;

    // Read one byte past the record so trailing data is detected without
    // pulling an arbitrarily large foreign file into memory.
    let mut buf = Vec::with_capacity(KEY_FILE_LEN_V1 + 1);
    file.take(KEY_FILE_LEN_V1 as u64 + 1)
        .read_to_end(&mut buf)
        .map_err(io_err(path))?;

    let material = decode_key_file(&buf)?;
    log::debug!("loaded key file {} (fingerprint {})", path.display(), material.fingerprint());
    Ok(material)
}
