//! ops/io.rs
//! Whole-file read/write with typed source/destination failures.
//!
//! A source is read completely before its destination is opened, so input
//! and output may be the same path (in-place transform).

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::constants::IO_BUFFER_SIZE;
use crate::types::OpError;

pub fn read_source(path: &Path) -> Result<Vec<u8>, OpError> {
    let src = |source| OpError::SourceRead { path: path.to_path_buf(), source };

    let file = File::open(path).map_err(src)?;
    let hint = file.metadata().map(|m| m.len() as usize).unwrap_or(0);
    let mut buf = Vec::with_capacity(hint);
    BufReader::with_capacity(IO_BUFFER_SIZE, file)
        .read_to_end(&mut buf)
        .map_err(src)?;
    Ok(buf)
}

/// Create or truncate `path`, write `data` and flush it to disk.
pub fn write_output(path: &Path, data: &[u8]) -> Result<(), OpError> {
    let dst = |source| OpError::DestinationWrite { path: path.to_path_buf(), source };

    let file = File::create(path).map_err(dst)?;
    let mut writer = BufWriter::with_capacity(IO_BUFFER_SIZE, file);
    writer.write_all(data).map_err(dst)?;
    let file = writer.into_inner().map_err(|e| dst(e.into_error()))?;
    file.sync_all().map_err(dst)
}
