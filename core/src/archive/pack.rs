//! archive/pack.rs
//! Bundle several files into one ZIP archive.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;

use crate::archive::types::{ArchiveError, PackReport};
use crate::archive::writer::ArchiveWriter;
use crate::constants::IO_BUFFER_SIZE;

/// Base file name used as the entry name (directories stripped).
fn entry_name(path: &Path) -> io::Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))
}

/// Summary: Pack `paths` in order into a new archive at `archive_path`.
/// - Entry names are base file names; a later duplicate replaces the earlier one.
///   Only the central directory drops the earlier entry: its local header and
///   compressed bytes stay in the file, unreferenced, and remain recoverable by
///   scanning the raw archive.
/// - Each source is read completely before its entry is written.
///
/// Errors:
/// - `Creation` if the archive cannot be created or its directory cannot be written.
/// - `Entry { index }` for the first source that cannot be read or added. The
///   archive is then closed with the entries before `index`, so it stays readable.
pub fn pack<P: AsRef<Path>>(paths: &[P], archive_path: impl AsRef<Path>) -> Result<PackReport, ArchiveError> {
    let archive_path = archive_path.as_ref();
    let creation = |source| ArchiveError::Creation { path: archive_path.to_path_buf(), source };

    let file = File::create(archive_path).map_err(creation)?;
    let mut writer = ArchiveWriter::new(BufWriter::with_capacity(IO_BUFFER_SIZE, file));
    let mut report = PackReport::default();

    for (index, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        let added = entry_name(path).and_then(|name| {
            let data = fs::read(path)?;
            let modified = fs::metadata(path).and_then(|m| m.modified()).ok();
            writer.add_entry(&name, &data, modified)
        });

        match added {
            Ok(stats) => {
                log::debug!(
                    "archived {} ({:?}, {} -> {} bytes)",
                    path.display(), stats.codec, stats.uncompressed, stats.compressed
                );
                report.bytes_in += stats.uncompressed;
                if stats.replaced {
                    report.replaced += 1;
                }
            }
            Err(source) => {
                log::warn!("archiving stopped at file #{} ({}): {}", index, path.display(), source);
                if let Err(e) = writer.finish() {
                    log::warn!("closing partial archive {} failed: {}", archive_path.display(), e);
                }
                return Err(ArchiveError::Entry { index, path: path.to_path_buf(), source });
            }
        }
    }

    report.entries = writer.len();
    let (out, total) = writer.finish().map_err(creation)?;
    out.into_inner()
        .map_err(|e| e.into_error())
        .and_then(|f| f.sync_all())
        .map_err(creation)?;
    report.bytes_out = total;

    log::info!(
        "packed {} file(s) into {} ({} bytes)",
        report.entries, archive_path.display(), report.bytes_out
    );
    Ok(report)
}
