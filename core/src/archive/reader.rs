//! archive/reader.rs
//! In-memory ZIP reader driven by the central directory. Supports the stored
//! and deflate methods this crate writes; every entry is size- and CRC-checked.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::archive::types::{
    signatures, ArchiveEntry, ArchiveError, CENTRAL_HEADER_LEN, EOCD_LEN, LOCAL_HEADER_LEN,
};
use crate::compression::{create_decompressor, verify_entry};

fn truncated(what: &str) -> ArchiveError {
    ArchiveError::Format(format!("truncated {}", what))
}

/// Locate the end-of-central-directory record, allowing for a trailing comment.
fn find_eocd(buf: &[u8]) -> Result<usize, ArchiveError> {
    if buf.len() < EOCD_LEN {
        return Err(truncated("end of central directory"));
    }
    let lowest = buf.len().saturating_sub(EOCD_LEN + u16::MAX as usize);
    let sig = signatures::END_OF_CENTRAL_DIRECTORY.to_le_bytes();
    (lowest..=buf.len() - EOCD_LEN)
        .rev()
        .find(|&i| buf[i..i + 4] == sig)
        .ok_or_else(|| ArchiveError::Format("end of central directory not found".into()))
}

/// Decode every entry listed in the central directory, in directory order.
pub fn read_archive(buf: &[u8]) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let eocd = find_eocd(buf)?;
    let mut c = Cursor::new(&buf[eocd + 4..]);
    let eocd_err = |_| truncated("end of central directory");
    let _disk = c.read_u16::<LittleEndian>().map_err(eocd_err)?;
    let _cd_disk = c.read_u16::<LittleEndian>().map_err(eocd_err)?;
    let _entries_on_disk = c.read_u16::<LittleEndian>().map_err(eocd_err)?;
    let total_entries = c.read_u16::<LittleEndian>().map_err(eocd_err)? as usize;
    let _cd_size = c.read_u32::<LittleEndian>().map_err(eocd_err)?;
    let cd_offset = c.read_u32::<LittleEndian>().map_err(eocd_err)? as usize;

    let mut entries = Vec::with_capacity(total_entries);
    let mut pos = cd_offset;

    for _ in 0..total_entries {
        let header = buf
            .get(pos..pos + CENTRAL_HEADER_LEN)
            .ok_or_else(|| truncated("central directory"))?;
        let mut c = Cursor::new(header);
        let cd_err = |_| truncated("central directory");
        if c.read_u32::<LittleEndian>().map_err(cd_err)? != signatures::CENTRAL_DIRECTORY {
            return Err(ArchiveError::Format(format!("bad central directory signature at {}", pos)));
        }
        let _made_by = c.read_u16::<LittleEndian>().map_err(cd_err)?;
        let _needed = c.read_u16::<LittleEndian>().map_err(cd_err)?;
        let _flags = c.read_u16::<LittleEndian>().map_err(cd_err)?;
        let method = c.read_u16::<LittleEndian>().map_err(cd_err)?;
        let _time = c.read_u16::<LittleEndian>().map_err(cd_err)?;
        let _date = c.read_u16::<LittleEndian>().map_err(cd_err)?;
        let crc32 = c.read_u32::<LittleEndian>().map_err(cd_err)?;
        let compressed_size = c.read_u32::<LittleEndian>().map_err(cd_err)? as usize;
        let uncompressed_size = c.read_u32::<LittleEndian>().map_err(cd_err)? as usize;
        let name_len = c.read_u16::<LittleEndian>().map_err(cd_err)? as usize;
        let extra_len = c.read_u16::<LittleEndian>().map_err(cd_err)? as usize;
        let comment_len = c.read_u16::<LittleEndian>().map_err(cd_err)? as usize;
        let _disk_start = c.read_u16::<LittleEndian>().map_err(cd_err)?;
        let _internal = c.read_u16::<LittleEndian>().map_err(cd_err)?;
        let _external = c.read_u32::<LittleEndian>().map_err(cd_err)?;
        let local_offset = c.read_u32::<LittleEndian>().map_err(cd_err)? as usize;

        let name_start = pos + CENTRAL_HEADER_LEN;
        let name_bytes = buf
            .get(name_start..name_start + name_len)
            .ok_or_else(|| truncated("entry name"))?;
        let name = String::from_utf8_lossy(name_bytes).into_owned();
        pos = name_start + name_len + extra_len + comment_len;

        let data_start = local_data_start(buf, local_offset)?;
        let payload = buf
            .get(data_start..data_start + compressed_size)
            .ok_or_else(|| truncated("entry data"))?;

        let mut decompressor = create_decompressor(method)
            .map_err(|source| ArchiveError::Compression { name: name.clone(), source })?;
        let mut data = Vec::new();
        decompressor
            .decompress(payload, uncompressed_size, &mut data)
            .and_then(|_| verify_entry(decompressor.codec(), &data, uncompressed_size, crc32))
            .map_err(|source| ArchiveError::Compression { name: name.clone(), source })?;

        entries.push(ArchiveEntry { name, data });
    }

    Ok(entries)
}

/// Offset of the entry payload behind the local header at `offset`.
fn local_data_start(buf: &[u8], offset: usize) -> Result<usize, ArchiveError> {
    let header = buf
        .get(offset..offset + LOCAL_HEADER_LEN)
        .ok_or_else(|| truncated("local header"))?;
    let sig = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    if sig != signatures::LOCAL_FILE_HEADER {
        return Err(ArchiveError::Format(format!("bad local header signature at {}", offset)));
    }
    let name_len = u16::from_le_bytes([header[26], header[27]]) as usize;
    let extra_len = u16::from_le_bytes([header[28], header[29]]) as usize;
    Ok(offset + LOCAL_HEADER_LEN + name_len + extra_len)
}

/// Read an archive file and decode all entries into memory.
pub fn unpack(archive_path: impl AsRef<Path>) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let path = archive_path.as_ref();
    let buf = fs::read(path).map_err(|source| ArchiveError::Read { path: path.to_path_buf(), source })?;
    read_archive(&buf)
}
