//! archive/writer.rs
//! Minimal ZIP writer: one local header + data per entry, then the central
//! directory and end record on `finish`.
//!
//! Design notes:
//! - Entries arrive fully in memory, so sizes and CRC are known before the
//!   local header is written (no data descriptors, no ZIP64).
//! - The central directory is authoritative. A repeated name replaces the
//!   earlier record there; the earlier local bytes stay behind unreferenced.

use std::io::{self, Write};
use std::time::SystemTime;

use byteorder::{LittleEndian, WriteBytesExt};
use chrono::{DateTime, Datelike, Local, Timelike};

use crate::archive::types::{
    signatures, CentralRecord, FLAG_UTF8_NAME, MAX_ENTRIES, ZIP_VERSION_20,
};
use crate::compression::{create_compressor, CompressionCodec, MAX_ENTRY_SIZE};
use crate::utils::compute_crc32;

/// Counts bytes so local header offsets are known without `Seek`.
struct CountingWriter<W: Write> {
    inner: W,
    written: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Outcome of `ArchiveWriter::add_entry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryStats {
    pub codec: CompressionCodec,
    pub uncompressed: u64,
    pub compressed: u64,
    /// True when an earlier entry with the same name was superseded.
    pub replaced: bool,
}

pub struct ArchiveWriter<W: Write> {
    out: CountingWriter<W>,
    records: Vec<CentralRecord>,
    level: Option<u32>,
}

impl<W: Write> ArchiveWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { out: CountingWriter { inner, written: 0 }, records: Vec::new(), level: None }
    }

    pub fn with_level(inner: W, level: u32) -> Self {
        Self { level: Some(level), ..Self::new(inner) }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Compress and append one entry. Deflate is used unless it does not shrink
    /// the data, in which case the entry is stored.
    pub fn add_entry(&mut self, name: &str, data: &[u8], modified: Option<SystemTime>) -> io::Result<EntryStats> {
        if data.len() as u64 > MAX_ENTRY_SIZE {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "entry exceeds 4 GiB (ZIP64 unsupported)"));
        }
        if name.is_empty() || name.len() > u16::MAX as usize {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "entry name must be 1..=65535 bytes"));
        }
        let replaced = self.records.iter().any(|r| r.name == name);
        if !replaced && self.records.len() >= MAX_ENTRIES {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "too many entries (ZIP64 unsupported)"));
        }

        let mut payload = Vec::with_capacity(data.len() / 2);
        let mut codec = CompressionCodec::Deflate;
        create_compressor(codec, self.level)
            .compress(data, &mut payload)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        if payload.len() >= data.len() {
            codec = CompressionCodec::Stored;
            payload.clear();
            create_compressor(codec, None)
                .compress(data, &mut payload)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        }

        let offset = u32::try_from(self.out.written)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "archive exceeds 4 GiB (ZIP64 unsupported)"))?;
        let (dos_time, dos_date) = dos_datetime(modified.unwrap_or_else(SystemTime::now));

        let record = CentralRecord {
            name: name.to_string(),
            codec,
            dos_time,
            dos_date,
            crc32: compute_crc32(data),
            compressed_size: payload.len() as u32,
            uncompressed_size: data.len() as u32,
            local_header_offset: offset,
        };

        let w = &mut self.out;
        w.write_u32::<LittleEndian>(signatures::LOCAL_FILE_HEADER)?;
        w.write_u16::<LittleEndian>(ZIP_VERSION_20)?;      // version needed
        w.write_u16::<LittleEndian>(FLAG_UTF8_NAME)?;      // flags
        w.write_u16::<LittleEndian>(codec as u16)?;        // method
        w.write_u16::<LittleEndian>(record.dos_time)?;
        w.write_u16::<LittleEndian>(record.dos_date)?;
        w.write_u32::<LittleEndian>(record.crc32)?;
        w.write_u32::<LittleEndian>(record.compressed_size)?;
        w.write_u32::<LittleEndian>(record.uncompressed_size)?;
        w.write_u16::<LittleEndian>(name.len() as u16)?;
        w.write_u16::<LittleEndian>(0)?;                   // extra length
        w.write_all(name.as_bytes())?;
        w.write_all(&payload)?;

        if replaced {
            log::warn!("archive entry {:?} appears twice; keeping the later file", name);
            self.records.retain(|r| r.name != name);
        }
        self.records.push(record);

        Ok(EntryStats {
            codec,
            uncompressed: data.len() as u64,
            compressed: payload.len() as u64,
            replaced,
        })
    }

    /// Write the central directory and end record, flush, and return the sink
    /// with the total number of bytes written.
    pub fn finish(mut self) -> io::Result<(W, u64)> {
        let cd_start = self.out.written;
        let records = std::mem::take(&mut self.records);

        for r in &records {
            let w = &mut self.out;
            w.write_u32::<LittleEndian>(signatures::CENTRAL_DIRECTORY)?;
            w.write_u16::<LittleEndian>(ZIP_VERSION_20)?;  // version made by
            w.write_u16::<LittleEndian>(ZIP_VERSION_20)?;  // version needed
            w.write_u16::<LittleEndian>(FLAG_UTF8_NAME)?;
            w.write_u16::<LittleEndian>(r.codec as u16)?;
            w.write_u16::<LittleEndian>(r.dos_time)?;
            w.write_u16::<LittleEndian>(r.dos_date)?;
            w.write_u32::<LittleEndian>(r.crc32)?;
            w.write_u32::<LittleEndian>(r.compressed_size)?;
            w.write_u32::<LittleEndian>(r.uncompressed_size)?;
            w.write_u16::<LittleEndian>(r.name.len() as u16)?;
            w.write_u16::<LittleEndian>(0)?;               // extra length
            w.write_u16::<LittleEndian>(0)?;               // comment length
            w.write_u16::<LittleEndian>(0)?;               // disk number start
            w.write_u16::<LittleEndian>(0)?;               // internal attributes
            w.write_u32::<LittleEndian>(0)?;               // external attributes
            w.write_u32::<LittleEndian>(r.local_header_offset)?;
            w.write_all(r.name.as_bytes())?;
        }

        let cd_size = self.out.written - cd_start;
        let too_big = || io::Error::new(io::ErrorKind::InvalidInput, "archive exceeds 4 GiB (ZIP64 unsupported)");
        let cd_start = u32::try_from(cd_start).map_err(|_| too_big())?;
        let cd_size = u32::try_from(cd_size).map_err(|_| too_big())?;

        let w = &mut self.out;
        w.write_u32::<LittleEndian>(signatures::END_OF_CENTRAL_DIRECTORY)?;
        w.write_u16::<LittleEndian>(0)?;                   // this disk
        w.write_u16::<LittleEndian>(0)?;                   // disk with central directory
        w.write_u16::<LittleEndian>(records.len() as u16)?;
        w.write_u16::<LittleEndian>(records.len() as u16)?;
        w.write_u32::<LittleEndian>(cd_size)?;
        w.write_u32::<LittleEndian>(cd_start)?;
        w.write_u16::<LittleEndian>(0)?;                   // comment length
        w.flush()?;

        let total = self.out.written;
        Ok((self.out.inner, total))
    }
}

/// MS-DOS time/date fields in local time. Clamped to the representable
/// range 1980..=2107.
pub fn dos_datetime(t: SystemTime) -> (u16, u16) {
    let dt: DateTime<Local> = t.into();
    let year = dt.year();
    if year < 1980 {
        return (0, (1 << 5) | 1);
    }
    if year > 2107 {
        return ((23 << 11) | (59 << 5) | 29, (127 << 9) | (12 << 5) | 31);
    }
    let time = ((dt.hour() as u16) << 11) | ((dt.minute() as u16) << 5) | (dt.second() as u16 / 2);
    let date = (((year - 1980) as u16) << 9) | ((dt.month() as u16) << 5) | dt.day() as u16;
    (time, date)
}
