//! compression/types.rs
//! Codec identifiers, errors and the compressor traits.
use std::fmt;
use num_enum::TryFromPrimitive;

use crate::compression::constants::codec_ids;
use crate::utils::enum_name_or_hex;

#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum CompressionCodec {
    Stored  = codec_ids::STORED,
    Deflate = codec_ids::DEFLATE,
}

impl CompressionCodec {
    pub fn verify(raw: u16) -> Result<Self, CompressionError> {
        Self::try_from_primitive(raw).map_err(|_| CompressionError::UnsupportedCodec { codec_id: raw })
    }

    pub fn name(&self) -> &'static str {
        match self {
            CompressionCodec::Stored => "stored",
            CompressionCodec::Deflate => "deflate",
        }
    }
}

#[derive(Debug)]
pub enum CompressionError {
    UnsupportedCodec { codec_id: u16 },
    CodecProcessFailed { codec: String, msg: String },
    ChecksumMismatch { codec: String, have: u32, need: u32 },
    SizeMismatch { codec: String, have: usize, need: usize },
}

impl fmt::Display for CompressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CompressionError::*;
        match self {
            UnsupportedCodec { codec_id } =>
                write!(f, "unsupported compression codec: {}",
                       enum_name_or_hex::<CompressionCodec>(*codec_id)),
            CodecProcessFailed { codec, msg } =>
                write!(f, "codec {} process failed: {}", codec, msg),
            ChecksumMismatch { codec, have, need } =>
                write!(f, "codec {} checksum mismatch: 0x{:08x} != 0x{:08x}", codec, have, need),
            SizeMismatch { codec, have, need } =>
                write!(f, "codec {} decoded size {} != {}", codec, have, need),
        }
    }
}

impl std::error::Error for CompressionError {}

pub trait Compressor: Send {
    fn codec(&self) -> CompressionCodec;
    /// Compress one complete entry into `out`.
    fn compress(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError>;
}

pub trait Decompressor: Send {
    fn codec(&self) -> CompressionCodec;
    /// Decompress one complete entry into `out`. `expected_len` is the declared
    /// size; a decoder may stop one byte past it, leaving the mismatch to `verify_entry`.
    fn decompress(&mut self, input: &[u8], expected_len: usize, out: &mut Vec<u8>) -> Result<(), CompressionError>;
}

/// Compare a decoded entry against the size and CRC32 recorded for it.
pub fn verify_entry(codec: CompressionCodec, data: &[u8], size: usize, crc32: u32) -> Result<(), CompressionError> {
    if data.len() != size {
        return Err(CompressionError::SizeMismatch { codec: codec.name().into(), have: data.len(), need: size });
    }
    let actual = crate::utils::compute_crc32(data);
    if actual != crc32 {
        return Err(CompressionError::ChecksumMismatch { codec: codec.name().into(), have: actual, need: crc32 });
    }
    Ok(())
}
