//! Raw deflate (RFC 1951, no zlib wrapper) via flate2, as ZIP method 8 expects.

use std::io::{Read, Write};
use flate2::{Compression, write::DeflateEncoder, read::DeflateDecoder};

use crate::compression::constants::{DEFAULT_LEVEL_DEFLATE, MAX_DEFLATE_RATIO};
use crate::compression::types::{CompressionCodec, CompressionError, Compressor, Decompressor};

pub struct DeflateCompressor {
    level: Compression,
}

impl DeflateCompressor {
    pub fn new(level: Option<u32>) -> Self {
        let level = match level {
            Some(l @ 0..=9) => Compression::new(l),
            _ => Compression::new(DEFAULT_LEVEL_DEFLATE),
        };
        Self { level }
    }
}

fn process_err(e: std::io::Error) -> CompressionError {
    CompressionError::CodecProcessFailed { codec: "deflate".into(), msg: e.to_string() }
}

impl Compressor for DeflateCompressor {
    fn codec(&self) -> CompressionCodec {
        CompressionCodec::Deflate
    }

    fn compress(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let mut enc = DeflateEncoder::new(out, self.level);
        enc.write_all(input).map_err(process_err)?;
        enc.finish().map_err(process_err)?;
        Ok(())
    }
}

pub struct DeflateDecompressor;

impl DeflateDecompressor {
    pub fn new() -> Self {
        Self
    }
}

impl Decompressor for DeflateDecompressor {
    fn codec(&self) -> CompressionCodec {
        CompressionCodec::Deflate
    }

    /// Output is capped at `expected_len + 1` bytes so an oversized stream still
    /// fails the size check without being inflated in full.
    fn decompress(&mut self, input: &[u8], expected_len: usize, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        out.reserve(expected_len.min(input.len().saturating_mul(MAX_DEFLATE_RATIO)));
        DeflateDecoder::new(input)
            .take((expected_len as u64).saturating_add(1))
            .read_to_end(out)
            .map_err(process_err)?;
        Ok(())
    }
}
