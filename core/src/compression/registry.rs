// ## src/compression/registry.rs

//! compression/registry.rs
//! Codec factory functions keyed by ZIP method id.

use crate::compression::codecs::{DeflateCompressor, DeflateDecompressor, StoredCompressor, StoredDecompressor};
use crate::compression::types::{CompressionCodec, CompressionError, Compressor, Decompressor};

pub fn create_compressor(codec: CompressionCodec, level: Option<u32>) -> Box<dyn Compressor> {
    match codec {
        CompressionCodec::Stored => Box::new(StoredCompressor::new()),
        CompressionCodec::Deflate => Box::new(DeflateCompressor::new(level)),
    }
}

pub fn create_decompressor(codec_id: u16) -> Result<Box<dyn Decompressor>, CompressionError> {
    match CompressionCodec::verify(codec_id)? {
        CompressionCodec::Stored => Ok(Box::new(StoredDecompressor::new())),
        CompressionCodec::Deflate => Ok(Box::new(DeflateDecompressor::new())),
    }
}
