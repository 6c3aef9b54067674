//! codecs/stored.rs
//! Pass-through codec (ZIP method 0), used when deflate does not shrink an entry.

use crate::compression::types::{CompressionCodec, CompressionError, Compressor, Decompressor};

pub struct StoredCompressor;
pub struct StoredDecompressor;

impl StoredCompressor {
    pub fn new() -> Self { Self }
}
impl StoredDecompressor {
    pub fn new() -> Self { Self }
}

impl Compressor for StoredCompressor {
    fn codec(&self) -> CompressionCodec {
        CompressionCodec::Stored
    }

    fn compress(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        out.extend_from_slice(input);
        Ok(())
    }
}

impl Decompressor for StoredDecompressor {
    fn codec(&self) -> CompressionCodec {
        CompressionCodec::Stored
    }

    fn decompress(&mut self, input: &[u8], _expected_len: usize, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        out.extend_from_slice(input);
        Ok(())
    }
}
