// ## 📂 File: `src/keyfile/encode.rs`
//! src/keyfile/encode.rs
//!
//! Serializes `KeyMaterial` into the fixed 64-byte v1 record.
//! Field order must match `decode.rs` exactly.

use crate::constants::{key_file_flags, IV_LEN_16, KEY_LEN_32, MAGIC_CKF1};
use crate::crypto::KeyMaterial;
use crate::keyfile::types::{KeyFileVersion, KEY_FILE_CRC_SPAN, KEY_FILE_LEN_V1};
use crate::utils::compute_crc32;

/// Serialize key material into a little-endian v1 record.
/// The CRC32 over bytes 0..60 is written last.
#[inline]
pub fn encode_key_file(material: &KeyMaterial) -> [u8; KEY_FILE_LEN_V1] {
    let mut out = [0u8; KEY_FILE_LEN_V1];
    let mut i = 0usize;

    fn put_u16(out: &mut [u8], i: &mut usize, v: u16) {
        out[*i..*i + 2].copy_from_slice(&v.to_le_bytes());
        *i += 2;
    }
    fn put_u32(out: &mut [u8], i: &mut usize, v: u32) {
        out[*i..*i + 4].copy_from_slice(&v.to_le_bytes());
        *i += 4;
    }
    fn put_bytes(out: &mut [u8], i: &mut usize, b: &[u8]) {
        out[*i..*i + b.len()].copy_from_slice(b);
        *i += b.len();
    }

    put_bytes(&mut out, &mut i, &MAGIC_CKF1);                  // 0..4   magic
    put_u16(&mut out, &mut i, KeyFileVersion::V1 as u16);       // 4..6   version
    put_u16(&mut out, &mut i, KEY_LEN_32 as u16);               // 6..8   key length
    put_u16(&mut out, &mut i, IV_LEN_16 as u16);                // 8..10  iv length
    put_u16(&mut out, &mut i, key_file_flags::NONE);            // 10..12 flags
    put_bytes(&mut out, &mut i, material.key());                // 12..44 key
    put_bytes(&mut out, &mut i, material.iv());                 // 44..60 iv

    let crc = compute_crc32(&out[..KEY_FILE_CRC_SPAN]);
    put_u32(&mut out, &mut i, crc);                             // 60..64 crc32

    debug_assert_eq!(i, KEY_FILE_LEN_V1, "encoding wrote incorrect length");
    out
}
