// ## 📂 File: `src/keyfile/decode.rs`
//! src/keyfile/decode.rs
//!
//! Parses a v1 key file record back into `KeyMaterial`.
//! Anything that is not exactly a well-formed v1 record is rejected.

use crate::constants::{key_file_flags, IV_LEN_16, KEY_LEN_32, MAGIC_CKF1};
use crate::crypto::KeyMaterial;
use crate::keyfile::types::{KeyFileError, KeyFileVersion, KEY_FILE_CRC_SPAN, KEY_FILE_LEN_V1};
use crate::utils::compute_crc32;

/// Deserialize a 64-byte little-endian record.
///
/// # Errors
/// - `BadLength` if `buf` is not exactly 64 bytes.
/// - `InvalidMagic`, `UnknownVersion`, `FieldLength`, `FlagsNonZero` for foreign layouts.
/// - `InvalidCrc32` for corrupted records.
pub fn decode_key_file(buf: &[u8]) -> Result<KeyMaterial, KeyFileError> {
    if buf.len() != KEY_FILE_LEN_V1 {
        return Err(KeyFileError::BadLength { have: buf.len(), need: KEY_FILE_LEN_V1 });
    }

    let mut i = 0usize;
    #[inline] fn get_u16(buf: &[u8], i: &mut usize) -> u16 { let v = u16::from_le_bytes([buf[*i], buf[*i + 1]]); *i += 2; v }
    #[inline] fn get_u32(buf: &[u8], i: &mut usize) -> u32 { let v = u32::from_le_bytes([buf[*i], buf[*i + 1], buf[*i + 2], buf[*i + 3]]); *i += 4; v }
    #[inline] fn get_bytes<const N: usize>(buf: &[u8], i: &mut usize) -> [u8; N] {
        let mut dst = [0u8; N]; dst.copy_from_slice(&buf[*i..*i + N]); *i += N; dst
    }

    let magic = get_bytes::<4>(buf, &mut i);          // 0..4   magic
    if magic != MAGIC_CKF1 {
        return Err(KeyFileError::InvalidMagic { have: magic, need: MAGIC_CKF1 });
    }

    KeyFileVersion::verify(get_u16(buf, &mut i))?;    // 4..6   version

    let key_len = get_u16(buf, &mut i);               // 6..8   key length
    if key_len as usize != KEY_LEN_32 {
        return Err(KeyFileError::FieldLength { field: "key", have: key_len, need: KEY_LEN_32 as u16 });
    }
    let iv_len = get_u16(buf, &mut i);                // 8..10  iv length
    if iv_len as usize != IV_LEN_16 {
        return Err(KeyFileError::FieldLength { field: "iv", have: iv_len, need: IV_LEN_16 as u16 });
    }
    let flags = get_u16(buf, &mut i);                 // 10..12 flags
    if flags != key_file_flags::NONE {
        return Err(KeyFileError::FlagsNonZero { flags });
    }

    let key = get_bytes::<KEY_LEN_32>(buf, &mut i);   // 12..44 key
    let iv = get_bytes::<IV_LEN_16>(buf, &mut i);     // 44..60 iv

    let stored_crc = get_u32(buf, &mut i);            // 60..64 crc32
    let computed_crc = compute_crc32(&buf[..KEY_FILE_CRC_SPAN]);
    if stored_crc != computed_crc {
        return Err(KeyFileError::InvalidCrc32 { have: stored_crc, need: computed_crc });
    }

    debug_assert_eq!(i, KEY_FILE_LEN_V1);
    Ok(KeyMaterial::from_parts(key, iv))
}
