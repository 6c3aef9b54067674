/// Magic marker for the key file record.
/// "CKF1" = Cryptr Key File v1
pub const MAGIC_CKF1: [u8; 4] = *b"CKF1";
pub const KEY_FILE_V1: u16 = 1;

/// AES-256 key size in bytes.
pub const KEY_LEN_32: usize = 32;
/// Key size in bits, as requested from the KDF.
pub const KEY_BITS_256: u32 = 256;
/// CBC initialization vector size (one AES block).
pub const IV_LEN_16: usize = 16;
/// AES block size in bytes.
pub const BLOCK_LEN: usize = 16;
/// Pepper size in bytes.
pub const PEPPER_LEN: usize = 16;

/// PBKDF2 iteration count used by password mode.
pub const DEFAULT_KDF_ITERATIONS: u32 = 65_536;

/// Application pepper used as PBKDF2 salt. Changing it breaks every existing
/// password-encrypted file.
pub const DEFAULT_PEPPER: [u8; PEPPER_LEN] = [
    0x8c, 0x37, 0x20, 0x3f, 0x84, 0x27, 0x1f, 0xeb,
    0x79, 0x2d, 0xe8, 0x1b, 0x5f, 0xd1, 0xdc, 0x6e,
];

/// Suffix appended to an encrypted file's path to name its key file.
pub const DEFAULT_KEY_FILE_SUFFIX: &str = ".KEY";

/// Read buffer for copying source files.
pub const IO_BUFFER_SIZE: usize = 64 * 1024;

/// Key file flag bits (reserved; all must be zero in v1).
pub mod key_file_flags {
    pub const NONE: u16 = 0x0000;
}
