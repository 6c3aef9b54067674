/// Stable codec IDs (u16). Values are the ZIP "compression method" field.
pub mod codec_ids {
    pub const STORED: u16  = 0x0000;
    pub const DEFLATE: u16 = 0x0008;
}

/// Default deflate level (balanced).
pub const DEFAULT_LEVEL_DEFLATE: u32 = 6;

/// Upper bound on deflate expansion (bytes out per byte in), used to cap
/// buffer reservations from untrusted size fields.
pub const MAX_DEFLATE_RATIO: usize = 1032;

/// Largest entry a non-ZIP64 archive can describe.
pub const MAX_ENTRY_SIZE: u64 = u32::MAX as u64;
