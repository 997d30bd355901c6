use super::CHUNK_SIZE;

pub struct GutmannWipe;

impl GutmannWipe {
    /// Gutmann's published sequence runs 35 passes; progress reporting and
    /// UI labels rely on this count.
    pub const PASS_COUNT: u32 = 35;

    /// Byte patterns cycled across the 35 passes.
    ///
    /// This is a deliberate simplification of the 1996 paper: the official
    /// sequence interleaves 27 fixed encoding-specific patterns with 8
    /// random passes, while this table cycles 16 single-byte fills. The
    /// approximation is a documented limitation of the implementation and
    /// is kept as-is; expanding it to the full sequence is a behavior
    /// change, not a fix.
    pub const PATTERN_TABLE: [u8; 16] = [
        0x00, 0xFF, 0x55, 0xAA, 0x92, 0x49, 0x24, 0x6D,
        0xB6, 0xDB, 0x95, 0x55, 0xAA, 0x24, 0x49, 0x92,
    ];

    /// Pattern chunk for the given 1-based pass, cycling the table.
    pub fn pattern(pass: u32) -> Vec<u8> {
        let index = (pass.saturating_sub(1) as usize) % Self::PATTERN_TABLE.len();
        vec![Self::PATTERN_TABLE[index]; CHUNK_SIZE]
    }
}
