use super::CHUNK_SIZE;
use crate::WipeResult;

pub struct DodWipe;

impl DodWipe {
    /// DoD 5220.22-M standard pass 1 pattern (all zeros)
    pub const PASS_1_PATTERN: u8 = 0x00;

    /// DoD 5220.22-M standard pass 2 pattern (all ones)
    pub const PASS_2_PATTERN: u8 = 0xFF;

    /// DoD 5220.22-M requires exactly 3 passes
    pub const PASS_COUNT: u32 = 3;

    /// Pattern chunk for the given 1-based pass. Passes beyond the second
    /// are cryptographically random, which also covers pass-count overrides
    /// above the standard three.
    pub fn pattern(pass: u32) -> WipeResult<Vec<u8>> {
        match pass {
            1 => Ok(vec![Self::PASS_1_PATTERN; CHUNK_SIZE]),
            2 => Ok(vec![Self::PASS_2_PATTERN; CHUNK_SIZE]),
            _ => super::random_chunk(),
        }
    }
}
