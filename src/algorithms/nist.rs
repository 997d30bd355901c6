use crate::WipeResult;

/// NIST 800-88 Clear: a single cryptographically random overwrite.
pub struct NistWipe;

impl NistWipe {
    pub const PASS_COUNT: u32 = 1;

    pub fn pattern() -> WipeResult<Vec<u8>> {
        super::random_chunk()
    }
}
