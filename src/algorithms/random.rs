use crate::WipeResult;

/// Seven-pass random overwrite. Every pass draws a fresh chunk from the
/// secure generator.
pub struct RandomWipe;

impl RandomWipe {
    pub const PASS_COUNT: u32 = 7;

    pub fn pattern() -> WipeResult<Vec<u8>> {
        super::random_chunk()
    }
}
