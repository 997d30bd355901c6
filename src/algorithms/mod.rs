pub mod dod;
pub mod gutmann;
pub mod nist;
pub mod random;
pub mod zero;

// Re-export the pattern implementations
pub use dod::DodWipe;
pub use gutmann::GutmannWipe;
pub use nist::NistWipe;
pub use random::RandomWipe;
pub use zero::ZeroWipe;

use crate::crypto::secure_random_bytes;
use crate::{WipeError, WipeMethod, WipeResult};

/// Pattern buffer size in bytes. The engine replicates the chunk until it
/// covers the target file's length.
pub const CHUNK_SIZE: usize = 1024;

/// Number of overwrite passes for a method. An explicit override is used
/// verbatim when present.
pub fn pass_count(method: WipeMethod, override_passes: Option<u32>) -> u32 {
    if let Some(passes) = override_passes {
        return passes;
    }

    match method {
        WipeMethod::Dod => DodWipe::PASS_COUNT,
        WipeMethod::Nist => NistWipe::PASS_COUNT,
        WipeMethod::Gutmann => GutmannWipe::PASS_COUNT,
        WipeMethod::Random => RandomWipe::PASS_COUNT,
        WipeMethod::Zero => ZeroWipe::PASS_COUNT,
    }
}

/// Produce the `CHUNK_SIZE` byte pattern for one overwrite pass.
///
/// `pass` is 1-based, matching how passes are reported to observers.
pub fn pattern_for_pass(method: WipeMethod, pass: u32) -> WipeResult<Vec<u8>> {
    match method {
        WipeMethod::Dod => DodWipe::pattern(pass),
        WipeMethod::Nist => NistWipe::pattern(),
        WipeMethod::Gutmann => Ok(GutmannWipe::pattern(pass)),
        WipeMethod::Random => RandomWipe::pattern(),
        WipeMethod::Zero => Ok(ZeroWipe::pattern()),
    }
}

/// Cryptographically random chunk for the methods that require one.
pub(crate) fn random_chunk() -> WipeResult<Vec<u8>> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    secure_random_bytes(&mut buf).map_err(|e| WipeError::Rng(e.to_string()))?;
    Ok(buf)
}
