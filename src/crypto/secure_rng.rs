use anyhow::{anyhow, Result};
use ring::rand::{SecureRandom, SystemRandom};
use std::fs::File;
use std::io::Read;
use std::sync::Mutex;

/// Trait for entropy sources
pub trait EntropySource: Send + Sync {
    /// Fill buffer with random bytes
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()>;
    /// Check if source is available
    fn is_available(&self) -> bool;
    /// Get source name for logging
    fn name(&self) -> &str;
}

/// Ring-based system random (uses OS facilities)
pub struct RingSystemRNG {
    rng: SystemRandom,
}

impl Default for RingSystemRNG {
    fn default() -> Self {
        Self::new()
    }
}

impl RingSystemRNG {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl EntropySource for RingSystemRNG {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        self.rng
            .fill(dest)
            .map_err(|_| anyhow!("Ring SystemRandom failed"))?;
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "RingSystemRNG"
    }
}

/// OS urandom entropy source (fallback)
pub struct URandom {
    available: bool,
}

impl Default for URandom {
    fn default() -> Self {
        Self::new()
    }
}

impl URandom {
    pub fn new() -> Self {
        let available = std::path::Path::new("/dev/urandom").exists();
        Self { available }
    }
}

impl EntropySource for URandom {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        if !self.available {
            return Err(anyhow!("/dev/urandom not available"));
        }

        let mut file = File::open("/dev/urandom")
            .map_err(|e| anyhow!("Failed to open /dev/urandom: {}", e))?;

        file.read_exact(dest)
            .map_err(|e| anyhow!("Failed to read from /dev/urandom: {}", e))?;

        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn name(&self) -> &str {
        "URandom"
    }
}

/// FIPS 140-2 style continuous random number generator test: two
/// consecutive identical output blocks indicate a stuck source.
pub(crate) struct ContinuousTest {
    last_block: Option<Vec<u8>>,
    failure_count: u64,
}

impl ContinuousTest {
    pub(crate) fn new() -> Self {
        Self {
            last_block: None,
            failure_count: 0,
        }
    }

    pub(crate) fn test(&mut self, data: &[u8]) -> bool {
        // Test 16-byte blocks as per FIPS 140-2
        if data.len() < 16 {
            return true; // Skip test for small blocks
        }

        let test_block = &data[..16];

        if let Some(ref last) = self.last_block {
            if last == test_block {
                self.failure_count += 1;
                tracing::warn!("continuous RNG test failed: identical blocks detected");
                return false;
            }
        }

        self.last_block = Some(test_block.to_vec());
        true
    }

    #[cfg(test)]
    pub(crate) fn failures(&self) -> u64 {
        self.failure_count
    }
}

/// Cryptographically secure random generator with a fallback entropy source.
///
/// Wiped bytes are a defense against forensic recovery, so fill requests
/// must never degrade to a general-purpose PRNG: the primary source is the
/// OS CSPRNG via ring, the fallback reads /dev/urandom directly.
pub struct SecureRng {
    primary: Box<dyn EntropySource>,
    fallback: Box<dyn EntropySource>,
    continuous_test: Mutex<ContinuousTest>,
}

impl SecureRng {
    pub fn new() -> Result<Self> {
        let primary = Box::new(RingSystemRNG::new()) as Box<dyn EntropySource>;
        let fallback = Box::new(URandom::new()) as Box<dyn EntropySource>;

        if !primary.is_available() && !fallback.is_available() {
            return Err(anyhow!("No entropy sources available"));
        }

        tracing::debug!(
            primary = primary.name(),
            fallback = fallback.name(),
            fallback_available = fallback.is_available(),
            "secure RNG initialized"
        );

        Ok(Self {
            primary,
            fallback,
            continuous_test: Mutex::new(ContinuousTest::new()),
        })
    }

    /// Fill buffer with cryptographically secure random bytes
    pub fn fill_bytes(&self, dest: &mut [u8]) -> Result<()> {
        let filled = match self.primary.fill_bytes(dest) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(source = self.primary.name(), error = %e, "entropy source failed");
                false
            }
        };

        if !filled {
            self.fallback.fill_bytes(dest)?;
        }

        let mut test = self.continuous_test.lock().unwrap();
        if !test.test(dest) {
            return Err(anyhow!("continuous RNG test failed"));
        }

        Ok(())
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL_RNG: SecureRng = SecureRng::new()
        .expect("Failed to initialize global secure RNG");
}

/// Convenience function to fill bytes using the global RNG
pub fn secure_random_bytes(dest: &mut [u8]) -> Result<()> {
    GLOBAL_RNG.fill_bytes(dest)
}

/// Calculate Shannon entropy of data in bits per byte (for verification)
pub fn calculate_entropy(data: &[u8]) -> f64 {
    let mut counts = [0u64; 256];
    for &byte in data {
        counts[byte as usize] += 1;
    }

    let length = data.len() as f64;
    let mut entropy = 0.0;

    for &count in &counts {
        if count > 0 {
            let probability = count as f64 / length;
            entropy -= probability * probability.log2();
        }
    }

    entropy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_bytes_produces_output() {
        let mut buf = [0u8; 256];
        secure_random_bytes(&mut buf).expect("fill should succeed");

        // 256 random bytes being all zero is astronomically unlikely
        assert!(buf.iter().any(|&b| b != 0), "buffer should not stay zeroed");
    }

    #[test]
    fn test_consecutive_fills_differ() {
        let mut a = [0u8; 64];
        let mut b = [0u8; 64];
        secure_random_bytes(&mut a).unwrap();
        secure_random_bytes(&mut b).unwrap();

        assert_ne!(a, b, "consecutive fills should not repeat");
    }

    #[test]
    fn test_continuous_test_rejects_stuck_source() {
        let mut test = ContinuousTest::new();
        let block = vec![0xABu8; 32];

        assert!(test.test(&block), "first block always passes");
        assert!(!test.test(&block), "repeated block must fail");
        assert_eq!(test.failures(), 1);
    }

    #[test]
    fn test_continuous_test_skips_small_blocks() {
        let mut test = ContinuousTest::new();
        let small = [0u8; 8];

        assert!(test.test(&small));
        assert!(test.test(&small), "blocks under 16 bytes are not tested");
    }

    #[test]
    fn test_entropy_of_constant_data_is_zero() {
        let data = vec![0x42u8; 1024];
        assert_eq!(calculate_entropy(&data), 0.0);
    }

    #[test]
    fn test_entropy_of_random_data_is_high() {
        let mut data = vec![0u8; 4096];
        secure_random_bytes(&mut data).unwrap();

        let entropy = calculate_entropy(&data);
        assert!(
            entropy > 7.0,
            "random data should exceed 7 bits/byte, got {:.2}",
            entropy
        );
    }
}
