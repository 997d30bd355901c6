pub mod secure_rng;

pub use secure_rng::{calculate_entropy, secure_random_bytes};
