//! Deterministic RNG for path simulation
//!
//! TigerStyle: ChaCha20-based RNG for reproducibility.
//!
//! Every trial owns its own generator. Trial `i` of a batch seeded with `s`
//! reads ChaCha20 stream `i` of key `s`, so a batch gives the same answer
//! no matter how trials are scheduled across threads.

use appflow_core::{parse_seed, SIMULATION_SEED_ENV};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Deterministic random number generator
///
/// Given the same seed and stream, produces the same sequence of values.
#[derive(Debug, Clone)]
pub struct DeterministicRng {
    /// Seed the batch was started from (for logging/reproduction)
    seed: u64,
    /// ChaCha stream selected for this generator
    stream: u64,
    rng: ChaCha20Rng,
}

impl DeterministicRng {
    /// Create a new deterministic RNG with the given seed (stream 0)
    pub fn new(seed: u64) -> Self {
        Self::for_stream(seed, 0)
    }

    /// Create an RNG reading an independent stream of the given seed
    pub fn for_stream(seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self { seed, stream, rng }
    }

    /// Read the seed from `APPFLOW_SEED` or generate a random one
    ///
    /// An unparsable value is reported and replaced by a random seed.
    /// Always logs the seed for reproducibility.
    pub fn seed_from_env_or_random() -> u64 {
        let seed = match std::env::var(SIMULATION_SEED_ENV) {
            Ok(text) => parse_seed(&text).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring {}, drawing a random seed", SIMULATION_SEED_ENV);
                rand::random()
            }),
            Err(_) => rand::random(),
        };

        tracing::info!(seed = seed, "Simulation seed (set APPFLOW_SEED={} to replay)", seed);
        seed
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the stream this RNG reads
    pub fn stream(&self) -> u64 {
        self.stream
    }

    /// Generate a random f64 in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Generate a random bool with given probability of true
    ///
    /// Probability 0 is never true and probability 1 is always true.
    pub fn next_bool(&mut self, probability: f64) -> bool {
        debug_assert!(
            (0.0..=1.0).contains(&probability),
            "probability must be in [0, 1]"
        );
        self.next_f64() < probability
    }

    /// Generate a uniform value in [0, bound)
    pub fn next_below(&mut self, bound: u64) -> u64 {
        debug_assert!(bound > 0, "bound must be positive");
        self.rng.gen_range(0..bound)
    }

    /// Generate a random index for a slice of given length
    pub fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "length must be positive");
        self.rng.gen_range(0..len)
    }
}
