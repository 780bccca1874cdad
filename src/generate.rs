//! Random inputs for hypothesis trials.
//!
//! Two kinds of string sets are produced:
//!
//! - **Random**: independent random strings. Overlaps are rare, so most
//!   walks barely touch the lower layers.
//! - **Substrings**: random substrings of one random superstring. Overlaps
//!   are frequent and the lower layers get exercised hard.
//!
//! All generators take the RNG explicitly; a seeded [`ChaCha8Rng`] makes a
//! whole run reproducible from its seed.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Error type for generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeneratorError {
    /// Bounds that cannot produce a string set.
    #[error("Invalid generator config: {0}")]
    InvalidConfig(String),
}

/// Kind of string set to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationMode {
    /// Substrings of a single random superstring.
    Substrings,
    /// Independent random strings.
    Random,
}

impl GenerationMode {
    /// Parse generation mode from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "s" | "substrings" => Some(Self::Substrings),
            "r" | "random" => Some(Self::Random),
            _ => None,
        }
    }
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Substrings => write!(f, "substrings"),
            Self::Random => write!(f, "random"),
        }
    }
}

/// Bounds for generated string sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of distinct letters, starting from `a`.
    pub alphabet_size: usize,
    /// Upper bound on the number of strings per set (at least 3 are drawn).
    pub max_strings: usize,
    /// Upper bound on the length of a random string (at least 2 is drawn).
    pub max_length: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            alphabet_size: 8,
            max_strings: 10,
            max_length: 6,
        }
    }
}

impl GeneratorConfig {
    /// Check that every range the generators draw from is non-empty.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.alphabet_size == 0 || self.alphabet_size > 26 {
            return Err(GeneratorError::InvalidConfig(format!(
                "alphabet_size must be in 1..=26, got {}",
                self.alphabet_size
            )));
        }
        if self.max_strings < 3 {
            return Err(GeneratorError::InvalidConfig(format!(
                "max_strings must be at least 3, got {}",
                self.max_strings
            )));
        }
        if self.max_length < 2 {
            return Err(GeneratorError::InvalidConfig(format!(
                "max_length must be at least 2, got {}",
                self.max_length
            )));
        }
        Ok(())
    }

    /// Generate one string set of the given kind.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        mode: GenerationMode,
    ) -> Result<Vec<String>, GeneratorError> {
        self.validate()?;
        Ok(match mode {
            GenerationMode::Substrings => substring_set(rng, self),
            GenerationMode::Random => random_set(rng, self),
        })
    }
}

/// Create a seeded RNG for reproducible runs.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Random permutation of `elements`, read as a cyclic order.
pub fn shuffled_order<R: Rng + ?Sized>(rng: &mut R, elements: &[String]) -> Vec<String> {
    let mut order = elements.to_vec();
    order.shuffle(rng);
    order
}

/// String of length in `[2, max_length]` over the first `alphabet_size` letters.
fn random_string<R: Rng + ?Sized>(rng: &mut R, alphabet_size: usize, max_length: usize) -> String {
    let len = rng.gen_range(2..=max_length);
    (0..len)
        .map(|_| char::from(b'a' + rng.gen_range(0..alphabet_size) as u8))
        .collect()
}

fn random_set<R: Rng + ?Sized>(rng: &mut R, config: &GeneratorConfig) -> Vec<String> {
    let count = rng.gen_range(3..=config.max_strings);
    (0..count)
        .map(|_| random_string(rng, config.alphabet_size, config.max_length))
        .collect()
}

fn substring_set<R: Rng + ?Sized>(rng: &mut R, config: &GeneratorConfig) -> Vec<String> {
    let count = rng.gen_range(3..=config.max_strings);
    let superstring_max = rng.gen_range(config.max_length..=config.max_length * count / 2);
    let superstring: Vec<char> = random_string(rng, config.alphabet_size, superstring_max)
        .chars()
        .collect();

    (0..count)
        .map(|_| {
            let mut start = rng.gen_range(0..superstring.len());
            let mut end = rng.gen_range(0..superstring.len());
            if start > end {
                std::mem::swap(&mut start, &mut end);
            }
            superstring[start..=end].iter().collect()
        })
        .collect()
}
