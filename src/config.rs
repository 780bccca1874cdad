//! Checker configuration: the fixed constants of the conjecture under test.
//!
//! The defaults reproduce the conjecture as stated. Other values are useful
//! for experiments, e.g. showing that an undoubled walk (multiplicity 1)
//! breaks the consistency check.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::{DEFAULT_PATH_MULTIPLICITY, DEFAULT_RETAINED_PAIRS};

/// Conjecture constants used by the graph and the trial driver.
///
/// ## Parameters
///
/// - `path_multiplicity`: weight added per transition edge by `add_path`
/// - `retained_pairs`: pairs kept by "collapse all but one"
/// - `include_empty_in_cycle`: whether every trial's walk also visits the
///   empty string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Weight added to every boundary edge of a path.
    pub path_multiplicity: u64,
    /// Pairs retained at nodes at risk of disconnecting from the empty string.
    pub retained_pairs: u64,
    /// Append the empty string to the cycle elements of every trial.
    pub include_empty_in_cycle: bool,
}

impl CheckerConfig {
    /// Configuration with a custom path multiplicity.
    pub fn with_path_multiplicity(path_multiplicity: u64) -> Self {
        Self {
            path_multiplicity,
            ..Self::default()
        }
    }

    /// Compute the params hash for provenance of reported counterexamples.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(self)
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            path_multiplicity: DEFAULT_PATH_MULTIPLICITY,
            retained_pairs: DEFAULT_RETAINED_PAIRS,
            include_empty_in_cycle: true,
        }
    }
}
