//! # collapse-hypothesis
//!
//! Empirical checker for the layered overlap-collapse conjecture.
//!
//! The checker answers one question:
//!
//! > Given a set of strings and a cyclic order on them, does the equivalence
//! > induced at every layer of the collapsed prefix/suffix graph refine into
//! > the one induced at the layer below?
//!
//! ## Core Contract
//!
//! 1. Build the layered graph of every prefix/suffix of the string set
//! 2. Overlay a doubled closed walk following the cyclic order
//! 3. From the top layer down to layer 1: check weak-component consistency,
//!    then collapse the layer onto the one below
//! 4. A failed check falsifies the conjecture for that input
//!
//! ## Architecture
//!
//! ```text
//! Generator → HypothesisChecker → LayeredGraph → NodeRegistry → Node
//!                   ↓                  ↓
//!              TrialOutcome     traversal::{upper, lower, reaches_empty}
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Layers are iterated in lexicographic order
//! - Same string set + same order → identical outcome and edge fingerprint,
//!   regardless of which trials ran before
//! - Seeded generators reproduce a whole run from its seed

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod registry;
pub mod traversal;
pub mod graph;
pub mod config;
pub mod canonical;
pub mod trial;
pub mod generate;

// Re-exports
pub use types::{Node, NodeId, EdgeSide, EdgeState};
pub use registry::NodeRegistry;
pub use graph::{LayeredGraph, WeakComponents};
pub use config::CheckerConfig;
pub use trial::{HypothesisChecker, TrialOutcome, TrialSummary, TrialError};
pub use generate::{
    GenerationMode, GeneratorConfig, GeneratorError,
    seeded_rng, shuffled_order,
};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};

/// Weight added to every boundary edge of a path.
///
/// Each transition of the walk is traversed in both directions by the
/// consistency check, hence two.
pub const DEFAULT_PATH_MULTIPLICITY: u64 = 2;

/// Pairs kept by "collapse all but one".
pub const DEFAULT_RETAINED_PAIRS: u64 = 1;
