//! Canonical serialization for edge-state fingerprints.
//!
//! Graph states are compared across trials by hashing a canonical JSON
//! rendering of their edge multiplicities. A trial must leave no trace in
//! the next one, so graph states are compared by fingerprint: every layered
//! node in layer order, with both counters. The same hash
//! tags each reported counterexample with the checker settings it ran under.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: struct fields serialize in declaration order
//! - Stable Vec order: callers fix the order before hashing (layer order
//!   for edge states)
//! - No HashMap in hashed data: use BTreeMap or sorted Vecs

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    // Plain structs, strings and integers only; serialization cannot fail.
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}
