//! Canonical serialization for deterministic fingerprints.
//!
//! Snapshot fingerprints and config hashes go through here so that two
//! processes computing them over the same data agree.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: Struct fields serialize in declaration order
//! - No HashMap allowed: Use BTreeMap for maps in hashed data
//! - Floats are quantized to integers by the caller before hashing

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
///
/// Values that cannot be represented as JSON (maps with non-string keys)
/// hash as the empty byte string.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).unwrap_or_default()
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    let bytes = to_canonical_bytes(value);
    xxh64(&bytes, 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_determinism() {
        let mut m = BTreeMap::new();
        m.insert("b", 2);
        m.insert("a", 1);

        assert_eq!(canonical_hash(&m), canonical_hash(&m));
        assert_eq!(canonical_hash_hex(&m).len(), 16);
    }

    #[test]
    fn test_insertion_order_independent() {
        let mut m1 = BTreeMap::new();
        m1.insert("a", 1);
        m1.insert("b", 2);
        let mut m2 = BTreeMap::new();
        m2.insert("b", 2);
        m2.insert("a", 1);

        assert_eq!(canonical_hash(&m1), canonical_hash(&m2));
    }
}
