#![cfg(feature = "serde")]

//! Integration tests for serde support.
//!
//! A vector serializes as a plain sequence and deserializes through a
//! transient.

use rstest::rstest;
use trie_vector::persistent::PersistentVector;

#[rstest]
fn test_vector_json_roundtrip() {
    let vector: PersistentVector<i32> = (1..=10).collect();
    let json = serde_json::to_string(&vector).unwrap();
    assert_eq!(json, "[1,2,3,4,5,6,7,8,9,10]");

    let restored: PersistentVector<i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(vector, restored);
}

#[rstest]
fn test_empty_vector_json_roundtrip() {
    let vector: PersistentVector<String> = PersistentVector::new();
    let json = serde_json::to_string(&vector).unwrap();
    assert_eq!(json, "[]");

    let restored: PersistentVector<String> = serde_json::from_str(&json).unwrap();
    assert!(restored.is_empty());
}

#[rstest]
fn test_large_vector_json_roundtrip() {
    let vector: PersistentVector<u32> = (0..40_000).collect();
    let json = serde_json::to_string(&vector).unwrap();
    let restored: PersistentVector<u32> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.len(), 40_000);
    assert_eq!(vector, restored);
}

#[rstest]
fn test_nested_vector_json() {
    let inner: PersistentVector<i32> = (0..3).collect();
    let outer = PersistentVector::new().push_back(inner.clone()).push_back(inner);
    let json = serde_json::to_string(&outer).unwrap();
    assert_eq!(json, "[[0,1,2],[0,1,2]]");
}

#[rstest]
fn test_deserialize_rejects_non_sequence() {
    let result: Result<PersistentVector<i32>, _> = serde_json::from_str("{\"a\":1}");
    assert!(result.is_err());
}
