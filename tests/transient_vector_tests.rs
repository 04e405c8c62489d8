//! Integration tests for TransientVector.

use rstest::rstest;
use trie_vector::persistent::{PersistentVector, TransientVector};
use trie_vector::VectorError;

#[rstest]
fn test_new_transient_is_empty() {
    let transient: TransientVector<i32> = TransientVector::new();
    assert!(transient.is_empty());
    assert_eq!(transient.len(), 0);
    assert_eq!(transient.get(0), None);
    assert!(transient.persistent().is_empty());
}

#[rstest]
fn test_push_back_chains() {
    let mut transient = TransientVector::default();
    transient.push_back(1).push_back(2).push_back(3);
    assert_eq!(transient.len(), 3);
    assert_eq!(transient.get(2), Some(&3));
}

#[rstest]
#[case(31)]
#[case(32)]
#[case(33)]
#[case(1_024)]
#[case(1_057)]
#[case(70_000)]
fn test_push_back_then_persistent(#[case] count: usize) {
    let mut transient = TransientVector::new();
    for element in 0..count {
        transient.push_back(element);
        assert_eq!(transient.get(element), Some(&element));
    }
    let vector = transient.persistent();
    assert_eq!(vector.len(), count);
    assert!(vector.iter().copied().eq(0..count));
}

#[rstest]
fn test_transient_from_vector_leaves_source_unchanged() {
    let source: PersistentVector<usize> = (0..5_000).collect();
    let mut transient = source.clone().transient();
    for index in (0..5_000).step_by(7) {
        transient.set(index, 0).unwrap();
    }
    transient.extend(5_000..6_000);
    let updated = transient.persistent();

    assert_eq!(source.len(), 5_000);
    assert!(source.iter().copied().eq(0..5_000));
    assert_eq!(updated.len(), 6_000);
    for index in 0..6_000 {
        let expected = if index < 5_000 && index % 7 == 0 { 0 } else { index };
        assert_eq!(updated.get(index), Some(&expected));
    }
}

#[rstest]
fn test_frozen_result_is_safe_to_share_with_later_transients() {
    let first: PersistentVector<usize> = (0..2_000).collect();

    let mut second_transient = first.clone().transient();
    second_transient.set(0, 42).unwrap();
    second_transient.push_back(2_000);
    let second = second_transient.persistent();

    let mut third_transient = second.clone().transient();
    third_transient.set(0, 43).unwrap();
    let third = third_transient.persistent();

    assert_eq!(first.get(0), Some(&0));
    assert_eq!(second.get(0), Some(&42));
    assert_eq!(third.get(0), Some(&43));
    assert_eq!(second.len(), 2_001);
    assert_eq!(third.len(), 2_001);
}

#[rstest]
fn test_persistent_vector_keeps_working_after_transient_episode() {
    let vector = {
        let mut transient = TransientVector::new();
        transient.extend(0..100);
        transient.persistent()
    };
    let pushed = vector.push_back(100);
    let (popped, element) = pushed.pop_back().unwrap();

    assert_eq!(element, 100);
    assert_eq!(popped, vector);
    assert_eq!(vector.set(50, -1).unwrap().get(50), Some(&-1));
}

#[rstest]
#[case(0, 0)]
#[case(10, 10)]
#[case(10, 11)]
fn test_set_out_of_range(#[case] length: usize, #[case] index: usize) {
    let mut transient = TransientVector::new();
    transient.extend(0..length);
    assert_eq!(
        transient.set(index, 0),
        Err(VectorError::IndexOutOfRange { index, length })
    );
}

#[rstest]
fn test_debug_does_not_print_elements() {
    let mut transient = TransientVector::new();
    transient.push_back("secret");
    let debug = format!("{transient:?}");
    assert!(debug.starts_with("TransientVector"));
    assert!(!debug.contains("secret"));
}
