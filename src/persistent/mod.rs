//! Persistent vector trie and its transient builder.
//!
//! - [`PersistentVector`]: immutable vector (32-way bitmapped trie + tail)
//! - [`TransientVector`]: exclusively owned builder over the same nodes
//!
//! # Structural Sharing
//!
//! Every operation on a [`PersistentVector`] copies only the nodes on one
//! root-to-leaf path. All other subtrees are shared between the old and the
//! new version.
//!
//! ```rust
//! use trie_vector::persistent::PersistentVector;
//!
//! let vector: PersistentVector<i32> = (0..100).collect();
//! let updated = vector.set(50, 999).unwrap();
//! assert_eq!(vector.get(50), Some(&50));     // Original unchanged
//! assert_eq!(updated.get(50), Some(&999));   // New version
//! ```
//!
//! # Transients
//!
//! ```rust
//! use trie_vector::persistent::{PersistentVector, TransientVector};
//!
//! let mut transient = TransientVector::new();
//! for value in 0..1000 {
//!     transient.push_back(value);
//! }
//! let vector: PersistentVector<i32> = transient.persistent();
//! assert_eq!(vector.len(), 1000);
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod node;
mod transient;
mod vector;

pub use transient::TransientVector;
pub use vector::PersistentVector;
pub use vector::PersistentVectorIntoIterator;
pub use vector::PersistentVectorIterator;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod reference_counter_tests {
    use super::ReferenceCounter;
    use rstest::rstest;

    #[rstest]
    fn test_reference_counter_make_mut_on_unique_does_not_copy() {
        let mut reference_counter: ReferenceCounter<Vec<i32>> = ReferenceCounter::new(vec![1]);
        let before = ReferenceCounter::as_ptr(&reference_counter);
        ReferenceCounter::make_mut(&mut reference_counter).push(2);
        assert_eq!(before, ReferenceCounter::as_ptr(&reference_counter));
        assert_eq!(*reference_counter, vec![1, 2]);
    }

    #[rstest]
    fn test_reference_counter_make_mut_on_shared_copies() {
        let mut reference_counter: ReferenceCounter<Vec<i32>> = ReferenceCounter::new(vec![1]);
        let shared = reference_counter.clone();
        ReferenceCounter::make_mut(&mut reference_counter).push(2);
        assert_eq!(*shared, vec![1]);
        assert_eq!(*reference_counter, vec![1, 2]);
    }
}
