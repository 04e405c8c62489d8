//! Error types for vector operations.
//!
//! Every failure is detected at the point of violation and reported to the
//! caller before anything is modified. Misuse of a [`TransientVector`]
//! (driving it from another thread, or touching it after it has been frozen)
//! is rejected at compile time and therefore has no runtime variant here.
//!
//! [`TransientVector`]: crate::persistent::TransientVector

/// Represents the ways an operation on a vector can fail.
///
/// # Examples
///
/// ```rust
/// use trie_vector::{PersistentVector, VectorError};
///
/// let vector: PersistentVector<i32> = (0..3).collect();
/// assert_eq!(
///     vector.try_get(3),
///     Err(VectorError::IndexOutOfRange { index: 3, length: 3 })
/// );
///
/// let empty: PersistentVector<i32> = PersistentVector::new();
/// assert_eq!(empty.pop_back().unwrap_err(), VectorError::EmptyCollection);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorError {
    /// The index is outside `[0, length)`.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The length of the vector at the time of the call.
        length: usize,
    },
    /// The operation needs at least one element.
    EmptyCollection,
}

impl VectorError {
    pub(crate) const fn index_out_of_range(index: usize, length: usize) -> Self {
        Self::IndexOutOfRange { index, length }
    }
}

impl std::fmt::Display for VectorError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { index, length } => {
                write!(
                    formatter,
                    "index out of range: the length is {length} but the index is {index}"
                )
            }
            Self::EmptyCollection => write!(formatter, "cannot pop from an empty vector"),
        }
    }
}

impl std::error::Error for VectorError {}
