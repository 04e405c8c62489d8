//! # trie-vector
//!
//! A persistent (immutable, versioned) indexed sequence built as a 32-way
//! bitmapped vector trie with a trailing tail buffer.
//!
//! ## Overview
//!
//! - **[`PersistentVector`]**: immutable vector with O(log32 N) random access,
//!   update, append and removal from the end. Every operation returns a new
//!   vector sharing all untouched subtrees with the original.
//! - **[`TransientVector`]**: an exclusively owned, temporarily mutable view
//!   over the same representation, used to batch many appends without
//!   allocating a new path per element. It is frozen back into a
//!   [`PersistentVector`] exactly once.
//!
//! ## Feature Flags
//!
//! - `arc`: use `Arc` instead of `Rc` for node sharing, so vectors can be
//!   read from several threads at once
//! - `serde`: serialize and deserialize vector contents as sequences
//! - `tracing`: emit `trace` level events on structural changes of the trie
//! - `full`: enable all features
//!
//! ## Example
//!
//! ```rust
//! use trie_vector::prelude::*;
//!
//! let vector: PersistentVector<i32> = (0..100).collect();
//! assert_eq!(vector.get(99), Some(&99));
//!
//! let updated = vector.set(10, -1).unwrap();
//! assert_eq!(vector.get(10), Some(&10));
//! assert_eq!(updated.get(10), Some(&-1));
//!
//! let mut transient = updated.transient();
//! transient.push_back(100).push_back(101);
//! let extended = transient.persistent();
//! assert_eq!(extended.len(), 102);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

#[macro_use]
mod trace;

pub mod error;
pub mod persistent;

pub use error::VectorError;
pub use persistent::{
    PersistentVector, PersistentVectorIntoIterator, PersistentVectorIterator, TransientVector,
};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use trie_vector::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::VectorError;
    pub use crate::persistent::*;
}
