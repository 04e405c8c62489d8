//! Persistent (immutable) vector based on a bitmapped vector trie.
//!
//! This module provides [`PersistentVector`], an immutable indexed sequence
//! that uses structural sharing for efficient operations.
//!
//! # Overview
//!
//! `PersistentVector` is a 32-way branching trie in the style of Clojure's
//! `PersistentVector`. It provides:
//!
//! - O(log32 N) random access (effectively O(1) for practical sizes)
//! - O(log32 N) `push_back` (amortized O(1) thanks to the tail buffer)
//! - O(log32 N) `set` and `pop_back`
//! - O(1) `len`, `is_empty` and `clone`
//!
//! All operations return new vectors without modifying the original.
//!
//! # Internal Structure
//!
//! The vector consists of:
//! - A root node (32-way branching trie), always frozen
//! - A tail buffer holding the last 1 to 32 elements
//!
//! Every index below the tail offset resolves through the root, every index
//! at or above it resolves through the tail. The tail offset is always a
//! multiple of 32.
//!
//! # Examples
//!
//! ```rust
//! use trie_vector::persistent::PersistentVector;
//!
//! let vector = PersistentVector::new()
//!     .push_back(1)
//!     .push_back(2)
//!     .push_back(3);
//!
//! assert_eq!(vector.get(0), Some(&1));
//! assert_eq!(vector.get(2), Some(&3));
//!
//! // Structural sharing: the original vector is preserved
//! let extended = vector.push_back(4);
//! assert_eq!(vector.len(), 3);     // Original unchanged
//! assert_eq!(extended.len(), 4);   // New vector
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::{FromIterator, FusedIterator};
use std::ops::Index;

use super::ReferenceCounter;
use super::node::{BITS_PER_LEVEL, BRANCHING_FACTOR, MASK, Node, new_path, trie_is_full};
use super::transient::TransientVector;
use crate::error::VectorError;

// =============================================================================
// PersistentVector Definition
// =============================================================================

/// A persistent (immutable) vector based on a bitmapped vector trie.
///
/// # Time Complexity
///
/// | Operation    | Complexity                      |
/// |--------------|---------------------------------|
/// | `new`        | O(1)                            |
/// | `get`        | O(log32 N)                      |
/// | `set`        | O(log32 N)                      |
/// | `push_back`  | O(log32 N), amortized O(1)      |
/// | `pop_back`   | O(log32 N)                      |
/// | `len`        | O(1)                            |
/// | `iter`       | O(1) to create, O(N) to iterate |
///
/// # Examples
///
/// ```rust
/// use trie_vector::persistent::PersistentVector;
///
/// let vector: PersistentVector<i32> = (0..100).collect();
/// assert_eq!(vector.len(), 100);
/// assert_eq!(vector.get(50), Some(&50));
/// ```
pub struct PersistentVector<T> {
    /// Total number of elements
    length: usize,
    /// Shift amount for index calculation: (depth - 1) * `BITS_PER_LEVEL`
    shift: usize,
    /// Root node of the trie
    root: ReferenceCounter<Node<T>>,
    /// Tail buffer for efficient append (up to 32 elements)
    tail: ReferenceCounter<[T]>,
}

/// Cloning only bumps two reference counts.
impl<T> Clone for PersistentVector<T> {
    fn clone(&self) -> Self {
        Self {
            length: self.length,
            shift: self.shift,
            root: self.root.clone(),
            tail: self.tail.clone(),
        }
    }
}

impl<T> PersistentVector<T> {
    /// Creates a new empty vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = PersistentVector::new();
    /// assert!(vector.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            length: 0,
            shift: BITS_PER_LEVEL,
            root: ReferenceCounter::new(Node::empty_branch(None)),
            tail: ReferenceCounter::from(Vec::<T>::new()),
        }
    }

    /// Creates a vector containing a single element.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::PersistentVector;
    ///
    /// let vector = PersistentVector::singleton(42);
    /// assert_eq!(vector.len(), 1);
    /// assert_eq!(vector.get(0), Some(&42));
    /// ```
    #[inline]
    #[must_use]
    pub fn singleton(element: T) -> Self {
        Self {
            length: 1,
            shift: BITS_PER_LEVEL,
            root: ReferenceCounter::new(Node::empty_branch(None)),
            tail: ReferenceCounter::from(vec![element]),
        }
    }

    /// Builds a vector holding `elements` in order.
    ///
    /// The elements are appended through a single transient, so no
    /// intermediate vector is allocated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::PersistentVector;
    ///
    /// let vector = PersistentVector::vector_of(1..=10_000);
    /// assert_eq!(vector.len(), 10_000);
    /// assert_eq!(vector.get(919), Some(&920));
    /// ```
    #[must_use]
    pub fn vector_of<I>(elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        elements.into_iter().collect()
    }

    /// Assembles a vector from parts produced by a transient.
    pub(super) const fn from_parts(
        length: usize,
        shift: usize,
        root: ReferenceCounter<Node<T>>,
        tail: ReferenceCounter<[T]>,
    ) -> Self {
        Self {
            length,
            shift,
            root,
            tail,
        }
    }

    /// Hands the parts over to a transient.
    pub(super) fn into_parts(self) -> (usize, usize, ReferenceCounter<Node<T>>, ReferenceCounter<[T]>) {
        (self.length, self.shift, self.root, self.tail)
    }

    /// Returns the number of elements in the vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.len(), 5);
    /// ```
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the vector contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the empty vector.
    ///
    /// The element type is kept; nothing is shared with `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..10_000).collect();
    /// let cleared = vector.clear();
    /// assert!(cleared.is_empty());
    /// assert_eq!(vector.len(), 10_000);
    /// ```
    #[inline]
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn clear(&self) -> Self {
        Self::new()
    }

    /// Height of the trie encoded as `5 * (levels - 1)`.
    #[cfg(test)]
    pub(crate) const fn shift(&self) -> usize {
        self.shift
    }

    /// Returns the starting index of the tail buffer.
    #[inline]
    const fn tail_offset(&self) -> usize {
        if self.length < BRANCHING_FACTOR {
            0
        } else {
            ((self.length - 1) >> BITS_PER_LEVEL) << BITS_PER_LEVEL
        }
    }

    /// Returns the elements held in the tail buffer.
    ///
    /// These are the most recently appended elements not yet folded into
    /// the trie; the slice is never longer than 32.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..40).collect();
    /// assert_eq!(vector.tail_slice(), &[32, 33, 34, 35, 36, 37, 38, 39]);
    /// ```
    #[inline]
    #[must_use]
    pub fn tail_slice(&self) -> &[T] {
        &self.tail
    }

    /// Returns the 32-element block (leaf or tail) holding `index`.
    fn leaf_for(&self, index: usize) -> Option<&[T]> {
        if index >= self.tail_offset() {
            Some(&*self.tail)
        } else {
            self.root
                .leaf_for(self.shift, index)
                .map(|elements| &**elements)
        }
    }

    /// Like [`Self::leaf_for`], but returns shared ownership of the storage.
    fn shared_leaf_for(&self, index: usize) -> Option<ReferenceCounter<[T]>> {
        if index >= self.tail_offset() {
            Some(self.tail.clone())
        } else {
            self.root.leaf_for(self.shift, index).cloned()
        }
    }

    /// Returns a reference to the element at the given index.
    ///
    /// Returns `None` if the index is out of bounds.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// assert_eq!(vector.get(0), Some(&1));
    /// assert_eq!(vector.get(4), Some(&5));
    /// assert_eq!(vector.get(10), None);
    /// ```
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.length {
            return None;
        }
        self.leaf_for(index)
            .and_then(|elements| elements.get(index & MASK))
    }

    /// Returns a reference to the element at the given index.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::IndexOutOfRange`] if `index >= self.len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::{PersistentVector, VectorError};
    ///
    /// let vector: PersistentVector<i32> = (0..100).collect();
    /// assert_eq!(vector.try_get(99), Ok(&99));
    /// assert_eq!(
    ///     vector.try_get(100),
    ///     Err(VectorError::IndexOutOfRange { index: 100, length: 100 })
    /// );
    /// ```
    pub fn try_get(&self, index: usize) -> Result<&T, VectorError> {
        self.get(index)
            .ok_or_else(|| VectorError::index_out_of_range(index, self.length))
    }

    /// Returns a reference to the first element.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns a reference to the last element.
    ///
    /// # Complexity
    ///
    /// O(1) - the last element is always in the tail
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.tail.last()
    }

    /// Returns an iterator over references to the elements.
    ///
    /// The iterator descends the trie once per 32 elements, so a full pass is
    /// O(N). It can be cloned to restart from the current position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// let collected: Vec<&i32> = vector.iter().collect();
    /// assert_eq!(collected, vec![&1, &2, &3, &4, &5]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentVectorIterator<'_, T> {
        PersistentVectorIterator::new(self)
    }

    /// Calls `function` on every element in index order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=4).collect();
    /// let mut sum = 0;
    /// vector.for_each(|element| sum += element);
    /// assert_eq!(sum, 10);
    /// ```
    pub fn for_each<F>(&self, function: F)
    where
        F: FnMut(&T),
    {
        self.iter().for_each(function);
    }

    /// Builds a new vector by applying `function` to every element.
    ///
    /// The result is assembled in one transient episode. The element type may
    /// change.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=10_000).collect();
    /// let squares = vector.map(|element| i64::from(*element) * i64::from(*element));
    /// assert_eq!(squares.get(9_999), Some(&100_000_000));
    ///
    /// let labels = vector.map(|element| format!("#{element}"));
    /// assert_eq!(labels.get(0).map(String::as_str), Some("#1"));
    /// ```
    #[must_use]
    pub fn map<U, F>(&self, function: F) -> PersistentVector<U>
    where
        F: FnMut(&T) -> U,
    {
        self.iter().map(function).collect()
    }

    /// Finds the index of the first element that satisfies the predicate.
    #[must_use]
    pub fn find_index<P>(&self, predicate: P) -> Option<usize>
    where
        P: Fn(&T) -> bool,
    {
        self.iter().position(predicate)
    }
}

impl<T: Clone> PersistentVector<T> {
    /// Appends an element to the back of the vector.
    ///
    /// Returns a new vector with the element at the end.
    ///
    /// While the tail has room only the tail is copied. When it is full, the
    /// tail becomes a new leaf of the trie: the root absorbs it along the
    /// rightmost path or, if the trie is full at its current height, a new
    /// root is grown on top of it.
    ///
    /// # Complexity
    ///
    /// O(log32 N) amortized O(1) due to tail optimization
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::PersistentVector;
    ///
    /// let vector = PersistentVector::new()
    ///     .push_back(1)
    ///     .push_back(2)
    ///     .push_back(3);
    ///
    /// assert_eq!(vector.len(), 3);
    /// assert_eq!(vector.get(2), Some(&3));
    /// ```
    #[must_use]
    pub fn push_back(&self, element: T) -> Self {
        if self.length - self.tail_offset() < BRANCHING_FACTOR {
            let mut new_tail = Vec::with_capacity(self.tail.len() + 1);
            new_tail.extend_from_slice(&self.tail);
            new_tail.push(element);

            return Self {
                length: self.length + 1,
                shift: self.shift,
                root: self.root.clone(),
                tail: ReferenceCounter::from(new_tail),
            };
        }

        // Reuses the tail storage as the leaf, only the reference count changes
        let tail_node = Node::leaf(None, self.tail.clone());
        trace_structure!(length = self.length, "tail promoted into trie");

        let (root, shift) = if trie_is_full(self.length, self.shift) {
            let spine = new_path(None, self.shift, tail_node);
            trace_structure!(
                length = self.length,
                shift = self.shift + BITS_PER_LEVEL,
                "trie height grew"
            );
            (
                Node::grown_root(None, self.root.clone(), spine),
                self.shift + BITS_PER_LEVEL,
            )
        } else {
            (
                push_tail(self.length, self.shift, &self.root, tail_node),
                self.shift,
            )
        };

        Self {
            length: self.length + 1,
            shift,
            root: ReferenceCounter::new(root),
            tail: ReferenceCounter::from(vec![element]),
        }
    }

    /// Appends multiple elements to the back of the vector.
    ///
    /// All elements go through one transient episode, so only the path to the
    /// growing edge of the trie is copied, once.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=3).collect();
    /// let extended = vector.push_back_many(4..=6);
    ///
    /// assert_eq!(extended.len(), 6);
    /// assert_eq!(vector.len(), 3);
    /// let collected: Vec<i32> = extended.iter().copied().collect();
    /// assert_eq!(collected, vec![1, 2, 3, 4, 5, 6]);
    /// ```
    #[must_use]
    pub fn push_back_many<I>(&self, elements: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut transient = self.clone().transient();
        transient.extend(elements);
        transient.persistent()
    }

    /// Creates a `PersistentVector` from a slice.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::PersistentVector;
    ///
    /// let vector = PersistentVector::from_slice(&[1, 2, 3, 4, 5]);
    /// assert_eq!(vector.len(), 5);
    /// assert_eq!(vector.get(0), Some(&1));
    /// ```
    #[must_use]
    pub fn from_slice(slice: &[T]) -> Self {
        slice.iter().cloned().collect()
    }

    /// Returns a new vector with `element` stored at `index`.
    ///
    /// Only the tail, or the nodes on the path from the root to the target
    /// leaf, are copied. Every other subtree is shared with `self`.
    ///
    /// `index == self.len()` is out of range; use [`Self::push_back`] to
    /// append.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::IndexOutOfRange`] if `index >= self.len()`.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// let updated = vector.set(2, 100).unwrap();
    ///
    /// assert_eq!(updated.get(2), Some(&100));
    /// assert_eq!(vector.get(2), Some(&3)); // Original unchanged
    /// assert!(vector.set(5, 6).is_err());
    /// ```
    pub fn set(&self, index: usize, element: T) -> Result<Self, VectorError> {
        if index >= self.length {
            return Err(VectorError::index_out_of_range(index, self.length));
        }

        let tail_offset = self.tail_offset();

        if index >= tail_offset {
            let mut new_tail = self.tail.to_vec();
            new_tail[index - tail_offset] = element;

            Ok(Self {
                length: self.length,
                shift: self.shift,
                root: self.root.clone(),
                tail: ReferenceCounter::from(new_tail),
            })
        } else {
            Ok(Self {
                length: self.length,
                shift: self.shift,
                root: ReferenceCounter::new(assoc(self.shift, &self.root, index, element)),
                tail: self.tail.clone(),
            })
        }
    }

    /// Removes the last element from the vector.
    ///
    /// Returns the new vector and the removed element.
    ///
    /// If the tail holds more than one element only the tail shrinks.
    /// Otherwise the rightmost leaf of the trie becomes the new tail and the
    /// trie loses that leaf; a root left with a single child collapses one
    /// level.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::EmptyCollection`] if the vector is empty.
    ///
    /// # Complexity
    ///
    /// O(log32 N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (1..=5).collect();
    /// let (remaining, element) = vector.pop_back().unwrap();
    ///
    /// assert_eq!(element, 5);
    /// assert_eq!(remaining.len(), 4);
    /// assert_eq!(vector.len(), 5);
    /// ```
    pub fn pop_back(&self) -> Result<(Self, T), VectorError> {
        let Some(element) = self.tail.last().cloned() else {
            return Err(VectorError::EmptyCollection);
        };

        if self.length == 1 {
            return Ok((Self::new(), element));
        }

        if self.tail.len() > 1 {
            let new_tail = ReferenceCounter::from(&self.tail[..self.tail.len() - 1]);
            let new_vector = Self {
                length: self.length - 1,
                shift: self.shift,
                root: self.root.clone(),
                tail: new_tail,
            };
            return Ok((new_vector, element));
        }

        let Some(new_tail) = self.root.leaf_for(self.shift, self.length - 2).cloned() else {
            unreachable!("every index below the tail offset resolves to a leaf");
        };

        let mut new_root = pop_tail(self.length, self.shift, &self.root)
            .map_or_else(|| ReferenceCounter::new(Node::empty_branch(None)), ReferenceCounter::new);
        let mut new_shift = self.shift;

        if new_shift > BITS_PER_LEVEL
            && new_root.child(1).is_none()
            && let Some(only_child) = new_root.child(0).cloned()
        {
            // A transient may have left its (dead) owner tag on inner nodes
            new_root = if only_child.owner().is_some() {
                ReferenceCounter::new(only_child.copy_for_owner(None))
            } else {
                only_child
            };
            new_shift -= BITS_PER_LEVEL;
            trace_structure!(
                length = self.length - 1,
                shift = new_shift,
                "trie height collapsed"
            );
        }

        let new_vector = Self {
            length: self.length - 1,
            shift: new_shift,
            root: new_root,
            tail: new_tail,
        };
        Ok((new_vector, element))
    }

    /// Converts this vector into a transient for batch updates.
    ///
    /// The transient starts with its own copy of the root and tail; `self`
    /// keeps sharing every other node and is never affected.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..100).collect();
    /// let mut transient = vector.clone().transient();
    /// for value in 100..200 {
    ///     transient.push_back(value);
    /// }
    /// let extended = transient.persistent();
    ///
    /// assert_eq!(vector.len(), 100);
    /// assert_eq!(extended.len(), 200);
    /// ```
    #[must_use]
    pub fn transient(self) -> TransientVector<T> {
        TransientVector::from_persistent(self)
    }
}

// =============================================================================
// Path Copying
// =============================================================================

/// Returns a copy of `parent` with `tail_node` inserted as the new rightmost
/// leaf. `length` is the element count before the append.
fn push_tail<T>(length: usize, level: usize, parent: &Node<T>, tail_node: Node<T>) -> Node<T> {
    let subindex = ((length - 1) >> level) & MASK;
    let mut node = parent.copy_for_owner(None);

    let inserted = if level == BITS_PER_LEVEL {
        tail_node
    } else {
        match parent.child(subindex) {
            Some(child) => push_tail(length, level - BITS_PER_LEVEL, child, tail_node),
            None => new_path(None, level - BITS_PER_LEVEL, tail_node),
        }
    };

    node.put_child(subindex, Some(ReferenceCounter::new(inserted)));
    node
}

/// Returns a copy of the path from `node` down to `index` with `element`
/// stored in the leaf.
fn assoc<T: Clone>(level: usize, node: &Node<T>, index: usize, element: T) -> Node<T> {
    if level == 0 {
        return node.with_element(index & MASK, element);
    }

    let subindex = (index >> level) & MASK;
    let mut copy = node.copy_for_owner(None);
    if let Some(child) = node.child(subindex) {
        let updated = assoc(level - BITS_PER_LEVEL, child, index, element);
        copy.put_child(subindex, Some(ReferenceCounter::new(updated)));
    }
    copy
}

/// Returns a copy of `node` without its rightmost leaf, or `None` when
/// nothing would be left. `length` is the element count before the pop.
fn pop_tail<T>(length: usize, level: usize, node: &Node<T>) -> Option<Node<T>> {
    let subindex = ((length - 2) >> level) & MASK;

    if level > BITS_PER_LEVEL {
        let new_child = node
            .child(subindex)
            .and_then(|child| pop_tail(length, level - BITS_PER_LEVEL, child));
        if new_child.is_none() && subindex == 0 {
            return None;
        }
        let mut copy = node.copy_for_owner(None);
        copy.put_child(subindex, new_child.map(ReferenceCounter::new));
        Some(copy)
    } else if subindex == 0 {
        None
    } else {
        let mut copy = node.copy_for_owner(None);
        copy.put_child(subindex, None);
        Some(copy)
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over references to elements of a [`PersistentVector`].
///
/// Keeps the current 32-element block cached and descends the trie only when
/// crossing into the next block.
pub struct PersistentVectorIterator<'a, T> {
    vector: &'a PersistentVector<T>,
    /// Index of the next element to yield
    index: usize,
    /// Block holding `index` (empty before the first element)
    current_leaf: &'a [T],
}

impl<'a, T> PersistentVectorIterator<'a, T> {
    const fn new(vector: &'a PersistentVector<T>) -> Self {
        Self {
            vector,
            index: 0,
            current_leaf: &[],
        }
    }
}

impl<T> Clone for PersistentVectorIterator<'_, T> {
    fn clone(&self) -> Self {
        Self {
            vector: self.vector,
            index: self.index,
            current_leaf: self.current_leaf,
        }
    }
}

impl<'a, T> Iterator for PersistentVectorIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let vector: &'a PersistentVector<T> = self.vector;
        if self.index >= vector.length {
            return None;
        }

        let offset = self.index & MASK;
        if offset == 0 || self.current_leaf.is_empty() {
            self.current_leaf = vector.leaf_for(self.index)?;
        }

        let element = self.current_leaf.get(offset)?;
        self.index += 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vector.length.saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for PersistentVectorIterator<'_, T> {}

impl<T> FusedIterator for PersistentVectorIterator<'_, T> {}

/// An owning iterator over the elements of a [`PersistentVector`].
///
/// Leaves may be shared with other vectors, so elements are cloned out of
/// them.
pub struct PersistentVectorIntoIterator<T> {
    vector: PersistentVector<T>,
    index: usize,
    current_leaf: Option<ReferenceCounter<[T]>>,
}

impl<T: Clone> Iterator for PersistentVectorIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.vector.length {
            return None;
        }

        let offset = self.index & MASK;
        if offset == 0 || self.current_leaf.is_none() {
            self.current_leaf = self.vector.shared_leaf_for(self.index);
        }

        let element = self.current_leaf.as_ref()?.get(offset)?.clone();
        self.index += 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.vector.length.saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<T: Clone> ExactSizeIterator for PersistentVectorIntoIterator<T> {}

impl<T: Clone> FusedIterator for PersistentVectorIntoIterator<T> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for PersistentVector<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Builds through a single transient episode.
impl<T> FromIterator<T> for PersistentVector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut transient = TransientVector::new();
        transient.extend(iter);
        transient.persistent()
    }
}

impl<T: Clone> IntoIterator for PersistentVector<T> {
    type Item = T;
    type IntoIter = PersistentVectorIntoIterator<T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        PersistentVectorIntoIterator {
            vector: self,
            index: 0,
            current_leaf: None,
        }
    }
}

impl<'a, T> IntoIterator for &'a PersistentVector<T> {
    type Item = &'a T;
    type IntoIter = PersistentVectorIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Index<usize> for PersistentVector<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `index >= self.len()`, like slice indexing.
    fn index(&self, index: usize) -> &Self::Output {
        match self.try_get(index) {
            Ok(element) => element,
            Err(error) => panic!("{error}"),
        }
    }
}

impl<T: PartialEq> PartialEq for PersistentVector<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.length != other.length {
            return false;
        }
        if ReferenceCounter::ptr_eq(&self.root, &other.root)
            && ReferenceCounter::ptr_eq(&self.tail, &other.tail)
        {
            return true;
        }
        self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for PersistentVector<T> {}

/// Hashes the length, then every element in order, so equal vectors hash
/// equally regardless of how their tries were built.
impl<T: Hash> Hash for PersistentVector<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PersistentVector<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for PersistentVector<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "[")?;
        let mut first = true;
        for element in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{element}")?;
        }
        write!(formatter, "]")
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for PersistentVector<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct PersistentVectorVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for PersistentVectorVisitor<T>
where
    T: serde::Deserialize<'de>,
{
    type Value = PersistentVector<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut transient = TransientVector::new();
        while let Some(element) = seq.next_element()? {
            transient.push_back(element);
        }
        Ok(transient.persistent())
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for PersistentVector<T>
where
    T: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(PersistentVectorVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Send / Sync
// =============================================================================

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentVector<i32>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentVector<String>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentVector<i32>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
