//! Transient (temporarily mutable) vector for batch construction.
//!
//! A [`TransientVector`] works on the same nodes as [`PersistentVector`], but
//! every node it creates or copies is tagged with the transient's own
//! [`OwnerToken`] and is mutated in place afterwards. Nodes it merely shares
//! with persistent vectors are frozen and are copied the first time the
//! transient writes through them.
//!
//! # Lifecycle
//!
//! A transient is created from a persistent vector (or empty), mutated, and
//! consumed exactly once by [`TransientVector::persistent`]. Both ways of
//! misusing it are compile errors rather than runtime failures:
//!
//! - `persistent` takes `self` by value, so the transient cannot be touched
//!   after it has been frozen.
//! - `TransientVector` is neither `Send` nor `Sync`, so it cannot be driven
//!   from any thread but the one that created it.
//!
//! [`PersistentVector`]: super::PersistentVector
//! [`OwnerToken`]: super::node::OwnerToken

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use arrayvec::ArrayVec;

use super::ReferenceCounter;
use super::node::{
    BITS_PER_LEVEL, BRANCHING_FACTOR, MASK, Node, OwnerToken, ensure_editable, new_path,
    trie_is_full,
};
use super::vector::PersistentVector;
use crate::error::VectorError;

// =============================================================================
// TransientVector Definition
// =============================================================================

/// A transient (temporarily mutable) vector for efficient batch updates.
///
/// # Design
///
/// - Owns a fresh owner token; nodes tagged with it are mutated in place,
///   all others are copied before the first write
/// - The tail is an inline buffer of 32 slots written in place
/// - `PhantomData<Rc<()>>` ensures `!Send` and `!Sync`
/// - Clone/Copy traits are intentionally not implemented (linear type semantics)
///
/// # Examples
///
/// ```rust
/// use trie_vector::persistent::TransientVector;
///
/// let mut transient = TransientVector::new();
/// for value in 0..100 {
///     transient.push_back(value);
/// }
///
/// let vector = transient.persistent();
/// assert_eq!(vector.get(0), Some(&0));
/// assert_eq!(vector.get(99), Some(&99));
/// assert!(vector.try_get(100).is_err());
/// ```
///
/// # Transient-Persistent Pattern
///
/// ```rust
/// use trie_vector::persistent::PersistentVector;
///
/// let persistent: PersistentVector<i32> = (0..10).collect();
///
/// let mut transient = persistent.clone().transient();
/// transient.push_back(10).push_back(11);
/// transient.set(0, -1).unwrap();
///
/// let updated = transient.persistent();
/// assert_eq!(updated.len(), 12);
/// assert_eq!(updated.get(0), Some(&-1));
/// assert_eq!(persistent.get(0), Some(&0)); // Original unchanged
/// ```
///
/// # Misuse
///
/// Using a transient after [`Self::persistent`], or from another thread, does
/// not compile:
///
/// ```compile_fail
/// use trie_vector::persistent::TransientVector;
///
/// let mut transient = TransientVector::new();
/// transient.push_back(1);
/// let _vector = transient.persistent();
/// transient.push_back(2); // borrow of moved value
/// ```
///
/// ```compile_fail
/// use trie_vector::persistent::TransientVector;
///
/// let mut transient: TransientVector<i32> = TransientVector::new();
/// std::thread::spawn(move || {
///     transient.push_back(1); // `Rc<()>` cannot be sent between threads
/// });
/// ```
pub struct TransientVector<T> {
    length: usize,
    shift: usize,
    root: ReferenceCounter<Node<T>>,
    tail: ArrayVec<T, BRANCHING_FACTOR>,
    owner: OwnerToken,
    /// Marker to ensure `!Send` and `!Sync`.
    _marker: PhantomData<Rc<()>>,
}

// Static assertions to verify TransientVector is not Send/Sync
static_assertions::assert_not_impl_any!(TransientVector<i32>: Send, Sync);
static_assertions::assert_not_impl_any!(TransientVector<String>: Send, Sync);

// Arc feature verification: even with Arc, TransientVector remains !Send/!Sync
#[cfg(feature = "arc")]
mod arc_send_sync_verification_vector {
    use super::TransientVector;
    use std::sync::Arc;

    static_assertions::assert_not_impl_any!(TransientVector<Arc<i32>>: Send, Sync);
    static_assertions::assert_not_impl_any!(TransientVector<Arc<String>>: Send, Sync);
}

// =============================================================================
// TransientVector Implementation
// =============================================================================

impl<T> TransientVector<T> {
    /// Creates a new empty `TransientVector`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::TransientVector;
    ///
    /// let transient: TransientVector<i32> = TransientVector::new();
    /// assert!(transient.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        let owner = OwnerToken::mint();
        trace_structure!(?owner, length = 0_usize, "transient opened");
        Self {
            length: 0,
            shift: BITS_PER_LEVEL,
            root: ReferenceCounter::new(Node::empty_branch(Some(owner))),
            tail: ArrayVec::new(),
            owner,
            _marker: PhantomData,
        }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the transient contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Index of the first tail element.
    #[inline]
    fn tail_offset(&self) -> usize {
        self.length - self.tail.len()
    }

    /// Returns a reference to the element at the given index.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::TransientVector;
    ///
    /// let mut transient = TransientVector::new();
    /// transient.extend(0..50);
    /// assert_eq!(transient.get(40), Some(&40));
    /// assert_eq!(transient.get(50), None);
    /// ```
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.length {
            return None;
        }

        let tail_offset = self.tail_offset();
        if index >= tail_offset {
            self.tail.get(index - tail_offset)
        } else {
            self.root
                .leaf_for(self.shift, index)
                .and_then(|elements| elements.get(index & MASK))
        }
    }

    /// Appends an element in place and returns `self` for chaining.
    ///
    /// When the tail is full it becomes a leaf of the trie. Nodes along the
    /// rightmost path that already belong to this transient are written in
    /// place; any other node on that path is copied once and owned from then
    /// on.
    ///
    /// # Complexity
    ///
    /// O(1) amortized; one descent per 32 elements
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::TransientVector;
    ///
    /// let mut transient = TransientVector::new();
    /// transient.push_back(1).push_back(2).push_back(3);
    /// assert_eq!(transient.len(), 3);
    /// ```
    pub fn push_back(&mut self, element: T) -> &mut Self {
        if let Err(overflow) = self.tail.try_push(element) {
            self.push_tail_into_trie();
            self.tail.push(overflow.element());
        }
        self.length += 1;
        self
    }

    /// Moves the full tail into the trie. `self.length` still excludes the
    /// element waiting to be appended.
    fn push_tail_into_trie(&mut self) {
        let owner = self.owner;
        let full_tail: ReferenceCounter<[T]> = std::mem::take(&mut self.tail).into_iter().collect();
        let tail_node = Node::leaf(Some(owner), full_tail);
        trace_structure!(?owner, length = self.length, "tail promoted into trie");

        if trie_is_full(self.length, self.shift) {
            let spine = new_path(Some(owner), self.shift, tail_node);
            let previous_root = self.root.clone();
            self.root = ReferenceCounter::new(Node::grown_root(Some(owner), previous_root, spine));
            self.shift += BITS_PER_LEVEL;
            trace_structure!(
                ?owner,
                length = self.length,
                shift = self.shift,
                "trie height grew"
            );
        } else {
            push_tail_in_place(owner, self.length, self.shift, &mut self.root, tail_node);
        }
    }

    /// Converts this transient into a persistent vector.
    ///
    /// Clears the root's owner tag and freezes the tail at its exact length.
    /// Nodes still carrying this transient's token stay unreachable for
    /// mutation: the token is never handed out again.
    ///
    /// # Complexity
    ///
    /// O(1) plus moving at most 32 tail elements
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::TransientVector;
    ///
    /// let mut transient = TransientVector::new();
    /// transient.extend(1..=3);
    /// let persistent = transient.persistent();
    /// assert_eq!(persistent.len(), 3);
    /// ```
    #[must_use]
    pub fn persistent(mut self) -> PersistentVector<T> {
        let root = ensure_editable(&mut self.root, self.owner);
        root.freeze();
        debug_assert!(root.owner().is_none());
        trace_structure!(
            owner = ?self.owner,
            length = self.length,
            "transient finalized"
        );

        let tail: ReferenceCounter<[T]> = self.tail.into_iter().collect();
        PersistentVector::from_parts(self.length, self.shift, self.root, tail)
    }
}

impl<T: Clone> TransientVector<T> {
    /// Opens a transient over the nodes of `vector`.
    ///
    /// The root is copied under a fresh owner token and the tail is copied
    /// into the inline buffer; every other node stays shared until written.
    pub(super) fn from_persistent(vector: PersistentVector<T>) -> Self {
        let owner = OwnerToken::mint();
        let (length, shift, root, tail) = vector.into_parts();
        trace_structure!(?owner, length, "transient opened");
        Self {
            length,
            shift,
            root: ReferenceCounter::new(root.copy_for_owner(Some(owner))),
            tail: tail.iter().cloned().collect(),
            owner,
            _marker: PhantomData,
        }
    }

    /// Replaces the element at `index` in place.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::IndexOutOfRange`] if `index >= self.len()`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trie_vector::persistent::PersistentVector;
    ///
    /// let vector: PersistentVector<i32> = (0..100).collect();
    /// let mut transient = vector.clone().transient();
    /// transient.set(10, -10).unwrap();
    /// assert!(transient.set(100, 0).is_err());
    ///
    /// let updated = transient.persistent();
    /// assert_eq!(updated.get(10), Some(&-10));
    /// assert_eq!(vector.get(10), Some(&10));
    /// ```
    pub fn set(&mut self, index: usize, element: T) -> Result<(), VectorError> {
        if index >= self.length {
            return Err(VectorError::index_out_of_range(index, self.length));
        }

        let tail_offset = self.tail_offset();
        if index >= tail_offset {
            self.tail[index - tail_offset] = element;
        } else {
            assoc_in_place(self.owner, self.shift, &mut self.root, index, element);
        }
        Ok(())
    }
}

// =============================================================================
// In-place Path Updates
// =============================================================================

/// Inserts `tail_node` as the new rightmost leaf below `slot`, copying only
/// the nodes `owner` does not hold yet.
fn push_tail_in_place<T>(
    owner: OwnerToken,
    length: usize,
    level: usize,
    slot: &mut ReferenceCounter<Node<T>>,
    tail_node: Node<T>,
) {
    let node = ensure_editable(slot, owner);
    let subindex = ((length - 1) >> level) & MASK;

    if level == BITS_PER_LEVEL {
        node.put_child(subindex, Some(ReferenceCounter::new(tail_node)));
    } else if let Some(child) = node.child_slot_mut(subindex) {
        push_tail_in_place(owner, length, level - BITS_PER_LEVEL, child, tail_node);
    } else {
        let spine = new_path(Some(owner), level - BITS_PER_LEVEL, tail_node);
        node.put_child(subindex, Some(ReferenceCounter::new(spine)));
    }
}

/// Writes `element` at `index` below `slot`, copying only the nodes `owner`
/// does not hold yet.
fn assoc_in_place<T: Clone>(
    owner: OwnerToken,
    level: usize,
    slot: &mut ReferenceCounter<Node<T>>,
    index: usize,
    element: T,
) {
    let node = ensure_editable(slot, owner);

    if level == 0 {
        node.set_element(index & MASK, element);
    } else if let Some(child) = node.child_slot_mut((index >> level) & MASK) {
        assoc_in_place(owner, level - BITS_PER_LEVEL, child, index, element);
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for TransientVector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for TransientVector<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.push_back(element);
        }
    }
}

impl<T> fmt::Debug for TransientVector<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TransientVector")
            .field("length", &self.length)
            .field("shift", &self.shift)
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn built(count: usize) -> PersistentVector<usize> {
        let mut transient = TransientVector::new();
        transient.extend(0..count);
        transient.persistent()
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(32)]
    #[case(33)]
    #[case(1056)]
    #[case(1057)]
    #[case(40_000)]
    fn test_transient_matches_persistent_push(#[case] count: usize) {
        let by_transient = built(count);
        let by_push = (0..count).fold(PersistentVector::new(), |vector, index| {
            vector.push_back(index)
        });

        assert_eq!(by_transient.len(), by_push.len());
        assert_eq!(by_transient.shift(), by_push.shift());
        assert_eq!(by_transient.tail_slice(), by_push.tail_slice());
        assert_eq!(by_transient, by_push);
    }

    #[rstest]
    fn test_push_back_mutates_owned_nodes_in_place() {
        let mut transient = TransientVector::new();
        transient.extend(0..64);
        let root_before = ReferenceCounter::as_ptr(&transient.root);

        transient.extend(64..96);
        transient.push_back(96);

        assert_eq!(root_before, ReferenceCounter::as_ptr(&transient.root));
        assert_eq!(transient.len(), 97);
    }

    #[rstest]
    fn test_transient_does_not_touch_source_vector() {
        let source = built(2000);
        let leaf_before = source.get(1500).copied();

        let mut transient = source.clone().transient();
        transient.extend(2000..3000);
        transient.set(1500, 0).unwrap();
        transient.set(5, 0).unwrap();
        let result = transient.persistent();

        assert_eq!(source.len(), 2000);
        assert_eq!(source.get(1500).copied(), leaf_before);
        assert_eq!(source.get(5), Some(&5));
        assert_eq!(result.get(1500), Some(&0));
        assert_eq!(result.get(5), Some(&0));
        assert_eq!(result.get(2999), Some(&2999));
    }

    #[rstest]
    fn test_from_persistent_copies_root_under_new_owner() {
        let source = built(100);
        let transient = source.clone().transient();
        assert!(transient.root.is_editable_by(transient.owner));
        assert_eq!(transient.tail.len(), 4);
        assert_eq!(transient.len(), 100);
    }

    #[rstest]
    fn test_persistent_freezes_root_and_trims_tail() {
        let mut transient = TransientVector::new();
        transient.extend(0..45);
        let vector = transient.persistent();
        assert_eq!(vector.tail_slice().len(), 13);
        assert_eq!(vector.tail_slice().first(), Some(&32));
    }

    #[rstest]
    fn test_second_transient_does_not_mutate_first_result() {
        let first = built(100);
        let mut transient = first.clone().transient();
        for index in 0..96 {
            transient.set(index, 0).unwrap();
        }
        let second = transient.persistent();

        assert!(first.iter().copied().eq(0..100));
        assert!(second.iter().take(96).all(|element| *element == 0));
    }

    #[rstest]
    fn test_set_in_tail_and_trie() {
        let mut transient = TransientVector::new();
        transient.extend(0..40);
        transient.set(39, 100).unwrap();
        transient.set(1, 200).unwrap();
        assert_eq!(transient.get(39), Some(&100));
        assert_eq!(transient.get(1), Some(&200));
        assert_eq!(
            transient.set(40, 0),
            Err(VectorError::IndexOutOfRange {
                index: 40,
                length: 40
            })
        );
    }

    #[rstest]
    fn test_debug_does_not_require_debug_elements() {
        struct Opaque;
        let mut transient = TransientVector::new();
        transient.push_back(Opaque);
        let rendered = format!("{transient:?}");
        assert!(rendered.starts_with("TransientVector"));
        assert!(rendered.contains("length: 1"));
    }
}
