//! Trie nodes shared by [`PersistentVector`] and [`TransientVector`].
//!
//! A node is a fixed 32-slot unit carrying an owner tag. A node without an
//! owner is frozen: it may be referenced from any number of vectors and is
//! never written to. A node tagged with an [`OwnerToken`] belongs to exactly
//! one live transient, which may mutate it in place.
//!
//! [`PersistentVector`]: super::PersistentVector
//! [`TransientVector`]: super::TransientVector

use std::sync::atomic::{AtomicU64, Ordering};

use super::ReferenceCounter;

// =============================================================================
// Constants
// =============================================================================

/// Branching factor (2^5 = 32)
pub(crate) const BRANCHING_FACTOR: usize = 32;

/// Bits per level in the trie
pub(crate) const BITS_PER_LEVEL: usize = 5;

/// Bit mask for extracting index within a node
pub(crate) const MASK: usize = BRANCHING_FACTOR - 1;

/// Child slots of a branch node.
pub(crate) type Children<T> = [Option<ReferenceCounter<Node<T>>>; BRANCHING_FACTOR];

// =============================================================================
// OwnerToken
// =============================================================================

static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);

/// Identity of one transient construction episode.
///
/// Tokens come from a process-wide counter and are never reused, so nodes
/// left behind by a finalized transient can never be mistaken for nodes of a
/// later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct OwnerToken(u64);

impl OwnerToken {
    /// Mints a fresh token.
    pub(crate) fn mint() -> Self {
        Self(NEXT_OWNER.fetch_add(1, Ordering::Relaxed))
    }
}

// =============================================================================
// Node Definition
// =============================================================================

/// Slot contents, selected by the node's level in the trie.
pub(crate) enum Slots<T> {
    /// Internal node: up to 32 children one level down
    Branch(Children<T>),
    /// Bottom level: exactly 32 elements (or fewer, for a tail in flight)
    Leaf(ReferenceCounter<[T]>),
}

impl<T> Clone for Slots<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Branch(children) => Self::Branch(children.clone()),
            Self::Leaf(elements) => Self::Leaf(elements.clone()),
        }
    }
}

/// One 32-way unit of the trie.
pub(crate) struct Node<T> {
    owner: Option<OwnerToken>,
    slots: Slots<T>,
}

/// Cloning is shallow: children and leaf storage are shared.
impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        Self {
            owner: self.owner,
            slots: self.slots.clone(),
        }
    }
}

impl<T> Node<T> {
    /// Creates a branch node with every slot empty.
    pub(crate) fn empty_branch(owner: Option<OwnerToken>) -> Self {
        Self {
            owner,
            slots: Slots::Branch(std::array::from_fn(|_| None)),
        }
    }

    /// Creates a leaf node around existing storage.
    ///
    /// The storage is reused as is; promoting a persistent tail into the trie
    /// only bumps its reference count.
    pub(crate) const fn leaf(owner: Option<OwnerToken>, elements: ReferenceCounter<[T]>) -> Self {
        Self {
            owner,
            slots: Slots::Leaf(elements),
        }
    }

    /// Creates the root of a trie one level taller than `previous_root`.
    ///
    /// Slot 0 holds the previous root, slot 1 the freshly built `spine`.
    pub(crate) fn grown_root(
        owner: Option<OwnerToken>,
        previous_root: ReferenceCounter<Self>,
        spine: Self,
    ) -> Self {
        let mut root = Self::empty_branch(owner);
        root.put_child(0, Some(previous_root));
        root.put_child(1, Some(ReferenceCounter::new(spine)));
        root
    }

    /// Returns a node with the same slots tagged for `owner`.
    pub(crate) fn copy_for_owner(&self, owner: Option<OwnerToken>) -> Self {
        Self {
            owner,
            slots: self.slots.clone(),
        }
    }

    /// Returns `true` if `owner` may mutate this node in place.
    #[inline]
    pub(crate) fn is_editable_by(&self, owner: OwnerToken) -> bool {
        self.owner == Some(owner)
    }

    /// Clears the owner tag, making the node safe to share.
    #[inline]
    pub(crate) const fn freeze(&mut self) {
        self.owner = None;
    }

    #[inline]
    pub(crate) const fn owner(&self) -> Option<OwnerToken> {
        self.owner
    }

    #[inline]
    pub(crate) const fn children(&self) -> Option<&Children<T>> {
        match &self.slots {
            Slots::Branch(children) => Some(children),
            Slots::Leaf(_) => None,
        }
    }

    #[inline]
    pub(crate) const fn elements(&self) -> Option<&ReferenceCounter<[T]>> {
        match &self.slots {
            Slots::Leaf(elements) => Some(elements),
            Slots::Branch(_) => None,
        }
    }

    /// Returns the child at `index`, if this is a branch and the slot is set.
    #[inline]
    pub(crate) fn child(&self, index: usize) -> Option<&ReferenceCounter<Self>> {
        self.children().and_then(|children| children[index].as_ref())
    }

    /// Mutable access to an occupied child slot.
    #[inline]
    pub(crate) fn child_slot_mut(&mut self, index: usize) -> Option<&mut ReferenceCounter<Self>> {
        match &mut self.slots {
            Slots::Branch(children) => children[index].as_mut(),
            Slots::Leaf(_) => None,
        }
    }

    /// Overwrites the child slot at `index`. Leaves are left untouched.
    pub(crate) fn put_child(&mut self, index: usize, child: Option<ReferenceCounter<Self>>) {
        debug_assert!(
            matches!(self.slots, Slots::Branch(_)),
            "put_child on a leaf node"
        );
        if let Slots::Branch(children) = &mut self.slots {
            children[index] = child;
        }
    }

    /// Finds the leaf storage holding `index` in a trie of height `shift`
    /// rooted at `self`.
    pub(crate) fn leaf_for(&self, shift: usize, index: usize) -> Option<&ReferenceCounter<[T]>> {
        let mut node = self;
        let mut level = shift;

        while level > 0 {
            node = node.child((index >> level) & MASK)?;
            level -= BITS_PER_LEVEL;
        }

        node.elements()
    }
}

impl<T: Clone> Node<T> {
    /// Returns a frozen copy of this leaf with `element` at slot `index`.
    pub(crate) fn with_element(&self, index: usize, element: T) -> Self {
        let mut copy = self.copy_for_owner(None);
        copy.set_element(index, element);
        copy
    }

    /// Writes `element` at slot `index` of this leaf.
    ///
    /// The storage is written in place when nothing else references it;
    /// otherwise it is copied first.
    pub(crate) fn set_element(&mut self, index: usize, element: T) {
        if let Slots::Leaf(elements) = &mut self.slots {
            if let Some(values) = ReferenceCounter::get_mut(elements) {
                values[index] = element;
            } else {
                let mut values = elements.to_vec();
                values[index] = element;
                *elements = ReferenceCounter::from(values);
            }
        }
    }
}

// =============================================================================
// Path Helpers
// =============================================================================

/// Builds a chain of single-child branches `level / 5` deep ending in `node`.
pub(crate) fn new_path<T>(owner: Option<OwnerToken>, level: usize, node: Node<T>) -> Node<T> {
    if level == 0 {
        return node;
    }
    let mut branch = Node::empty_branch(owner);
    branch.put_child(
        0,
        Some(ReferenceCounter::new(new_path(
            owner,
            level - BITS_PER_LEVEL,
            node,
        ))),
    );
    branch
}

/// Hands out the node behind `slot` for in-place mutation by `owner`.
///
/// A node tagged with another owner (or frozen) is first replaced by a copy
/// tagged for `owner`. The copy is referenced only from `slot`, so the
/// following `make_mut` never clones again.
pub(crate) fn ensure_editable<T>(
    slot: &mut ReferenceCounter<Node<T>>,
    owner: OwnerToken,
) -> &mut Node<T> {
    if !slot.is_editable_by(owner) {
        *slot = ReferenceCounter::new(slot.copy_for_owner(Some(owner)));
    }
    ReferenceCounter::make_mut(slot)
}

/// Returns `true` when a trie of height `shift` has no room for another leaf
/// while the vector holds `length` elements and a full tail.
#[inline]
pub(crate) fn trie_is_full(length: usize, shift: usize) -> bool {
    let capacity_in_leaves = u32::try_from(shift)
        .ok()
        .and_then(|shift| 1_usize.checked_shl(shift))
        .unwrap_or(usize::MAX);
    (length >> BITS_PER_LEVEL) > capacity_in_leaves
}

// =============================================================================
// Tests
// =============================================================================
