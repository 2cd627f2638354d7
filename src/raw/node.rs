use core::borrow::Borrow;

use smallvec::SmallVec;

use super::handle::Handle;

// Inline capacities cover small orders (plus the transient overflow slot a
// node holds mid-split); larger orders spill to the heap.
const KEY_INLINE: usize = 9;
const CHILD_INLINE: usize = 10;

/// A tree node: either an internal routing node or a leaf holding elements.
///
/// The two cases are separate types rather than one struct with an `is_leaf`
/// flag, so child links simply do not exist on leaves and every algorithm
/// pattern-matches on the case it expects.
pub(crate) enum Node<E, const K: usize> {
    Internal(InternalNode<E, K>),
    Leaf(LeafNode<E, K>),
}

/// Internal nodes hold `n` separator keys and `n + 1` child handles.
///
/// The separator between `children[i]` and `children[i + 1]` is a copy of the
/// smallest key in the subtree rooted at `children[i + 1]`, so a search for a
/// key equal to a separator descends right.
pub(crate) struct InternalNode<E, const K: usize> {
    keys: SmallVec<[E; KEY_INLINE]>,
    children: SmallVec<[Handle; CHILD_INLINE]>,
}

/// Leaf nodes hold the elements themselves, plus chain links to the
/// neighboring leaves for ordered traversal.
pub(crate) struct LeafNode<E, const K: usize> {
    prev: Option<Handle>,
    next: Option<Handle>,
    keys: SmallVec<[E; KEY_INLINE]>,
}

/// Result of searching for a key within a single node.
pub(crate) enum SearchResult {
    /// Key is present at the given index.
    Found(usize),
    /// Key is absent; index is where it would be inserted.
    NotFound(usize),
}

impl<E, const K: usize> Node<E, K> {
    /// Maximum keys per node: the order `2k`.
    pub(crate) const MAX_KEYS: usize = {
        assert!(K >= 1, "B+ tree order parameter `K` must be at least 1");
        2 * K
    };
    /// Minimum keys per non-root node.
    pub(crate) const MIN_KEYS: usize = K;

    /// Returns the leaf node, panicking if this is not a leaf.
    pub(crate) fn as_leaf(&self) -> &LeafNode<E, K> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => panic!("expected leaf node"),
        }
    }

    /// Returns the leaf node mutably, panicking if this is not a leaf.
    pub(crate) fn as_leaf_mut(&mut self) -> &mut LeafNode<E, K> {
        match self {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => panic!("expected leaf node"),
        }
    }

    /// Returns the internal node, panicking if this is not internal.
    pub(crate) fn as_internal(&self) -> &InternalNode<E, K> {
        match self {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => panic!("expected internal node"),
        }
    }

    /// Returns the internal node mutably, panicking if this is not internal.
    pub(crate) fn as_internal_mut(&mut self) -> &mut InternalNode<E, K> {
        match self {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => panic!("expected internal node"),
        }
    }
}

impl<E, const K: usize> InternalNode<E, K> {
    pub(crate) fn new() -> Self {
        Self {
            keys: SmallVec::new(),
            children: SmallVec::new(),
        }
    }

    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    /// True if this node holds more than `2k` keys and must split.
    pub(crate) fn is_overfull(&self) -> bool {
        self.keys.len() > Node::<E, K>::MAX_KEYS
    }

    /// True if this node holds fewer than `k` keys and needs rebalancing
    /// (unless it is the root).
    pub(crate) fn is_underfull(&self) -> bool {
        self.keys.len() < Node::<E, K>::MIN_KEYS
    }

    /// True if this node can give up a key without itself underflowing.
    pub(crate) fn can_lend(&self) -> bool {
        self.keys.len() > Node::<E, K>::MIN_KEYS
    }

    #[inline]
    pub(crate) fn key(&self, index: usize) -> &E {
        &self.keys[index]
    }

    pub(crate) fn keys(&self) -> &[E] {
        &self.keys
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> Handle {
        self.children[index]
    }

    /// Index of the child to descend into for `key`.
    ///
    /// The smallest `i` with `key < keys[i]`, or the last child when no such
    /// separator exists. A key equal to a separator belongs to the right
    /// subtree, whose minimum the separator copies.
    #[inline]
    pub(crate) fn search_child<Q>(&self, key: &Q) -> usize
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.keys.binary_search_by(|k| k.borrow().cmp(key)) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        }
    }

    /// Inserts a separator and the right half of a split child.
    ///
    /// `index` is the position the split child occupied; the new child lands
    /// immediately to its right.
    pub(crate) fn insert_child(&mut self, index: usize, key: E, child: Handle) {
        self.keys.insert(index, key);
        self.children.insert(index + 1, child);
    }

    /// Removes the separator at `index` and the child to its right.
    pub(crate) fn remove_child(&mut self, index: usize) -> (E, Handle) {
        let key = self.keys.remove(index);
        let child = self.children.remove(index + 1);
        (key, child)
    }

    pub(crate) fn push_child(&mut self, key: E, child: Handle) {
        self.keys.push(key);
        self.children.push(child);
    }

    /// Prepends a separator and a new first child.
    pub(crate) fn push_child_front(&mut self, key: E, child: Handle) {
        self.keys.insert(0, key);
        self.children.insert(0, child);
    }

    /// Sets the first child (before any separators).
    pub(crate) fn set_first_child(&mut self, child: Handle) {
        if self.children.is_empty() {
            self.children.push(child);
        } else {
            self.children[0] = child;
        }
    }

    pub(crate) fn set_key(&mut self, index: usize, key: E) {
        self.keys[index] = key;
    }

    /// Removes the last separator and the last child.
    pub(crate) fn pop_child(&mut self) -> Option<(E, Handle)> {
        let key = self.keys.pop()?;
        let child = self.children.pop().expect("internal node has a child per key");
        Some((key, child))
    }

    /// Removes the first separator and the first child.
    pub(crate) fn pop_child_front(&mut self) -> Option<(E, Handle)> {
        if self.keys.is_empty() {
            return None;
        }
        let key = self.keys.remove(0);
        let child = self.children.remove(0);
        Some((key, child))
    }

    /// Splits this node around its middle key. Returns `(separator, right)`.
    ///
    /// The middle key moves up to the parent (it is not duplicated); the
    /// remaining keys and the children split left/right around it.
    pub(crate) fn split(&mut self) -> (E, InternalNode<E, K>) {
        let mid = self.keys.len() / 2;

        let mut right = InternalNode::new();
        right.keys = self.keys.drain(mid + 1..).collect();
        right.children = self.children.drain(mid + 1..).collect();

        let separator = self.keys.pop().expect("split node has a middle key");
        (separator, right)
    }

    /// Absorbs the right sibling, with the separator from the parent
    /// re-inserted between the two key runs.
    pub(crate) fn merge_with_right(&mut self, separator: E, mut right: InternalNode<E, K>) {
        self.keys.push(separator);
        self.keys.append(&mut right.keys);
        self.children.append(&mut right.children);
    }
}

impl<E, const K: usize> LeafNode<E, K> {
    pub(crate) fn new() -> Self {
        Self {
            prev: None,
            next: None,
            keys: SmallVec::new(),
        }
    }

    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// True if this leaf holds more than `2k` keys and must split.
    pub(crate) fn is_overfull(&self) -> bool {
        self.keys.len() > Node::<E, K>::MAX_KEYS
    }

    /// True if this leaf holds fewer than `k` keys and needs rebalancing
    /// (unless it is the root).
    pub(crate) fn is_underfull(&self) -> bool {
        self.keys.len() < Node::<E, K>::MIN_KEYS
    }

    /// True if this leaf can give up a key without itself underflowing.
    pub(crate) fn can_lend(&self) -> bool {
        self.keys.len() > Node::<E, K>::MIN_KEYS
    }

    pub(crate) fn prev(&self) -> Option<Handle> {
        self.prev
    }

    pub(crate) fn set_prev(&mut self, prev: Option<Handle>) {
        self.prev = prev;
    }

    pub(crate) fn next(&self) -> Option<Handle> {
        self.next
    }

    pub(crate) fn set_next(&mut self, next: Option<Handle>) {
        self.next = next;
    }

    #[inline]
    pub(crate) fn key(&self, index: usize) -> &E {
        &self.keys[index]
    }

    pub(crate) fn keys(&self) -> &[E] {
        &self.keys
    }

    pub(crate) fn first_key(&self) -> Option<&E> {
        self.keys.first()
    }

    pub(crate) fn last_key(&self) -> Option<&E> {
        self.keys.last()
    }

    /// Binary search within this leaf.
    #[inline]
    pub(crate) fn search<Q>(&self, key: &Q) -> SearchResult
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.keys.binary_search_by(|k| k.borrow().cmp(key)) {
            Ok(idx) => SearchResult::Found(idx),
            Err(idx) => SearchResult::NotFound(idx),
        }
    }

    /// Inserts a key at the given position, preserving sort order.
    pub(crate) fn insert(&mut self, index: usize, key: E) {
        self.keys.insert(index, key);
    }

    pub(crate) fn remove(&mut self, index: usize) -> E {
        self.keys.remove(index)
    }

    pub(crate) fn push(&mut self, key: E) {
        self.keys.push(key);
    }

    pub(crate) fn push_front(&mut self, key: E) {
        self.keys.insert(0, key);
    }

    pub(crate) fn pop(&mut self) -> Option<E> {
        self.keys.pop()
    }

    pub(crate) fn pop_front(&mut self) -> Option<E> {
        if self.keys.is_empty() {
            return None;
        }
        Some(self.keys.remove(0))
    }

    /// Takes ownership of all keys, leaving the leaf empty.
    pub(crate) fn take_all(&mut self) -> SmallVec<[E; KEY_INLINE]> {
        core::mem::take(&mut self.keys)
    }

    /// Splits this leaf. Returns `(separator, right)`.
    ///
    /// The left half keeps the lower `ceil((2k + 1) / 2)` keys; the separator
    /// is a copy of the right half's smallest key, which stays in the leaf
    /// (standard B+ tree leaf duplication).
    pub(crate) fn split(&mut self) -> (E, LeafNode<E, K>)
    where
        E: Clone,
    {
        let mid = self.keys.len().div_ceil(2);

        let mut right = LeafNode::new();
        right.keys = self.keys.drain(mid..).collect();

        let separator = right.keys.first().expect("split leaf has a right half").clone();
        (separator, right)
    }

    /// Absorbs the right sibling, taking over its outgoing chain link.
    pub(crate) fn merge_with_right(&mut self, mut right: LeafNode<E, K>) {
        self.keys.append(&mut right.keys);
        self.next = right.next;
    }
}
