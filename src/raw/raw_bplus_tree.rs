use core::borrow::Borrow;

use alloc::vec::Vec;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{InternalNode, LeafNode, Node, SearchResult};

/// The core B+ tree backing `BPlusTreeSet`.
///
/// All mutation is a descent from the root to a leaf, recording the path taken,
/// followed by a local edit at the leaf and a walk back up the recorded path
/// applying splits (insert) or borrows/merges (remove) until a node absorbs
/// the change.
pub(crate) struct RawBPlusTree<E, const K: usize> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<E, K>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Total number of elements, equal to the sum of leaf key counts.
    len: usize,
    /// Handle to the first (leftmost) leaf, for ascending traversal.
    first_leaf: Option<Handle>,
    /// Handle to the last (rightmost) leaf, for descending traversal.
    last_leaf: Option<Handle>,
}

/// One step of a root-to-leaf descent.
struct PathElement {
    /// Handle to the internal node at this level.
    node: Handle,
    /// Index of the child we descended into.
    child_index: usize,
}

/// A descent path: the stack of internal nodes above the current leaf.
/// This stands in for parent back-pointers.
type Path = SmallVec<[PathElement; 16]>;

impl<E, const K: usize> RawBPlusTree<E, K> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
            first_leaf: None,
            last_leaf: None,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
        self.first_leaf = None;
        self.last_leaf = None;
    }

    pub(crate) fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<E, K> {
        self.nodes.get(handle)
    }

    pub(crate) fn first_leaf(&self) -> Option<Handle> {
        self.first_leaf
    }

    pub(crate) fn last_leaf(&self) -> Option<Handle> {
        self.last_leaf
    }

    /// Smallest element, if any. Reads the leftmost leaf directly.
    pub(crate) fn first(&self) -> Option<&E> {
        self.nodes.get(self.first_leaf?).as_leaf().first_key()
    }

    /// Largest element, if any. Reads the rightmost leaf directly.
    pub(crate) fn last(&self) -> Option<&E> {
        self.nodes.get(self.last_leaf?).as_leaf().last_key()
    }

    /// Drains all elements in ascending order by walking the leaf chain.
    /// O(n), avoids any rebalancing.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<E> {
        let mut result = Vec::with_capacity(self.len);
        let mut current = self.first_leaf;

        while let Some(leaf_handle) = current {
            let leaf = self.nodes.get_mut(leaf_handle).as_leaf_mut();
            current = leaf.next();
            result.extend(leaf.take_all());
        }

        self.clear();
        result
    }
}

impl<E: Ord + Clone, const K: usize> RawBPlusTree<E, K> {
    /// Descends to the unique leaf whose key range covers `key`, recording the
    /// child index taken at every internal node.
    fn locate_leaf<Q>(&self, root: Handle, key: &Q, path: &mut Path) -> Handle
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = root;
        loop {
            match self.nodes.get(current) {
                Node::Internal(internal) => {
                    let child_index = internal.search_child(key);
                    path.push(PathElement {
                        node: current,
                        child_index,
                    });
                    current = internal.child(child_index);
                }
                Node::Leaf(_) => return current,
            }
        }
    }

    /// Returns true if the tree contains `key`.
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(root) = self.root else {
            return false;
        };
        let mut current = root;
        loop {
            match self.nodes.get(current) {
                Node::Internal(internal) => {
                    current = internal.child(internal.search_child(key));
                }
                Node::Leaf(leaf) => {
                    return matches!(leaf.search(key), SearchResult::Found(_));
                }
            }
        }
    }

    /// Inserts an element. Returns false (and changes nothing) if an equal
    /// element is already present.
    pub(crate) fn insert(&mut self, element: E) -> bool {
        let Some(root) = self.root else {
            let mut leaf = LeafNode::new();
            leaf.push(element);
            let leaf_handle = self.nodes.alloc(Node::Leaf(leaf));
            self.root = Some(leaf_handle);
            self.first_leaf = Some(leaf_handle);
            self.last_leaf = Some(leaf_handle);
            self.len = 1;
            return true;
        };

        let mut path: Path = SmallVec::new();
        let leaf_handle = self.locate_leaf(root, &element, &mut path);

        let leaf = self.nodes.get_mut(leaf_handle).as_leaf_mut();
        match leaf.search(&element) {
            SearchResult::Found(_) => false,
            SearchResult::NotFound(idx) => {
                leaf.insert(idx, element);
                self.len += 1;

                if leaf.is_overfull() {
                    self.split_leaf_and_propagate(leaf_handle, &mut path);
                }
                true
            }
        }
    }

    /// Splits an overfull leaf and hands the separator to the parent,
    /// splitting further up as needed.
    fn split_leaf_and_propagate(&mut self, leaf_handle: Handle, path: &mut Path) {
        let leaf = self.nodes.get_mut(leaf_handle).as_leaf_mut();
        let (separator, mut right_leaf) = leaf.split();

        // Splice the new leaf into the chain.
        let old_next = leaf.next();
        right_leaf.set_prev(Some(leaf_handle));
        right_leaf.set_next(old_next);
        let right_handle = self.nodes.alloc(Node::Leaf(right_leaf));

        self.nodes.get_mut(leaf_handle).as_leaf_mut().set_next(Some(right_handle));
        if let Some(old_next) = old_next {
            self.nodes.get_mut(old_next).as_leaf_mut().set_prev(Some(right_handle));
        }
        if self.last_leaf == Some(leaf_handle) {
            self.last_leaf = Some(right_handle);
        }

        self.propagate_split(path, separator, right_handle);
    }

    /// Walks the recorded path upward, inserting the separator and new right
    /// sibling at each level, until a node has room or the root splits.
    fn propagate_split(&mut self, path: &mut Path, mut separator: E, mut new_child: Handle) {
        while let Some(elem) = path.pop() {
            let parent = self.nodes.get_mut(elem.node).as_internal_mut();
            parent.insert_child(elem.child_index, separator, new_child);

            if !parent.is_overfull() {
                return;
            }

            let (median, right_internal) = parent.split();
            separator = median;
            new_child = self.nodes.alloc(Node::Internal(right_internal));
        }

        // The root itself split: grow the tree by one level.
        let old_root = self.root.expect("split propagation implies a non-empty tree");
        let mut new_root = InternalNode::new();
        new_root.set_first_child(old_root);
        new_root.push_child(separator, new_child);
        self.root = Some(self.nodes.alloc(Node::Internal(new_root)));
    }

    /// Removes an element. Returns false (and changes nothing) if no equal
    /// element is present.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(root) = self.root else {
            return false;
        };

        let mut path: Path = SmallVec::new();
        let leaf_handle = self.locate_leaf(root, key, &mut path);

        let leaf = self.nodes.get_mut(leaf_handle).as_leaf_mut();
        let idx = match leaf.search(key) {
            SearchResult::Found(idx) => idx,
            SearchResult::NotFound(_) => return false,
        };

        leaf.remove(idx);
        self.len -= 1;

        if self.len == 0 {
            // Back to the construction state.
            self.clear();
            return true;
        }

        // A removed leaf minimum may leave its copy behind as a separator in
        // some ancestor; stale separators still partition the key space
        // correctly, so nothing needs refreshing.
        if self.nodes.get(leaf_handle).as_leaf().is_underfull() && !path.is_empty() {
            self.rebalance_leaf(leaf_handle, &mut path);
        }
        true
    }

    /// Restores the minimum-occupancy invariant of an underfull leaf using its
    /// nearest sibling: the left one when it exists, otherwise the right one.
    /// Borrow when the sibling has surplus, merge when it does not.
    fn rebalance_leaf(&mut self, leaf_handle: Handle, path: &mut Path) {
        let parent_elem = path.last().expect("underfull leaf is not the root");
        let parent_handle = parent_elem.node;
        let child_idx = parent_elem.child_index;
        let parent = self.nodes.get(parent_handle).as_internal();

        if child_idx > 0 {
            let left_handle = parent.child(child_idx - 1);
            if self.nodes.get(left_handle).as_leaf().can_lend() {
                self.borrow_from_left_leaf(leaf_handle, left_handle, parent_handle, child_idx);
            } else {
                self.merge_leaves(left_handle, leaf_handle, path, child_idx - 1);
            }
        } else {
            let right_handle = parent.child(child_idx + 1);
            if self.nodes.get(right_handle).as_leaf().can_lend() {
                self.borrow_from_right_leaf(leaf_handle, right_handle, parent_handle, child_idx);
            } else {
                self.merge_leaves(leaf_handle, right_handle, path, child_idx);
            }
        }
    }

    /// Moves the left sibling's largest key into the front of `leaf_handle`.
    /// The moved key becomes the leaf's new minimum, hence the new separator.
    fn borrow_from_left_leaf(&mut self, leaf_handle: Handle, left_handle: Handle, parent_handle: Handle, child_idx: usize) {
        let left = self.nodes.get_mut(left_handle).as_leaf_mut();
        let moved = left.pop().expect("lending sibling is not empty");
        let separator = moved.clone();

        self.nodes.get_mut(leaf_handle).as_leaf_mut().push_front(moved);
        self.nodes.get_mut(parent_handle).as_internal_mut().set_key(child_idx - 1, separator);
    }

    /// Moves the right sibling's smallest key onto the back of `leaf_handle`.
    /// The sibling's new minimum becomes the new separator.
    fn borrow_from_right_leaf(&mut self, leaf_handle: Handle, right_handle: Handle, parent_handle: Handle, child_idx: usize) {
        let right = self.nodes.get_mut(right_handle).as_leaf_mut();
        let moved = right.pop_front().expect("lending sibling is not empty");
        let separator = right.first_key().expect("lending sibling keeps at least one key").clone();

        self.nodes.get_mut(leaf_handle).as_leaf_mut().push(moved);
        self.nodes.get_mut(parent_handle).as_internal_mut().set_key(child_idx, separator);
    }

    /// Merges the right leaf into the left one and drops the separator
    /// between them from the parent.
    fn merge_leaves(&mut self, left_handle: Handle, right_handle: Handle, path: &mut Path, separator_idx: usize) {
        let right = match self.nodes.take(right_handle) {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => panic!("expected leaf node"),
        };

        let left = self.nodes.get_mut(left_handle).as_leaf_mut();
        left.merge_with_right(right);
        let new_next = left.next();

        if let Some(next_handle) = new_next {
            self.nodes.get_mut(next_handle).as_leaf_mut().set_prev(Some(left_handle));
        }
        if self.last_leaf == Some(right_handle) {
            self.last_leaf = Some(left_handle);
        }

        self.remove_separator_and_propagate(path, separator_idx);
    }

    /// Removes a separator (and the merged-away child to its right) from the
    /// parent, then rebalances the parent if the removal underfilled it.
    fn remove_separator_and_propagate(&mut self, path: &mut Path, separator_idx: usize) {
        let parent_elem = path.pop().expect("merge target has a parent");
        let parent_handle = parent_elem.node;

        self.nodes.get_mut(parent_handle).as_internal_mut().remove_child(separator_idx);

        if path.is_empty() {
            // The parent is the root. A root holding no separators routes
            // everything to its single child, so that child becomes the root
            // and the tree shrinks by one level.
            let parent = self.nodes.get(parent_handle).as_internal();
            if parent.key_count() == 0 {
                let new_root = parent.child(0);
                self.nodes.free(parent_handle);
                self.root = Some(new_root);
            }
            return;
        }

        if self.nodes.get(parent_handle).as_internal().is_underfull() {
            self.rebalance_internal(parent_handle, path);
        }
    }

    /// Internal-node counterpart of [`rebalance_leaf`](Self::rebalance_leaf):
    /// same sibling choice, but keys rotate through the parent separator and
    /// carry a child handle with them.
    fn rebalance_internal(&mut self, node_handle: Handle, path: &mut Path) {
        let parent_elem = path.last().expect("underfull node is not the root");
        let parent_handle = parent_elem.node;
        let child_idx = parent_elem.child_index;
        let parent = self.nodes.get(parent_handle).as_internal();

        if child_idx > 0 {
            let left_handle = parent.child(child_idx - 1);
            if self.nodes.get(left_handle).as_internal().can_lend() {
                self.borrow_from_left_internal(node_handle, left_handle, parent_handle, child_idx);
            } else {
                self.merge_internals(left_handle, node_handle, path, child_idx - 1);
            }
        } else {
            let right_handle = parent.child(child_idx + 1);
            if self.nodes.get(right_handle).as_internal().can_lend() {
                self.borrow_from_right_internal(node_handle, right_handle, parent_handle, child_idx);
            } else {
                self.merge_internals(node_handle, right_handle, path, child_idx);
            }
        }
    }

    /// Rotates the left sibling's last key/child through the parent: the
    /// parent separator drops into `node_handle` and the sibling's last key
    /// replaces it in the parent.
    fn borrow_from_left_internal(&mut self, node_handle: Handle, left_handle: Handle, parent_handle: Handle, child_idx: usize) {
        let parent_sep = self.nodes.get(parent_handle).as_internal().key(child_idx - 1).clone();

        let left = self.nodes.get_mut(left_handle).as_internal_mut();
        let (left_key, left_child) = left.pop_child().expect("lending sibling is not empty");

        self.nodes.get_mut(node_handle).as_internal_mut().push_child_front(parent_sep, left_child);
        self.nodes.get_mut(parent_handle).as_internal_mut().set_key(child_idx - 1, left_key);
    }

    /// Mirror image of [`borrow_from_left_internal`](Self::borrow_from_left_internal).
    fn borrow_from_right_internal(&mut self, node_handle: Handle, right_handle: Handle, parent_handle: Handle, child_idx: usize) {
        let parent_sep = self.nodes.get(parent_handle).as_internal().key(child_idx).clone();

        let right = self.nodes.get_mut(right_handle).as_internal_mut();
        let (right_key, right_child) = right.pop_child_front().expect("lending sibling is not empty");

        self.nodes.get_mut(node_handle).as_internal_mut().push_child(parent_sep, right_child);
        self.nodes.get_mut(parent_handle).as_internal_mut().set_key(child_idx, right_key);
    }

    /// Merges the right internal node into the left one, pulling the parent
    /// separator down between their key runs, then drops that separator from
    /// the parent.
    fn merge_internals(&mut self, left_handle: Handle, right_handle: Handle, path: &mut Path, separator_idx: usize) {
        let parent_handle = path.last().expect("merge target has a parent").node;
        let separator = self.nodes.get(parent_handle).as_internal().key(separator_idx).clone();

        let right = match self.nodes.take(right_handle) {
            Node::Internal(internal) => internal,
            Node::Leaf(_) => panic!("expected internal node"),
        };

        self.nodes.get_mut(left_handle).as_internal_mut().merge_with_right(separator, right);
        self.remove_separator_and_propagate(path, separator_idx);
    }
}
