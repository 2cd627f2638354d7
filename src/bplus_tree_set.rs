use core::borrow::Borrow;
use core::fmt;
use core::iter::FusedIterator;

use alloc::vec;

use crate::error::EmptyTreeError;
use crate::raw::{Handle, Node, RawBPlusTree};

/// An ordered set backed by a B+ tree of order `2 * K`.
///
/// Elements must form a total order through [`Ord`]. Each element is stored at
/// most once: inserting a present element or removing an absent one is a
/// silent no-op reported through the `bool` return value, never an error.
///
/// `K` is the tree's balance parameter: every node holds at most `2 * K` keys,
/// and every non-root node holds at least `K`. The default `K = 2` gives the
/// smallest useful fan-out; larger values trade deeper rebalancing for
/// shallower trees.
///
/// It is a logic error for an element to be modified in such a way that its
/// ordering relative to any other element, as determined by the [`Ord`] trait,
/// changes while it is in the set.
///
/// # Examples
///
/// ```
/// use bplus_tree::BPlusTreeSet;
///
/// let mut primes: BPlusTreeSet<u32> = BPlusTreeSet::new();
///
/// primes.insert(5);
/// primes.insert(2);
/// primes.insert(3);
/// primes.insert(7);
///
/// assert!(primes.contains(&3));
/// assert!(!primes.contains(&4));
///
/// // Duplicates are rejected, absent removals are harmless.
/// assert!(!primes.insert(7));
/// assert!(!primes.remove(&11));
///
/// let sorted: Vec<u32> = primes.iter().copied().collect();
/// assert_eq!(sorted, [2, 3, 5, 7]);
/// ```
pub struct BPlusTreeSet<E, const K: usize = 2> {
    raw: RawBPlusTree<E, K>,
}

/// Visit order for [`BPlusTreeSet::for_each`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Traversal {
    /// Smallest to largest.
    Ascending,
    /// Largest to smallest.
    Descending,
    /// Whatever order is cheapest for the tree (currently ascending).
    #[default]
    Unspecified,
}

impl<E, const K: usize> BPlusTreeSet<E, K> {
    /// Makes a new, empty set.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_tree::BPlusTreeSet;
    ///
    /// let mut set: BPlusTreeSet<i32> = BPlusTreeSet::new();
    /// set.insert(1);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raw: RawBPlusTree::new(),
        }
    }

    /// Returns the number of elements in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if the set contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the set, removing all elements.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the smallest element, if any.
    #[must_use]
    pub fn first(&self) -> Option<&E> {
        self.raw.first()
    }

    /// Returns the largest element, if any.
    #[must_use]
    pub fn last(&self) -> Option<&E> {
        self.raw.last()
    }

    /// Returns the smallest element, or [`EmptyTreeError`] if the set is empty.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyTreeError`] when the set holds no elements; nothing is
    /// mutated in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_tree::{BPlusTreeSet, EmptyTreeError};
    ///
    /// let mut set: BPlusTreeSet<i32> = BPlusTreeSet::new();
    /// assert_eq!(set.min(), Err(EmptyTreeError));
    ///
    /// set.insert(7);
    /// set.insert(3);
    /// assert_eq!(set.min(), Ok(&3));
    /// ```
    pub fn min(&self) -> Result<&E, EmptyTreeError> {
        self.raw.first().ok_or(EmptyTreeError)
    }

    /// Returns the largest element, or [`EmptyTreeError`] if the set is empty.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyTreeError`] when the set holds no elements; nothing is
    /// mutated in that case.
    pub fn max(&self) -> Result<&E, EmptyTreeError> {
        self.raw.last().ok_or(EmptyTreeError)
    }

    /// Gets an iterator that visits the elements in ascending order.
    ///
    /// The iterator is lazy, double-ended, and exact-sized; call it again for
    /// a fresh traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_tree::BPlusTreeSet;
    ///
    /// let set: BPlusTreeSet<i32> = [3, 1, 2].into();
    /// let mut iter = set.iter();
    /// assert_eq!(iter.next(), Some(&1));
    /// assert_eq!(iter.next_back(), Some(&3));
    /// assert_eq!(iter.next(), Some(&2));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, E, K> {
        let front_leaf = self.raw.first_leaf();
        let back_leaf = self.raw.last_leaf();
        let back_index = back_leaf.map_or(0, |handle| self.raw.node(handle).as_leaf().key_count());
        Iter {
            raw: &self.raw,
            front_leaf,
            front_index: 0,
            back_leaf,
            back_index,
            remaining: self.raw.len(),
        }
    }

    /// Calls `visit` on every element in the requested [`Traversal`] order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_tree::{BPlusTreeSet, Traversal};
    ///
    /// let set: BPlusTreeSet<i32> = (1..=5).collect();
    ///
    /// let mut seen = Vec::new();
    /// set.for_each(Traversal::Descending, |&e| seen.push(e));
    /// assert_eq!(seen, [5, 4, 3, 2, 1]);
    /// ```
    pub fn for_each<F>(&self, order: Traversal, mut visit: F)
    where
        F: FnMut(&E),
    {
        match order {
            Traversal::Ascending | Traversal::Unspecified => {
                for element in self.iter() {
                    visit(element);
                }
            }
            Traversal::Descending => {
                for element in self.iter().rev() {
                    visit(element);
                }
            }
        }
    }

    /// Writes a depth-indented dump of the node structure and keys to `w`.
    ///
    /// Diagnostics only; the exact format is not stable.
    ///
    /// # Errors
    ///
    /// Propagates any error from the underlying writer.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_tree::BPlusTreeSet;
    ///
    /// let set: BPlusTreeSet<i32> = (1..=5).collect();
    /// let mut out = String::new();
    /// set.debug_dump(&mut out).unwrap();
    /// assert!(out.contains("leaf:"));
    /// ```
    pub fn debug_dump<W: fmt::Write>(&self, w: &mut W) -> fmt::Result
    where
        E: fmt::Debug,
    {
        match self.raw.root() {
            Some(root) => self.dump_node(w, root, 0),
            None => writeln!(w, "empty"),
        }
    }

    fn dump_node<W: fmt::Write>(&self, w: &mut W, handle: Handle, depth: usize) -> fmt::Result
    where
        E: fmt::Debug,
    {
        write!(w, "{:width$}", "", width = depth * 2)?;
        match self.raw.node(handle) {
            Node::Leaf(leaf) => {
                write!(w, "leaf:")?;
                for key in leaf.keys() {
                    write!(w, " {key:?}")?;
                }
                writeln!(w)
            }
            Node::Internal(internal) => {
                write!(w, "inner:")?;
                for key in internal.keys() {
                    write!(w, " {key:?}")?;
                }
                writeln!(w)?;
                for i in 0..internal.child_count() {
                    self.dump_node(w, internal.child(i), depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl<E: Ord + Clone, const K: usize> BPlusTreeSet<E, K> {
    /// Returns true if the set contains an element equal to `key`.
    ///
    /// `key` may be any borrowed form of the element type, as long as the
    /// ordering on the borrowed form matches the element ordering.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.contains(key)
    }

    /// Adds an element to the set.
    ///
    /// Returns whether the element was newly inserted: false means an equal
    /// element was already present and the set is unchanged.
    pub fn insert(&mut self, element: E) -> bool {
        self.raw.insert(element)
    }

    /// Removes an element from the set.
    ///
    /// Returns whether an equal element was present; removing an absent
    /// element is not an error and leaves the set untouched.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        E: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key)
    }

    /// Removes every listed element, one by one. Returns how many were
    /// actually present.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_tree::BPlusTreeSet;
    ///
    /// let mut set: BPlusTreeSet<i32> = (1..=5).collect();
    /// assert_eq!(set.remove_all([2, 4, 9]), 2);
    ///
    /// let rest: Vec<i32> = set.iter().copied().collect();
    /// assert_eq!(rest, [1, 3, 5]);
    /// ```
    pub fn remove_all<Q, I>(&mut self, keys: I) -> usize
    where
        E: Borrow<Q>,
        Q: Ord,
        I: IntoIterator<Item = Q>,
    {
        let mut removed = 0;
        for key in keys {
            if self.raw.remove(&key) {
                removed += 1;
            }
        }
        removed
    }
}

/// An iterator over the elements of a `BPlusTreeSet` in ascending order.
///
/// Walks the leaf chain from both ends; created by [`BPlusTreeSet::iter`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, E, const K: usize> {
    raw: &'a RawBPlusTree<E, K>,
    front_leaf: Option<Handle>,
    front_index: usize,
    back_leaf: Option<Handle>,
    back_index: usize,
    remaining: usize,
}

impl<'a, E, const K: usize> Iterator for Iter<'a, E, K> {
    type Item = &'a E;

    fn next(&mut self) -> Option<&'a E> {
        if self.remaining == 0 {
            return None;
        }

        let leaf = self.raw.node(self.front_leaf?).as_leaf();
        let key = leaf.key(self.front_index);
        self.front_index += 1;
        if self.front_index == leaf.key_count() {
            self.front_leaf = leaf.next();
            self.front_index = 0;
        }
        self.remaining -= 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, E, const K: usize> DoubleEndedIterator for Iter<'a, E, K> {
    fn next_back(&mut self) -> Option<&'a E> {
        if self.remaining == 0 {
            return None;
        }

        if self.back_index == 0 {
            // Exhausted this leaf from the back; step to the previous one.
            let prev = self.raw.node(self.back_leaf?).as_leaf().prev();
            self.back_leaf = prev;
            self.back_index = self.raw.node(prev?).as_leaf().key_count();
        }
        self.back_index -= 1;
        self.remaining -= 1;
        Some(self.raw.node(self.back_leaf?).as_leaf().key(self.back_index))
    }
}

impl<E, const K: usize> ExactSizeIterator for Iter<'_, E, K> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<E, const K: usize> FusedIterator for Iter<'_, E, K> {}

impl<E, const K: usize> Clone for Iter<'_, E, K> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw,
            front_leaf: self.front_leaf,
            front_index: self.front_index,
            back_leaf: self.back_leaf,
            back_index: self.back_index,
            remaining: self.remaining,
        }
    }
}

impl<E: fmt::Debug, const K: usize> fmt::Debug for Iter<'_, E, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An owning iterator over the elements of a `BPlusTreeSet` in ascending
/// order, created by [`IntoIterator::into_iter`].
///
/// Draining walks the leaf chain once up front, so iteration itself never
/// rebalances the tree.
pub struct IntoIter<E> {
    inner: vec::IntoIter<E>,
}

impl<E> Iterator for IntoIter<E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<E> DoubleEndedIterator for IntoIter<E> {
    fn next_back(&mut self) -> Option<E> {
        self.inner.next_back()
    }
}

impl<E> ExactSizeIterator for IntoIter<E> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<E> FusedIterator for IntoIter<E> {}

impl<E: fmt::Debug> fmt::Debug for IntoIter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<E, const K: usize> Default for BPlusTreeSet<E, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: fmt::Debug, const K: usize> fmt::Debug for BPlusTreeSet<E, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<E: PartialEq, const K: usize> PartialEq for BPlusTreeSet<E, K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<E: Eq, const K: usize> Eq for BPlusTreeSet<E, K> {}

impl<E: Ord + Clone, const K: usize> Clone for BPlusTreeSet<E, K> {
    fn clone(&self) -> Self {
        // Rebuilding from the sorted walk yields an equivalent set; node
        // layout is not part of the set's identity.
        self.iter().cloned().collect()
    }
}

impl<E: Ord + Clone, const K: usize> Extend<E> for BPlusTreeSet<E, K> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

impl<'a, E: Ord + Copy, const K: usize> Extend<&'a E> for BPlusTreeSet<E, K> {
    fn extend<I: IntoIterator<Item = &'a E>>(&mut self, iter: I) {
        for &element in iter {
            self.insert(element);
        }
    }
}

impl<E: Ord + Clone, const K: usize> FromIterator<E> for BPlusTreeSet<E, K> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<E: Ord + Clone, const K: usize, const N: usize> From<[E; N]> for BPlusTreeSet<E, K> {
    /// Converts a `[E; N]` into a `BPlusTreeSet<E>`. Duplicates collapse.
    ///
    /// ```
    /// use bplus_tree::BPlusTreeSet;
    ///
    /// let set: BPlusTreeSet<i32> = [3, 1, 2, 3].into();
    /// assert_eq!(set.len(), 3);
    /// ```
    fn from(elements: [E; N]) -> Self {
        elements.into_iter().collect()
    }
}

impl<'a, E, const K: usize> IntoIterator for &'a BPlusTreeSet<E, K> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E, K>;

    fn into_iter(self) -> Iter<'a, E, K> {
        self.iter()
    }
}

impl<E, const K: usize> IntoIterator for BPlusTreeSet<E, K> {
    type Item = E;
    type IntoIter = IntoIter<E>;

    fn into_iter(mut self) -> IntoIter<E> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}
