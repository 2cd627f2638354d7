use thiserror::Error;

/// Error returned by [`min`](crate::BPlusTreeSet::min) and
/// [`max`](crate::BPlusTreeSet::max) when the tree holds no elements.
///
/// An absent key is never an error: `contains` and `remove` report it
/// through their `bool` return value instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("B+ tree is empty")]
pub struct EmptyTreeError;
