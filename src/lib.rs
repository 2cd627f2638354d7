//! An in-memory B+ tree ordered set.
//!
//! This crate provides [`BPlusTreeSet`], an ordered collection of unique elements
//! backed by a B+ tree: a multi-way search tree that keeps all elements in its
//! leaves, all leaves at the same depth, and node fan-out bounded by a
//! configurable order `2k` (the const parameter `K`, default `2`).
//!
//! # Example
//!
//! ```
//! use bplus_tree::BPlusTreeSet;
//!
//! let mut set: BPlusTreeSet<i32> = BPlusTreeSet::new();
//! set.insert(30);
//! set.insert(10);
//! set.insert(20);
//!
//! assert!(set.contains(&10));
//! assert_eq!(set.len(), 3);
//! assert_eq!(set.min(), Ok(&10));
//! assert_eq!(set.max(), Ok(&30));
//!
//! let ascending: Vec<i32> = set.iter().copied().collect();
//! assert_eq!(ascending, [10, 20, 30]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Configurable order** - `BPlusTreeSet<E, K>` holds at most `2 * K` keys per node
//! - **Ordered traversal** - Double-ended iteration over a linked leaf chain
//! - **Cache-efficient** - Nodes live contiguously in a slot arena, linked by handles
//!
//! # Implementation
//!
//! All elements are stored in leaf nodes; internal nodes hold only separator
//! keys for routing. A separator is a copy of the smallest key of the subtree
//! to its right, so equal keys descend right during search. Nodes are
//! addressed by arena handles rather than references, which keeps parent
//! tracking as a plain descent stack with no back-pointers to maintain.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod raw;

pub mod bplus_tree_set;

pub use bplus_tree_set::{BPlusTreeSet, Traversal};
pub use error::EmptyTreeError;
