//! Intrusive collections with external storage.
//!
//! This crate provides link-based data structures for systems that own
//! their nodes elsewhere. The key insight: separate storage from structure.
//!
//! # Design Philosophy
//!
//! Traditional collections own their data:
//!
//! ```text
//! BinaryHeap<T>  - owns values, moves them on every sift
//! LinkedList<T>  - owns nodes, no O(1) removal by handle
//! ```
//!
//! This crate inverts the model:
//!
//! ```text
//! Storage (Arena)   - owns nodes, provides stable indices
//! List/LinkedHeap   - coordinate indices, don't own data
//! ```
//!
//! Nodes embed their own link fields ([`ListLinks`], [`TreeLinks`]) and
//! live in a [`Storage`] implementation. The structures link and unlink
//! those nodes by index and never allocate. Benefits:
//!
//! - **Stable indices**: a node's index never changes while it lives,
//!   even as it moves through a structure or between structures
//! - **Zero allocation on hot path**: pre-allocate storage at startup
//! - **O(1) removal from anywhere**: hand the index back, no search
//! - **Shared storage**: one arena can back several structures, and a
//!   node can migrate between them without moving in memory
//!
//! The heap is a true linked binary heap: a complete binary tree held
//! together purely by child and holder links, with no backing array. It
//! supports O(log n) removal of arbitrary nodes by index, which makes it
//! suitable for cancellable timer wheels and deadline queues.
//!
//! # Quick Start
//!
//! ```
//! use burrow_collections::{Arena, LinkedHeap, Storage, TreeLinks, TreeNode};
//!
//! // Nodes embed their links and order themselves via Ord.
//! #[derive(Debug)]
//! struct Task {
//!     priority: u32,
//!     links: TreeLinks<u32>,
//! }
//!
//! impl TreeNode<u32> for Task {
//!     fn links(&self) -> &TreeLinks<u32> { &self.links }
//!     fn links_mut(&mut self) -> &mut TreeLinks<u32> { &mut self.links }
//! }
//!
//! impl Ord for Task {
//!     fn cmp(&self, other: &Self) -> std::cmp::Ordering {
//!         self.priority.cmp(&other.priority)
//!     }
//! }
//! impl PartialOrd for Task {
//!     fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
//!         Some(self.cmp(other))
//!     }
//! }
//! impl PartialEq for Task {
//!     fn eq(&self, other: &Self) -> bool { self.priority == other.priority }
//! }
//! impl Eq for Task {}
//!
//! // Storage owns the nodes; the heap coordinates indices into it.
//! let mut arena: Arena<Task> = Arena::with_capacity(64);
//! let mut heap: LinkedHeap<u32> = LinkedHeap::new();
//!
//! let urgent = arena.try_insert(Task { priority: 1, links: TreeLinks::new() }).unwrap();
//! let later = arena.try_insert(Task { priority: 9, links: TreeLinks::new() }).unwrap();
//! heap.insert(&mut arena, later);
//! heap.insert(&mut arena, urgent);
//!
//! assert_eq!(heap.peek(), Some(urgent));
//!
//! // O(log n) removal of any node by index, not just the minimum.
//! heap.remove(&mut arena, later);
//! assert_eq!(heap.pop(&mut arena), Some(urgent));
//! assert!(heap.is_empty());
//! ```
//!
//! # Critical Invariant: Same Storage Instance
//!
//! All operations on a structure must use the same storage instance, and
//! a node may be linked into at most one heap (and one list per embedded
//! [`ListLinks`] pair) at a time. This is the caller's responsibility;
//! passing a different storage or double-linking a node corrupts the
//! links.
//!
//! # Storage Options
//!
//! | Storage | Capacity | Allocation | Use Case |
//! |---------|----------|------------|----------|
//! | [`Arena`] | Fixed (runtime) | Single vector | Default choice |
//! | `slab::Slab` | Growable | May reallocate | When size unknown |
//!
//! Enable the `slab` feature for the `slab::Slab` backend.
//!
//! # Data Structures
//!
//! | Structure | Use Case | Key Operations |
//! |-----------|----------|----------------|
//! | [`List`] | FIFO queues, state pipelines | O(1) push/pop/remove |
//! | [`LinkedHeap`] | Deadline queues, cancellable timers | O(log n) insert/pop/remove |
//!
//! # Feature Flags
//!
//! - `slab` - Enable the [`Storage`] impl for `slab::Slab`

#![warn(missing_docs)]

pub mod heap;
pub mod index;
pub mod list;
pub mod storage;

pub use heap::{LinkedHeap, Side, Slot, TreeLinks, TreeNode};
pub use index::Index;
pub use list::{List, ListLinks, ListNode};
pub use storage::{Arena, Full, Storage};
