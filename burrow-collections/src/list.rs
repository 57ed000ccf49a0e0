//! Intrusive doubly-linked list over index-based storage.
//!
//! Nodes embed a [`ListLinks`] pair and live in caller-owned storage; the
//! [`List`] holds only head, tail, and a count, and splices nodes in and
//! out by index. Removal from anywhere is O(1) given the node's index,
//! and a node can move between lists sharing one storage without its
//! index changing — the basis of multi-stage queues like the timer
//! queue's scheduled/ready/done pipeline.
//!
//! # Example
//!
//! ```
//! use burrow_collections::{Arena, List, ListLinks, ListNode, Storage};
//!
//! #[derive(Debug)]
//! struct Item {
//!     value: u64,
//!     links: ListLinks<u32>,
//! }
//!
//! impl Item {
//!     fn new(value: u64) -> Self {
//!         Self { value, links: ListLinks::new() }
//!     }
//! }
//!
//! impl ListNode<u32> for Item {
//!     fn list_links(&self) -> &ListLinks<u32> { &self.links }
//!     fn list_links_mut(&mut self) -> &mut ListLinks<u32> { &mut self.links }
//! }
//!
//! let mut storage: Arena<Item> = Arena::with_capacity(16);
//! let mut list: List<u32> = List::new();
//!
//! let a = storage.try_insert(Item::new(1)).unwrap();
//! let b = storage.try_insert(Item::new(2)).unwrap();
//! list.push_back(&mut storage, a);
//! list.push_back(&mut storage, b);
//!
//! assert_eq!(list.head(), a);
//! list.remove(&mut storage, a); // O(1), from anywhere
//! assert_eq!(list.head(), b);
//! assert_eq!(list.len(), 1);
//! ```

use crate::{Index, Storage};

/// List link fields embedded in a node.
///
/// A node starts unlinked (`ListLinks::new()`); [`List`] maintains the
/// fields after that. Read accessors are public for walking neighbors.
#[derive(Debug, Clone, Copy)]
pub struct ListLinks<Idx> {
    pub(crate) prev: Idx,
    pub(crate) next: Idx,
}

impl<Idx: Index> ListLinks<Idx> {
    /// Creates unlinked links.
    #[inline]
    pub fn new() -> Self {
        Self {
            prev: Idx::NONE,
            next: Idx::NONE,
        }
    }

    /// Returns the previous node, or the sentinel at the head.
    #[inline]
    pub fn prev(&self) -> Idx {
        self.prev
    }

    /// Returns the next node, or the sentinel at the tail.
    #[inline]
    pub fn next(&self) -> Idx {
        self.next
    }
}

impl<Idx: Index> Default for ListLinks<Idx> {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for types that can be linked into a [`List`].
///
/// Implementors embed a [`ListLinks`] field and expose it here. A type
/// participating in several lists at once embeds several pairs and
/// implements this trait on a wrapper per pair.
pub trait ListNode<Idx: Index> {
    /// Returns the embedded list links.
    fn list_links(&self) -> &ListLinks<Idx>;

    /// Returns the embedded list links mutably.
    fn list_links_mut(&mut self) -> &mut ListLinks<Idx>;
}

/// A doubly-linked list coordinating caller-owned nodes by index.
///
/// All operations on a list must use the same storage instance. Splices
/// are O(1); nothing here allocates or frees node memory.
#[derive(Debug, Clone)]
pub struct List<Idx: Index> {
    head: Idx,
    tail: Idx,
    len: usize,
}

impl<Idx: Index> Default for List<Idx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Idx: Index> List<Idx> {
    /// Creates an empty list.
    #[inline]
    pub const fn new() -> Self {
        Self {
            head: Idx::NONE,
            tail: Idx::NONE,
            len: 0,
        }
    }

    /// Returns the head node's index, or the sentinel if empty.
    #[inline]
    pub const fn head(&self) -> Idx {
        self.head
    }

    /// Returns the tail node's index, or the sentinel if empty.
    #[inline]
    pub const fn tail(&self) -> Idx {
        self.tail
    }

    /// Returns the number of linked nodes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no nodes are linked.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Links a node at the back.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not valid in storage.
    #[inline]
    pub fn push_back<T, S>(&mut self, storage: &mut S, idx: Idx)
    where
        T: ListNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let prev = self.tail;
        self.splice(storage, prev, Idx::NONE, idx);
    }

    /// Links a node at the front.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not valid in storage.
    #[inline]
    pub fn push_front<T, S>(&mut self, storage: &mut S, idx: Idx)
    where
        T: ListNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let next = self.head;
        self.splice(storage, Idx::NONE, next, idx);
    }

    /// Links `idx` directly after `anchor`.
    ///
    /// An anchor of the sentinel links at the front, so a backward scan
    /// that walks off the head still inserts in one call.
    ///
    /// # Panics
    ///
    /// Panics if `anchor` (when not the sentinel) or `idx` is not valid
    /// in storage.
    pub fn insert_after<T, S>(&mut self, storage: &mut S, anchor: Idx, idx: Idx)
    where
        T: ListNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let next = if anchor.is_none() {
            self.head
        } else {
            storage.get(anchor).expect("invalid index").list_links().next()
        };
        self.splice(storage, anchor, next, idx);
    }

    /// Links `idx` directly before `anchor`.
    ///
    /// An anchor of the sentinel links at the back, mirroring
    /// [`insert_after`](List::insert_after).
    ///
    /// # Panics
    ///
    /// Panics if `anchor` (when not the sentinel) or `idx` is not valid
    /// in storage.
    pub fn insert_before<T, S>(&mut self, storage: &mut S, anchor: Idx, idx: Idx)
    where
        T: ListNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let prev = if anchor.is_none() {
            self.tail
        } else {
            storage.get(anchor).expect("invalid index").list_links().prev()
        };
        self.splice(storage, prev, anchor, idx);
    }

    /// Unlinks and returns the head node's index, or the sentinel if
    /// empty. The node stays in storage.
    #[inline]
    pub fn pop_front<T, S>(&mut self, storage: &mut S) -> Idx
    where
        T: ListNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let idx = self.head;
        if idx.is_some() {
            self.remove(storage, idx);
        }
        idx
    }

    /// Unlinks and returns the tail node's index, or the sentinel if
    /// empty. The node stays in storage.
    #[inline]
    pub fn pop_back<T, S>(&mut self, storage: &mut S) -> Idx
    where
        T: ListNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let idx = self.tail;
        if idx.is_some() {
            self.remove(storage, idx);
        }
        idx
    }

    /// Unlinks a node from anywhere in the list in O(1).
    ///
    /// The node's links are cleared; it stays in storage.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not valid in storage.
    pub fn remove<T, S>(&mut self, storage: &mut S, idx: Idx)
    where
        T: ListNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let links = *storage.get(idx).expect("invalid index").list_links();

        if links.prev.is_some() {
            storage
                .get_mut(links.prev)
                .expect("invalid index")
                .list_links_mut()
                .next = links.next;
        } else {
            self.head = links.next;
        }
        if links.next.is_some() {
            storage
                .get_mut(links.next)
                .expect("invalid index")
                .list_links_mut()
                .prev = links.prev;
        } else {
            self.tail = links.prev;
        }

        *storage.get_mut(idx).expect("invalid index").list_links_mut() = ListLinks::new();
        self.len -= 1;
    }

    /// Unlinks every node, clearing its links. Nodes stay in storage.
    pub fn clear<T, S>(&mut self, storage: &mut S)
    where
        T: ListNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let mut idx = self.head;
        while idx.is_some() {
            let next = storage.get(idx).expect("invalid index").list_links().next();
            *storage.get_mut(idx).expect("invalid index").list_links_mut() = ListLinks::new();
            idx = next;
        }
        self.head = Idx::NONE;
        self.tail = Idx::NONE;
        self.len = 0;
    }

    /// Iterates node indices from head to tail.
    pub fn iter<'s, T, S>(&self, storage: &'s S) -> Iter<'s, Idx, S, T>
    where
        T: ListNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        Iter {
            storage,
            cur: self.head,
            _marker: core::marker::PhantomData,
        }
    }

    /// Writes the node's links and patches its neighbors (or the list
    /// header where a neighbor is absent) to complete the splice.
    fn splice<T, S>(&mut self, storage: &mut S, prev: Idx, next: Idx, idx: Idx)
    where
        T: ListNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        {
            let links = storage.get_mut(idx).expect("invalid index").list_links_mut();
            links.prev = prev;
            links.next = next;
        }

        if prev.is_some() {
            storage.get_mut(prev).expect("invalid index").list_links_mut().next = idx;
        } else {
            self.head = idx;
        }
        if next.is_some() {
            storage.get_mut(next).expect("invalid index").list_links_mut().prev = idx;
        } else {
            self.tail = idx;
        }

        self.len += 1;
    }
}

/// Forward iterator over a list's node indices.
///
/// Created by [`List::iter`]. Yields indices; look nodes up through the
/// storage as needed.
pub struct Iter<'s, Idx: Index, S, T> {
    storage: &'s S,
    cur: Idx,
    _marker: core::marker::PhantomData<T>,
}

impl<'s, Idx, S, T> Iterator for Iter<'s, Idx, S, T>
where
    Idx: Index,
    T: ListNode<Idx>,
    S: Storage<T, Index = Idx>,
{
    type Item = Idx;

    fn next(&mut self) -> Option<Idx> {
        if self.cur.is_none() {
            return None;
        }
        let idx = self.cur;
        self.cur = self
            .storage
            .get(idx)
            .expect("invalid index")
            .list_links()
            .next();
        Some(idx)
    }
}
