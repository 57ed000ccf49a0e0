//! Intrusive binary heap linked through per-node slot descriptors.
//!
//! Unlike an array heap, [`LinkedHeap`] has no backing vector: the
//! complete-binary-tree shape lives entirely in link fields embedded in
//! each node ([`TreeLinks`]). Every node records its two children and a
//! [`Slot`] descriptor naming the exact slot that holds it — the heap's
//! root field, or one side of its parent's child pair. The descriptor is
//! how a node answers "which child am I" and how a swap retargets whoever
//! points at it, without any positional array.
//!
//! The heap never inserts into or removes from storage. Callers own node
//! memory; `insert` links an existing node and `remove` unlinks one,
//! leaving it in place. This makes arbitrary-node removal O(log n): swap
//! the victim with the node in the final level-order position, shrink,
//! and re-sift the displaced node.
//!
//! Ordering comes from the node type's `Ord`; the smallest node surfaces
//! first. Wrap keys in `core::cmp::Reverse` for max-first behavior.
//!
//! # Example
//!
//! ```
//! use burrow_collections::{Arena, LinkedHeap, Storage, TreeLinks, TreeNode};
//! use std::cmp::Ordering;
//!
//! #[derive(Debug)]
//! struct Job {
//!     priority: u32,
//!     links: TreeLinks<u32>,
//! }
//!
//! impl Job {
//!     fn new(priority: u32) -> Self {
//!         Self { priority, links: TreeLinks::new() }
//!     }
//! }
//!
//! impl TreeNode<u32> for Job {
//!     fn links(&self) -> &TreeLinks<u32> { &self.links }
//!     fn links_mut(&mut self) -> &mut TreeLinks<u32> { &mut self.links }
//! }
//!
//! impl Ord for Job {
//!     fn cmp(&self, other: &Self) -> Ordering {
//!         self.priority.cmp(&other.priority)
//!     }
//! }
//! impl PartialOrd for Job {
//!     fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
//! }
//! impl PartialEq for Job {
//!     fn eq(&self, other: &Self) -> bool { self.priority == other.priority }
//! }
//! impl Eq for Job {}
//!
//! let mut jobs: Arena<Job> = Arena::with_capacity(16);
//! let mut heap: LinkedHeap<u32> = LinkedHeap::new();
//!
//! let a = jobs.try_insert(Job::new(5)).unwrap();
//! let b = jobs.try_insert(Job::new(1)).unwrap();
//! let c = jobs.try_insert(Job::new(3)).unwrap();
//!
//! heap.insert(&mut jobs, a);
//! heap.insert(&mut jobs, b);
//! heap.insert(&mut jobs, c);
//!
//! assert_eq!(heap.pop(&mut jobs), Some(b));
//! assert_eq!(heap.pop(&mut jobs), Some(c));
//! assert_eq!(heap.pop(&mut jobs), Some(a));
//! assert_eq!(heap.pop(&mut jobs), None);
//! ```

use crate::{Index, Storage};

use core::fmt::Write as _;

/// Which of a parent's two child slots a node occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The left child slot (even level-order index).
    Left = 0,
    /// The right child slot (odd level-order index).
    Right = 1,
}

impl Side {
    /// Both sides, left first.
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Position of this side in a child pair.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    const fn from_bit(bit: usize) -> Self {
        if bit == 0 {
            Side::Left
        } else {
            Side::Right
        }
    }
}

/// Descriptor of the slot currently holding a node.
///
/// Resolving a linked node's slot through the heap — the root field for
/// `Root`, `parent`'s child pair for `Child` — always yields that node's
/// own index; the heap repairs descriptors on every structural change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<Idx> {
    /// Not linked into any heap.
    Detached,
    /// Held by the heap's root field.
    Root,
    /// Held by one side of `parent`'s child pair.
    Child {
        /// The node whose child pair holds this node.
        parent: Idx,
        /// Which side of that pair.
        side: Side,
    },
}

impl<Idx: Index> Slot<Idx> {
    /// Returns the parent named by this slot, or the sentinel for the
    /// root and detached cases.
    #[inline]
    pub fn parent(self) -> Idx {
        match self {
            Slot::Child { parent, .. } => parent,
            _ => Idx::NONE,
        }
    }

    /// Returns `true` if this is the detached state.
    #[inline]
    pub fn is_detached(self) -> bool {
        matches!(self, Slot::Detached)
    }
}

/// Heap link fields embedded in a node.
///
/// A node starts detached (`TreeLinks::new()`); [`LinkedHeap`] maintains
/// the fields from then on. The read accessors are public so callers can
/// inspect a node's position; mutation goes through the heap.
#[derive(Debug, Clone, Copy)]
pub struct TreeLinks<Idx> {
    pub(crate) child: [Idx; 2],
    pub(crate) slot: Slot<Idx>,
}

impl<Idx: Index> TreeLinks<Idx> {
    /// Creates detached links, ready for a first insertion.
    #[inline]
    pub fn new() -> Self {
        Self {
            child: [Idx::NONE; 2],
            slot: Slot::Detached,
        }
    }

    /// Returns the child on `side`, or the sentinel.
    #[inline]
    pub fn child(&self, side: Side) -> Idx {
        self.child[side.index()]
    }

    /// Returns the parent, or the sentinel for the root and detached
    /// states.
    #[inline]
    pub fn parent(&self) -> Idx {
        self.slot.parent()
    }

    /// Returns the slot descriptor.
    #[inline]
    pub fn slot(&self) -> Slot<Idx> {
        self.slot
    }

    /// Returns `true` if the node is linked into a heap.
    #[inline]
    pub fn in_heap(&self) -> bool {
        !self.slot.is_detached()
    }
}

impl<Idx: Index> Default for TreeLinks<Idx> {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for types that can be linked into a [`LinkedHeap`].
///
/// Implementors embed a [`TreeLinks`] field and expose it here; `Ord`
/// supplies the priority order (smallest first). The heap maintains the
/// links — implementors should never modify them directly.
pub trait TreeNode<Idx: Index>: Ord {
    /// Returns the embedded heap links.
    fn links(&self) -> &TreeLinks<Idx>;

    /// Returns the embedded heap links mutably.
    fn links_mut(&mut self) -> &mut TreeLinks<Idx>;

    /// Returns `true` if this node is currently linked into a heap.
    #[inline]
    fn in_heap(&self) -> bool {
        self.links().in_heap()
    }
}

/// A min-heap over caller-owned nodes, linked rather than stored.
///
/// The heap itself is three words: the root index, the index of the node
/// occupying the final level-order position (`last`), and the count.
/// Nodes live in external storage and must implement [`TreeNode`].
///
/// All operations on a heap must use the same storage instance; passing a
/// different one corrupts both (same discipline as the `slab` crate).
///
/// Operations never allocate. `insert`, `remove`, and `pop` are
/// O(log n); `peek` is O(1).
#[derive(Debug, Clone)]
pub struct LinkedHeap<Idx: Index> {
    root: Idx,
    last: Idx,
    len: usize,
}

impl<Idx: Index> Default for LinkedHeap<Idx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Idx: Index> LinkedHeap<Idx> {
    /// Creates an empty heap.
    #[inline]
    pub const fn new() -> Self {
        Self {
            root: Idx::NONE,
            last: Idx::NONE,
            len: 0,
        }
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

    /// Returns the minimum node's index without unlinking it.
    #[inline]
    pub fn peek(&self) -> Option<Idx> {
        if self.root.is_none() {
            None
        } else {
            Some(self.root)
        }
    }

    /// Returns the index of the node in the final level-order position.
    ///
    /// `None` exactly when the heap is empty.
    #[inline]
    pub fn last(&self) -> Option<Idx> {
        if self.last.is_none() {
            None
        } else {
            Some(self.last)
        }
    }

    /// Links a node into the heap.
    ///
    /// The node must already exist in storage with detached links. Its
    /// position becomes the next free level-order slot, then it sifts up
    /// to its place.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not valid in storage; linking an already-linked
    /// node is a programming error caught by a debug assertion.
    pub fn insert<T, S>(&mut self, storage: &mut S, idx: Idx)
    where
        T: TreeNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        debug_assert!(
            !storage.get(idx).expect("invalid index").in_heap(),
            "node already in a heap"
        );

        self.len += 1;
        let slot = self.slot_for(storage, self.len);

        {
            let links = storage.get_mut(idx).expect("invalid index").links_mut();
            links.child = [Idx::NONE; 2];
            links.slot = slot;
        }

        match slot {
            Slot::Root => {
                debug_assert!(self.root.is_none(), "insertion slot occupied");
                self.root = idx;
            }
            Slot::Child { parent, side } => {
                let parent_links = storage.get_mut(parent).expect("invalid index").links_mut();
                debug_assert!(
                    parent_links.child(side).is_none(),
                    "insertion slot occupied"
                );
                parent_links.child[side.index()] = idx;
            }
            Slot::Detached => unreachable!(),
        }

        self.last = idx;

        while self.swap_with_parent(storage, idx) {}
    }

    /// Unlinks the minimum node and returns its index.
    ///
    /// Returns `None` if the heap is empty.
    pub fn pop<T, S>(&mut self, storage: &mut S) -> Option<Idx>
    where
        T: TreeNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let idx = self.peek()?;
        self.remove(storage, idx);
        Some(idx)
    }

    /// Unlinks an arbitrary node.
    ///
    /// The node is swapped with the occupant of the final level-order
    /// position, the tree shrinks by one slot, and the displaced occupant
    /// sifts up then down to wherever its neighbors put it. The removed
    /// node's links are cleared; it stays in storage.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not valid in storage; removing a node that is
    /// not linked is a programming error caught by a debug assertion.
    pub fn remove<T, S>(&mut self, storage: &mut S, idx: Idx)
    where
        T: TreeNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        debug_assert!(
            storage.get(idx).expect("invalid index").in_heap(),
            "node not in a heap"
        );

        let displaced = self.last;
        if idx != displaced {
            self.swap(storage, idx, displaced);
        }

        // The victim now occupies the final slot. Reseat `last` before
        // the victim disappears; the upward walk starts from it.
        self.len -= 1;
        if self.len > 1 {
            self.find_last(storage);
        } else if self.len == 1 {
            self.last = self.root;
        } else {
            self.last = Idx::NONE;
        }

        // Detach: empty the slot holding the victim, then its own links.
        let slot = storage.get(idx).expect("invalid index").links().slot();
        match slot {
            Slot::Root => self.root = Idx::NONE,
            Slot::Child { parent, side } => {
                storage.get_mut(parent).expect("invalid index").links_mut().child
                    [side.index()] = Idx::NONE;
            }
            Slot::Detached => unreachable!("linked node with detached slot"),
        }
        *storage.get_mut(idx).expect("invalid index").links_mut() = TreeLinks::new();

        if idx != displaced {
            // The displaced node sits in an arbitrary position relative
            // to its new neighbors; exactly one of these passes moves it.
            while self.swap_with_parent(storage, displaced) {}
            while self.swap_with_children(storage, displaced) {}
        }
    }

    /// Renders the tree recursively for diagnostics.
    ///
    /// `describe` renders a node's payload. No correctness contract.
    pub fn dump<T, S, F>(&self, storage: &S, describe: F) -> String
    where
        T: TreeNode<Idx>,
        S: Storage<T, Index = Idx>,
        F: Fn(&T) -> String,
    {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "len: {}; root: {}; last: {}",
            self.len,
            fmt_idx(self.root),
            fmt_idx(self.last)
        );
        self.dump_branch(storage, self.root, 0, &describe, &mut out);
        out
    }

    fn dump_branch<T, S, F>(&self, storage: &S, idx: Idx, depth: usize, describe: &F, out: &mut String)
    where
        T: TreeNode<Idx>,
        S: Storage<T, Index = Idx>,
        F: Fn(&T) -> String,
    {
        if idx.is_none() {
            return;
        }
        let node = storage.get(idx).expect("invalid index");
        let links = node.links();
        let _ = writeln!(
            out,
            "{:indent$}[{}] {} (parent={}, left={}, right={})",
            "",
            fmt_idx(idx),
            describe(node),
            fmt_idx(links.parent()),
            fmt_idx(links.child(Side::Left)),
            fmt_idx(links.child(Side::Right)),
            indent = depth * 2
        );
        self.dump_branch(storage, links.child(Side::Left), depth + 1, describe, out);
        self.dump_branch(storage, links.child(Side::Right), depth + 1, describe, out);
    }

    /// Resolves the slot at 1-based level-order position `pos`.
    ///
    /// The bits of `pos` below its most significant one spell the
    /// root-to-slot path; all but the lowest descend through occupied
    /// nodes, and the lowest names the child side.
    fn slot_for<T, S>(&self, storage: &S, pos: usize) -> Slot<Idx>
    where
        T: TreeNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        debug_assert!(pos >= 1);
        if pos == 1 {
            return Slot::Root;
        }

        let bits = usize::BITS - pos.leading_zeros();
        let mut parent = self.root;
        for shift in (1..bits - 1).rev() {
            let side = Side::from_bit((pos >> shift) & 1);
            parent = storage.get(parent).expect("invalid index").links().child(side);
        }

        Slot::Child {
            parent,
            side: Side::from_bit(pos & 1),
        }
    }

    /// Reseats `last` on the occupant of level-order position `len`.
    ///
    /// Walks up from the old last position until a step arrives from a
    /// right child (the predecessor lives under that parent's left
    /// child), or the root is reached (the old last was on the leftmost
    /// path; the predecessor is the deepest rightmost leaf). Then
    /// descends preferring right children down to a leaf.
    fn find_last<T, S>(&mut self, storage: &S)
    where
        T: TreeNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let mut n = self.last;
        loop {
            match storage.get(n).expect("invalid index").links().slot() {
                Slot::Child {
                    parent,
                    side: Side::Left,
                } => n = parent,
                Slot::Child {
                    parent,
                    side: Side::Right,
                } => {
                    n = storage
                        .get(parent)
                        .expect("invalid index")
                        .links()
                        .child(Side::Left);
                    break;
                }
                Slot::Root => break,
                Slot::Detached => unreachable!("detached node in tree"),
            }
        }

        loop {
            let links = storage.get(n).expect("invalid index").links();
            let next = if links.child(Side::Right).is_some() {
                links.child(Side::Right)
            } else {
                links.child(Side::Left)
            };
            if next.is_none() {
                break;
            }
            n = next;
        }

        self.last = n;
    }

    /// Exchanges two nodes' tree positions in O(1).
    ///
    /// Each node takes over the other's slot descriptor and child pair;
    /// direct parent/child adjacency between the two is re-derived rather
    /// than left pointing at stale positions, the slots now holding each
    /// node are retargeted, both nodes' children get their parent
    /// back-references rewritten, and `last` follows the position it was
    /// tracking.
    fn swap<T, S>(&mut self, storage: &mut S, p: Idx, q: Idx)
    where
        T: TreeNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        debug_assert!(p != q, "cannot swap a node with itself");

        let p_old = *storage.get(p).expect("invalid index").links();
        let q_old = *storage.get(q).expect("invalid index").links();

        let mut p_new = q_old;
        let mut q_new = p_old;
        match q_old.slot {
            Slot::Child { parent, side } if parent == p => {
                p_new.slot = Slot::Child { parent: q, side };
                q_new.child[side.index()] = p;
            }
            _ => {
                if let Slot::Child { parent, side } = p_old.slot {
                    if parent == q {
                        q_new.slot = Slot::Child { parent: p, side };
                        p_new.child[side.index()] = q;
                    }
                }
            }
        }

        *storage.get_mut(p).expect("invalid index").links_mut() = p_new;
        *storage.get_mut(q).expect("invalid index").links_mut() = q_new;

        // Point the occupied slots at their new occupants.
        self.set_slot(storage, p_new.slot, p);
        self.set_slot(storage, q_new.slot, q);

        // Both nodes' children answer to a relocated parent now. In the
        // adjacent case one "child" is p or q itself; the rewrite is
        // identical to what the adjacency fix already stored.
        for side in Side::BOTH {
            let c = p_new.child[side.index()];
            if c.is_some() {
                storage.get_mut(c).expect("invalid index").links_mut().slot =
                    Slot::Child { parent: p, side };
            }
            let c = q_new.child[side.index()];
            if c.is_some() {
                storage.get_mut(c).expect("invalid index").links_mut().slot =
                    Slot::Child { parent: q, side };
            }
        }

        // `last` tracks a position, not a node.
        if self.last == p {
            self.last = q;
        } else if self.last == q {
            self.last = p;
        }
    }

    fn set_slot<T, S>(&mut self, storage: &mut S, slot: Slot<Idx>, occupant: Idx)
    where
        T: TreeNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        match slot {
            Slot::Root => self.root = occupant,
            Slot::Child { parent, side } => {
                storage.get_mut(parent).expect("invalid index").links_mut().child
                    [side.index()] = occupant;
            }
            Slot::Detached => unreachable!("linked node with detached slot"),
        }
    }

    /// Single sift-up step: swaps `p` with its parent unless the parent
    /// is absent or strictly smaller. An equal parent is displaced,
    /// consistent with the sift-down tie rule.
    fn swap_with_parent<T, S>(&mut self, storage: &mut S, p: Idx) -> bool
    where
        T: TreeNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let q = storage.get(p).expect("invalid index").links().parent();
        if q.is_none() {
            return false;
        }
        let parent = storage.get(q).expect("invalid index");
        let node = storage.get(p).expect("invalid index");
        if parent.cmp(node).is_lt() {
            return false;
        }

        self.swap(storage, p, q);
        true
    }

    /// Single sift-down step on one side: swaps `p` with the named child
    /// unless it is absent or strictly greater. Ties move down.
    fn swap_with_child<T, S>(&mut self, storage: &mut S, p: Idx, side: Side) -> bool
    where
        T: TreeNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let q = storage.get(p).expect("invalid index").links().child(side);
        if q.is_none() {
            return false;
        }
        let child = storage.get(q).expect("invalid index");
        let node = storage.get(p).expect("invalid index");
        if child.cmp(node).is_gt() {
            return false;
        }

        self.swap(storage, p, q);
        true
    }

    /// Single sift-down step: picks the smaller existing child (equal
    /// children resolve to the right one) and swaps if it is not greater
    /// than `p`.
    fn swap_with_children<T, S>(&mut self, storage: &mut S, p: Idx) -> bool
    where
        T: TreeNode<Idx>,
        S: Storage<T, Index = Idx>,
    {
        let links = *storage.get(p).expect("invalid index").links();
        let left = links.child(Side::Left);
        let right = links.child(Side::Right);

        // A complete tree has no right child without a left one.
        let side = if right.is_some()
            && storage
                .get(right)
                .expect("invalid index")
                .cmp(storage.get(left).expect("invalid index"))
                .is_le()
        {
            Side::Right
        } else {
            Side::Left
        };

        if links.child(side).is_none() {
            return false;
        }
        self.swap_with_child(storage, p, side)
    }
}

fn fmt_idx<Idx: Index>(idx: Idx) -> String {
    if idx.is_none() {
        "-".to_string()
    } else {
        idx.as_usize().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arena;
    use core::cmp::Ordering;

    #[derive(Debug)]
    struct Job {
        priority: i32,
        links: TreeLinks<u32>,
    }

    impl Job {
        fn new(priority: i32) -> Self {
            Self {
                priority,
                links: TreeLinks::new(),
            }
        }
    }

    impl TreeNode<u32> for Job {
        fn links(&self) -> &TreeLinks<u32> {
            &self.links
        }
        fn links_mut(&mut self) -> &mut TreeLinks<u32> {
            &mut self.links
        }
    }

    impl Ord for Job {
        fn cmp(&self, other: &Self) -> Ordering {
            self.priority.cmp(&other.priority)
        }
    }
    impl PartialOrd for Job {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }
    impl PartialEq for Job {
        fn eq(&self, other: &Self) -> bool {
            self.priority == other.priority
        }
    }
    impl Eq for Job {}

    fn build(priorities: &[i32]) -> (Arena<Job>, LinkedHeap<u32>, Vec<u32>) {
        let mut arena: Arena<Job> = Arena::with_capacity(priorities.len().max(1));
        let mut heap: LinkedHeap<u32> = LinkedHeap::new();
        let mut handles = Vec::new();
        for &p in priorities {
            let idx = arena.try_insert(Job::new(p)).unwrap();
            heap.insert(&mut arena, idx);
            handles.push(idx);
        }
        (arena, heap, handles)
    }

    fn drain(arena: &mut Arena<Job>, heap: &mut LinkedHeap<u32>) -> Vec<i32> {
        let mut out = Vec::new();
        while let Some(idx) = heap.pop(arena) {
            assert!(!arena.get(idx).unwrap().in_heap());
            out.push(arena.get(idx).unwrap().priority);
        }
        out
    }

    #[test]
    fn new_heap_is_empty() {
        let heap: LinkedHeap<u32> = LinkedHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);
        assert!(heap.peek().is_none());
        assert!(heap.last().is_none());
    }

    #[test]
    fn sorted_extraction() {
        let (mut arena, mut heap, _) = build(&[5, 3, 8, 1, 9, 2]);
        assert_eq!(heap.len(), 6);
        assert_eq!(drain(&mut arena, &mut heap), vec![1, 2, 3, 5, 8, 9]);
        assert_eq!(heap.len(), 0);
    }

    #[test]
    fn pop_on_empty_is_idempotent() {
        let (mut arena, mut heap, _) = build(&[4]);
        assert!(heap.pop(&mut arena).is_some());
        for _ in 0..3 {
            assert_eq!(heap.pop(&mut arena), None);
            assert_eq!(heap.len(), 0);
            assert!(heap.peek().is_none());
        }
    }

    #[test]
    fn duplicate_priorities_all_surface() {
        let (mut arena, mut heap, _) = build(&[2, 2, 1, 2, 1]);
        assert_eq!(drain(&mut arena, &mut heap), vec![1, 1, 2, 2, 2]);
    }

    #[test]
    fn remove_interior_node() {
        let (mut arena, mut heap, handles) = build(&[10, 20, 30, 40, 50, 60, 70]);

        // Remove the 4th insertion directly, not via pop.
        heap.remove(&mut arena, handles[3]);
        assert!(!arena.get(handles[3]).unwrap().in_heap());
        assert_eq!(heap.len(), 6);

        assert_eq!(drain(&mut arena, &mut heap), vec![10, 20, 30, 50, 60, 70]);
    }

    #[test]
    fn remove_root_directly() {
        let (mut arena, mut heap, _) = build(&[3, 1, 2]);
        let root = heap.peek().unwrap();
        heap.remove(&mut arena, root);
        assert_eq!(arena.get(root).unwrap().priority, 1);
        assert_eq!(drain(&mut arena, &mut heap), vec![2, 3]);
    }

    #[test]
    fn remove_only_node() {
        let (mut arena, mut heap, handles) = build(&[9]);
        heap.remove(&mut arena, handles[0]);
        assert!(heap.is_empty());
        assert!(heap.peek().is_none());
        assert!(heap.last().is_none());
        assert!(!arena.get(handles[0]).unwrap().in_heap());
    }

    #[test]
    fn last_tracks_insertion() {
        let (mut arena, mut heap, handles) = build(&[1, 2, 3, 4]);
        // Ascending insertions never sift, so the 4th node holds the
        // final position.
        assert_eq!(heap.last(), Some(handles[3]));

        // Removing the last node reseats `last` on the occupant of the
        // previous level-order position.
        heap.remove(&mut arena, handles[3]);
        assert_eq!(heap.last(), Some(handles[2]));
    }

    #[test]
    fn last_follows_swaps() {
        let mut arena: Arena<Job> = Arena::with_capacity(8);
        let mut heap: LinkedHeap<u32> = LinkedHeap::new();

        let a = arena.try_insert(Job::new(5)).unwrap();
        let b = arena.try_insert(Job::new(3)).unwrap();
        heap.insert(&mut arena, a);
        heap.insert(&mut arena, b);

        // b sifted above a, but the final position is still position 2,
        // now occupied by a.
        assert_eq!(heap.peek(), Some(b));
        assert_eq!(heap.last(), Some(a));
    }

    #[test]
    fn single_sift_step_respects_order() {
        let mut arena: Arena<Job> = Arena::with_capacity(8);
        let mut heap: LinkedHeap<u32> = LinkedHeap::new();

        let a = arena.try_insert(Job::new(1)).unwrap();
        let b = arena.try_insert(Job::new(2)).unwrap();
        heap.insert(&mut arena, a);
        heap.insert(&mut arena, b);

        // Child is greater: no swap either way.
        assert!(!heap.swap_with_child(&mut arena, a, Side::Left));
        assert!(!heap.swap_with_parent(&mut arena, b));
        assert_eq!(heap.peek(), Some(a));

        // Make the child equal: ties move.
        arena.get_mut(b).unwrap().priority = 1;
        assert!(heap.swap_with_child(&mut arena, a, Side::Left));
        assert_eq!(heap.peek(), Some(b));
    }

    #[test]
    fn equal_children_resolve_right() {
        let mut arena: Arena<Job> = Arena::with_capacity(8);
        let mut heap: LinkedHeap<u32> = LinkedHeap::new();

        // Ascending-enough insertions build exactly this shape:
        //        1
        //      4a  4b
        //     9
        let top = arena.try_insert(Job::new(1)).unwrap();
        let left = arena.try_insert(Job::new(4)).unwrap();
        let right = arena.try_insert(Job::new(4)).unwrap();
        let deep = arena.try_insert(Job::new(9)).unwrap();
        for idx in [top, left, right, deep] {
            heap.insert(&mut arena, idx);
        }

        // Popping the root sifts the displaced 9 down against two equal
        // fours; the right child wins the tie and takes the root.
        assert_eq!(heap.pop(&mut arena), Some(top));
        assert_eq!(heap.peek(), Some(right));
    }

    #[test]
    fn interleaved_churn_stays_sorted() {
        let mut arena: Arena<Job> = Arena::with_capacity(1024);
        let mut heap: LinkedHeap<u32> = LinkedHeap::new();

        for i in 0..512i32 {
            let priority = (i * 7 + 13) % 512; // Deterministic scramble
            let idx = arena.try_insert(Job::new(priority)).unwrap();
            heap.insert(&mut arena, idx);
        }

        let mut floor = i32::MIN;
        let mut popped = 0;
        while let Some(idx) = heap.pop(&mut arena) {
            let p = arena.get(idx).unwrap().priority;
            assert!(p >= floor, "heap order violated: {p} after {floor}");
            floor = p;
            popped += 1;

            // Reinsert a few no smaller than the floor.
            if popped % 3 == 0 && popped < 256 {
                let idx = arena.try_insert(Job::new(floor + popped % 17)).unwrap();
                heap.insert(&mut arena, idx);
            }
        }
    }

    #[test]
    fn size_accounting() {
        let (mut arena, mut heap, handles) = build(&[6, 2, 9, 4, 7]);
        assert_eq!(heap.len(), 5);
        heap.remove(&mut arena, handles[1]);
        heap.remove(&mut arena, handles[4]);
        assert_eq!(heap.len(), 3);
        heap.pop(&mut arena);
        assert_eq!(heap.len(), 2);
    }

    #[test]
    fn dump_renders_every_node() {
        let (arena, heap, _) = build(&[5, 3, 8]);
        let rendered = heap.dump(&arena, |job: &Job| job.priority.to_string());
        assert!(rendered.contains("len: 3"));
        for p in ["5", "3", "8"] {
            assert!(rendered.contains(p), "missing {p} in:\n{rendered}");
        }
    }

    #[test]
    fn nodes_can_relink_after_removal() {
        let (mut arena, mut heap, handles) = build(&[5, 1, 3]);
        heap.remove(&mut arena, handles[0]);

        arena.get_mut(handles[0]).unwrap().priority = 0;
        heap.insert(&mut arena, handles[0]);

        assert_eq!(heap.peek(), Some(handles[0]));
        assert_eq!(drain(&mut arena, &mut heap), vec![0, 1, 3]);
    }
}
