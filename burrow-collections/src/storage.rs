//! Slab-like storage with stable indices.
//!
//! The structures in this crate never own their nodes; callers place nodes
//! in a [`Storage`] implementation and hand indices to a [`List`] or
//! [`LinkedHeap`], which only link and unlink them. An index stays valid
//! until the node is explicitly removed, so structures can keep long-lived
//! references to nodes without pinning or pointer arithmetic.
//!
//! [`List`]: crate::List
//! [`LinkedHeap`]: crate::LinkedHeap

use crate::Index;

use core::mem;

/// Stable-index storage for caller-owned nodes.
///
/// # Requirements
///
/// - **Stable indices**: an index stays valid until its node is removed.
/// - **O(1)** insert, remove, and lookup.
/// - **Slot reuse**: removed slots may be handed out again.
///
/// Provided by [`Arena`] in this crate and by `slab::Slab` behind the
/// `slab` feature.
pub trait Storage<T> {
    /// Index type handed out by this storage.
    type Index: Index;

    /// Error for rejected insertions (`Full<T>` for fixed capacity,
    /// `Infallible` for growable backends).
    type Error;

    /// Inserts a value, returning its stable index.
    fn try_insert(&mut self, value: T) -> Result<Self::Index, Self::Error>;

    /// Removes and returns the value at `index`, if occupied.
    fn remove(&mut self, index: Self::Index) -> Option<T>;

    /// Returns the value at `index`, if occupied.
    fn get(&self, index: Self::Index) -> Option<&T>;

    /// Returns the value at `index` mutably, if occupied.
    fn get_mut(&mut self, index: Self::Index) -> Option<&mut T>;
}

/// Error returned when a fixed-capacity arena rejects an insert.
///
/// Carries the value back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Recovers the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> core::fmt::Display for Full<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: core::fmt::Debug> std::error::Error for Full<T> {}

#[derive(Debug)]
enum Entry<T, Idx> {
    Occupied(T),
    /// Next slot in the free list, or the sentinel at its end.
    Vacant(Idx),
}

/// Fixed-capacity arena with an intrusive free list.
///
/// Slots are handed out from a vacancy chain threaded through removed
/// entries, so insert and remove are O(1) and freed slots are reused
/// most-recently-freed first. Capacity is fixed at construction; once the
/// backing vector has grown to it, `try_insert` fails with [`Full`] rather
/// than reallocating.
///
/// # Example
///
/// ```
/// use burrow_collections::{Arena, Storage};
///
/// let mut arena: Arena<u64> = Arena::with_capacity(8);
/// let idx = arena.try_insert(42).unwrap();
/// assert_eq!(arena.get(idx), Some(&42));
/// assert_eq!(arena.remove(idx), Some(42));
/// assert_eq!(arena.get(idx), None);
/// ```
#[derive(Debug)]
pub struct Arena<T, Idx: Index = u32> {
    entries: Vec<Entry<T, Idx>>,
    /// Head of the vacancy chain.
    next_free: Idx,
    len: usize,
    capacity: usize,
}

impl<T, Idx: Index> Arena<T, Idx> {
    /// Creates an arena holding up to `capacity` nodes.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 or would collide with the index
    /// sentinel.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        assert!(
            capacity <= Idx::NONE.as_usize(),
            "capacity exceeds index type maximum"
        );

        Self {
            entries: Vec::with_capacity(capacity),
            next_free: Idx::NONE,
            len: 0,
            capacity,
        }
    }

    /// Returns the fixed capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slots are occupied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if every slot is occupied.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Drops every node and resets the vacancy chain.
    ///
    /// Any structure still holding indices into this arena is left
    /// dangling; clear those structures first.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_free = Idx::NONE;
        self.len = 0;
    }
}

impl<T, Idx: Index> Storage<T> for Arena<T, Idx> {
    type Index = Idx;
    type Error = Full<T>;

    fn try_insert(&mut self, value: T) -> Result<Self::Index, Self::Error> {
        if self.next_free.is_some() {
            let idx = self.next_free;
            let slot = &mut self.entries[idx.as_usize()];
            match mem::replace(slot, Entry::Occupied(value)) {
                Entry::Vacant(next) => self.next_free = next,
                Entry::Occupied(_) => unreachable!("occupied slot on free list"),
            }
            self.len += 1;
            Ok(idx)
        } else if self.entries.len() < self.capacity {
            let idx = Idx::from_usize(self.entries.len());
            self.entries.push(Entry::Occupied(value));
            self.len += 1;
            Ok(idx)
        } else {
            Err(Full(value))
        }
    }

    fn remove(&mut self, index: Self::Index) -> Option<T> {
        let slot = self.entries.get_mut(index.as_usize())?;
        if matches!(slot, Entry::Vacant(_)) {
            return None;
        }

        match mem::replace(slot, Entry::Vacant(self.next_free)) {
            Entry::Occupied(value) => {
                self.next_free = index;
                self.len -= 1;
                Some(value)
            }
            Entry::Vacant(_) => unreachable!(),
        }
    }

    #[inline]
    fn get(&self, index: Self::Index) -> Option<&T> {
        match self.entries.get(index.as_usize()) {
            Some(Entry::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn get_mut(&mut self, index: Self::Index) -> Option<&mut T> {
        match self.entries.get_mut(index.as_usize()) {
            Some(Entry::Occupied(value)) => Some(value),
            _ => None,
        }
    }
}

#[cfg(feature = "slab")]
impl<T> Storage<T> for slab::Slab<T> {
    type Index = usize;
    type Error = core::convert::Infallible;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<Self::Index, Self::Error> {
        Ok(self.insert(value))
    }

    #[inline]
    fn remove(&mut self, index: Self::Index) -> Option<T> {
        self.try_remove(index)
    }

    #[inline]
    fn get(&self, index: Self::Index) -> Option<&T> {
        self.get(index)
    }

    #[inline]
    fn get_mut(&mut self, index: Self::Index) -> Option<&mut T> {
        self.get_mut(index)
    }
}
