//! Cancellable alarm queue with deadline polling.
//!
//! [`TimerQueue`] tracks payloads against deadlines of any `Ord + Copy`
//! type: an integer tick, an `Instant`, a nanosecond count. It is built
//! for event loops that own their clock: the loop asks [`poll`] how long
//! it may sleep, sleeps, then calls [`process`] to fire whatever came
//! due. Nothing here reads a clock or spawns a thread.
//!
//! Internally a timer moves through three lists backed by one arena:
//!
//! ```text
//! set ──► scheduled (sorted by deadline) ──► ready ──► done
//!              │                               │         │
//!              └────────────── cancel ─────────┴─────────┘
//! ```
//!
//! Timers with equal deadlines fire in the order they were set. A fired
//! timer rests in `done`, its payload intact, until [`cancel`] reclaims
//! it; its [`TimerId`] stays valid the whole way through.
//!
//! # Example
//!
//! ```
//! use burrow_timer::{NextFire, TimerQueue};
//!
//! let mut timers: TimerQueue<&str, u64> = TimerQueue::with_capacity(16);
//!
//! timers.set(30, "boil").unwrap();
//! let steep = timers.set(10, "steep").unwrap();
//!
//! assert_eq!(timers.poll(&0), NextFire::At(10));
//!
//! // Changed our mind about steeping.
//! assert_eq!(timers.cancel(steep), Some("steep"));
//!
//! let mut fired = Vec::new();
//! timers.process(&31, |_, payload| fired.push(*payload));
//! assert_eq!(fired, vec!["boil"]);
//! ```
//!
//! [`poll`]: TimerQueue::poll
//! [`process`]: TimerQueue::process
//! [`cancel`]: TimerQueue::cancel

#![warn(missing_docs)]

use burrow_collections::{Arena, Full, Index, List, ListLinks, ListNode, Storage};

use core::ops::Sub;

/// Opaque handle to a timer, valid from [`TimerQueue::set`] until
/// [`TimerQueue::cancel`] (or [`TimerQueue::clear`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u32);

/// Which list currently holds a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Waiting for its deadline.
    Scheduled,
    /// Past its deadline, about to fire.
    Ready,
    /// Fired; payload retained until cancelled.
    Done,
}

/// What the queue wants the event loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextFire<D> {
    /// Nothing scheduled; sleep indefinitely.
    Idle,
    /// Wake at (or sleep for) the given deadline or delay.
    At(D),
    /// A deadline has been reached; process now.
    Due,
}

/// Error returned when the queue's arena is out of slots.
///
/// Carries the payload back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFull<T>(pub T);

impl<T> QueueFull<T> {
    /// Recovers the payload that could not be scheduled.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> core::fmt::Display for QueueFull<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "timer queue is full")
    }
}

impl<T: core::fmt::Debug> std::error::Error for QueueFull<T> {}

#[derive(Debug)]
struct Entry<T, D> {
    deadline: D,
    state: TimerState,
    payload: T,
    links: ListLinks<u32>,
}

impl<T, D> ListNode<u32> for Entry<T, D> {
    fn list_links(&self) -> &ListLinks<u32> {
        &self.links
    }
    fn list_links_mut(&mut self) -> &mut ListLinks<u32> {
        &mut self.links
    }
}

/// A fixed-capacity queue of cancellable timers.
///
/// `D` is the deadline type (any `Ord + Copy`); `T` is the payload
/// carried from [`set`] to the [`process`] callback and back out through
/// [`cancel`]. All storage is allocated once at construction.
///
/// [`set`]: TimerQueue::set
/// [`process`]: TimerQueue::process
/// [`cancel`]: TimerQueue::cancel
#[derive(Debug)]
pub struct TimerQueue<T, D> {
    entries: Arena<Entry<T, D>>,
    scheduled: List<u32>,
    ready: List<u32>,
    done: List<u32>,
}

impl<T, D: Ord + Copy> TimerQueue<T, D> {
    /// Creates a queue holding up to `capacity` timers at once.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arena::with_capacity(capacity),
            scheduled: List::new(),
            ready: List::new(),
            done: List::new(),
        }
    }

    /// Returns the number of timers in any state.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no timers exist in any state.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the fixed capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Returns the number of timers waiting for their deadline.
    #[inline]
    pub fn scheduled_len(&self) -> usize {
        self.scheduled.len()
    }

    /// Returns the number of fired timers awaiting [`cancel`].
    ///
    /// [`cancel`]: TimerQueue::cancel
    #[inline]
    pub fn done_len(&self) -> usize {
        self.done.len()
    }

    /// Returns a timer's current state, or `None` for a stale id.
    pub fn state(&self, id: TimerId) -> Option<TimerState> {
        self.entries.get(id.0).map(|entry| entry.state)
    }

    /// Returns a timer's deadline, or `None` for a stale id.
    pub fn deadline(&self, id: TimerId) -> Option<D> {
        self.entries.get(id.0).map(|entry| entry.deadline)
    }

    /// Schedules a payload to fire at `deadline`.
    ///
    /// Insertion scans the sorted schedule from the tail, so timers set
    /// in roughly increasing deadline order insert in O(1) and equal
    /// deadlines keep their set order.
    pub fn set(&mut self, deadline: D, payload: T) -> Result<TimerId, QueueFull<T>> {
        let entry = Entry {
            deadline,
            state: TimerState::Scheduled,
            payload,
            links: ListLinks::new(),
        };
        let idx = self
            .entries
            .try_insert(entry)
            .map_err(|Full(entry)| QueueFull(entry.payload))?;

        let mut anchor = self.scheduled.tail();
        while anchor.is_some() {
            let existing = self.entries.get(anchor).expect("invalid index");
            if existing.deadline <= deadline {
                break;
            }
            anchor = existing.list_links().prev();
        }
        self.scheduled.insert_after(&mut self.entries, anchor, idx);

        Ok(TimerId(idx))
    }

    /// Removes a timer in any state and returns its payload.
    ///
    /// This is also how fired timers are reclaimed from the done list.
    /// Returns `None` if the id was already cancelled.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let state = self.entries.get(id.0)?.state;
        let list = match state {
            TimerState::Scheduled => &mut self.scheduled,
            TimerState::Ready => &mut self.ready,
            TimerState::Done => &mut self.done,
        };
        list.remove(&mut self.entries, id.0);
        self.entries.remove(id.0).map(|entry| entry.payload)
    }

    /// Reports the earliest scheduled deadline relative to `now`.
    ///
    /// Returns [`NextFire::Due`] once `now` has reached the head
    /// deadline, [`NextFire::At`] with that deadline otherwise, and
    /// [`NextFire::Idle`] when nothing is scheduled. Fired-but-unclaimed
    /// timers in the done list do not count.
    pub fn poll(&self, now: &D) -> NextFire<D> {
        let head = self.scheduled.head();
        if head.is_none() {
            return NextFire::Idle;
        }
        let deadline = self.entries.get(head).expect("invalid index").deadline;
        if *now >= deadline {
            NextFire::Due
        } else {
            NextFire::At(deadline)
        }
    }

    /// Like [`poll`], but [`NextFire::At`] carries the remaining delay
    /// (`deadline - now`) instead of the absolute deadline.
    ///
    /// [`poll`]: TimerQueue::poll
    pub fn poll_delay(&self, now: &D) -> NextFire<D>
    where
        D: Sub<Output = D>,
    {
        match self.poll(now) {
            NextFire::At(deadline) => NextFire::At(deadline - *now),
            other => other,
        }
    }

    /// Fires every timer whose deadline has passed.
    ///
    /// Timers move to the ready list while `now` is strictly past their
    /// deadline (a timer set for `now` exactly waits one more tick,
    /// matching the `>=` in [`poll`] so a `Due` poll result may still
    /// fire nothing until time advances). The ready list then drains in
    /// deadline order, invoking `f` as each timer lands in the done
    /// list. Returns the number fired.
    ///
    /// [`poll`]: TimerQueue::poll
    pub fn process<F>(&mut self, now: &D, mut f: F) -> usize
    where
        F: FnMut(TimerId, &mut T),
    {
        self.make_ready(now, None);
        self.drain_ready(&mut f)
    }

    /// Like [`process`], but at most `n` timers leave the schedule.
    ///
    /// Bounds the work done in one event-loop turn; anything still due
    /// fires on a later call.
    ///
    /// [`process`]: TimerQueue::process
    pub fn process_n<F>(&mut self, now: &D, n: usize, mut f: F) -> usize
    where
        F: FnMut(TimerId, &mut T),
    {
        self.make_ready(now, Some(n));
        self.drain_ready(&mut f)
    }

    /// Drops every timer in every state and frees their slots.
    ///
    /// Outstanding [`TimerId`]s become stale.
    pub fn clear(&mut self) {
        self.scheduled = List::new();
        self.ready = List::new();
        self.done = List::new();
        self.entries.clear();
    }

    /// Moves due timers from the schedule to the ready list, up to
    /// `budget` of them.
    fn make_ready(&mut self, now: &D, mut budget: Option<usize>) {
        loop {
            if budget == Some(0) {
                break;
            }
            let head = self.scheduled.head();
            if head.is_none() {
                break;
            }
            let deadline = self.entries.get(head).expect("invalid index").deadline;
            if *now <= deadline {
                break;
            }

            self.scheduled.remove(&mut self.entries, head);
            self.entries.get_mut(head).expect("invalid index").state = TimerState::Ready;
            self.ready.push_back(&mut self.entries, head);
            if let Some(n) = budget.as_mut() {
                *n -= 1;
            }
        }
    }

    /// Drains the entire ready list into done, firing callbacks.
    fn drain_ready<F>(&mut self, f: &mut F) -> usize
    where
        F: FnMut(TimerId, &mut T),
    {
        let mut fired = 0;
        loop {
            let head = self.ready.pop_front(&mut self.entries);
            if head.is_none() {
                break;
            }
            fired += 1;
            self.done.push_back(&mut self.entries, head);
            let entry = self.entries.get_mut(head).expect("invalid index");
            entry.state = TimerState::Done;
            f(TimerId(head), &mut entry.payload);
        }
        fired
    }
}
