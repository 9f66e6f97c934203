//! Bounded mailbox carrying press events from interrupt to main context.

use core::cell::RefCell;
use critical_section::Mutex;
use heapless::Deque;

use crate::button::ChannelId;

/// A confirmed, debounced press on one input line.
///
/// Only the channel crosses the interrupt boundary; raw timing stays behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PressEvent {
    pub channel: ChannelId,
}

impl PressEvent {
    /// Creates an event for `channel`.
    pub const fn new(channel: ChannelId) -> Self {
        Self { channel }
    }
}

struct Inner<const QUEUE: usize> {
    events: Deque<PressEvent, QUEUE>,
    dropped: u32,
}

/// Fixed-capacity FIFO of [`PressEvent`]s.
///
/// [`post`](Self::post) is called from the edge dispatcher and never blocks;
/// when the queue is full the event is discarded and counted. The main loop
/// drains it with [`take`](Self::take). Each call holds a critical section
/// only for the duration of a single push or pop.
///
/// # Type Parameters
/// * `QUEUE` - Maximum number of undelivered events
pub struct EventQueue<const QUEUE: usize> {
    inner: Mutex<RefCell<Inner<QUEUE>>>,
}

impl<const QUEUE: usize> EventQueue<QUEUE> {
    /// Creates an empty queue.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                events: Deque::new(),
                dropped: 0,
            })),
        }
    }

    /// Appends `event`.
    ///
    /// Returns the event back if the queue was full. The drop counter is
    /// incremented in that case.
    pub fn post(&self, event: PressEvent) -> Result<(), PressEvent> {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            match inner.events.push_back(event) {
                Ok(()) => Ok(()),
                Err(rejected) => {
                    inner.dropped = inner.dropped.wrapping_add(1);
                    Err(rejected)
                }
            }
        })
    }

    /// Removes and returns the oldest event.
    pub fn take(&self) -> Option<PressEvent> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).events.pop_front())
    }

    /// Discards every pending event.
    pub fn clear(&self) {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).events.clear());
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow_ref(cs).events.len())
    }

    /// Returns true if no events are pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of pending events.
    pub const fn capacity(&self) -> usize {
        QUEUE
    }

    /// Number of events discarded because the queue was full.
    pub fn dropped(&self) -> u32 {
        critical_section::with(|cs| self.inner.borrow_ref(cs).dropped)
    }
}

impl<const QUEUE: usize> Default for EventQueue<QUEUE> {
    fn default() -> Self {
        Self::new()
    }
}
