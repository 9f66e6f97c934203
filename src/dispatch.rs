//! Interrupt-context edge dispatcher.
//!
//! Turns raw edge notifications into at most one [`PressEvent`] per genuine
//! transition. Everything here is bounded-time: one critical section to
//! update the channel record, one to post the event. No logging, no waiting.

use crate::button::{ButtonBank, ButtonState, ChannelId};
use crate::config::DEBOUNCE_DELAY;
use crate::debounce::{debounce_within, has_state_changed};
use crate::queue::{EventQueue, PressEvent};
use crate::time::TimeSource;

/// Edge bitmask as delivered by the platform's GPIO interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeFlags(u32);

impl EdgeFlags {
    /// No edge.
    pub const NONE: Self = EdgeFlags(0);
    /// High to low.
    pub const FALL: Self = EdgeFlags(0x4);
    /// Low to high.
    pub const RISE: Self = EdgeFlags(0x8);
    /// Both edges reported together.
    pub const BOTH: Self = EdgeFlags(0x4 | 0x8);

    /// Builds flags from a raw event mask, ignoring unknown bits.
    #[inline]
    pub const fn from_bits_truncate(bits: u32) -> Self {
        EdgeFlags(bits & Self::BOTH.0)
    }

    /// Raw bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true if a rising edge is flagged.
    #[inline]
    pub const fn is_rising(self) -> bool {
        self.0 & Self::RISE.0 != 0
    }

    /// Returns true if a falling edge is flagged.
    #[inline]
    pub const fn is_falling(self) -> bool {
        self.0 & Self::FALL.0 != 0
    }
}

impl core::ops::BitOr for EdgeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        EdgeFlags(self.0 | rhs.0)
    }
}

/// Routes edge notifications to the button bank and the event queue.
///
/// Holds only shared references, so one instance can be stored in a
/// `static` next to the bank and queue and called from the GPIO handler.
///
/// # Type Parameters
/// * `'a` - Lifetime of the shared bank, queue and clock
/// * `T` - Time source implementation type
/// * `CHANNELS` - Number of input lines in the bank
/// * `QUEUE` - Event queue capacity
pub struct EdgeDispatcher<'a, T: TimeSource, const CHANNELS: usize, const QUEUE: usize> {
    bank: &'a ButtonBank<CHANNELS>,
    queue: &'a EventQueue<QUEUE>,
    time_source: &'a T,
    window: u64,
}

impl<'a, T: TimeSource, const CHANNELS: usize, const QUEUE: usize>
    EdgeDispatcher<'a, T, CHANNELS, QUEUE>
{
    /// Creates a dispatcher using [`DEBOUNCE_DELAY`] as the window.
    pub const fn new(
        bank: &'a ButtonBank<CHANNELS>,
        queue: &'a EventQueue<QUEUE>,
        time_source: &'a T,
    ) -> Self {
        Self::with_window(bank, queue, time_source, DEBOUNCE_DELAY)
    }

    /// Creates a dispatcher with a custom debounce window in ticks.
    pub const fn with_window(
        bank: &'a ButtonBank<CHANNELS>,
        queue: &'a EventQueue<QUEUE>,
        time_source: &'a T,
        window: u64,
    ) -> Self {
        Self {
            bank,
            queue,
            time_source,
            window,
        }
    }

    /// Debounce window in ticks.
    pub fn window(&self) -> u64 {
        self.window
    }

    /// Handles one edge notification for `channel`.
    ///
    /// Unknown channels and empty masks are ignored. Both edges at once are
    /// treated as chatter: the record is reset and nothing is evaluated.
    /// Otherwise the record is marked and, if the debounce gate passes,
    /// exactly one press event is posted and also returned.
    ///
    /// An event that does not fit in the queue is dropped and counted by the
    /// queue; `None` is returned in that case.
    pub fn on_edge(&self, channel: ChannelId, flags: EdgeFlags) -> Option<PressEvent> {
        let rising = flags.is_rising();
        let falling = flags.is_falling();
        if !rising && !falling {
            return None;
        }

        let now = self.time_source.now();
        let window = self.window;
        let mut confirmed = false;
        self.bank.update(channel, |state| {
            if rising && falling {
                state.reset();
                return;
            }
            if rising {
                state.mark_rising_edge(now);
            } else {
                state.mark_falling_edge(now);
            }
            confirmed = debounce_within(state, window);
        })?;

        if confirmed {
            self.emit(channel)
        } else {
            None
        }
    }

    /// Handles one polled sample of `channel`'s raw level.
    ///
    /// For platforms without edge interrupts. The time history only moves
    /// when the sampled level differs from the recorded one, so the window
    /// is measured from the previous observed change, not the previous
    /// sample. As with [`on_edge`](Self::on_edge), only a debounced release
    /// (high to low) posts an event, giving one event per press.
    pub fn on_sample(&self, channel: ChannelId, level: bool) -> Option<PressEvent> {
        let now = self.time_source.now();
        let window = self.window;
        let mut confirmed = false;
        self.bank.update(channel, |state| {
            state.advance_logical(level);
            if has_state_changed(state.prev_logical_state, state.curr_logical_state) {
                state.advance_time(now);
                confirmed = !state.curr_logical_state && debounce_within(state, window);
            }
        })?;

        if confirmed {
            self.emit(channel)
        } else {
            None
        }
    }

    /// Resets `channel`'s record on an explicit request.
    pub fn reset(&self, channel: ChannelId) -> bool {
        self.bank.reset(channel)
    }

    /// Consistent copy of `channel`'s record.
    pub fn snapshot(&self, channel: ChannelId) -> Option<ButtonState> {
        self.bank.snapshot(channel)
    }

    fn emit(&self, channel: ChannelId) -> Option<PressEvent> {
        let event = PressEvent::new(channel);
        self.queue.post(event).ok().map(|()| event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Timestamp;
    use core::cell::Cell;

    struct MockTimeSource {
        current_time: Cell<Timestamp>,
    }

    impl MockTimeSource {
        fn new() -> Self {
            Self {
                current_time: Cell::new(Timestamp(0)),
            }
        }

        fn set(&self, ticks: u64) {
            self.current_time.set(Timestamp(ticks));
        }
    }

    impl TimeSource for MockTimeSource {
        fn now(&self) -> Timestamp {
            self.current_time.get()
        }
    }

    const BTN: ChannelId = ChannelId(16);

    #[test]
    fn flags_decode_platform_mask() {
        let flags = EdgeFlags::from_bits_truncate(0x4 | 0x8 | 0x1);
        assert!(flags.is_rising());
        assert!(flags.is_falling());
        assert_eq!(flags.bits(), 0xC);
        assert_eq!(EdgeFlags::RISE | EdgeFlags::FALL, EdgeFlags::BOTH);
        assert!(!EdgeFlags::NONE.is_rising());
    }

    #[test]
    fn empty_mask_is_ignored() {
        let bank = ButtonBank::new([BTN]);
        let queue = EventQueue::<4>::new();
        let timer = MockTimeSource::new();
        let dispatcher = EdgeDispatcher::new(&bank, &queue, &timer);

        bank.update(BTN, |s| s.mark_rising_edge(Timestamp(5)));
        let before = bank.snapshot(BTN);
        assert_eq!(dispatcher.on_edge(BTN, EdgeFlags::NONE), None);
        assert_eq!(bank.snapshot(BTN), before);
    }

    #[test]
    fn rising_edge_alone_never_confirms() {
        let bank = ButtonBank::new([BTN]);
        let queue = EventQueue::<4>::new();
        let timer = MockTimeSource::new();
        let dispatcher = EdgeDispatcher::new(&bank, &queue, &timer);

        timer.set(900_000);
        assert_eq!(dispatcher.on_edge(BTN, EdgeFlags::RISE), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn custom_window_changes_the_verdict() {
        let bank = ButtonBank::new([BTN]);
        let queue = EventQueue::<4>::new();
        let timer = MockTimeSource::new();
        let dispatcher = EdgeDispatcher::with_window(&bank, &queue, &timer, 1_000);
        assert_eq!(dispatcher.window(), 1_000);

        timer.set(10);
        dispatcher.on_edge(BTN, EdgeFlags::RISE);
        timer.set(1_011);
        assert_eq!(
            dispatcher.on_edge(BTN, EdgeFlags::FALL),
            Some(PressEvent::new(BTN))
        );
    }

    #[test]
    fn explicit_reset_clears_record() {
        let bank = ButtonBank::new([BTN]);
        let queue = EventQueue::<4>::new();
        let timer = MockTimeSource::new();
        let dispatcher = EdgeDispatcher::new(&bank, &queue, &timer);

        timer.set(10);
        dispatcher.on_edge(BTN, EdgeFlags::RISE);
        assert!(dispatcher.reset(BTN));
        assert_eq!(dispatcher.snapshot(BTN), Some(ButtonState::new(BTN)));
        assert!(!dispatcher.reset(ChannelId(99)));
    }
}
