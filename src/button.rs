//! Per-channel button records and the bank that shares them across contexts.
//!
//! A [`ButtonState`] is a plain `Copy` value. The [`ButtonBank`] stores one per
//! input line inside a `critical_section::Mutex`, so the edge dispatcher can
//! replace a whole record in one step and the main loop can only ever copy a
//! fully written record back out.

use core::cell::Cell;
use critical_section::Mutex;

use crate::time::Timestamp;

/// Identifier of a physical input line (the GPIO number on the reference board).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelId(pub u8);

impl From<u8> for ChannelId {
    fn from(id: u8) -> Self {
        ChannelId(id)
    }
}

impl From<ChannelId> for u8 {
    fn from(id: ChannelId) -> Self {
        id.0
    }
}

/// Where a channel sits in its edge state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonPhase {
    /// No edge pending (freshly created, reset, or a steady polled level).
    Idle,
    /// A rising edge was seen and no falling edge has followed yet.
    RisingPending,
    /// A falling edge was seen.
    FallingPending,
}

/// Debounce inputs for one physical input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonState {
    /// Input line this record belongs to. Never changes.
    pub channel_id: ChannelId,
    /// Level before the most recent observed edge.
    pub prev_logical_state: bool,
    /// Level at the most recent observed edge.
    pub curr_logical_state: bool,
    /// When the previous level was observed.
    pub prev_transition_time: Timestamp,
    /// When the current level was observed, or [`Timestamp::UNSET`].
    pub curr_transition_time: Timestamp,
}

impl ButtonState {
    /// Creates an idle record with every field zeroed.
    pub const fn new(channel_id: ChannelId) -> Self {
        Self {
            channel_id,
            prev_logical_state: false,
            curr_logical_state: false,
            prev_transition_time: Timestamp::UNSET,
            curr_transition_time: Timestamp::UNSET,
        }
    }

    /// Records a rising edge observed at `now`.
    ///
    /// Restarts the stability window: `now` becomes the previous transition
    /// time and the current one is cleared until a falling edge arrives.
    pub fn mark_rising_edge(&mut self, now: Timestamp) {
        self.prev_logical_state = false;
        self.curr_logical_state = true;
        self.prev_transition_time = now;
        self.curr_transition_time = Timestamp::UNSET;
    }

    /// Records a falling edge observed at `now`.
    ///
    /// The previously recorded level becomes the previous level, so after a
    /// rising edge this records `true -> false`, while a repeated falling
    /// edge records `false -> false` and can never pass the debounce gate.
    /// The same holds for a release following a chatter [`reset`](Self::reset):
    /// without a fresh rising edge it is not reported.
    /// Leaves `prev_transition_time` as recorded by the last rising edge.
    pub fn mark_falling_edge(&mut self, now: Timestamp) {
        self.prev_logical_state = self.curr_logical_state;
        self.curr_logical_state = false;
        self.curr_transition_time = now;
    }

    /// Zeroes the levels and both timestamps. The channel id is kept.
    pub fn reset(&mut self) {
        *self = Self::new(self.channel_id);
    }

    /// Shifts the current level into the previous one and stores `level`.
    ///
    /// Used by polled inputs on platforms without edge interrupts.
    pub fn advance_logical(&mut self, level: bool) {
        self.prev_logical_state = self.curr_logical_state;
        self.curr_logical_state = level;
    }

    /// Shifts the current timestamp into the previous one and stores `now`.
    ///
    /// Paired with [`advance_logical`](Self::advance_logical) in polling mode.
    pub fn advance_time(&mut self, now: Timestamp) {
        self.prev_transition_time = self.curr_transition_time;
        self.curr_transition_time = now;
    }

    /// Derives the edge state machine position from the recorded fields.
    pub fn phase(&self) -> ButtonPhase {
        match (self.prev_logical_state, self.curr_logical_state) {
            (false, true) => ButtonPhase::RisingPending,
            (_, false) if !self.curr_transition_time.is_unset() => ButtonPhase::FallingPending,
            _ => ButtonPhase::Idle,
        }
    }
}

/// Fixed set of button records shared between interrupt and main contexts.
///
/// Every record sits behind its own critical-section mutex. Mutation goes
/// through [`update`](Self::update), which runs a closure on a copy and
/// stores the result before the critical section ends; reads go through
/// [`snapshot`](Self::snapshot). A reader therefore sees either the record
/// before or after a dispatcher write, never a mix.
///
/// # Type Parameters
/// * `CHANNELS` - Number of input lines
pub struct ButtonBank<const CHANNELS: usize> {
    channels: [ChannelId; CHANNELS],
    slots: [Mutex<Cell<ButtonState>>; CHANNELS],
}

impl<const CHANNELS: usize> ButtonBank<CHANNELS> {
    /// Creates a bank with one idle record per channel.
    ///
    /// Channel ids are expected to be distinct; lookups resolve to the first
    /// matching slot.
    pub const fn new(channels: [ChannelId; CHANNELS]) -> Self {
        let mut slots =
            [const { Mutex::new(Cell::new(ButtonState::new(ChannelId(0)))) }; CHANNELS];
        let mut i = 0;
        while i < CHANNELS {
            slots[i] = Mutex::new(Cell::new(ButtonState::new(channels[i])));
            i += 1;
        }
        Self { channels, slots }
    }

    /// Number of channels in the bank.
    pub const fn len(&self) -> usize {
        CHANNELS
    }

    /// Returns true if the bank has no channels.
    pub const fn is_empty(&self) -> bool {
        CHANNELS == 0
    }

    /// Returns true if `channel` belongs to this bank.
    pub fn contains(&self, channel: ChannelId) -> bool {
        self.slot(channel).is_some()
    }

    /// Copies out the complete record for `channel`.
    pub fn snapshot(&self, channel: ChannelId) -> Option<ButtonState> {
        let slot = self.slot(channel)?;
        Some(critical_section::with(|cs| slot.borrow(cs).get()))
    }

    /// Applies `f` to the record for `channel` inside one critical section
    /// and returns the stored result.
    ///
    /// Returns `None` without calling `f` for unknown channels.
    pub fn update<F>(&self, channel: ChannelId, f: F) -> Option<ButtonState>
    where
        F: FnOnce(&mut ButtonState),
    {
        let slot = self.slot(channel)?;
        Some(critical_section::with(|cs| {
            let cell = slot.borrow(cs);
            let mut state = cell.get();
            f(&mut state);
            cell.set(state);
            state
        }))
    }

    /// Resets the record for `channel`. Returns false for unknown channels.
    pub fn reset(&self, channel: ChannelId) -> bool {
        self.update(channel, ButtonState::reset).is_some()
    }

    /// Resets every record in the bank.
    pub fn reset_all(&self) {
        critical_section::with(|cs| {
            for slot in &self.slots {
                let cell = slot.borrow(cs);
                let mut state = cell.get();
                state.reset();
                cell.set(state);
            }
        });
    }

    /// Channel ids in slot order.
    pub fn channels(&self) -> &[ChannelId] {
        &self.channels
    }

    fn slot(&self, channel: ChannelId) -> Option<&Mutex<Cell<ButtonState>>> {
        let idx = self.channels.iter().position(|&id| id == channel)?;
        self.slots.get(idx)
    }
}
