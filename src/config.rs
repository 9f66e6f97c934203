//! Compile-time constants and the board configuration.

use crate::button::ChannelId;

/// Minimum quiet interval, in ticks, before a level change is accepted.
pub const DEBOUNCE_DELAY: u64 = 200_000;

/// How long each pattern element is lit, and the gap after it, in ticks.
pub const BLINK_DELAY: u64 = 500_000;

/// Default cap on the pattern length.
pub const DEFAULT_PATTERN_LEN: usize = 10;

/// Number of distinct pattern symbols (one indicator line and button each).
pub const SYMBOL_COUNT: usize = 4;

/// Symbol buttons plus the reset button.
pub const NUM_CHANNELS: usize = SYMBOL_COUNT + 1;

/// Default depth of the press event queue.
pub const DEFAULT_QUEUE_DEPTH: usize = 8;

/// Which input line plays which role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelMap {
    /// Symbol `i` is entered through `symbols[i]`.
    pub symbols: [ChannelId; SYMBOL_COUNT],
    /// Clears all game state when pressed.
    pub reset: ChannelId,
}

impl ChannelMap {
    /// GPIO 16..=19 for the symbols and GPIO 20 for reset.
    pub const DEFAULT: Self = ChannelMap::new(
        [ChannelId(16), ChannelId(17), ChannelId(18), ChannelId(19)],
        ChannelId(20),
    );

    /// Creates a channel map.
    pub const fn new(symbols: [ChannelId; SYMBOL_COUNT], reset: ChannelId) -> Self {
        Self { symbols, reset }
    }

    /// Symbol entered by `channel`, if it is a symbol input.
    pub fn symbol_for(&self, channel: ChannelId) -> Option<u8> {
        self.symbols
            .iter()
            .position(|&id| id == channel)
            .map(|idx| idx as u8)
    }

    /// Returns true if `channel` is the reset input.
    pub fn is_reset(&self, channel: ChannelId) -> bool {
        channel == self.reset
    }

    /// Every channel in bank order: the symbols followed by reset.
    pub const fn all(&self) -> [ChannelId; NUM_CHANNELS] {
        let mut all = [self.reset; NUM_CHANNELS];
        let mut i = 0;
        while i < SYMBOL_COUNT {
            all[i] = self.symbols[i];
            i += 1;
        }
        all
    }
}

impl Default for ChannelMap {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Runtime tunables for a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GameConfig {
    /// Debounce window in ticks.
    pub debounce_window: u64,
    /// Ticks a pattern element stays lit.
    pub on_time: u64,
    /// Ticks all lines stay dark after an element.
    pub off_time: u64,
    /// Role of each input line.
    pub channels: ChannelMap,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            debounce_window: DEBOUNCE_DELAY,
            on_time: BLINK_DELAY,
            off_time: BLINK_DELAY,
            channels: ChannelMap::default(),
        }
    }
}
