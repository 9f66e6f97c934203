//! Game rules: pattern growth, input checking, scoring and reset.
//!
//! The [`Game`] is owned by the main loop and is the single writer of all
//! game progress. Presses reach it only as [`PressEvent`](crate::PressEvent)
//! channels forwarded by the main loop.

use heapless::Vec;

use crate::button::ChannelId;
use crate::config::{ChannelMap, SYMBOL_COUNT};
use crate::pattern::PatternSource;

/// Where the game is in its round cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GamePhase {
    /// A new pattern element must be generated and shown.
    AwaitingPattern,
    /// The pattern is being displayed. Symbol presses are discarded.
    ShowingPattern,
    /// Waiting for the player to reproduce the pattern.
    AwaitingInput,
    /// A wrong symbol was entered. Only reset leaves this phase.
    GameOver,
}

/// Result of feeding one press into the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressOutcome {
    /// The reset input was pressed and all state was cleared.
    Reset,
    /// Unknown channel, or a symbol press outside [`GamePhase::AwaitingInput`].
    Ignored,
    /// Correct symbol, more to enter.
    Correct {
        /// Position just matched.
        index: usize,
    },
    /// Correct final symbol; the score was incremented.
    RoundComplete {
        /// Score after this round.
        score: u32,
    },
    /// Wrong symbol; the game is over.
    GameOver {
        /// Symbol the pattern held at this position.
        expected: u8,
        /// Symbol the player entered.
        actual: u8,
    },
}

/// Errors for main-loop calls made out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameError {
    /// Operation called from the wrong phase.
    InvalidPhase {
        /// Phase the operation requires.
        expected: GamePhase,
        /// The actual current phase.
        actual: GamePhase,
    },
    /// The pattern buffer has zero capacity.
    ZeroCapacity,
}

impl core::fmt::Display for GameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            GameError::InvalidPhase { expected, actual } => {
                write!(
                    f,
                    "invalid phase: expected {:?}, but game is in {:?}",
                    expected, actual
                )
            }
            GameError::ZeroCapacity => {
                write!(f, "pattern buffer has zero capacity")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GameError {}

/// State of one memory game.
///
/// # Type Parameters
/// * `PATTERN_LEN` - Maximum pattern length. Once reached, each new round
///   regenerates the last element instead of growing the pattern.
#[derive(Debug, Clone)]
pub struct Game<const PATTERN_LEN: usize> {
    channels: ChannelMap,
    pattern: Vec<u8, PATTERN_LEN>,
    level: usize,
    input_index: usize,
    score: u32,
    phase: GamePhase,
}

impl<const PATTERN_LEN: usize> Game<PATTERN_LEN> {
    /// Creates a game at level 0 with an empty pattern.
    pub fn new(channels: ChannelMap) -> Self {
        Self {
            channels,
            pattern: Vec::new(),
            level: 0,
            input_index: 0,
            score: 0,
            phase: GamePhase::AwaitingPattern,
        }
    }

    /// Adds the next random symbol and enters [`GamePhase::ShowingPattern`].
    ///
    /// Returns the generated symbol. Must be called from
    /// [`GamePhase::AwaitingPattern`].
    pub fn next_round<S: PatternSource + ?Sized>(&mut self, source: &mut S) -> Result<u8, GameError> {
        self.expect_phase(GamePhase::AwaitingPattern)?;
        if PATTERN_LEN == 0 {
            return Err(GameError::ZeroCapacity);
        }

        let symbol = source.next_symbol(SYMBOL_COUNT as u8);
        if let Err(symbol) = self.pattern.push(symbol) {
            if let Some(last) = self.pattern.last_mut() {
                *last = symbol;
            }
        }

        self.level = self.pattern.len();
        self.input_index = 0;
        self.phase = GamePhase::ShowingPattern;
        debug!("round {}: new symbol {}", self.level, symbol);
        Ok(symbol)
    }

    /// Marks the pattern display as finished and starts accepting input.
    pub fn pattern_shown(&mut self) -> Result<(), GameError> {
        self.expect_phase(GamePhase::ShowingPattern)?;
        self.phase = GamePhase::AwaitingInput;
        Ok(())
    }

    /// Applies one confirmed press.
    ///
    /// The reset channel is honoured in every phase.
    pub fn handle_press(&mut self, channel: ChannelId) -> PressOutcome {
        if self.channels.is_reset(channel) {
            self.reset();
            return PressOutcome::Reset;
        }

        let Some(actual) = self.channels.symbol_for(channel) else {
            return PressOutcome::Ignored;
        };
        if self.phase != GamePhase::AwaitingInput {
            return PressOutcome::Ignored;
        }
        let Some(&expected) = self.pattern.get(self.input_index) else {
            return PressOutcome::Ignored;
        };

        debug!(
            "[{}] of [{}] pattern = {} input = {}",
            self.input_index, self.level, expected, actual
        );

        if actual != expected {
            self.phase = GamePhase::GameOver;
            info!("game over, score {}", self.score);
            return PressOutcome::GameOver { expected, actual };
        }

        if self.input_index + 1 >= self.level {
            self.input_index = 0;
            self.score = self.score.saturating_add(1);
            self.phase = GamePhase::AwaitingPattern;
            info!("score: {}", self.score);
            PressOutcome::RoundComplete { score: self.score }
        } else {
            let index = self.input_index;
            self.input_index += 1;
            PressOutcome::Correct { index }
        }
    }

    /// Clears level, score, pattern and flags. Safe from any phase.
    pub fn reset(&mut self) {
        self.pattern.clear();
        self.level = 0;
        self.input_index = 0;
        self.score = 0;
        self.phase = GamePhase::AwaitingPattern;
        info!("reset game");
    }

    /// Returns the current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Number of pattern elements the player must reproduce this round.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Rounds completed since the last reset.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Position of the next expected symbol.
    pub fn input_index(&self) -> usize {
        self.input_index
    }

    /// Returns true once a wrong symbol was entered.
    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Returns true while a new pattern element is due.
    pub fn is_waiting_for_pattern(&self) -> bool {
        self.phase == GamePhase::AwaitingPattern
    }

    /// The pattern shown so far.
    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// Role of each input line.
    pub fn channels(&self) -> &ChannelMap {
        &self.channels
    }

    fn expect_phase(&self, expected: GamePhase) -> Result<(), GameError> {
        if self.phase != expected {
            return Err(GameError::InvalidPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }
}
