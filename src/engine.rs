//! Main-loop coordinator.
//!
//! [`MemoryGame`] is the only owner of game progress. It drains press events
//! posted by the [`EdgeDispatcher`](crate::EdgeDispatcher), feeds them to the
//! [`Game`], and drives the [`PatternDisplay`]. Instead of spinning on flags it
//! reports through [`ServiceTiming`] how long the caller may sleep.

use crate::config::GameConfig;
use crate::display::{DisplayError, DisplayState, Indicators, PatternDisplay, ServiceTiming};
use crate::game::{Game, GameError, GamePhase, PressOutcome};
use crate::pattern::PatternSource;
use crate::queue::EventQueue;
use crate::time::TimeSource;

/// Errors that can occur while servicing the game loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineError {
    /// A game rule operation failed.
    Game(GameError),
    /// A display operation failed.
    Display(DisplayError),
}

impl core::fmt::Display for EngineError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EngineError::Game(err) => write!(f, "game error: {}", err),
            EngineError::Display(err) => write!(f, "display error: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EngineError {}

impl From<GameError> for EngineError {
    fn from(err: GameError) -> Self {
        EngineError::Game(err)
    }
}

impl From<DisplayError> for EngineError {
    fn from(err: DisplayError) -> Self {
        EngineError::Display(err)
    }
}

/// Runs the memory game on one set of indicator lines.
///
/// # Type Parameters
/// * `'a` - Lifetime of the shared event queue and time source
/// * `L` - Indicator implementation type
/// * `T` - Time source implementation type
/// * `R` - Pattern source implementation type
/// * `QUEUE` - Event queue capacity
/// * `PATTERN_LEN` - Maximum pattern length
pub struct MemoryGame<
    'a,
    L: Indicators,
    T: TimeSource,
    R: PatternSource,
    const QUEUE: usize,
    const PATTERN_LEN: usize,
> {
    game: Game<PATTERN_LEN>,
    display: PatternDisplay<L, PATTERN_LEN>,
    source: R,
    queue: &'a EventQueue<QUEUE>,
    time_source: &'a T,
    reset_pending: bool,
    dropped_seen: u32,
}

impl<'a, L, T, R, const QUEUE: usize, const PATTERN_LEN: usize>
    MemoryGame<'a, L, T, R, QUEUE, PATTERN_LEN>
where
    L: Indicators,
    T: TimeSource,
    R: PatternSource,
{
    /// Creates a game waiting for its first pattern, with all lines off.
    pub fn new(
        lines: L,
        source: R,
        queue: &'a EventQueue<QUEUE>,
        time_source: &'a T,
        config: &GameConfig,
    ) -> Self {
        Self {
            game: Game::new(config.channels),
            display: PatternDisplay::new(lines, config.on_time, config.off_time),
            source,
            queue,
            time_source,
            reset_pending: false,
            dropped_seen: 0,
        }
    }

    /// Runs one iteration of the game loop.
    ///
    /// Drains pending presses, advances the pattern display and starts the
    /// next round when one is due.
    ///
    /// # Returns
    /// * `Ok(ServiceTiming::Delay(ticks))` - Display in progress, service again after this delay
    /// * `Ok(ServiceTiming::Complete)` - Waiting on the player; sleep until the next press event
    /// * `Err` - Internal state mismatch
    pub fn service(&mut self) -> Result<ServiceTiming, EngineError> {
        let now = self.time_source.now();
        self.drain_events();

        if self.display.is_running() {
            match self.display.service(now)? {
                ServiceTiming::Delay(delay) => return Ok(ServiceTiming::Delay(delay)),
                ServiceTiming::Complete => self.finish_display()?,
            }
        }

        if self.game.is_waiting_for_pattern() {
            self.game.next_round(&mut self.source)?;
            info!("level {}", self.game.level());

            match self.display.start(self.game.pattern(), now)? {
                ServiceTiming::Delay(delay) => return Ok(ServiceTiming::Delay(delay)),
                ServiceTiming::Complete => self.finish_display()?,
            }
        }

        Ok(ServiceTiming::Complete)
    }

    /// Feeds every pending press event into the game.
    ///
    /// Returns the number of events consumed. A reset that arrives while a
    /// pattern is being shown is held until the display completes.
    pub fn drain_events(&mut self) -> usize {
        let dropped = self.queue.dropped();
        if dropped != self.dropped_seen {
            warn!("{} press events dropped", dropped.wrapping_sub(self.dropped_seen));
            self.dropped_seen = dropped;
        }

        let mut consumed = 0;
        while let Some(event) = self.queue.take() {
            consumed += 1;
            if self.display.is_running() && self.game.channels().is_reset(event.channel) {
                self.reset_pending = true;
                continue;
            }
            if let PressOutcome::Ignored = self.game.handle_press(event.channel) {
                debug!("press on {} ignored", event.channel.0);
            }
        }
        consumed
    }

    /// Requests a full game reset. Safe to call in any phase.
    ///
    /// Applied immediately unless a pattern is being shown, in which case it
    /// takes effect as soon as the display completes.
    pub fn reset(&mut self) {
        if self.display.is_running() {
            self.reset_pending = true;
        } else {
            self.game.reset();
        }
    }

    /// Returns the game rules state.
    pub fn game(&self) -> &Game<PATTERN_LEN> {
        &self.game
    }

    /// Returns the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.game.phase()
    }

    /// Returns the pattern display state.
    pub fn display_state(&self) -> DisplayState {
        self.display.state()
    }

    /// Returns the indicator lines.
    pub fn lines(&self) -> &L {
        self.display.lines()
    }

    /// Returns true if a reset is waiting for the display to complete.
    pub fn is_reset_pending(&self) -> bool {
        self.reset_pending
    }

    fn finish_display(&mut self) -> Result<(), EngineError> {
        self.game.pattern_shown()?;
        if self.reset_pending {
            self.reset_pending = false;
            self.game.reset();
        }
        Ok(())
    }
}
