//! Pattern display on discrete indicator lines.
//!
//! Provides [`PatternDisplay`], a non-blocking stepper that shows a pattern one
//! element at a time, and the [`Indicators`] trait for the output hardware.
//! The display never sleeps itself: every call to
//! [`service`](PatternDisplay::service) reports how long the caller may wait.

use heapless::Vec;

use crate::time::Timestamp;

/// Trait for abstracting a bank of on/off indicator lines.
///
/// Implement this for your LEDs (GPIO outputs, shift register, etc.).
/// Handle any hardware errors internally - these methods cannot fail.
pub trait Indicators {
    /// Number of lines. Line `i` shows symbol `i`.
    fn line_count(&self) -> usize;

    /// Drives line `index` high (`on`) or low.
    fn set_line(&mut self, index: usize, on: bool);

    /// Turns every line off.
    fn all_off(&mut self) {
        for index in 0..self.line_count() {
            self.set_line(index, false);
        }
    }

    /// Lights only the line for `symbol`. Out-of-range symbols leave all
    /// lines off.
    fn show_only(&mut self, symbol: u8) {
        let symbol = usize::from(symbol);
        for index in 0..self.line_count() {
            self.set_line(index, index == symbol);
        }
    }
}

/// The current state of a pattern display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayState {
    /// Nothing started. Lines are off.
    Idle,
    /// A pattern is being shown.
    Running,
    /// The last element has been shown and the lines are off.
    Complete,
}

/// Timing information returned by service operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceTiming {
    /// Service again after this many ticks.
    Delay(u64),
    /// Nothing left to do until new input arrives.
    Complete,
}

/// Errors that can occur during display operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Operation called from an invalid state.
    InvalidState {
        /// Human-readable description of expected state(s)
        expected: &'static str,
        /// The actual current state
        actual: DisplayState,
    },
    /// The pattern does not fit in the display buffer.
    CapacityExceeded,
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DisplayError::InvalidState { expected, actual } => {
                write!(
                    f,
                    "invalid state: expected {}, but display is in {:?}",
                    expected, actual
                )
            }
            DisplayError::CapacityExceeded => {
                write!(f, "pattern exceeds display capacity")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DisplayError {}

/// What the lines currently show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lit {
    Off,
    Symbol(u8),
}

/// Shows a pattern element by element: one line lit for `on_time`, then all
/// lines dark for `off_time`.
///
/// A started display always runs to completion; there is no cancel.
///
/// # Type Parameters
/// * `L` - Indicator implementation type
/// * `N` - Maximum pattern length
pub struct PatternDisplay<L: Indicators, const N: usize> {
    lines: L,
    state: DisplayState,
    pattern: Vec<u8, N>,
    start_time: Option<Timestamp>,
    on_time: u64,
    off_time: u64,
    lit: Lit,
}

impl<L: Indicators, const N: usize> PatternDisplay<L, N> {
    /// Creates an idle display with all lines turned off.
    pub fn new(mut lines: L, on_time: u64, off_time: u64) -> Self {
        lines.all_off();

        Self {
            lines,
            state: DisplayState::Idle,
            pattern: Vec::new(),
            start_time: None,
            on_time,
            off_time,
            lit: Lit::Off,
        }
    }

    /// Starts showing `pattern` from its first element at `now`.
    ///
    /// Must be called from `Idle` or `Complete`.
    pub fn start(&mut self, pattern: &[u8], now: Timestamp) -> Result<ServiceTiming, DisplayError> {
        if self.state == DisplayState::Running {
            return Err(DisplayError::InvalidState {
                expected: "Idle or Complete",
                actual: self.state,
            });
        }

        self.pattern = Vec::from_slice(pattern).map_err(|_| DisplayError::CapacityExceeded)?;
        self.start_time = Some(now);
        self.state = DisplayState::Running;
        self.service(now)
    }

    /// Updates the lines for `now`.
    ///
    /// Must be called from `Running`.
    ///
    /// # Returns
    /// - `Ok(ServiceTiming::Delay(ticks))` - Service again after this delay
    /// - `Ok(ServiceTiming::Complete)` - Pattern finished, transitions to `Complete`
    /// - `Err` - Invalid state
    pub fn service(&mut self, now: Timestamp) -> Result<ServiceTiming, DisplayError> {
        let Some(start_time) = self.start_time.filter(|_| self.state == DisplayState::Running)
        else {
            return Err(DisplayError::InvalidState {
                expected: "Running",
                actual: self.state,
            });
        };

        // A clock that reads earlier than the start holds the first element.
        let elapsed = now.checked_duration_since(start_time).unwrap_or(0);
        let period = self.on_time.saturating_add(self.off_time);
        let position = if period == 0 {
            self.pattern.len()
        } else {
            usize::try_from(elapsed / period).unwrap_or(usize::MAX)
        };

        let Some(&symbol) = self.pattern.get(position) else {
            self.set_lit(Lit::Off);
            self.start_time = None;
            self.state = DisplayState::Complete;
            return Ok(ServiceTiming::Complete);
        };

        let within = elapsed % period;
        if within < self.on_time {
            if self.lit != Lit::Symbol(symbol) {
                debug!("pattern[{}] = {}", position, symbol);
            }
            self.set_lit(Lit::Symbol(symbol));
            Ok(ServiceTiming::Delay(self.on_time - within))
        } else {
            self.set_lit(Lit::Off);
            Ok(ServiceTiming::Delay(period - within))
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// Returns true while a pattern is being shown.
    pub fn is_running(&self) -> bool {
        self.state == DisplayState::Running
    }

    /// Pattern passed to the last [`start`](Self::start).
    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    /// Symbol currently lit, if any.
    pub fn lit_symbol(&self) -> Option<u8> {
        match self.lit {
            Lit::Symbol(symbol) => Some(symbol),
            Lit::Off => None,
        }
    }

    /// Total ticks needed to show the current pattern.
    pub fn total_duration(&self) -> u64 {
        (self.pattern.len() as u64).saturating_mul(self.on_time.saturating_add(self.off_time))
    }

    /// Returns the indicator lines.
    pub fn lines(&self) -> &L {
        &self.lines
    }

    fn set_lit(&mut self, lit: Lit) {
        // Update lines only if the output changed
        if lit == self.lit {
            return;
        }
        match lit {
            Lit::Off => self.lines.all_off(),
            Lit::Symbol(symbol) => self.lines.show_only(symbol),
        }
        self.lit = lit;
    }
}
