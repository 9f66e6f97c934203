//! Status indicator blink, independent of the game loop.

use crate::time::Timestamp;

/// Trait for a single on/off status output.
pub trait StatusLed {
    /// Drives the output.
    fn set(&mut self, on: bool);
}

/// Toggles a status line every `period` ticks to show the firmware is alive.
///
/// Uses wrapping arithmetic, so it keeps blinking across a clock wraparound.
pub struct Heartbeat<S: StatusLed> {
    led: S,
    period: u64,
    last_toggle: Timestamp,
    on: bool,
}

impl<S: StatusLed> Heartbeat<S> {
    /// Creates a heartbeat that switches the LED on at `now`.
    pub fn new(mut led: S, period: u64, now: Timestamp) -> Self {
        led.set(true);
        Self {
            led,
            period,
            last_toggle: now,
            on: true,
        }
    }

    /// Toggles the LED if a period has passed and returns the ticks until the
    /// next toggle is due.
    pub fn service(&mut self, now: Timestamp) -> u64 {
        let elapsed = now.wrapping_duration_since(self.last_toggle);
        if elapsed < self.period {
            return self.period - elapsed;
        }

        self.on = !self.on;
        self.led.set(self.on);
        self.last_toggle = now;
        self.period
    }

    /// Returns true while the LED is lit.
    pub fn is_on(&self) -> bool {
        self.on
    }
}
