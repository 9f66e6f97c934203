//! Shared test infrastructure for memory-game-core integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;
use memory_game_core::{ChannelMap, Indicators, PatternSource, TimeSource, Timestamp};

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<Timestamp>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(Timestamp(0)),
        }
    }

    /// Advance time by the given number of ticks
    pub fn advance(&self, ticks: u64) {
        let current = self.current_time.get();
        self.current_time.set(Timestamp(current.0 + ticks));
    }

    pub fn set_time(&self, ticks: u64) {
        self.current_time.set(Timestamp(ticks));
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Indicator Lines
// ============================================================================

/// Mock indicator lines that record which symbol was lit on every change
pub struct MockLines {
    levels: [bool; 4],
    shown: heapless::Vec<u8, 64>,
}

impl MockLines {
    pub fn new() -> Self {
        Self {
            levels: [false; 4],
            shown: heapless::Vec::new(),
        }
    }

    pub fn levels(&self) -> [bool; 4] {
        self.levels
    }

    /// Symbols in the order they were lit
    pub fn shown(&self) -> &[u8] {
        &self.shown
    }
}

impl Indicators for MockLines {
    fn line_count(&self) -> usize {
        self.levels.len()
    }

    fn set_line(&mut self, index: usize, on: bool) {
        self.levels[index] = on;
        if on {
            let _ = self.shown.push(index as u8);
        }
    }
}

// ============================================================================
// Scripted Pattern Source
// ============================================================================

/// Pattern source replaying a fixed list of symbols
pub struct ScriptedSource {
    symbols: &'static [u8],
    next: usize,
}

impl ScriptedSource {
    pub fn new(symbols: &'static [u8]) -> Self {
        Self { symbols, next: 0 }
    }
}

impl PatternSource for ScriptedSource {
    fn next_symbol(&mut self, symbols: u8) -> u8 {
        let symbol = self.symbols[self.next % self.symbols.len()] % symbols;
        self.next += 1;
        symbol
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

pub const MAP: ChannelMap = ChannelMap::DEFAULT;

/// Input line for a pattern symbol on the reference board
pub fn symbol_channel(symbol: u8) -> memory_game_core::ChannelId {
    MAP.symbols[symbol as usize]
}
