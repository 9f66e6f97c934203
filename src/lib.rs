#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`ButtonState`**: Debounce inputs for one input line (levels and transition times)
//! - **`ButtonBank`**: Per-channel records shared between interrupt and main context
//! - **`debounce`**: Pure gate deciding whether a recorded change is a genuine press
//! - **`EdgeDispatcher`**: Interrupt-side handler turning edge notifications into `PressEvent`s
//! - **`EventQueue`**: Bounded mailbox carrying `PressEvent`s to the main loop
//! - **`Game`**: Pattern, level, score and game-over rules
//! - **`PatternDisplay`**: Non-blocking stepper showing a pattern on `Indicators`
//! - **`MemoryGame`**: Main-loop coordinator owning all game state
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`PatternSource`**: Random symbols, implemented for every `rand::RngCore`
//!
//! The interrupt side only ever touches the `ButtonBank` and the `EventQueue`.
//! Everything else is owned by the main loop, so game state has a single writer.

#[macro_use]
mod fmt;

pub mod time;
pub mod config;
pub mod button;
pub mod debounce;
pub mod queue;
pub mod dispatch;
pub mod pattern;
pub mod game;
pub mod display;
pub mod heartbeat;
pub mod engine;

pub use time::{TimeSource, Timestamp};
pub use config::{
    BLINK_DELAY, ChannelMap, DEBOUNCE_DELAY, DEFAULT_PATTERN_LEN, DEFAULT_QUEUE_DEPTH,
    GameConfig, NUM_CHANNELS, SYMBOL_COUNT,
};
pub use button::{ButtonBank, ButtonPhase, ButtonState, ChannelId};
pub use debounce::{debounce, debounce_within, has_state_changed, is_stable, is_stable_within};
pub use queue::{EventQueue, PressEvent};
pub use dispatch::{EdgeDispatcher, EdgeFlags};
pub use pattern::PatternSource;
pub use game::{Game, GameError, GamePhase, PressOutcome};
pub use display::{DisplayError, DisplayState, Indicators, PatternDisplay, ServiceTiming};
pub use heartbeat::{Heartbeat, StatusLed};
pub use engine::{EngineError, MemoryGame};
