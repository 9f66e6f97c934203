//! Pure debounce decision logic.
//!
//! A hardware edge is only accepted as a genuine transition when the logical
//! level actually changed *and* the input stayed quiet for longer than the
//! debounce window since the previous observed change. Both checks are
//! independent and side-effect free.

use crate::button::ButtonState;
use crate::config::DEBOUNCE_DELAY;
use crate::time::Timestamp;

/// Returns true if more than [`DEBOUNCE_DELAY`] ticks separate the two timestamps.
///
/// Equal timestamps and backward-moving time are never stable.
#[inline]
pub fn is_stable(prev_time: Timestamp, curr_time: Timestamp) -> bool {
    is_stable_within(prev_time, curr_time, DEBOUNCE_DELAY)
}

/// Like [`is_stable`] but with an explicit window in ticks.
///
/// The comparison is strict: an elapsed time exactly equal to `window` is
/// still considered chatter.
#[inline]
pub fn is_stable_within(prev_time: Timestamp, curr_time: Timestamp, window: u64) -> bool {
    match curr_time.checked_duration_since(prev_time) {
        Some(0) | None => false,
        Some(elapsed) => elapsed > window,
    }
}

/// Returns true if the logical level differs between the two samples.
#[inline]
pub fn has_state_changed(prev_logical: bool, curr_logical: bool) -> bool {
    prev_logical ^ curr_logical
}

/// Returns true if `state` records a changed level that has been stable for
/// longer than [`DEBOUNCE_DELAY`].
///
/// This is the sole gate for treating an edge as a user action.
#[inline]
pub fn debounce(state: &ButtonState) -> bool {
    debounce_within(state, DEBOUNCE_DELAY)
}

/// Like [`debounce`] but with an explicit window in ticks.
#[inline]
pub fn debounce_within(state: &ButtonState, window: u64) -> bool {
    has_state_changed(state.prev_logical_state, state.curr_logical_state)
        && is_stable_within(state.prev_transition_time, state.curr_transition_time, window)
}
