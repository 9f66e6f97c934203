//! Integration tests for the interrupt-side input path

mod common;
use common::*;

use memory_game_core::{
    ButtonBank, ButtonPhase, ButtonState, ChannelId, DEBOUNCE_DELAY, EdgeDispatcher, EdgeFlags,
    EventQueue, PressEvent, Timestamp, debounce,
};

const BTN: ChannelId = ChannelId(16);

#[test]
fn press_after_quiet_window_emits_exactly_once() {
    let bank = ButtonBank::new([BTN]);
    let queue = EventQueue::<8>::new();
    let timer = MockTimeSource::new();
    let dispatcher = EdgeDispatcher::new(&bank, &queue, &timer);

    // Rising edge at t=0
    assert_eq!(dispatcher.on_edge(BTN, EdgeFlags::RISE), None);
    let state = bank.snapshot(BTN).unwrap();
    assert!(!state.prev_logical_state);
    assert!(state.curr_logical_state);
    assert_eq!(state.prev_transition_time, Timestamp(0));
    assert!(state.curr_transition_time.is_unset());
    assert!(!debounce(&state));

    // Falling edge at t=250_000
    timer.set_time(250_000);
    assert_eq!(
        dispatcher.on_edge(BTN, EdgeFlags::FALL),
        Some(PressEvent::new(BTN))
    );
    let state = bank.snapshot(BTN).unwrap();
    assert!(state.prev_logical_state);
    assert!(!state.curr_logical_state);
    assert_eq!(state.curr_transition_time, Timestamp(250_000));

    assert_eq!(queue.take(), Some(PressEvent::new(BTN)));
    assert_eq!(queue.take(), None);
}

#[test]
fn repeated_falling_edge_is_chatter() {
    let bank = ButtonBank::new([BTN]);
    let queue = EventQueue::<8>::new();
    let timer = MockTimeSource::new();
    let dispatcher = EdgeDispatcher::new(&bank, &queue, &timer);

    dispatcher.on_edge(BTN, EdgeFlags::RISE);
    timer.set_time(250_000);
    dispatcher.on_edge(BTN, EdgeFlags::FALL);
    queue.take();

    // The level is already low; a second falling edge is not a change.
    timer.set_time(250_050);
    assert_eq!(dispatcher.on_edge(BTN, EdgeFlags::FALL), None);
    let state = bank.snapshot(BTN).unwrap();
    assert!(!state.prev_logical_state);
    assert!(!state.curr_logical_state);
    assert!(queue.is_empty());

    // Much later still nothing: timing alone never produces a press.
    timer.set_time(5_000_000);
    assert_eq!(dispatcher.on_edge(BTN, EdgeFlags::FALL), None);
    assert!(queue.is_empty());
}

#[test]
fn falling_edge_inside_window_is_rejected() {
    let bank = ButtonBank::new([BTN]);
    let queue = EventQueue::<8>::new();
    let timer = MockTimeSource::new();
    let dispatcher = EdgeDispatcher::new(&bank, &queue, &timer);

    timer.set_time(1_000);
    dispatcher.on_edge(BTN, EdgeFlags::RISE);
    timer.advance(DEBOUNCE_DELAY);
    assert_eq!(dispatcher.on_edge(BTN, EdgeFlags::FALL), None);
    assert!(queue.is_empty());
}

#[test]
fn rise_then_fall_outside_window_always_confirms() {
    for gap in [DEBOUNCE_DELAY + 1, 2 * DEBOUNCE_DELAY, 10 * DEBOUNCE_DELAY] {
        let bank = ButtonBank::new([BTN]);
        let queue = EventQueue::<8>::new();
        let timer = MockTimeSource::new();
        let dispatcher = EdgeDispatcher::new(&bank, &queue, &timer);

        timer.set_time(5);
        dispatcher.on_edge(BTN, EdgeFlags::RISE);
        timer.advance(gap);
        assert!(dispatcher.on_edge(BTN, EdgeFlags::FALL).is_some());
    }
}

#[test]
fn simultaneous_edges_reset_the_channel() {
    let bank = ButtonBank::new([BTN]);
    let queue = EventQueue::<8>::new();
    let timer = MockTimeSource::new();
    let dispatcher = EdgeDispatcher::new(&bank, &queue, &timer);

    timer.set_time(100);
    dispatcher.on_edge(BTN, EdgeFlags::RISE);
    timer.set_time(900_000);
    assert_eq!(dispatcher.on_edge(BTN, EdgeFlags::BOTH), None);

    let state = bank.snapshot(BTN).unwrap();
    assert_eq!(state, ButtonState::new(BTN));
    assert_eq!(state.phase(), ButtonPhase::Idle);
    assert!(!debounce(&state));
    assert!(queue.is_empty());
}

#[test]
fn unknown_channel_is_a_no_op() {
    let bank = ButtonBank::new([BTN, ChannelId(17)]);
    let queue = EventQueue::<8>::new();
    let timer = MockTimeSource::new();
    let dispatcher = EdgeDispatcher::new(&bank, &queue, &timer);

    dispatcher.on_edge(ChannelId(3), EdgeFlags::RISE);
    timer.set_time(900_000);
    assert_eq!(dispatcher.on_edge(ChannelId(3), EdgeFlags::FALL), None);

    assert_eq!(bank.snapshot(BTN), Some(ButtonState::new(BTN)));
    assert!(queue.is_empty());
}

#[test]
fn backward_clock_never_confirms() {
    let bank = ButtonBank::new([BTN]);
    let queue = EventQueue::<8>::new();
    let timer = MockTimeSource::new();
    let dispatcher = EdgeDispatcher::new(&bank, &queue, &timer);

    timer.set_time(900_000);
    dispatcher.on_edge(BTN, EdgeFlags::RISE);
    timer.set_time(100);
    assert_eq!(dispatcher.on_edge(BTN, EdgeFlags::FALL), None);
}

#[test]
fn channels_are_debounced_independently() {
    let a = ChannelId(16);
    let b = ChannelId(17);
    let bank = ButtonBank::new([a, b]);
    let queue = EventQueue::<8>::new();
    let timer = MockTimeSource::new();
    let dispatcher = EdgeDispatcher::new(&bank, &queue, &timer);

    timer.set_time(10);
    dispatcher.on_edge(a, EdgeFlags::RISE);
    timer.set_time(150_000);
    dispatcher.on_edge(b, EdgeFlags::RISE);
    timer.set_time(300_000);
    assert!(dispatcher.on_edge(a, EdgeFlags::FALL).is_some());
    assert!(dispatcher.on_edge(b, EdgeFlags::FALL).is_none());

    assert_eq!(queue.take(), Some(PressEvent::new(a)));
    assert!(queue.is_empty());
}

#[test]
fn full_queue_drops_confirmed_press() {
    let bank = ButtonBank::new([BTN]);
    let queue = EventQueue::<1>::new();
    let timer = MockTimeSource::new();
    let dispatcher = EdgeDispatcher::new(&bank, &queue, &timer);

    for round in 0..2u64 {
        timer.set_time(1 + round * 1_000_000);
        dispatcher.on_edge(BTN, EdgeFlags::RISE);
        timer.advance(DEBOUNCE_DELAY + 1);
        let emitted = dispatcher.on_edge(BTN, EdgeFlags::FALL);
        assert_eq!(emitted.is_some(), round == 0);
    }

    assert_eq!(queue.len(), 1);
    assert_eq!(queue.dropped(), 1);
}

/// Samples `BTN` once per millisecond from `start_ms` to `end_ms` with the
/// level given by `level_at`, returning the number of press events.
fn poll_at_1khz(
    dispatcher: &EdgeDispatcher<'_, MockTimeSource, 1, 8>,
    timer: &MockTimeSource,
    start_ms: u64,
    end_ms: u64,
    level_at: impl Fn(u64) -> bool,
) -> usize {
    let mut events = 0;
    for ms in start_ms..end_ms {
        timer.set_time(ms * 1_000);
        if dispatcher.on_sample(BTN, level_at(ms)).is_some() {
            events += 1;
        }
    }
    events
}

#[test]
fn polled_clean_press_confirms_once_at_1khz() {
    let bank = ButtonBank::new([BTN]);
    let queue = EventQueue::<8>::new();
    let timer = MockTimeSource::new();
    let dispatcher = EdgeDispatcher::new(&bank, &queue, &timer);

    let events = poll_at_1khz(&dispatcher, &timer, 1, 2_500, |ms| (1_000..1_500).contains(&ms));

    assert_eq!(events, 1);
    assert_eq!(queue.take(), Some(PressEvent::new(BTN)));
    assert!(queue.is_empty());

    // The window was measured from the press, not the previous sample.
    let state = bank.snapshot(BTN).unwrap();
    assert_eq!(state.prev_transition_time, Timestamp(1_000_000));
    assert_eq!(state.curr_transition_time, Timestamp(1_500_000));
}

#[test]
fn polled_bouncy_press_confirms_once_at_1khz() {
    let bank = ButtonBank::new([BTN]);
    let queue = EventQueue::<8>::new();
    let timer = MockTimeSource::new();
    let dispatcher = EdgeDispatcher::new(&bank, &queue, &timer);

    // Contact bounce on both press and release.
    let level = |ms: u64| match ms {
        1_000 | 1_002..1_300 | 1_301 => true,
        _ => false,
    };
    let events = poll_at_1khz(&dispatcher, &timer, 1, 2_000, level);

    assert_eq!(events, 1);
    assert_eq!(queue.len(), 1);
}

#[test]
fn polled_tap_shorter_than_window_is_rejected() {
    let bank = ButtonBank::new([BTN]);
    let queue = EventQueue::<8>::new();
    let timer = MockTimeSource::new();
    let dispatcher = EdgeDispatcher::new(&bank, &queue, &timer);

    let events = poll_at_1khz(&dispatcher, &timer, 1, 2_000, |ms| (1_000..1_100).contains(&ms));

    assert_eq!(events, 0);
    assert!(queue.is_empty());
}

#[test]
fn release_after_chatter_reset_needs_a_new_rising_edge() {
    let bank = ButtonBank::new([BTN]);
    let queue = EventQueue::<8>::new();
    let timer = MockTimeSource::new();
    let dispatcher = EdgeDispatcher::new(&bank, &queue, &timer);

    timer.set_time(1_000);
    dispatcher.on_edge(BTN, EdgeFlags::RISE);
    timer.set_time(1_050);
    dispatcher.on_edge(BTN, EdgeFlags::BOTH);

    // The reset forgot the rising edge, so this release is not a press.
    timer.set_time(400_000);
    assert_eq!(dispatcher.on_edge(BTN, EdgeFlags::FALL), None);
    assert!(queue.is_empty());

    // A full rise and release afterwards is reported normally.
    timer.set_time(500_000);
    dispatcher.on_edge(BTN, EdgeFlags::RISE);
    timer.set_time(800_000);
    assert_eq!(
        dispatcher.on_edge(BTN, EdgeFlags::FALL),
        Some(PressEvent::new(BTN))
    );
}
