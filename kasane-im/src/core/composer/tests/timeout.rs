use super::*;

use std::sync::Arc as StdArc;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::core::clock::Clock;

struct SharedClock(StdArc<AtomicI64>);

impl Clock for SharedClock {
    fn now_msec(&self) -> i64 {
        self.0.load(Ordering::Relaxed)
    }
}

#[test]
fn test_timeout_via_injected_clock() {
    // Events without timestamps fall back to the composer clock.
    let ticks = StdArc::new(AtomicI64::new(1_000));
    let mut composer = toggle_composer(1000);
    composer.set_clock(Box::new(SharedClock(StdArc::clone(&ticks))));

    composer.insert_key_event(&KeyEvent::from_key("1"));
    ticks.store(1_200, Ordering::Relaxed);
    composer.insert_key_event(&KeyEvent::from_key("1"));
    assert_eq!(composer.get_string_for_preedit(), "い");

    ticks.store(9_000, Ordering::Relaxed);
    composer.insert_key_event(&KeyEvent::from_key("1"));
    assert_eq!(composer.get_string_for_preedit(), "いあ");
}

#[test]
fn test_toggle_within_threshold() {
    let mut composer = toggle_composer(1000);
    composer.insert_key_event(&KeyEvent::from_key("1").with_timestamp(1_000));
    composer.insert_key_event(&KeyEvent::from_key("1").with_timestamp(1_500));
    // Quick taps cycle through the alternatives on one chunk.
    assert_eq!(composer.get_string_for_preedit(), "い");
    assert_eq!(composer.get_length(), 1);
}

#[test]
fn test_timeout_flushes_toggle_state() {
    // S8: after the threshold elapses a stop-toggling key is synthesized,
    // so the next tap of the same key starts a new chunk.
    let mut composer = toggle_composer(1000);
    composer.insert_key_event(&KeyEvent::from_key("1").with_timestamp(1_000));
    composer.insert_key_event(&KeyEvent::from_key("1").with_timestamp(1_500));
    assert_eq!(composer.get_string_for_preedit(), "い");

    composer.insert_key_event(&KeyEvent::from_key("1").with_timestamp(5_000));
    assert_eq!(composer.get_string_for_preedit(), "いあ");
    assert_eq!(composer.get_length(), 2);
}

#[test]
fn test_stop_toggling_keeps_display() {
    let mut composer = toggle_composer(0);
    type_keys(&mut composer, "11");
    assert_eq!(composer.get_string_for_preedit(), "い");
    assert!(composer.is_toggleable());

    composer.insert_command_character(InternalCommand::StopKeyToggling);
    // No visible character is consumed.
    assert_eq!(composer.get_string_for_preedit(), "い");
    assert!(!composer.is_toggleable());
}

#[test]
fn test_rewind_command() {
    let mut composer = toggle_composer(0);
    type_keys(&mut composer, "11");
    assert_eq!(composer.get_string_for_preedit(), "い");

    // Rewind undoes the last rule application.
    composer.insert_command_character(InternalCommand::Rewind);
    assert_eq!(composer.get_string_for_preedit(), "あ");

    // Rewinding the creating keystroke removes the chunk.
    composer.insert_command_character(InternalCommand::Rewind);
    assert_eq!(composer.get_string_for_preedit(), "");
    assert_eq!(composer.get_cursor(), 0);
}

#[test]
fn test_zero_threshold_never_flushes() {
    let mut composer = toggle_composer(0);
    composer.insert_key_event(&KeyEvent::from_key("1").with_timestamp(1_000));
    composer.insert_key_event(&KeyEvent::from_key("1").with_timestamp(999_999));
    // With the timeout disabled, even distant taps keep toggling.
    assert_eq!(composer.get_string_for_preedit(), "い");
}

#[test]
fn test_timeout_with_romaji_table_seals_chunk() {
    let mut config = Settings::default();
    config.input.composing_timeout_threshold_msec = 1000;
    let mut composer = Composer::new(
        Arc::clone(Table::shared_default()),
        Request::default(),
        config,
    );
    composer.insert_key_event(&KeyEvent::from_key("k").with_timestamp(1_000));
    composer.insert_key_event(&KeyEvent::from_key("a").with_timestamp(1_100));
    assert_eq!(composer.get_string_for_preedit(), "か");

    // A late key still composes normally; the flush only seals the chunk.
    composer.insert_key_event(&KeyEvent::from_key("m").with_timestamp(9_000));
    composer.insert_key_event(&KeyEvent::from_key("e").with_timestamp(9_100));
    assert_eq!(composer.get_string_for_preedit(), "かめ");
}
