//! Tests for the composer state machine

use std::sync::Arc;

use kasane_engine::{RuleAttributes, Table, TransliterationType};

use super::*;
use crate::config::settings::Settings;
use crate::core::keyevent::KeyEvent;
use crate::core::request::Request;

mod cursor;
mod snapshot;
mod timeout;

fn new_composer() -> Composer {
    Composer::new(
        Arc::clone(Table::shared_default()),
        Request::default(),
        Settings::default(),
    )
}

fn type_keys(composer: &mut Composer, keys: &str) {
    for c in keys.chars() {
        composer.insert_key_event(&KeyEvent::from_key(c.to_string()));
    }
}

fn type_shifted(composer: &mut Composer, c: char) {
    composer.insert_key_event(&KeyEvent::from_key(c.to_string()).with_shift());
}

fn preedit_string(composer: &Composer) -> String {
    let (left, focused, right) = composer.get_preedit();
    format!("{left}[{focused}]{right}")
}

/// A flick-style toggle table: tapping 1 cycles あ→い→う, the modifier key
/// cycles ほ and its voiced forms.
fn toggle_table() -> Arc<Table> {
    let mut table = Table::new();
    table.add_rule_with_attributes("1", "", "あ", RuleAttributes::NEW_CHUNK);
    table.add_rule("あ1", "", "い");
    table.add_rule("い1", "", "う");
    table.add_rule("う1", "", "あ");
    table.add_rule_with_attributes("6", "", "ほ", RuleAttributes::NEW_CHUNK);
    table.add_rule("ほ*", "", "ぼ");
    table.add_rule("ぼ*", "", "ぽ");
    table.add_rule("ぽ*", "", "ほ");
    Arc::new(table)
}

fn toggle_composer(timeout_msec: u64) -> Composer {
    let mut config = Settings::default();
    config.input.composing_timeout_threshold_msec = timeout_msec;
    Composer::new(toggle_table(), Request::default(), config)
}
