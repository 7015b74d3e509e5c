//! Input-mode rules: temporary shifted modes, surrounding-text adoption,
//! and the automatic IME-off switch for URL-like input.

use kasane_engine::{TransliterationType, Transliterator};
use tracing::warn;

use super::Composer;
use crate::config::settings::{PreeditMethod, ShiftKeyModeSwitch};
use crate::core::mode_switching::{ModeSwitchAction, ModeSwitchingHandler};

impl Composer {
    /// Change the input mode temporarily according to the typed character
    /// and the shift/caps state.
    pub(crate) fn apply_temporary_input_mode(&mut self, input: &str, caps_locked: bool) {
        let Some(first) = input.chars().next() else {
            return;
        };
        let switch_mode = self.config.input.shift_key_mode_switch;

        // Non-ASCII input ends a temporary mode. set_input_mode is only
        // called when a temporary mode is active, or every multi-byte
        // character would start a new chunk through the new-input flag.
        if !first.is_ascii() {
            if self.comeback_input_mode != self.input_mode {
                self.set_input_mode(self.comeback_input_mode);
            }
            return;
        }

        let alpha_with_shift = (!caps_locked && first.is_ascii_uppercase())
            || (caps_locked && first.is_ascii_lowercase());
        let alpha_without_shift = (caps_locked && first.is_ascii_uppercase())
            || (!caps_locked && first.is_ascii_lowercase());

        if alpha_with_shift {
            match switch_mode {
                ShiftKeyModeSwitch::AsciiInputMode => {
                    if !matches!(
                        self.input_mode,
                        TransliterationType::HalfAscii | TransliterationType::FullAscii
                    ) {
                        self.set_temporary_input_mode(TransliterationType::HalfAscii);
                    }
                }
                ShiftKeyModeSwitch::KatakanaInputMode => {
                    if self.input_mode == TransliterationType::Hiragana {
                        self.set_temporary_input_mode(TransliterationType::FullKatakana);
                    }
                }
                ShiftKeyModeSwitch::Off => {}
            }
            self.shifted_sequence_count += 1;
        } else if alpha_without_shift {
            // A lower-case letter after continuous shifted input ends the
            // temporary half-width ASCII window.
            if self.shifted_sequence_count > 1
                && switch_mode == ShiftKeyModeSwitch::AsciiInputMode
            {
                self.set_input_mode(self.comeback_input_mode);
            }
            if switch_mode == ShiftKeyModeSwitch::KatakanaInputMode {
                self.set_input_mode(self.comeback_input_mode);
            }
            self.shifted_sequence_count = 0;
        } else {
            // Continuous shifted input resets on non-alphabet characters.
            self.shifted_sequence_count = 0;
        }
    }

    /// Adopt the view of the characters around the cursor as the input mode;
    /// otherwise fall back to the comeback mode.
    pub fn update_input_mode(&mut self) {
        if self.position != 0 && self.request.update_input_mode_from_surrounding_text {
            let current = self.composition.get_transliterator(self.position);
            if self.position == self.composition.length()
                || current == self.composition.get_transliterator(self.position + 1)
            {
                // At the tail of the composition, or between two characters
                // of the same view: follow that view.
                self.input_mode = current.to_type(self.comeback_input_mode);
                self.shifted_sequence_count = 0;
                self.is_new_input = true;
                self.composition
                    .set_input_transliterator(Transliterator::from_type(self.input_mode));
                return;
            }
        }
        self.set_input_mode(self.comeback_input_mode);
    }

    pub fn toggle_input_mode(&mut self) {
        if self.input_mode == TransliterationType::Hiragana {
            self.set_input_mode(TransliterationType::HalfAscii);
        } else {
            self.set_input_mode(TransliterationType::Hiragana);
        }
    }

    /// Switch the composition mode automatically for URL-like input. Roman
    /// preedit only; the rule set is keyed on the half-ASCII view.
    pub fn auto_switch_mode(&mut self) {
        if !self.config.input.use_auto_ime_turn_off {
            return;
        }
        if self.config.input.preedit_method != PreeditMethod::Roman {
            return;
        }

        let key = self
            .composition
            .get_string_with_transliterator(Transliterator::HalfAscii);
        let rule = ModeSwitchingHandler::shared().rule_for(&key);

        // display_mode affects the composition the user already typed.
        match rule.display_mode {
            ModeSwitchAction::NoChange => {}
            ModeSwitchAction::RevertToPreviousMode => {
                warn!("revert-to-previous is invalid for display_mode");
            }
            ModeSwitchAction::PreferredAlphanumeric => {
                if self.input_mode == TransliterationType::FullAscii {
                    self.set_output_mode(TransliterationType::FullAscii);
                } else {
                    self.set_output_mode(TransliterationType::HalfAscii);
                }
            }
            ModeSwitchAction::HalfAlphanumeric => {
                self.set_output_mode(TransliterationType::HalfAscii);
            }
            ModeSwitchAction::FullAlphanumeric => {
                self.set_output_mode(TransliterationType::FullAscii);
            }
        }

        // input_mode affects the mode used for new typing.
        match rule.input_mode {
            ModeSwitchAction::NoChange => {}
            ModeSwitchAction::RevertToPreviousMode => {
                self.set_input_mode(self.comeback_input_mode);
            }
            ModeSwitchAction::PreferredAlphanumeric => {
                if !matches!(
                    self.input_mode,
                    TransliterationType::HalfAscii | TransliterationType::FullAscii
                ) {
                    self.set_temporary_input_mode(TransliterationType::HalfAscii);
                }
            }
            ModeSwitchAction::HalfAlphanumeric => {
                if self.input_mode != TransliterationType::HalfAscii {
                    self.set_temporary_input_mode(TransliterationType::HalfAscii);
                }
            }
            ModeSwitchAction::FullAlphanumeric => {
                if self.input_mode != TransliterationType::FullAscii {
                    self.set_temporary_input_mode(TransliterationType::FullAscii);
                }
            }
        }
    }
}
