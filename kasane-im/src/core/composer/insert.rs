//! Insertion paths: raw keys, pre-converted text, key events, internal
//! commands, handwriting seeds.

use kasane_engine::{CompositionInput, Transliterator, TransliterationType};
use tracing::{debug, warn};

use super::{Composer, InternalCommand};
use crate::core::HandwritingComposition;
use crate::core::keyevent::{InputStyle, KeyEvent};

impl Composer {
    /// Whether the composition may still grow. The cap is the only condition
    /// under which input is rejected.
    pub fn enable_insert(&self) -> bool {
        if self.get_length() >= self.max_length {
            warn!("preedit reached the length cap; input rejected");
            return false;
        }
        true
    }

    fn process_composition_input(&mut self, input: CompositionInput) -> bool {
        if !self.enable_insert() {
            return false;
        }
        self.position = self.composition.insert_input(self.position, input);
        self.is_new_input = false;
        true
    }

    /// Insert raw typed characters. `{name}` placeholders known to the table
    /// are substituted the same way they are in rules.
    pub fn insert_character(&mut self, key: &str) -> bool {
        let raw = self.table.parse_special_key(key);
        self.process_composition_input(CompositionInput::from_raw(raw, self.is_new_input))
    }

    /// Insert one of the reserved pseudo keys.
    pub fn insert_command_character(&mut self, command: InternalCommand) -> bool {
        let spelled = match command {
            InternalCommand::Rewind => "{<}",
            InternalCommand::StopKeyToggling => "{!}",
        };
        let raw = self.table.parse_special_key(spelled);
        self.process_composition_input(CompositionInput::from_raw(raw, self.is_new_input))
    }

    /// Insert a key with its pre-converted text (kana keyboards).
    pub fn insert_character_key_and_preedit(&mut self, key: &str, preedit: &str) -> bool {
        let raw = self.table.parse_special_key(key);
        self.process_composition_input(CompositionInput::from_raw_and_conversion(
            raw,
            preedit,
            self.is_new_input,
        ))
    }

    /// Insert pre-converted text character by character.
    pub fn insert_character_preedit(&mut self, input: &str) -> bool {
        for c in input.chars() {
            let s = c.to_string();
            if !self.insert_character_key_and_preedit(&s, &s) {
                return false;
            }
        }
        true
    }

    /// Process one platform key event: timeout synthesis, mode adoption,
    /// modifier-only comeback, the as-is path, temporary-mode rules, and the
    /// auto mode switch.
    pub fn insert_key_event(&mut self, event: &KeyEvent) -> bool {
        if !self.enable_insert() {
            return false;
        }

        // A long pause between keys flushes any ongoing toggle cycle before
        // the real key is applied.
        if self.timeout_threshold_msec > 0 {
            let current_msec = event
                .timestamp_msec
                .unwrap_or_else(|| self.clock.now_msec());
            if self.timestamp_msec > 0
                && current_msec - self.timestamp_msec >= self.timeout_threshold_msec
            {
                debug!("toggle timeout elapsed; flushing toggle state");
                self.insert_command_character(InternalCommand::StopKeyToggling);
            }
            self.timestamp_msec = current_msec;
        }

        if let Some(mode) = event.mode {
            // An equal mode must not go through set_input_mode, or the
            // comeback mode would be lost.
            if mode != self.input_mode {
                self.set_input_mode(mode);
            }
        }

        // A bare Shift reverts a temporary input mode.
        if event.is_modifier_only() {
            if event.shift {
                self.set_input_mode(self.comeback_input_mode);
                return true;
            }
            return false;
        }

        let raw = self
            .table
            .parse_special_key(event.key.as_deref().unwrap_or(""));
        let mut input = match &event.key_string {
            Some(preedit) => {
                CompositionInput::from_raw_and_conversion(raw.clone(), preedit, self.is_new_input)
            }
            None => CompositionInput::from_raw(raw.clone(), self.is_new_input),
        };
        input.set_is_asis(event.input_style == InputStyle::AsIs);
        input.set_probable_key_events(event.probable_key_events.clone());
        if input.is_empty() {
            return false;
        }

        if input.conversion().is_some() {
            if input.is_asis() {
                // The delivered text is final; show it as-is and restore the
                // mode afterwards.
                self.composition
                    .set_input_transliterator(Transliterator::Conversion);
                self.process_composition_input(input);
                self.set_input_mode(self.comeback_input_mode);
            } else {
                // Kana input carries a conversion; the mode rules below are
                // for romaji only.
                self.process_composition_input(input);
            }
        } else {
            self.apply_temporary_input_mode(&raw, event.caps_lock);
            self.process_composition_input(input);
        }

        if self.comeback_input_mode == self.input_mode {
            self.auto_switch_mode();
        }
        true
    }

    /// Seed the composition from a plain preedit string through the RAW
    /// view. Lowercase ASCII fakes an alphabet keyboard by entering a
    /// temporary half-ASCII mode.
    pub fn set_preedit_text(&mut self, input: &str) {
        self.composition
            .set_input_transliterator(Transliterator::Raw);
        for c in input.chars() {
            let composition_input = CompositionInput::from_raw(c.to_string(), self.is_new_input);
            self.position = self.composition.insert_input(self.position, composition_input);
            self.is_new_input = false;
        }
        if !input.is_empty() && input.chars().all(|c| c.is_ascii_alphabetic()) {
            self.set_temporary_input_mode(TransliterationType::HalfAscii);
        }
    }

    /// Reset and seed from the first handwriting candidate so that one
    /// codepoint becomes one chunk; the full list rides along in snapshots
    /// for the converter to use as its result space.
    pub fn set_compositions_for_handwriting(
        &mut self,
        compositions: Vec<HandwritingComposition>,
    ) {
        self.reset();
        self.compositions_for_handwriting = compositions;
        let Some(first) = self.compositions_for_handwriting.first() else {
            return;
        };
        let seed = first.composition_string.clone();
        self.composition
            .set_input_transliterator(Transliterator::Raw);
        for c in seed.chars() {
            let input = CompositionInput::from_raw(c.to_string(), self.is_new_input);
            self.position = self.composition.insert_input(self.position, input);
            self.is_new_input = false;
        }
    }
}
