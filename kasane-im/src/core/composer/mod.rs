//! The interactive composer: a small state machine over a composition.
//!
//! Keystrokes come in through the insertion methods, cursor and deletion
//! methods maintain a position in LOCAL characters, and the query methods
//! expose the transliterated views the downstream converter and predictor
//! consume. Snapshots ([`ComposerData`]) are deep values safe to hand across
//! the conversion boundary.

mod cursor;
mod insert;
mod mode;
mod query;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use kasane_engine::{Composition, Table, TransliterationType, Transliterator};

use crate::config::settings::Settings;
use crate::core::clock::{Clock, SystemClock};
use crate::core::data::ComposerData;
use crate::core::request::Request;
use crate::core::{HandwritingComposition, InputFieldType};

/// Hard cap on the preedit length, defending against pathological input.
pub const MAX_PREEDIT_LENGTH: usize = 256;

/// Pseudo commands synthesized inside the composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalCommand {
    Rewind,
    StopKeyToggling,
}

pub struct Composer {
    composition: Composition,
    position: usize,
    input_mode: TransliterationType,
    output_mode: TransliterationType,
    /// The mode to restore when a temporary mode ends.
    comeback_input_mode: TransliterationType,
    input_field_type: InputFieldType,
    shifted_sequence_count: usize,
    /// True when the next insertion starts typing after an editing command;
    /// some rewrite rules refer to this state.
    is_new_input: bool,
    source_text: String,
    max_length: usize,
    timeout_threshold_msec: i64,
    timestamp_msec: i64,
    compositions_for_handwriting: Vec<HandwritingComposition>,
    table: Arc<Table>,
    request: Request,
    config: Settings,
    clock: Box<dyn Clock>,
}

impl Composer {
    pub fn new(table: Arc<Table>, request: Request, config: Settings) -> Self {
        let mut composer = Self {
            composition: Composition::new(Arc::clone(&table)),
            position: 0,
            input_mode: TransliterationType::Hiragana,
            output_mode: TransliterationType::Hiragana,
            comeback_input_mode: TransliterationType::Hiragana,
            input_field_type: InputFieldType::Normal,
            shifted_sequence_count: 0,
            is_new_input: true,
            source_text: String::new(),
            max_length: MAX_PREEDIT_LENGTH,
            timeout_threshold_msec: 0,
            timestamp_msec: 0,
            compositions_for_handwriting: Vec::new(),
            table,
            request,
            config,
            clock: Box::new(SystemClock),
        };
        composer.set_input_mode(TransliterationType::Hiragana);
        composer.reset();
        composer
    }

    /// Reset all composing data except the table binding.
    pub fn reset(&mut self) {
        self.edit_erase();
        self.reset_input_mode();
        self.set_output_mode(TransliterationType::Hiragana);
        self.source_text.clear();
        self.timeout_threshold_msec = self.config.input.composing_timeout_threshold_msec as i64;
        self.timestamp_msec = 0;
        self.compositions_for_handwriting.clear();
    }

    /// Restore the input mode a temporary mode replaced.
    pub fn reset_input_mode(&mut self) {
        self.set_input_mode(self.comeback_input_mode);
    }

    pub fn is_empty(&self) -> bool {
        self.get_length() == 0
    }

    pub fn set_table(&mut self, table: Arc<Table>) {
        self.composition.set_table(Arc::clone(&table));
        self.table = table;
    }

    pub fn set_request(&mut self, request: Request) {
        self.request = request;
    }

    pub fn set_config(&mut self, config: Settings) {
        self.config = config;
    }

    /// Substitute the clock used for the toggle timeout (tests).
    pub fn set_clock(&mut self, clock: Box<dyn Clock>) {
        self.clock = clock;
    }

    pub fn set_input_mode(&mut self, mode: TransliterationType) {
        self.comeback_input_mode = mode;
        self.input_mode = mode;
        self.shifted_sequence_count = 0;
        self.is_new_input = true;
        self.composition
            .set_input_transliterator(Transliterator::from_type(mode));
    }

    pub fn set_temporary_input_mode(&mut self, mode: TransliterationType) {
        // The current mode comes back when the temporary mode ends.
        self.comeback_input_mode = self.input_mode;
        self.input_mode = mode;
        self.shifted_sequence_count = 0;
        self.is_new_input = true;
        self.composition
            .set_input_transliterator(Transliterator::from_type(mode));
    }

    pub fn get_input_mode(&self) -> TransliterationType {
        self.input_mode
    }

    pub fn get_comeback_input_mode(&self) -> TransliterationType {
        self.comeback_input_mode
    }

    pub fn get_output_mode(&self) -> TransliterationType {
        self.output_mode
    }

    /// Switch the view used when committing; the whole composition adopts it
    /// and the cursor moves to the end.
    pub fn set_output_mode(&mut self, mode: TransliterationType) {
        self.output_mode = mode;
        let length = self.composition.length();
        self.composition
            .set_transliterator(0, length, Transliterator::from_type(mode));
        self.position = self.composition.length();
    }

    pub fn set_input_field_type(&mut self, input_field_type: InputFieldType) {
        self.input_field_type = input_field_type;
    }

    pub fn get_input_field_type(&self) -> InputFieldType {
        self.input_field_type
    }

    pub fn get_length(&self) -> usize {
        self.composition.length()
    }

    pub fn get_cursor(&self) -> usize {
        self.position
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn set_source_text(&mut self, source_text: impl Into<String>) {
        self.source_text = source_text.into();
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn set_max_length(&mut self, length: usize) {
        self.max_length = length;
    }

    pub fn is_new_input(&self) -> bool {
        self.is_new_input
    }

    /// Mark the next insertion as the beginning of new typing: a NEW_CHUNK
    /// rule will start a fresh chunk instead of toggling.
    pub fn set_new_input(&mut self) {
        self.is_new_input = true;
    }

    pub fn shifted_sequence_count(&self) -> usize {
        self.shifted_sequence_count
    }

    /// True when the chunk at the cursor still cycles under key toggling.
    pub fn is_toggleable(&self) -> bool {
        // New input always starts a fresh chunk, so nothing can toggle.
        !self.is_new_input && self.composition.is_toggleable(self.position)
    }

    pub fn compositions_for_handwriting(&self) -> &[HandwritingComposition] {
        &self.compositions_for_handwriting
    }

    /// Snapshot the composer into an immutable value for the converter and
    /// predictor.
    pub fn create_composer_data(&self) -> ComposerData {
        ComposerData::new(
            self.composition.clone(),
            self.position,
            self.input_mode,
            self.input_field_type,
            self.source_text.clone(),
            self.compositions_for_handwriting.clone(),
            self.config.character_form,
        )
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(
            Arc::clone(Table::shared_default()),
            Request::default(),
            Settings::default(),
        )
    }
}
