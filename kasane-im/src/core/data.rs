//! Immutable composer snapshots.
//!
//! A `ComposerData` is a deep copy of everything the converter and predictor
//! read: the composition, cursor, input mode, field type, reverse-conversion
//! source text and the handwriting candidates. It shares no mutable state
//! with the composer it came from and may move freely across threads.

use std::collections::BTreeSet;
use std::sync::Arc;

use kasane_engine::{Composition, Table, TransliterationType};

use super::queries;
use super::{HandwritingComposition, InputFieldType};
use crate::config::settings::CharacterFormSettings;

#[derive(Debug, Clone)]
pub struct ComposerData {
    composition: Composition,
    position: usize,
    input_mode: TransliterationType,
    input_field_type: InputFieldType,
    source_text: String,
    compositions_for_handwriting: Vec<HandwritingComposition>,
    character_form: CharacterFormSettings,
}

impl ComposerData {
    pub(crate) fn new(
        composition: Composition,
        position: usize,
        input_mode: TransliterationType,
        input_field_type: InputFieldType,
        source_text: String,
        compositions_for_handwriting: Vec<HandwritingComposition>,
        character_form: CharacterFormSettings,
    ) -> Self {
        Self {
            composition,
            position,
            input_mode,
            input_field_type,
            source_text,
            compositions_for_handwriting,
            character_form,
        }
    }

    /// A snapshot of nothing, built over the process-wide default table.
    pub fn empty() -> Self {
        Self::new(
            Composition::new(Arc::clone(Table::shared_default())),
            0,
            TransliterationType::Hiragana,
            InputFieldType::Normal,
            String::new(),
            Vec::new(),
            CharacterFormSettings::default(),
        )
    }

    pub fn get_input_mode(&self) -> TransliterationType {
        self.input_mode
    }

    pub fn get_input_field_type(&self) -> InputFieldType {
        self.input_field_type
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn compositions_for_handwriting(&self) -> &[HandwritingComposition] {
        &self.compositions_for_handwriting
    }

    pub fn get_length(&self) -> usize {
        self.composition.length()
    }

    pub fn get_cursor(&self) -> usize {
        self.position
    }

    pub fn get_string_for_preedit(&self) -> String {
        queries::string_for_preedit(&self.composition, self.input_field_type, &self.character_form)
    }

    pub fn get_query_for_conversion(&self) -> String {
        queries::query_for_conversion(&self.composition, &self.character_form)
    }

    pub fn get_query_for_prediction(&self) -> String {
        queries::query_for_prediction(&self.composition, self.input_mode, &self.character_form)
    }

    pub fn get_queries_for_prediction(&self) -> (String, BTreeSet<String>) {
        queries::queries_for_prediction(&self.composition, self.input_mode, &self.character_form)
    }

    pub fn get_string_for_type_correction(&self) -> String {
        queries::string_for_type_correction(&self.composition)
    }

    pub fn get_raw_string(&self) -> String {
        queries::raw_string(&self.composition)
    }

    pub fn get_raw_sub_string(&self, position: usize, size: usize) -> String {
        queries::raw_sub_string(&self.composition, position, size)
    }

    pub fn get_transliterations(&self) -> Vec<String> {
        queries::transliterations(&self.composition)
    }

    pub fn get_sub_transliterations(&self, position: usize, size: usize) -> Vec<String> {
        queries::sub_transliterations(&self.composition, position, size)
    }
}
