//! The query surface: preedit strings, converter/predictor queries, raw
//! views and transliterations.

use std::collections::BTreeSet;

use kasane_engine::TransliterationType;

use super::Composer;
use crate::core::numbers::transform_characters_for_numbers;
use crate::core::queries;

impl Composer {
    /// The preedit split around the cursor as `(left, focused, right)`,
    /// after the number transform.
    pub fn get_preedit(&self) -> (String, String, String) {
        let (left, focused, right) = self.composition.get_preedit(self.position);
        let whole = format!("{left}{focused}{right}");
        let Some(transformed) =
            transform_characters_for_numbers(&whole, &self.config.character_form)
        else {
            return (left, focused, right);
        };
        // The transform preserves character counts, so the split survives.
        let left_len = left.chars().count();
        let focused_len = focused.chars().count();
        (
            transformed.chars().take(left_len).collect(),
            transformed.chars().skip(left_len).take(focused_len).collect(),
            transformed.chars().skip(left_len + focused_len).collect(),
        )
    }

    /// The display string with user preferences applied.
    pub fn get_string_for_preedit(&self) -> String {
        queries::string_for_preedit(
            &self.composition,
            self.input_field_type,
            &self.config.character_form,
        )
    }

    /// The string committed on submission. Identical to the preedit string;
    /// kept separate because the session layer distinguishes the calls.
    pub fn get_string_for_submission(&self) -> String {
        self.get_string_for_preedit()
    }

    /// The downstream conversion query: pending committed, numbers
    /// canonicalised, ASCII narrowed.
    pub fn get_query_for_conversion(&self) -> String {
        queries::query_for_conversion(&self.composition, &self.config.character_form)
    }

    /// The prediction query, with the romaji-tail trimming heuristic.
    pub fn get_query_for_prediction(&self) -> String {
        queries::query_for_prediction(
            &self.composition,
            self.input_mode,
            &self.config.character_form,
        )
    }

    /// The expanded prediction queries: the finalised base plus the
    /// completions of the freshest pending tail.
    pub fn get_queries_for_prediction(&self) -> (String, BTreeSet<String>) {
        queries::queries_for_prediction(
            &self.composition,
            self.input_mode,
            &self.config.character_form,
        )
    }

    /// The as-is string handed to typing correction.
    pub fn get_string_for_type_correction(&self) -> String {
        queries::string_for_type_correction(&self.composition)
    }

    /// The user's raw typing.
    pub fn get_raw_string(&self) -> String {
        queries::raw_string(&self.composition)
    }

    /// Raw typing behind a range of the composed string: with
    /// [さ|sa][し|shi][み|mi] composed, `(0, 2)` returns "sashi".
    pub fn get_raw_sub_string(&self, position: usize, size: usize) -> String {
        queries::raw_sub_string(&self.composition, position, size)
    }

    /// All eleven transliterations of the whole composition, in the stable
    /// enumeration order.
    pub fn get_transliterations(&self) -> Vec<String> {
        queries::transliterations(&self.composition)
    }

    pub fn get_sub_transliteration(
        &self,
        mode: TransliterationType,
        position: usize,
        size: usize,
    ) -> String {
        queries::sub_transliteration(&self.composition, mode, position, size)
    }

    pub fn get_sub_transliterations(&self, position: usize, size: usize) -> Vec<String> {
        queries::sub_transliterations(&self.composition, position, size)
    }

    /// True when the composition should be committed immediately.
    pub fn should_commit(&self) -> bool {
        self.composition.should_commit()
    }

    /// Number-like fields keep almost nothing composing: the returned length
    /// should be committed from the head. PASSWORD keeps one character, TEL
    /// and NUMBER keep none.
    pub fn should_commit_head(&self) -> Option<usize> {
        let max_remaining = match self.input_field_type {
            crate::core::InputFieldType::Password => 1,
            crate::core::InputFieldType::Tel | crate::core::InputFieldType::Number => 0,
            crate::core::InputFieldType::Normal => return None,
        };
        let length = self.get_length();
        (length > max_remaining).then(|| length - max_remaining)
    }
}
