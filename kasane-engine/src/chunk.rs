//! Chunk: one atomic segment of composition.
//!
//! A chunk records the user's raw typing for the segment, the converted text
//! committed so far, and the pending tail still waiting for input that could
//! change the conversion. The pending tail may carry an `ambiguous`
//! resolution: the conversion the segment would take if no further input
//! arrives (a bare `n` resolves to ん).

use std::collections::BTreeSet;

use crate::composition::CompositionInput;
use crate::t13n::{self, Transliterator};
use crate::table::{RuleAttributes, Table};

/// The state retained for [`Chunk::rewind`]: everything the last `add_input`
/// call may have touched.
#[derive(Debug, Clone)]
struct Retained {
    raw: String,
    conversion: String,
    pending: String,
    ambiguous: String,
    attributes: RuleAttributes,
    last_rule: Option<usize>,
}

/// How the committed/pending split is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimMode {
    /// Drop the pending tail: "かn" renders "か".
    Trim,
    /// Keep the pending tail verbatim: "かn" renders "かn".
    Asis,
    /// Commit the pending tail: "かn" renders "かん".
    Fix,
}

#[derive(Debug, Clone)]
pub struct Chunk {
    transliterator: Transliterator,
    raw: String,
    conversion: String,
    pending: String,
    ambiguous: String,
    attributes: RuleAttributes,
    last_rule: Option<usize>,
    retained: Option<Box<Retained>>,
}

impl Chunk {
    pub fn new(transliterator: Transliterator) -> Self {
        Self {
            transliterator,
            raw: String::new(),
            conversion: String::new(),
            pending: String::new(),
            ambiguous: String::new(),
            attributes: RuleAttributes::NONE,
            last_rule: None,
            retained: None,
        }
    }

    pub fn transliterator(&self) -> Transliterator {
        self.transliterator
    }

    pub fn set_transliterator(&mut self, transliterator: Transliterator) {
        if transliterator != Transliterator::Local {
            self.transliterator = transliterator;
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn conversion(&self) -> &str {
        &self.conversion
    }

    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn ambiguous(&self) -> &str {
        &self.ambiguous
    }

    pub fn attributes(&self) -> RuleAttributes {
        self.attributes
    }

    pub fn last_rule(&self) -> Option<usize> {
        self.last_rule
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty() && self.conversion.is_empty() && self.pending.is_empty()
    }

    /// Whether further input may still combine with this chunk: it must have
    /// a pending tail, must not be terminated, and must display under the
    /// same view new input would use.
    pub fn is_appendable(&self, input_transliterator: Transliterator) -> bool {
        !self.pending.is_empty()
            && !self.attributes.contains(RuleAttributes::END_CHUNK)
            && (input_transliterator == Transliterator::Local
                || input_transliterator == self.transliterator)
    }

    fn resolved_view(&self, view: Transliterator) -> Transliterator {
        if view == Transliterator::Local {
            self.transliterator
        } else {
            view
        }
    }

    /// The chunk text under a view and trim mode. ASCII views render the raw
    /// typing; kana views render the converted body. Trim modes only affect
    /// the converted body.
    pub fn display(&self, view: Transliterator, trim: TrimMode) -> String {
        let view = self.resolved_view(view);
        match view {
            Transliterator::Raw => self.raw.clone(),
            Transliterator::HalfAscii => t13n::full_width_ascii_to_half_width(&self.raw),
            Transliterator::FullAscii => t13n::half_width_ascii_to_full_width(&self.raw),
            _ => {
                let mut body = self.conversion.clone();
                match trim {
                    TrimMode::Trim => {}
                    TrimMode::Asis => body.push_str(&self.pending),
                    TrimMode::Fix => {
                        if self.ambiguous.is_empty() {
                            body.push_str(&self.pending);
                        } else {
                            body.push_str(&self.ambiguous);
                        }
                    }
                }
                match view {
                    Transliterator::FullKatakana => t13n::hiragana_to_katakana(&body),
                    Transliterator::HalfKatakana => t13n::hiragana_to_half_width_katakana(&body),
                    _ => body,
                }
            }
        }
    }

    /// Character length under a view (pending included).
    pub fn length(&self, view: Transliterator) -> usize {
        self.display(view, TrimMode::Asis).chars().count()
    }

    /// Consume as much of `input` as this chunk can absorb, applying the
    /// table rule by rule. Unconsumed input belongs to a following chunk.
    pub fn add_input(&mut self, table: &Table, input: &mut CompositionInput) {
        if self.attributes.contains(RuleAttributes::END_CHUNK) {
            return;
        }
        self.retain_for_rewind();
        if input.conversion().is_some() {
            self.add_input_with_conversion(table, input);
            return;
        }
        loop {
            let Some(c) = input.peek_raw_char() else {
                break;
            };
            // An explicit new-input boundary together with a NEW_CHUNK rule
            // for the key keeps the key out of this chunk.
            if input.is_new_input() && !self.is_empty() && table.has_new_chunk_rule(c) {
                break;
            }
            let mut query = self.pending.clone();
            query.push(c);
            let looked = table.lookup(&query);
            if let Some(id) = looked.rule {
                let rule = table.rule(id);
                let ends = rule.attributes().contains(RuleAttributes::END_CHUNK);
                if looked.has_longer_prefix && !ends {
                    // Still ambiguous; remember the resolution seen so far.
                    self.pending = query;
                    self.ambiguous = rule.result().to_string();
                    self.last_rule = Some(id);
                    self.raw.push(c);
                    input.consume_raw_char();
                    continue;
                }
                self.conversion.push_str(rule.result());
                self.pending = rule.pending().to_string();
                self.ambiguous.clear();
                self.attributes |= rule.attributes();
                self.last_rule = Some(id);
                self.raw.push(c);
                input.consume_raw_char();
                if ends || self.pending.is_empty() {
                    break;
                }
                continue;
            }
            if looked.has_longer_prefix {
                self.pending = query;
                self.ambiguous.clear();
                self.last_rule = None;
                self.raw.push(c);
                input.consume_raw_char();
                continue;
            }
            // No rule matches the combined tail.
            if self.pending.is_empty() {
                // Not a table key: insert verbatim as raw and conversion.
                self.conversion.push(c);
                self.raw.push(c);
                input.consume_raw_char();
                break;
            }
            self.resolve_pending(table);
            // Retry the same character against the resolved state.
        }
    }

    /// Pre-converted input (kana keyboards): the converted characters are
    /// the typed characters as far as the table is concerned.
    fn add_input_with_conversion(&mut self, table: &Table, input: &mut CompositionInput) {
        let Some(conv) = input.conversion() else {
            return;
        };
        if input.is_asis() {
            self.raw.push_str(input.raw());
            self.conversion.push_str(conv);
            self.attributes |= RuleAttributes::END_CHUNK;
            input.clear();
            return;
        }
        let query = format!("{}{}", self.pending, conv);
        let looked = table.lookup(&query);
        if let Some(id) = looked.rule {
            let rule = table.rule(id);
            if looked.has_longer_prefix && !rule.attributes().contains(RuleAttributes::END_CHUNK) {
                self.pending = query;
                self.ambiguous = rule.result().to_string();
                self.last_rule = Some(id);
            } else {
                self.conversion.push_str(rule.result());
                self.pending = rule.pending().to_string();
                self.ambiguous.clear();
                self.attributes |= rule.attributes();
                self.last_rule = Some(id);
            }
            self.raw.push_str(input.raw());
            input.clear();
            return;
        }
        if looked.has_longer_prefix {
            self.pending = query;
            self.ambiguous.clear();
            self.last_rule = None;
            self.raw.push_str(input.raw());
            input.clear();
            return;
        }
        if self.pending.is_empty() {
            self.conversion.push_str(conv);
            self.raw.push_str(input.raw());
            input.clear();
            return;
        }
        // The converted character cannot combine; leave it for a new chunk.
        self.resolve_pending(table);
    }

    /// Commit the pending tail into the conversion by longest-prefix rule
    /// resolution, falling back to verbatim characters.
    pub(crate) fn resolve_pending(&mut self, table: &Table) {
        while !self.pending.is_empty() {
            let chars: Vec<char> = self.pending.chars().collect();
            let mut matched = None;
            for end in (1..=chars.len()).rev() {
                let prefix: String = chars[..end].iter().collect();
                if let Some(id) = table.lookup(&prefix).rule {
                    matched = Some((end, id));
                    break;
                }
            }
            match matched {
                Some((end, id)) => {
                    let rule = table.rule(id);
                    let rest: String = chars[end..].iter().collect();
                    let next_pending = format!("{}{}", rule.pending(), rest);
                    if next_pending.chars().count() >= chars.len() {
                        // A rule whose tail does not shrink would loop.
                        self.conversion.push(chars[0]);
                        self.pending = chars[1..].iter().collect();
                    } else {
                        self.conversion.push_str(rule.result());
                        self.pending = next_pending;
                    }
                }
                None => {
                    self.conversion.push(chars[0]);
                    self.pending = chars[1..].iter().collect();
                }
            }
        }
        self.ambiguous.clear();
        self.last_rule = None;
    }

    /// Flush toggle state for the stop-toggling key. A table may carry an
    /// explicit `pending + {!}` rule; otherwise the pending tail is kept on
    /// screen verbatim so no visible character is consumed.
    pub(crate) fn stop_toggling(&mut self, table: &Table, stop_key: char) {
        if self.pending.is_empty() {
            self.last_rule = None;
            return;
        }
        let query = format!("{}{}", self.pending, stop_key);
        if let Some(id) = table.lookup(&query).rule {
            let rule = table.rule(id);
            self.conversion.push_str(rule.result());
            self.pending = rule.pending().to_string();
            self.ambiguous.clear();
            self.last_rule = None;
            return;
        }
        self.conversion.push_str(&self.pending);
        self.pending.clear();
        self.ambiguous.clear();
        self.last_rule = None;
    }

    fn retain_for_rewind(&mut self) {
        self.retained = if self.is_empty() {
            None
        } else {
            Some(Box::new(Retained {
                raw: self.raw.clone(),
                conversion: self.conversion.clone(),
                pending: self.pending.clone(),
                ambiguous: self.ambiguous.clone(),
                attributes: self.attributes,
                last_rule: self.last_rule,
            }))
        };
    }

    /// Undo the most recent `add_input` call. Returns false when that call
    /// created the chunk from empty; the caller removes the chunk instead.
    pub fn rewind(&mut self) -> bool {
        match self.retained.take() {
            Some(prev) => {
                self.raw = prev.raw;
                self.conversion = prev.conversion;
                self.pending = prev.pending;
                self.ambiguous = prev.ambiguous;
                self.attributes = prev.attributes;
                self.last_rule = prev.last_rule;
                true
            }
            None => false,
        }
    }

    /// Width of `c` in the display of `view` (half-width katakana expands
    /// voiced characters into two code points).
    fn display_width(view: Transliterator, c: char) -> usize {
        if view == Transliterator::HalfKatakana {
            t13n::hiragana_to_half_width_katakana(&c.to_string())
                .chars()
                .count()
        } else {
            1
        }
    }

    /// Source-character index covering display position `pos` in `text`.
    fn source_index(view: Transliterator, text: &str, pos: usize) -> usize {
        let mut shown = 0;
        for (i, c) in text.chars().enumerate() {
            if shown >= pos {
                return i;
            }
            shown += Self::display_width(view, c);
        }
        text.chars().count()
    }

    /// Split at display position `pos` under `view` and return the right
    /// half. Raw typing cannot be split along conversion boundaries, so both
    /// halves redescribe their display as raw.
    pub fn split(&mut self, pos: usize, view: Transliterator) -> Chunk {
        let view = self.resolved_view(view);
        let mut right = Chunk::new(self.transliterator);

        match view {
            Transliterator::Raw | Transliterator::HalfAscii | Transliterator::FullAscii => {
                let idx = Self::source_index(view, &self.raw, pos);
                let split_byte = self
                    .raw
                    .char_indices()
                    .nth(idx)
                    .map(|(b, _)| b)
                    .unwrap_or(self.raw.len());
                right.raw = self.raw.split_off(split_byte);
                right.conversion = right.raw.clone();
                self.conversion = self.raw.clone();
                self.pending.clear();
            }
            _ => {
                let conv_display: usize = self
                    .conversion
                    .chars()
                    .map(|c| Self::display_width(view, c))
                    .sum();
                if pos < conv_display {
                    let idx = Self::source_index(view, &self.conversion, pos);
                    let split_byte = self
                        .conversion
                        .char_indices()
                        .nth(idx)
                        .map(|(b, _)| b)
                        .unwrap_or(self.conversion.len());
                    right.conversion = self.conversion.split_off(split_byte);
                    right.pending = std::mem::take(&mut self.pending);
                } else {
                    let inner = pos - conv_display;
                    let split_byte = self
                        .pending
                        .char_indices()
                        .nth(inner.min(self.pending.chars().count()))
                        .map(|(b, _)| b)
                        .unwrap_or(self.pending.len());
                    right.pending = self.pending.split_off(split_byte);
                }
                self.raw = format!("{}{}", self.conversion, self.pending);
                right.raw = format!("{}{}", right.conversion, right.pending);
            }
        }
        right.attributes = self.attributes;
        self.ambiguous.clear();
        self.last_rule = None;
        self.retained = None;
        right
    }

    /// Deterministic completions of the pending tail: the tail itself plus
    /// one step of every rule extending it.
    pub fn expanded_results(&self, table: &Table) -> BTreeSet<String> {
        let mut results = BTreeSet::new();
        if self.pending.is_empty() {
            return results;
        }
        results.insert(self.pending.clone());
        for id in table.lookup_predictive(&self.pending) {
            let rule = table.rule(id);
            if !rule.result().is_empty() {
                results.insert(rule.result().to_string());
            } else if !rule.pending().is_empty() {
                results.insert(rule.pending().to_string());
            }
        }
        results
    }
}
