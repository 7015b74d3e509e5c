//! Composition: an ordered sequence of chunks sharing a rewrite table.
//!
//! All public positions are measured in characters of a chosen view, LOCAL
//! by default (each chunk renders under its own transliterator, pending
//! included). Out-of-range positions clamp; no operation panics on caller
//! input.

mod input;

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::chunk::Chunk;
pub use crate::chunk::TrimMode;
use crate::t13n::Transliterator;
use crate::table::{REWIND, RuleAttributes, STOP_KEY_TOGGLING, Table};
pub use input::{CompositionInput, ProbableKeyEvent};

#[derive(Debug, Clone)]
pub struct Composition {
    table: Arc<Table>,
    chunks: Vec<Chunk>,
    input_transliterator: Transliterator,
}

impl Composition {
    pub fn new(table: Arc<Table>) -> Self {
        Self {
            table,
            chunks: Vec::new(),
            input_transliterator: Transliterator::Conversion,
        }
    }

    pub fn set_table(&mut self, table: Arc<Table>) {
        self.table = table;
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// The view new chunks adopt.
    pub fn set_input_transliterator(&mut self, transliterator: Transliterator) {
        self.input_transliterator = transliterator;
    }

    pub fn input_transliterator(&self) -> Transliterator {
        self.input_transliterator
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Total LOCAL length in characters.
    pub fn length(&self) -> usize {
        self.length_with(Transliterator::Local)
    }

    pub fn length_with(&self, view: Transliterator) -> usize {
        self.chunks.iter().map(|c| c.length(view)).sum()
    }

    /// Insert one normalised input at a LOCAL position; returns the new
    /// cursor. The reserved rewind and stop-toggling keys are intercepted
    /// here and never reach a chunk as visible characters.
    pub fn insert_input(&mut self, position: usize, mut input: CompositionInput) -> usize {
        debug_assert!(position <= self.length(), "insert position out of range");
        let position = position.min(self.length());
        if input.is_empty() {
            return position;
        }
        if input.conversion().is_none() {
            let mut raw_chars = input.raw().chars();
            if let (Some(c), None) = (raw_chars.next(), raw_chars.next()) {
                match c {
                    REWIND => return self.rewind_at(position),
                    STOP_KEY_TOGGLING => return self.stop_toggling_at(position),
                    _ => {}
                }
            }
        }

        let table = Arc::clone(&self.table);
        let right_index = self.split_at(position);
        let mut index = if right_index > 0
            && !input.is_asis()
            && self.chunks[right_index - 1].is_appendable(self.input_transliterator)
        {
            right_index - 1
        } else {
            self.chunks
                .insert(right_index, Chunk::new(self.input_transliterator));
            right_index
        };
        loop {
            self.chunks[index].add_input(&table, &mut input);
            if input.is_empty() {
                break;
            }
            // The chunk refused the remainder; it belongs to a new chunk.
            index += 1;
            self.chunks
                .insert(index, Chunk::new(self.input_transliterator));
        }
        self.chunks[..=index]
            .iter()
            .map(|c| c.length(Transliterator::Local))
            .sum()
    }

    /// Remove the LOCAL character at `position`, splitting chunks as needed.
    /// Returns the new cursor.
    pub fn delete_at(&mut self, position: usize) -> usize {
        let length = self.length();
        debug_assert!(position <= length, "delete position out of range");
        if position >= length {
            return length;
        }
        let start = self.split_at(position);
        let end = self.split_at(position + 1);
        self.chunks.drain(start..end);
        position
    }

    pub fn erase(&mut self) {
        self.chunks.clear();
    }

    /// Map a character position between views by summing per-chunk view
    /// lengths. Interior offsets clamp to the target chunk length; positions
    /// past the end clamp to the total.
    pub fn convert_position(
        &self,
        position: usize,
        from: Transliterator,
        to: Transliterator,
    ) -> usize {
        debug_assert!(
            position <= self.length_with(from),
            "conversion position out of range"
        );
        let position = position.min(self.length_with(from));
        let mut acc_from = 0;
        let mut acc_to = 0;
        for chunk in &self.chunks {
            let len_from = chunk.length(from);
            let len_to = chunk.length(to);
            if position == acc_from {
                return acc_to;
            }
            if position < acc_from + len_from {
                let inner = position - acc_from;
                return acc_to + inner.min(len_to);
            }
            acc_from += len_from;
            acc_to += len_to;
        }
        acc_to
    }

    /// Override the view of every chunk fully inside the LOCAL range.
    pub fn set_transliterator(&mut self, start: usize, end: usize, view: Transliterator) {
        if view == Transliterator::Local {
            return;
        }
        let end = end.min(self.length());
        let start = start.min(end);
        if start == end {
            return;
        }
        self.split_at(start);
        self.split_at(end);
        let mut acc = 0;
        for chunk in &mut self.chunks {
            let len = chunk.length(Transliterator::Local);
            if acc >= start && acc + len <= end {
                chunk.set_transliterator(view);
            }
            acc += len;
        }
    }

    /// The view of the chunk holding the boundary `position` (the chunk the
    /// position-th character belongs to, boundaries owned leftward).
    pub fn get_transliterator(&self, position: usize) -> Transliterator {
        match self.chunk_ending_at(position.max(1)) {
            Some((index, _)) => self.chunks[index].transliterator(),
            None => self.input_transliterator,
        }
    }

    /// LOCAL view, pending verbatim.
    pub fn get_string(&self) -> String {
        self.get_string_with_trim_mode(TrimMode::Asis)
    }

    /// A specific view over the whole composition, pending committed.
    pub fn get_string_with_transliterator(&self, view: Transliterator) -> String {
        self.chunks
            .iter()
            .map(|c| c.display(view, TrimMode::Fix))
            .collect()
    }

    pub fn get_string_with_trim_mode(&self, trim: TrimMode) -> String {
        self.chunks
            .iter()
            .map(|c| c.display(Transliterator::Local, trim))
            .collect()
    }

    /// The finalised base text plus every deterministic completion of the
    /// freshest chunk's pending tail. Earlier chunks cannot be resolved
    /// differently by future keystrokes, so only the last chunk expands.
    pub fn get_expanded_strings(&self) -> (String, BTreeSet<String>) {
        let Some((last, finished)) = self.chunks.split_last() else {
            return (String::new(), BTreeSet::new());
        };
        let mut base: String = finished
            .iter()
            .map(|c| c.display(Transliterator::Local, TrimMode::Fix))
            .collect();
        base.push_str(&last.display(Transliterator::Local, TrimMode::Trim));
        (base, last.expanded_results(&self.table))
    }

    /// The LOCAL string split around the cursor: `(left, focused, right)`.
    pub fn get_preedit(&self, position: usize) -> (String, String, String) {
        let text = self.get_string();
        let left: String = text.chars().take(position).collect();
        let focused: String = text.chars().skip(position).take(1).collect();
        let right: String = text.chars().skip(position + 1).collect();
        (left, focused, right)
    }

    /// True when the chunk at the cursor still cycles under its last rule.
    pub fn is_toggleable(&self, position: usize) -> bool {
        let Some((index, _)) = self.chunk_ending_at(position) else {
            return false;
        };
        self.chunks[index]
            .last_rule()
            .and_then(|id| self.table.next_rule(id))
            .is_some()
    }

    /// True when any chunk was produced by a DIRECT_INPUT rule.
    pub fn should_commit(&self) -> bool {
        self.chunks
            .iter()
            .any(|c| c.attributes().contains(RuleAttributes::DIRECT_INPUT))
    }

    // Internals ---------------------------------------------------------

    /// Ensure a chunk boundary exists at the LOCAL position and return the
    /// index of the chunk starting there.
    fn split_at(&mut self, position: usize) -> usize {
        debug_assert!(position <= self.length(), "split position out of range");
        let position = position.min(self.length());
        let mut acc = 0;
        for index in 0..self.chunks.len() {
            let len = self.chunks[index].length(Transliterator::Local);
            if position == acc {
                return index;
            }
            if position < acc + len {
                let right = self.chunks[index].split(position - acc, Transliterator::Local);
                self.chunks.insert(index + 1, right);
                return index + 1;
            }
            acc += len;
        }
        self.chunks.len()
    }

    /// The chunk whose span ends at or covers `position`, with its starting
    /// offset. `position` 0 never names a chunk.
    fn chunk_ending_at(&self, position: usize) -> Option<(usize, usize)> {
        let mut acc = 0;
        for (index, chunk) in self.chunks.iter().enumerate() {
            let len = chunk.length(Transliterator::Local);
            if position > acc && position <= acc + len {
                return Some((index, acc));
            }
            acc += len;
        }
        None
    }

    fn rewind_at(&mut self, position: usize) -> usize {
        let Some((index, start)) = self.chunk_ending_at(position) else {
            return position;
        };
        if !self.chunks[index].rewind() || self.chunks[index].is_empty() {
            self.chunks.remove(index);
            return start;
        }
        start + self.chunks[index].length(Transliterator::Local)
    }

    fn stop_toggling_at(&mut self, position: usize) -> usize {
        let table = Arc::clone(&self.table);
        let Some((index, start)) = self.chunk_ending_at(position) else {
            return position;
        };
        self.chunks[index].stop_toggling(&table, STOP_KEY_TOGGLING);
        if self.chunks[index].is_empty() {
            self.chunks.remove(index);
            return start;
        }
        start + self.chunks[index].length(Transliterator::Local)
    }
}
