//! The rewrite table: rules `(input, pending) -> (result, pending')` compiled
//! from a TSV resource, indexed for longest-prefix lookup.
//!
//! Rules are stored in a flat vector and referenced by index. Toggle cycles
//! (mobile flick input, where tapping the same key cycles through
//! alternatives) are linked at load time: a rule that leaves pending `P` and
//! was triggered by key `k` points to the rule whose input is `P + k`.

mod special;
mod trie;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use tracing::warn;

pub use special::{REWIND, STOP_KEY_TOGGLING};
use special::SpecialKeys;
use trie::TrieNode;

/// The romaji-to-hiragana table shipped with the engine.
const DEFAULT_TSV: &str = include_str!("../../data/romanji-hiragana.tsv");

/// Bit set of rule attributes. The TSV carries them as an integer bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleAttributes(u32);

impl RuleAttributes {
    pub const NONE: RuleAttributes = RuleAttributes(0);
    /// Force the rule to start a new chunk.
    pub const NEW_CHUNK: RuleAttributes = RuleAttributes(1);
    /// Emit the raw input instead of a transliterated view.
    pub const NO_TRANSLITERATION: RuleAttributes = RuleAttributes(2);
    /// The produced text should be committed without conversion.
    pub const DIRECT_INPUT: RuleAttributes = RuleAttributes(4);
    /// Terminate the chunk; no further input may combine with it.
    pub const END_CHUNK: RuleAttributes = RuleAttributes(8);
    /// The produced text must not feed user history.
    pub const NO_LEARNING: RuleAttributes = RuleAttributes(16);

    pub fn from_bits(bits: u32) -> RuleAttributes {
        RuleAttributes(bits)
    }

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: RuleAttributes) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for RuleAttributes {
    type Output = RuleAttributes;
    fn bitor(self, rhs: RuleAttributes) -> RuleAttributes {
        RuleAttributes(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for RuleAttributes {
    fn bitor_assign(&mut self, rhs: RuleAttributes) {
        self.0 |= rhs.0;
    }
}

/// One rewrite rule.
#[derive(Debug, Clone)]
pub struct Rule {
    input: String,
    result: String,
    pending: String,
    attributes: RuleAttributes,
    next: Option<usize>,
}

impl Rule {
    /// The pattern of typed characters that triggers the rule.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The text committed to the converted view when the rule fires.
    pub fn result(&self) -> &str {
        &self.result
    }

    /// The unfinished tail left over, awaiting further input.
    pub fn pending(&self) -> &str {
        &self.pending
    }

    pub fn attributes(&self) -> RuleAttributes {
        self.attributes
    }
}

/// Answer of [`Table::lookup`]: the unique rule whose input equals the query,
/// if any, and whether some rule has the query as a proper prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupResult {
    pub rule: Option<usize>,
    pub has_longer_prefix: bool,
}

/// Error from loading a table file. Malformed records never produce an
/// error; they are dropped with a warning.
#[derive(Debug, thiserror::Error)]
pub enum TableLoadError {
    #[error("failed to read table file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    rules: Vec<Rule>,
    index: TrieNode,
    by_input: HashMap<String, usize>,
    specials: SpecialKeys,
}

impl Table {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            index: TrieNode::new(),
            by_input: HashMap::new(),
            specials: SpecialKeys::new(),
        }
    }

    /// The process-wide default table (romaji to hiragana), loaded once.
    pub fn shared_default() -> &'static Arc<Table> {
        static INSTANCE: OnceLock<Arc<Table>> = OnceLock::new();
        INSTANCE.get_or_init(|| Arc::new(Table::from_tsv_str(DEFAULT_TSV)))
    }

    /// Build a table from TSV content. Parsing is total: malformed records
    /// are dropped with a warning.
    pub fn from_tsv_str(content: &str) -> Table {
        let mut table = Table::new();
        table.load_tsv(content);
        table
    }

    /// Load a TSV table file. Only an unreadable file is an error.
    pub fn load_from_file(path: &Path) -> Result<Table, TableLoadError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Table::from_tsv_str(&content))
    }

    /// Parse TSV records into rules: `input\tresult[\tpending[\tattributes]]`.
    /// Accepts a UTF-8 BOM; skips blank lines and `#` comments.
    pub fn load_tsv(&mut self, content: &str) {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        for (number, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t');
            let input = fields.next().unwrap_or("");
            let result = fields.next();
            let pending = fields.next().unwrap_or("");
            let attributes = fields.next();

            if input.is_empty() && result.unwrap_or("").is_empty() && pending.is_empty() {
                continue;
            }
            let Some(result) = result else {
                warn!(line = number + 1, "dropping table record without a result field");
                continue;
            };
            if input.is_empty() {
                warn!(line = number + 1, "dropping table record with empty input");
                continue;
            }
            if result.is_empty() && pending.is_empty() {
                warn!(line = number + 1, "dropping table record with no effect");
                continue;
            }
            let attributes = match attributes.map(str::trim) {
                None | Some("") => RuleAttributes::NONE,
                Some(text) => match text.parse::<u32>() {
                    Ok(bits) => RuleAttributes::from_bits(bits),
                    Err(_) => {
                        warn!(line = number + 1, "dropping table record with malformed attributes");
                        continue;
                    }
                },
            };
            self.add_rule_with_attributes(input, result, pending, attributes);
        }
    }

    pub fn add_rule(&mut self, input: &str, result: &str, pending: &str) -> usize {
        self.add_rule_with_attributes(input, result, pending, RuleAttributes::NONE)
    }

    /// Add one rule, replacing any earlier rule with the same input.
    /// `{name}` placeholders are registered and substituted in every field.
    pub fn add_rule_with_attributes(
        &mut self,
        input: &str,
        result: &str,
        pending: &str,
        attributes: RuleAttributes,
    ) -> usize {
        let input = self.specials.parse_and_register(input);
        let result = self.specials.parse_and_register(result);
        let pending = self.specials.parse_and_register(pending);

        let rule = Rule {
            input: input.clone(),
            result,
            pending,
            attributes,
            next: None,
        };
        let id = match self.by_input.get(&input) {
            Some(&existing) => {
                self.rules[existing] = rule;
                existing
            }
            None => {
                self.rules.push(rule);
                let id = self.rules.len() - 1;
                self.by_input.insert(input.clone(), id);
                self.index.insert(&input, id);
                id
            }
        };
        self.link_cycle(id);
        id
    }

    /// Establish toggle-cycle successors touching the rule `id`.
    fn link_cycle(&mut self, id: usize) {
        let successor_key = |rule: &Rule| -> Option<String> {
            if rule.pending.is_empty() {
                return None;
            }
            let last = rule.input.chars().last()?;
            let key = format!("{}{}", rule.pending, last);
            // A rule that regenerates its own input must not chain to itself.
            (key != rule.input).then_some(key)
        };

        if let Some(key) = successor_key(&self.rules[id]) {
            self.rules[id].next = self.by_input.get(&key).copied();
        }
        let input = self.rules[id].input.clone();
        for other in 0..self.rules.len() {
            if other == id {
                continue;
            }
            if successor_key(&self.rules[other]).as_deref() == Some(input.as_str()) {
                self.rules[other].next = Some(id);
            }
        }
    }

    /// Substitute known `{name}` placeholders in a query string.
    pub fn parse_special_key(&self, text: &str) -> String {
        self.specials.parse(text)
    }

    pub fn rule(&self, id: usize) -> &Rule {
        &self.rules[id]
    }

    /// The toggle-cycle successor of a rule, if any.
    pub fn next_rule(&self, id: usize) -> Option<usize> {
        self.rules[id].next
    }

    /// Exact-match rule and longer-prefix availability for a query.
    pub fn lookup(&self, query: &str) -> LookupResult {
        let (rule, has_longer_prefix) = self.index.probe(query);
        LookupResult {
            rule,
            has_longer_prefix,
        }
    }

    /// All rules whose input starts with `prefix` (including an exact match).
    pub fn lookup_predictive(&self, prefix: &str) -> Vec<usize> {
        self.index.collect_with_prefix(prefix)
    }

    /// True when the single-key rule for `key` carries the NEW_CHUNK
    /// attribute.
    pub fn has_new_chunk_rule(&self, key: char) -> bool {
        let mut buf = [0u8; 4];
        let query: &str = key.encode_utf8(&mut buf);
        self.lookup(query)
            .rule
            .is_some_and(|id| self.rules[id].attributes.contains(RuleAttributes::NEW_CHUNK))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
