//! Special-key notation.
//!
//! Rule strings may contain `{name}` placeholders. Each distinct name maps to
//! a single private-use codepoint so that later lookups stay plain string
//! matches. `{<}` (rewind) and `{!}` (stop key toggling) are reserved;
//! site-specific names are assigned codepoints as they appear at load time.
//! Unknown names in a query are preserved verbatim.

use std::collections::HashMap;

/// Codepoint for the reserved `{<}` rewind key.
pub const REWIND: char = '\u{F000}';
/// Codepoint for the reserved `{!}` stop-toggling key.
pub const STOP_KEY_TOGGLING: char = '\u{F001}';

const SITE_SPECIFIC_BASE: u32 = 0xF002;

/// Substitute `{name}` placeholders using `resolve`; names it does not
/// resolve are kept verbatim, as is an unterminated brace.
fn substitute(text: &str, mut resolve: impl FnMut(&str) -> Option<char>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        match tail.find('}') {
            Some(close) => {
                match resolve(&tail[1..close]) {
                    Some(c) => out.push(c),
                    None => out.push_str(&tail[..=close]),
                }
                rest = &tail[close + 1..];
            }
            None => {
                out.push_str(tail);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

#[derive(Debug, Clone)]
pub(crate) struct SpecialKeys {
    names: HashMap<String, char>,
    next: u32,
}

impl SpecialKeys {
    pub fn new() -> Self {
        let mut names = HashMap::new();
        names.insert("<".to_string(), REWIND);
        names.insert("!".to_string(), STOP_KEY_TOGGLING);
        Self {
            names,
            next: SITE_SPECIFIC_BASE,
        }
    }

    fn register(&mut self, name: &str) -> char {
        if let Some(&c) = self.names.get(name) {
            return c;
        }
        let c = char::from_u32(self.next).unwrap_or(char::REPLACEMENT_CHARACTER);
        self.next += 1;
        self.names.insert(name.to_string(), c);
        c
    }

    /// Read-only substitution for queries: unknown names stay verbatim.
    pub fn parse(&self, text: &str) -> String {
        substitute(text, |name| self.names.get(name).copied())
    }

    /// Substitution for rule strings: unseen names get fresh codepoints.
    pub fn parse_and_register(&mut self, text: &str) -> String {
        // The borrow checker rules out calling `self.register` from the
        // closure; collect names first, then substitute.
        let mut names = Vec::new();
        substitute(text, |name| {
            names.push(name.to_string());
            None
        });
        for name in names {
            self.register(&name);
        }
        self.parse(text)
    }
}

impl Default for SpecialKeys {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_names() {
        let keys = SpecialKeys::new();
        assert_eq!(keys.parse("{<}"), REWIND.to_string());
        assert_eq!(keys.parse("{!}"), STOP_KEY_TOGGLING.to_string());
        assert_eq!(keys.parse("a{!}b"), format!("a{}b", STOP_KEY_TOGGLING));
    }

    #[test]
    fn test_unknown_name_preserved() {
        let keys = SpecialKeys::new();
        assert_eq!(keys.parse("{henkan}"), "{henkan}");
        assert_eq!(keys.parse("x{henkan}y"), "x{henkan}y");
    }

    #[test]
    fn test_site_specific_registration() {
        let mut keys = SpecialKeys::new();
        let parsed = keys.parse_and_register("{henkan}");
        assert_eq!(parsed.chars().count(), 1);
        // The same name resolves to the same codepoint afterwards.
        assert_eq!(keys.parse("{henkan}"), parsed);
        // A different name gets a different codepoint.
        let other = keys.parse_and_register("{muhenkan}");
        assert_ne!(parsed, other);
    }

    #[test]
    fn test_unterminated_brace() {
        let keys = SpecialKeys::new();
        assert_eq!(keys.parse("a{bc"), "a{bc");
    }
}
