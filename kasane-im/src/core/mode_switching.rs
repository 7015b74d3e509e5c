//! Mode switching rules for URL-like input.
//!
//! When the auto-IME-off option is on, the composer consults this rule set
//! after every romaji insertion, keyed on the half-ASCII view of the
//! composition. A matching rule yields one action for the existing display
//! and one for the input mode used for further typing.

use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSwitchAction {
    NoChange,
    RevertToPreviousMode,
    PreferredAlphanumeric,
    HalfAlphanumeric,
    FullAlphanumeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSwitchingRule {
    /// Applied to the composition the user already typed.
    pub display_mode: ModeSwitchAction,
    /// Applied to the input mode used for new typing.
    pub input_mode: ModeSwitchAction,
}

const NO_CHANGE: ModeSwitchingRule = ModeSwitchingRule {
    display_mode: ModeSwitchAction::NoChange,
    input_mode: ModeSwitchAction::NoChange,
};

#[derive(Debug, Default)]
pub struct ModeSwitchingHandler {
    patterns: HashMap<String, ModeSwitchingRule>,
}

impl ModeSwitchingHandler {
    pub fn new() -> Self {
        let mut handler = Self {
            patterns: HashMap::new(),
        };
        let preferred = ModeSwitchingRule {
            display_mode: ModeSwitchAction::PreferredAlphanumeric,
            input_mode: ModeSwitchAction::RevertToPreviousMode,
        };
        let half = ModeSwitchingRule {
            display_mode: ModeSwitchAction::HalfAlphanumeric,
            input_mode: ModeSwitchAction::HalfAlphanumeric,
        };
        for word in ["google", "Google", "chrome", "Chrome", "android", "Android"] {
            handler.add_rule(word, preferred);
        }
        for prefix in ["http", "www.", "\\\\", "mailto:"] {
            handler.add_rule(prefix, half);
        }
        handler
    }

    pub fn shared() -> &'static ModeSwitchingHandler {
        static INSTANCE: OnceLock<ModeSwitchingHandler> = OnceLock::new();
        INSTANCE.get_or_init(ModeSwitchingHandler::new)
    }

    pub fn add_rule(&mut self, key: &str, rule: ModeSwitchingRule) {
        self.patterns.insert(key.to_string(), rule);
    }

    /// `C:\` and friends.
    fn is_drive_letter(key: &str) -> bool {
        let chars: Vec<char> = key.chars().collect();
        matches!(chars.as_slice(), [letter, ':', '\\'] if letter.is_ascii_alphabetic())
    }

    /// The rule for the whole composition; missing keys mean no change.
    pub fn rule_for(&self, key: &str) -> ModeSwitchingRule {
        if let Some(rule) = self.patterns.get(key) {
            return *rule;
        }
        if Self::is_drive_letter(key) {
            return ModeSwitchingRule {
                display_mode: ModeSwitchAction::HalfAlphanumeric,
                input_mode: ModeSwitchAction::HalfAlphanumeric,
            };
        }
        NO_CHANGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_prefix() {
        let handler = ModeSwitchingHandler::new();
        let rule = handler.rule_for("http");
        assert_eq!(rule.display_mode, ModeSwitchAction::HalfAlphanumeric);
        assert_eq!(rule.input_mode, ModeSwitchAction::HalfAlphanumeric);
    }

    #[test]
    fn test_brand_word() {
        let handler = ModeSwitchingHandler::new();
        let rule = handler.rule_for("Google");
        assert_eq!(rule.display_mode, ModeSwitchAction::PreferredAlphanumeric);
        assert_eq!(rule.input_mode, ModeSwitchAction::RevertToPreviousMode);
    }

    #[test]
    fn test_drive_letter() {
        let handler = ModeSwitchingHandler::new();
        let rule = handler.rule_for("c:\\");
        assert_eq!(rule.display_mode, ModeSwitchAction::HalfAlphanumeric);
        assert_eq!(handler.rule_for("1:\\"), NO_CHANGE);
    }

    #[test]
    fn test_no_match() {
        let handler = ModeSwitchingHandler::new();
        assert_eq!(handler.rule_for("konnichiha"), NO_CHANGE);
        // Prefix matching is exact, not substring.
        assert_eq!(handler.rule_for("http://example.com"), NO_CHANGE);
    }
}
