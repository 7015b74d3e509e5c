//! Key events as delivered by the session layer.

use kasane_engine::TransliterationType;
use kasane_engine::composition::ProbableKeyEvent;

/// How the produced characters should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputStyle {
    /// Follow the rewrite table.
    #[default]
    Follow,
    /// Keep the pre-converted text exactly as delivered.
    AsIs,
}

/// A platform keystroke, already resolved to the characters it produces.
#[derive(Debug, Clone, Default)]
pub struct KeyEvent {
    /// Raw characters produced by the key; `None` for modifier-only events.
    pub key: Option<String>,
    /// Pre-converted text (kana keyboards deliver the kana here).
    pub key_string: Option<String>,
    /// Composition mode requested together with the key.
    pub mode: Option<TransliterationType>,
    /// Shift was held.
    pub shift: bool,
    /// Caps lock was active.
    pub caps_lock: bool,
    /// Keystroke time in milliseconds; the composer clock is consulted when
    /// absent.
    pub timestamp_msec: Option<i64>,
    pub input_style: InputStyle,
    /// Probable key alternatives from soft keyboards.
    pub probable_key_events: Vec<ProbableKeyEvent>,
}

impl KeyEvent {
    /// A plain character key.
    pub fn from_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    /// A key with pre-converted text (kana keyboard).
    pub fn from_key_and_preedit(key: impl Into<String>, preedit: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            key_string: Some(preedit.into()),
            ..Self::default()
        }
    }

    /// A modifier-only Shift press.
    pub fn shift_only() -> Self {
        Self {
            shift: true,
            ..Self::default()
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_caps_lock(mut self) -> Self {
        self.caps_lock = true;
        self
    }

    pub fn with_mode(mut self, mode: TransliterationType) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_timestamp(mut self, msec: i64) -> Self {
        self.timestamp_msec = Some(msec);
        self
    }

    pub fn as_is(mut self) -> Self {
        self.input_style = InputStyle::AsIs;
        self
    }

    /// True when no producing key is present (modifier-only event).
    pub fn is_modifier_only(&self) -> bool {
        self.key.is_none() && self.key_string.is_none()
    }
}
