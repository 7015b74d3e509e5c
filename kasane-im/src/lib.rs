//! kasane-im: the composer state machine for Japanese input.
//!
//! Builds on kasane-engine's composition machinery: input modes and
//! temporary-mode rules, cursor motion, timeout-driven toggle flushing,
//! auto-IME-off mode switching, the query surface used by a downstream
//! converter/predictor, and immutable snapshots.

pub mod config;
pub mod core;

pub use crate::config::settings::{CharacterForm, PreeditMethod, Settings, ShiftKeyModeSwitch};
pub use crate::core::composer::{Composer, InternalCommand};
pub use crate::core::data::ComposerData;
pub use crate::core::keyevent::{InputStyle, KeyEvent};
pub use crate::core::request::Request;
pub use crate::core::{HandwritingComposition, InputFieldType};
