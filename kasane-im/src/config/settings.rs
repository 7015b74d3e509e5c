//! Settings configuration
//!
//! Manages the user-configurable knobs the composer consults.
//! Default values are defined in `config/default.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Default configuration TOML embedded from config/default.toml
const DEFAULT_CONFIG_TOML: &str = include_str!("../../config/default.toml");

/// Error from reading or parsing a settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("could not determine config directory")]
    NoConfigDir,
}

/// Composer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Input-mode behavior
    pub input: InputSettings,
    /// Preferred character forms
    pub character_form: CharacterFormSettings,
}

/// Preedit method: how keystrokes map to kana.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreeditMethod {
    /// Romanized typing through the rewrite table
    #[default]
    Roman,
    /// Direct kana keys with pre-converted text
    Kana,
}

/// Behavior of shifted alphabet input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftKeyModeSwitch {
    /// Shift does not change the input mode
    Off,
    /// Shifted alphabet enters temporary half-ASCII mode
    #[default]
    AsciiInputMode,
    /// Shifted alphabet enters temporary katakana mode
    KatakanaInputMode,
}

/// Input-mode related settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSettings {
    #[serde(default)]
    pub preedit_method: PreeditMethod,
    #[serde(default)]
    pub shift_key_mode_switch: ShiftKeyModeSwitch,
    /// Switch the composition mode automatically for URL-like input
    pub use_auto_ime_turn_off: bool,
    /// Flush toggle state when two keys are farther apart than this
    /// (milliseconds, 0 = disabled)
    pub composing_timeout_threshold_msec: u64,
}

/// Preferred width of a character class.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterForm {
    #[default]
    FullWidth,
    HalfWidth,
}

/// Preferred character forms for produced text
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacterFormSettings {
    /// Width of symbols produced by the number transform
    #[serde(default)]
    pub symbols: CharacterForm,
}

impl Default for Settings {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("embedded default.toml must be valid")
    }
}

/// Lay user-provided TOML values over the defaults, table by table. User
/// scalars win; tables descend so partial files keep the remaining
/// defaults.
fn overlay_value(base: &mut toml::Value, user: toml::Value) {
    match (base, user) {
        (toml::Value::Table(base), toml::Value::Table(user)) => {
            for (key, value) in user {
                match base.get_mut(&key) {
                    Some(slot) => overlay_value(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

impl Settings {
    /// The user's configuration file, under the platform config directory.
    pub fn config_file() -> Option<PathBuf> {
        ProjectDirs::from("org", "kasane", "kasane-im")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load the user's settings. Without a config file (or a config
    /// directory at all) the embedded defaults apply.
    pub fn load() -> Result<Self, SettingsError> {
        match Self::config_file() {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(_) => {
                debug!("no user settings file; using embedded defaults");
                Ok(Self::default())
            }
            None => {
                warn!("no config directory on this platform; using embedded defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load settings from a TOML file, overlaid on the embedded defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        debug!(path = %path.display(), "reading settings");
        let mut merged: toml::Value = toml::from_str(DEFAULT_CONFIG_TOML)?;
        let user: toml::Value = toml::from_str(&fs::read_to_string(path)?)?;
        overlay_value(&mut merged, user);
        Ok(merged.try_into()?)
    }

    /// Save settings to the default configuration file
    pub fn save(&self) -> Result<(), SettingsError> {
        match Self::config_file() {
            Some(path) => self.save_to(&path),
            None => Err(SettingsError::NoConfigDir),
        }
    }

    /// Save settings to a specific file
    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.input.preedit_method, PreeditMethod::Roman);
        assert_eq!(
            settings.input.shift_key_mode_switch,
            ShiftKeyModeSwitch::AsciiInputMode
        );
        assert!(settings.input.use_auto_ime_turn_off);
        assert_eq!(settings.input.composing_timeout_threshold_msec, 0);
        assert_eq!(settings.character_form.symbols, CharacterForm::FullWidth);
    }

    #[test]
    fn test_serialize_deserialize() {
        let settings = Settings::default();
        let toml_str = toml::to_string(&settings).unwrap();
        let loaded: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[input]
composing_timeout_threshold_msec = 1500
"#
        )
        .unwrap();

        let settings = Settings::load_from(file.path()).unwrap();
        assert_eq!(settings.input.composing_timeout_threshold_msec, 1500);
        // Should use default for unspecified values
        assert!(settings.input.use_auto_ime_turn_off);
        assert_eq!(settings.input.preedit_method, PreeditMethod::Roman);
    }

    #[test]
    fn test_shift_key_mode_switch_values() {
        for (text, expected) in [
            ("off", ShiftKeyModeSwitch::Off),
            ("ascii_input_mode", ShiftKeyModeSwitch::AsciiInputMode),
            ("katakana_input_mode", ShiftKeyModeSwitch::KatakanaInputMode),
        ] {
            let mut file = NamedTempFile::new().unwrap();
            writeln!(file, "[input]\nshift_key_mode_switch = \"{text}\"").unwrap();
            let settings = Settings::load_from(file.path()).unwrap();
            assert_eq!(settings.input.shift_key_mode_switch, expected);
        }
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut settings = Settings::default();
        settings.input.composing_timeout_threshold_msec = 800;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }
}
