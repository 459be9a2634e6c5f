use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::persist::{read_document, write_document, Storage, SETTINGS_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Bn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// Player preferences. Fields missing from the stored document take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub sound_enabled: bool,
    pub animation_enabled: bool,
    pub language: Language,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            animation_enabled: true,
            language: Language::En,
            theme: Theme::Dark,
        }
    }
}

/// Stored settings, or defaults when absent or malformed.
pub fn load_settings<S: Storage + ?Sized>(storage: &S) -> Settings {
    read_document(storage, SETTINGS_KEY).unwrap_or_default()
}

pub fn save_settings<S: Storage + ?Sized>(storage: &S, settings: &Settings) -> Result<()> {
    write_document(storage, SETTINGS_KEY, settings)
}

/// Overwrite the stored document with defaults and return them.
pub fn reset_settings<S: Storage + ?Sized>(storage: &S) -> Result<Settings> {
    let defaults = Settings::default();
    save_settings(storage, &defaults)?;
    Ok(defaults)
}
