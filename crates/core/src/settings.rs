//! User preferences.
//!
//! Presentation layers read four settings: theme, font style, text size and language. A key
//! that was never saved reads as its named default (`Light`, `Normal`, `18.0`, the system
//! language). A save commits all four together.

use crate::config::is_language_code;
use crate::constants::DEFAULT_TEXT_SIZE;
use crate::repositories::yaml::write_yaml_atomic;
use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::RwLock;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    SystemDefault,
}

impl Theme {
    pub fn display_name(self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::SystemDefault => "System Default",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Theme {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system default" | "system" => Ok(Theme::SystemDefault),
            other => Err(CoreError::InvalidInput(format!("unknown theme '{}'", other))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FontStyle::Normal => "Normal",
            FontStyle::Bold => "Bold",
            FontStyle::Italic => "Italic",
        })
    }
}

impl FromStr for FontStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(FontStyle::Normal),
            "bold" => Ok(FontStyle::Bold),
            "italic" => Ok(FontStyle::Italic),
            other => Err(CoreError::InvalidInput(format!("unknown font style '{}'", other))),
        }
    }
}

/// A complete set of preferences.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub theme: Theme,
    pub font_style: FontStyle,
    pub text_size: f32,
    /// ISO 639 language code.
    pub language: String,
}

impl Settings {
    /// The named defaults, with `language` as the system language.
    pub fn defaults(language: &str) -> Self {
        Self {
            theme: Theme::default(),
            font_style: FontStyle::default(),
            text_size: DEFAULT_TEXT_SIZE,
            language: language.to_string(),
        }
    }

    /// # Errors
    ///
    /// `CoreError::InvalidInput` for a non-positive or non-finite text size, or a language that
    /// is not a two or three letter lowercase code.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.text_size.is_finite() || self.text_size <= 0.0 {
            return Err(CoreError::InvalidInput(format!(
                "text size must be a positive number, got {}",
                self.text_size
            )));
        }
        if !is_language_code(&self.language) {
            return Err(CoreError::InvalidInput(format!(
                "'{}' is not an ISO 639 language code",
                self.language
            )));
        }
        Ok(())
    }
}

/// Settings as persisted; any key may be absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct StoredSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<Theme>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    font_style: Option<FontStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

impl StoredSettings {
    fn resolve(self, system_language: &str) -> Settings {
        Settings {
            theme: self.theme.unwrap_or_default(),
            font_style: self.font_style.unwrap_or_default(),
            text_size: self
                .text_size
                .filter(|s| s.is_finite() && *s > 0.0)
                .unwrap_or(DEFAULT_TEXT_SIZE),
            language: self
                .language
                .filter(|l| is_language_code(l))
                .unwrap_or_else(|| system_language.to_string()),
        }
    }

    /// Decode each key on its own so one bad value only resets that key.
    fn from_mapping(mapping: serde_yaml::Mapping) -> Self {
        fn key<T: serde::de::DeserializeOwned>(mapping: &serde_yaml::Mapping, name: &str) -> Option<T> {
            let value = mapping.get(name)?.clone();
            match serde_yaml::from_value(value) {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("ignoring unreadable setting '{}': {}", name, e);
                    None
                }
            }
        }

        Self {
            theme: key(&mapping, "theme"),
            font_style: key(&mapping, "font_style"),
            text_size: key(&mapping, "text_size"),
            language: key(&mapping, "language"),
        }
    }
}

impl From<&Settings> for StoredSettings {
    fn from(settings: &Settings) -> Self {
        Self {
            theme: Some(settings.theme),
            font_style: Some(settings.font_style),
            text_size: Some(settings.text_size),
            language: Some(settings.language.clone()),
        }
    }
}

/// Key-value preference storage.
pub trait PreferencesStore: Send + Sync {
    /// Current settings with defaults for absent keys.
    fn load(&self) -> CoreResult<Settings>;

    /// Validate and commit all four settings at once.
    fn save(&self, settings: &Settings) -> CoreResult<()>;
}

/// Preferences held for the lifetime of the process.
#[derive(Debug)]
pub struct InMemoryPreferences {
    system_language: String,
    stored: RwLock<StoredSettings>,
}

impl InMemoryPreferences {
    pub fn new(system_language: impl Into<String>) -> Self {
        Self {
            system_language: system_language.into(),
            stored: RwLock::new(StoredSettings::default()),
        }
    }
}

impl PreferencesStore for InMemoryPreferences {
    fn load(&self) -> CoreResult<Settings> {
        Ok(self.stored.read()?.clone().resolve(&self.system_language))
    }

    fn save(&self, settings: &Settings) -> CoreResult<()> {
        settings.validate()?;
        *self.stored.write()? = StoredSettings::from(settings);
        Ok(())
    }
}

/// Preferences persisted to a YAML file.
#[derive(Debug)]
pub struct YamlPreferencesFile {
    path: PathBuf,
    system_language: String,
    lock: RwLock<()>,
}

impl YamlPreferencesFile {
    pub fn new(path: impl Into<PathBuf>, system_language: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            system_language: system_language.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_stored(&self) -> CoreResult<StoredSettings> {
        if !self.path.exists() {
            return Ok(StoredSettings::default());
        }
        let contents = fs::read_to_string(&self.path).map_err(CoreError::FileRead)?;
        let value: serde_yaml::Value =
            serde_yaml::from_str(&contents).map_err(CoreError::YamlDeserialization)?;
        Ok(match value {
            serde_yaml::Value::Mapping(mapping) => StoredSettings::from_mapping(mapping),
            serde_yaml::Value::Null => StoredSettings::default(),
            _ => {
                tracing::warn!("{} is not a settings map; using defaults", self.path.display());
                StoredSettings::default()
            }
        })
    }
}

impl PreferencesStore for YamlPreferencesFile {
    fn load(&self) -> CoreResult<Settings> {
        let _guard = self.lock.read()?;
        Ok(self.read_stored()?.resolve(&self.system_language))
    }

    fn save(&self, settings: &Settings) -> CoreResult<()> {
        settings.validate()?;
        let _guard = self.lock.write()?;
        write_yaml_atomic(&self.path, &StoredSettings::from(settings))?;
        tracing::info!("saved settings to {}", self.path.display());
        Ok(())
    }
}
