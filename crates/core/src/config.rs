//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses. Binaries call [`EnvValues::read`] once and resolve the raw values with
//! [`CoreConfig::from_env_values`].

use crate::constants::{DEFAULT_DOCTOR_ID, DEFAULT_DOCTOR_NAME, FALLBACK_LANGUAGE};
use crate::{CoreError, CoreResult};
use clinic_types::NonEmptyText;
use std::path::{Path, PathBuf};

/// The doctor whose session queries and mutates appointments and billing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActingDoctor {
    id: String,
    name: String,
}

impl ActingDoctor {
    pub fn new(id: NonEmptyText, name: impl Into<String>) -> Self {
        Self {
            id: id.into_inner(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for ActingDoctor {
    fn default() -> Self {
        Self {
            id: DEFAULT_DOCTOR_ID.to_string(),
            name: DEFAULT_DOCTOR_NAME.to_string(),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    acting_doctor: ActingDoctor,
    data_dir: Option<PathBuf>,
    system_language: String,
    reject_double_booking: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            acting_doctor: ActingDoctor::default(),
            data_dir: None,
            system_language: FALLBACK_LANGUAGE.to_string(),
            reject_double_booking: false,
        }
    }
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if `system_language` is not a plausible ISO 639 code.
    pub fn new(
        acting_doctor: ActingDoctor,
        data_dir: Option<PathBuf>,
        system_language: String,
        reject_double_booking: bool,
    ) -> CoreResult<Self> {
        if !is_language_code(&system_language) {
            return Err(CoreError::InvalidInput(format!(
                "system language '{}' is not an ISO 639 code",
                system_language
            )));
        }

        Ok(Self {
            acting_doctor,
            data_dir,
            system_language,
            reject_double_booking,
        })
    }

    /// Resolve raw environment values into a configuration.
    ///
    /// Blank values count as unset. A blank or missing data directory means in-memory demo data.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if the double-booking flag is not a boolean value.
    pub fn from_env_values(values: EnvValues) -> CoreResult<Self> {
        let acting_doctor = acting_doctor_from_env_values(values.doctor_id, values.doctor_name);
        let data_dir = values
            .data_dir
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let system_language = language_from_locale_value(values.lang);
        let reject_double_booking = flag_from_env_value(values.reject_double_booking)?;

        Self::new(acting_doctor, data_dir, system_language, reject_double_booking)
    }

    /// Replace the data directory, e.g. from a command-line flag.
    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.data_dir = Some(data_dir);
        self
    }

    pub fn acting_doctor(&self) -> &ActingDoctor {
        &self.acting_doctor
    }

    /// Directory holding the YAML repositories; `None` means in-memory demo data.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    pub fn system_language(&self) -> &str {
        &self.system_language
    }

    pub fn reject_double_booking(&self) -> bool {
        self.reject_double_booking
    }
}

/// Raw configuration values as found in the process environment.
///
/// # Environment Variables
/// - `CLINIC_DOCTOR_ID` / `CLINIC_DOCTOR_NAME`: acting doctor (default: the demo doctor)
/// - `CLINIC_DATA_DIR`: directory for YAML data files (default: in-memory demo data)
/// - `LANG`: system locale, used for the default language preference
/// - `CLINIC_REJECT_DOUBLE_BOOKING`: refuse overlapping appointments (default: off)
#[derive(Clone, Debug, Default)]
pub struct EnvValues {
    pub doctor_id: Option<String>,
    pub doctor_name: Option<String>,
    pub data_dir: Option<String>,
    pub lang: Option<String>,
    pub reject_double_booking: Option<String>,
}

impl EnvValues {
    /// Read the variables listed above. Call once at startup.
    pub fn read() -> Self {
        Self {
            doctor_id: std::env::var("CLINIC_DOCTOR_ID").ok(),
            doctor_name: std::env::var("CLINIC_DOCTOR_NAME").ok(),
            data_dir: std::env::var("CLINIC_DATA_DIR").ok(),
            lang: std::env::var("LANG").ok(),
            reject_double_booking: std::env::var("CLINIC_REJECT_DOUBLE_BOOKING").ok(),
        }
    }
}

/// Build the acting doctor from optional raw environment values.
///
/// Missing or blank values fall back to the demo doctor.
pub fn acting_doctor_from_env_values(id: Option<String>, name: Option<String>) -> ActingDoctor {
    let default = ActingDoctor::default();
    let id = id
        .and_then(|v| NonEmptyText::new(v).ok())
        .map(NonEmptyText::into_inner)
        .unwrap_or(default.id);
    let name = name
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or(default.name);

    ActingDoctor { id, name }
}

/// Derive the ISO language code from a POSIX locale value such as `en_GB.UTF-8`.
///
/// `None`, empty, `C` and `POSIX` resolve to the fallback language.
pub fn language_from_locale_value(value: Option<String>) -> String {
    let Some(value) = value else {
        return FALLBACK_LANGUAGE.to_string();
    };

    let code = value
        .trim()
        .split(['_', '.', '@', '-'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    if code.is_empty() || code == "c" || code == "posix" || !is_language_code(&code) {
        return FALLBACK_LANGUAGE.to_string();
    }
    code
}

/// Parse a boolean flag value (`1/0`, `true/false`, `yes/no`, `on/off`).
///
/// `None` or blank resolves to `false`.
pub fn flag_from_env_value(value: Option<String>) -> CoreResult<bool> {
    let value = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());

    match value.as_deref() {
        None => Ok(false),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(CoreError::InvalidInput(format!(
            "'{}' is not a boolean flag value",
            other
        ))),
    }
}

/// Two or three lowercase ASCII letters.
pub(crate) fn is_language_code(code: &str) -> bool {
    (2..=3).contains(&code.len()) && code.bytes().all(|b| b.is_ascii_lowercase())
}
