//! Constants used throughout the clinic core crate.
//!
//! Defaults, display formats and file names live here so the services, the REST layer and the
//! CLI agree on them.

/// Acting doctor used when no identity is configured.
pub const DEFAULT_DOCTOR_ID: &str = "doc123";

/// Display name paired with [`DEFAULT_DOCTOR_ID`].
pub const DEFAULT_DOCTOR_NAME: &str = "Dr. Smith";

/// Calendar date display format, e.g. `October 17, 2026`.
pub const DISPLAY_DATE_FORMAT: &str = "%B %d, %Y";

/// Short date display format used for reports and transcript history, e.g. `Oct 17, 2026`.
pub const SHORT_DATE_FORMAT: &str = "%b %d, %Y";

/// Time-of-day display format, e.g. `09:30 AM`.
pub const DISPLAY_TIME_FORMAT: &str = "%I:%M %p";

/// Page size used by the patient list screens.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Queries shorter than this (after trimming) do not filter the patient list.
pub const MIN_SEARCH_QUERY_LEN: usize = 3;

/// Default number of upcoming appointments returned.
pub const DEFAULT_UPCOMING_LIMIT: usize = 10;

/// Default text size for list rendering.
pub const DEFAULT_TEXT_SIZE: f32 = 18.0;

/// Language used when the system locale cannot be determined.
pub const FALLBACK_LANGUAGE: &str = "en";

/// Language choices offered by the settings screen, as `(label, ISO 639-1 code)`.
pub const SUPPORTED_LANGUAGES: [(&str, &str); 5] = [
    ("English", "en"),
    ("Spanish", "es"),
    ("French", "fr"),
    ("German", "de"),
    ("Japanese", "ja"),
];

/// Filename for persisted appointments inside the data directory.
pub const APPOINTMENTS_FILENAME: &str = "appointments.yaml";

/// Filename for persisted billing items inside the data directory.
pub const BILLING_FILENAME: &str = "billing.yaml";

/// Filename for the persisted patient roster inside the data directory.
pub const PATIENTS_FILENAME: &str = "patients.yaml";

/// Filename for persisted user preferences inside the data directory.
pub const SETTINGS_FILENAME: &str = "settings.yaml";

/// Placeholder for a history object without a usable `text` field.
pub const HISTORY_INVALID_ENTRY: &str = "Invalid entry";

/// Placeholder for a history element that is neither a string nor an object.
pub const HISTORY_UNKNOWN_FORMAT: &str = "Unknown format";

/// Notice surfaced once when the patient list runs out of pages.
pub const NO_MORE_PATIENTS_NOTICE: &str = "No more patients to load";
