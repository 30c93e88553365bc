//! # Clinic Core
//!
//! Business logic for the clinic workflow: the patient directory and paged patient list, the
//! appointment schedule, the billing ledger, patient charts, preferences and transcript
//! history.
//!
//! Everything here is synchronous and safe to share across threads. Stores are reached through
//! the repository traits in [`repositories`], with in-memory and YAML file backends.
//!
//! **No API concerns**: HTTP routing and the command line live in `api-rest` and `clinic-cli`.

pub mod billing;
pub mod chart;
pub mod clinic;
pub mod config;
pub mod constants;
pub mod datetime;
pub mod directory;
pub mod error;
pub mod models;
pub mod patient_list;
pub mod repositories;
pub mod schedule;
pub mod seed;
pub mod settings;
pub mod transcripts;
pub mod validation;

pub use billing::BillingLedger;
pub use chart::PatientChart;
pub use clinic::ClinicServices;
pub use config::{ActingDoctor, CoreConfig};
pub use directory::PatientDirectory;
pub use error::{CoreError, CoreResult};
pub use patient_list::{PageLoad, PageSource, PatientListModel};
pub use schedule::ScheduleService;
pub use settings::{FontStyle, PreferencesStore, Settings, Theme};
pub use transcripts::{parse_history, TranscriptLog};
pub use validation::{AppointmentDraft, BillingDraft, ValidationError};

pub use clinic_types::NonEmptyText;
pub use clinic_uuid::RecordId;
