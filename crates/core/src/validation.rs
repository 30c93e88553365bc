//! Input validation gate.
//!
//! Raw form input arrives as [`AppointmentDraft`] / [`BillingDraft`] values with every field
//! optional. `validate` checks fields in a fixed order and reports the first failure as a
//! [`ValidationError`] naming that field. Only validated records reach the stores, which do not
//! re-check them.

use crate::config::ActingDoctor;
use crate::datetime::{format_time_of_day, parse_date, parse_time_of_day};
use crate::models::{
    Appointment, AppointmentStatus, AppointmentType, BillingCategory, BillingItem, Money, Patient,
};
use clinic_types::NonEmptyText;
use clinic_uuid::RecordId;
use serde::Deserialize;

/// Duration applied when a draft does not name one.
pub const DEFAULT_DURATION_MINUTES: u32 = 30;

/// Longest accepted duration: one day.
pub const MAX_DURATION_MINUTES: u32 = 24 * 60;

/// Reason a draft was rejected before reaching a store.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a patient")]
    MissingPatient,
    #[error("Unknown patient: {0}")]
    UnknownPatient(String),
    #[error("Please select a date")]
    MissingDate,
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Please select a time")]
    MissingTime,
    #[error("Invalid time: {0}")]
    InvalidTime(String),
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
    #[error("Please enter a description")]
    MissingDescription,
    #[error("Please enter a valid amount")]
    InvalidAmount,
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,
    #[error("Please select a category")]
    MissingCategory,
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

/// Unvalidated appointment input from a form or request body.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppointmentDraft {
    pub patient_id: Option<String>,
    /// ISO or display date.
    pub date: Option<String>,
    /// `09:30 AM` or `14:15`.
    pub time: Option<String>,
    /// Minutes, optionally suffixed: `45` or `45 min`.
    pub duration: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub reminder_set: bool,
}

impl AppointmentDraft {
    /// Validate into a new appointment with a freshly generated id.
    pub fn validate(
        self,
        roster: &[Patient],
        doctor: &ActingDoctor,
    ) -> Result<Appointment, ValidationError> {
        self.validate_with_id(RecordId::new(), roster, doctor)
    }

    /// Validate into an appointment carrying `id` and owned by `doctor`.
    ///
    /// An unrecognised type falls back to check-up and an unrecognised status to scheduled,
    /// matching the picker defaults.
    pub fn validate_with_id(
        self,
        id: RecordId,
        roster: &[Patient],
        doctor: &ActingDoctor,
    ) -> Result<Appointment, ValidationError> {
        self.build(
            id,
            roster,
            (doctor.id(), doctor.name()),
            AppointmentType::Checkup,
            AppointmentStatus::Scheduled,
        )
    }

    /// Validate as a full-record update of `existing`.
    ///
    /// The id and doctor are kept. A missing or unrecognised type or status keeps the stored
    /// value instead of resetting it.
    pub fn validate_update(
        self,
        existing: &Appointment,
        roster: &[Patient],
    ) -> Result<Appointment, ValidationError> {
        self.build(
            existing.id,
            roster,
            (existing.doctor_id.as_str(), existing.doctor_name.as_str()),
            existing.kind,
            existing.status,
        )
    }

    fn build(
        self,
        id: RecordId,
        roster: &[Patient],
        (doctor_id, doctor_name): (&str, &str),
        fallback_kind: AppointmentType,
        fallback_status: AppointmentStatus,
    ) -> Result<Appointment, ValidationError> {
        let patient = resolve_patient(self.patient_id.as_deref(), roster)?;
        let date = required_date(self.date.as_deref())?;

        let time = match non_blank(self.time.as_deref()) {
            None => return Err(ValidationError::MissingTime),
            Some(raw) => parse_time_of_day(raw)
                .map(format_time_of_day)
                .ok_or_else(|| ValidationError::InvalidTime(raw.to_string()))?,
        };

        let duration_minutes = match non_blank(self.duration.as_deref()) {
            None => DEFAULT_DURATION_MINUTES,
            Some(raw) => parse_duration(raw)?,
        };

        let kind = non_blank(self.kind.as_deref())
            .and_then(|k| k.parse::<AppointmentType>().ok())
            .unwrap_or(fallback_kind);
        let status = non_blank(self.status.as_deref())
            .and_then(|s| s.parse::<AppointmentStatus>().ok())
            .unwrap_or(fallback_status);

        Ok(Appointment {
            id,
            patient_id: patient.id.clone(),
            patient_name: patient.name.clone(),
            doctor_id: doctor_id.to_string(),
            doctor_name: doctor_name.to_string(),
            date,
            time,
            duration_minutes,
            kind,
            status,
            notes: trimmed_or_empty(self.notes),
            reminder_set: self.reminder_set,
        })
    }
}

/// Unvalidated billing input from a form or request body.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct BillingDraft {
    pub patient_id: Option<String>,
    pub description: Option<String>,
    /// Major currency units.
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub paid: bool,
    pub notes: Option<String>,
}

impl BillingDraft {
    pub fn validate(self, roster: &[Patient]) -> Result<BillingItem, ValidationError> {
        self.validate_with_id(RecordId::new(), roster)
    }

    pub fn validate_with_id(
        self,
        id: RecordId,
        roster: &[Patient],
    ) -> Result<BillingItem, ValidationError> {
        let patient = resolve_patient(self.patient_id.as_deref(), roster)?;

        let description = NonEmptyText::from_optional(self.description.as_deref())
            .map_err(|_| ValidationError::MissingDescription)?
            .into_inner();

        let amount = match self.amount {
            None => return Err(ValidationError::InvalidAmount),
            Some(value) if !value.is_finite() => return Err(ValidationError::InvalidAmount),
            Some(value) if value <= 0.0 => return Err(ValidationError::NonPositiveAmount),
            Some(value) => Money::from_major(value).ok_or(ValidationError::InvalidAmount)?,
        };
        // Rounds to zero cents, e.g. 0.001.
        if amount.is_zero() {
            return Err(ValidationError::NonPositiveAmount);
        }

        let category = match non_blank(self.category.as_deref()) {
            None => return Err(ValidationError::MissingCategory),
            Some(raw) => raw
                .parse::<BillingCategory>()
                .map_err(|_| ValidationError::UnknownCategory(raw.to_string()))?,
        };

        let date = required_date(self.date.as_deref())?;

        Ok(BillingItem {
            id,
            patient_id: patient.id.clone(),
            date,
            description,
            amount,
            paid: self.paid,
            category,
            notes: trimmed_or_empty(self.notes),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn trimmed_or_empty(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn resolve_patient<'a>(
    patient_id: Option<&str>,
    roster: &'a [Patient],
) -> Result<&'a Patient, ValidationError> {
    let patient_id = non_blank(patient_id).ok_or(ValidationError::MissingPatient)?;
    roster
        .iter()
        .find(|p| p.id == patient_id)
        .ok_or_else(|| ValidationError::UnknownPatient(patient_id.to_string()))
}

fn required_date(raw: Option<&str>) -> Result<chrono::NaiveDate, ValidationError> {
    let raw = non_blank(raw).ok_or(ValidationError::MissingDate)?;
    parse_date(raw).ok_or_else(|| ValidationError::InvalidDate(raw.to_string()))
}

fn parse_duration(raw: &str) -> Result<u32, ValidationError> {
    let digits = raw
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c.is_whitespace() || c == '.')
        .trim();
    match digits.parse::<u32>() {
        Ok(minutes) if (1..=MAX_DURATION_MINUTES).contains(&minutes) => Ok(minutes),
        _ => Err(ValidationError::InvalidDuration(raw.to_string())),
    }
}
