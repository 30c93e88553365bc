use crate::datetime::{format_display_date, minutes_since_midnight, parse_time_of_day};
use crate::{CoreError, CoreResult};
use chrono::NaiveDate;
use clinic_uuid::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A scheduled visit between a patient and a doctor.
///
/// Patient and doctor names are denormalised copies taken when the appointment is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: RecordId,
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    pub date: NaiveDate,
    /// Display form, e.g. `09:30 AM`.
    pub time: String,
    pub duration_minutes: u32,
    #[serde(rename = "type")]
    pub kind: AppointmentType,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub reminder_set: bool,
}

impl Appointment {
    /// Minutes since midnight, or `None` when the stored time cannot be parsed.
    pub fn start_minutes(&self) -> Option<u32> {
        parse_time_of_day(&self.time).map(minutes_since_midnight)
    }

    /// Half-open `[start, end)` range in minutes since midnight. The end may run past
    /// midnight (1440) and saturates at `u32::MAX`.
    pub fn minute_range(&self) -> Option<std::ops::Range<u32>> {
        self.start_minutes()
            .map(|start| start..start.saturating_add(self.duration_minutes))
    }

    pub fn display_date(&self) -> String {
        format_display_date(self.date)
    }
}

/// Kind of visit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    Checkup,
    FollowUp,
    Consultation,
    Procedure,
    Emergency,
    Other,
}

impl AppointmentType {
    pub const ALL: [AppointmentType; 6] = [
        AppointmentType::Checkup,
        AppointmentType::FollowUp,
        AppointmentType::Consultation,
        AppointmentType::Procedure,
        AppointmentType::Emergency,
        AppointmentType::Other,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            AppointmentType::Checkup => "Check-up",
            AppointmentType::FollowUp => "Follow-up",
            AppointmentType::Consultation => "Consultation",
            AppointmentType::Procedure => "Procedure",
            AppointmentType::Emergency => "Emergency",
            AppointmentType::Other => "Other",
        }
    }

    fn key(self) -> &'static str {
        match self {
            AppointmentType::Checkup => "checkup",
            AppointmentType::FollowUp => "follow_up",
            AppointmentType::Consultation => "consultation",
            AppointmentType::Procedure => "procedure",
            AppointmentType::Emergency => "emergency",
            AppointmentType::Other => "other",
        }
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for AppointmentType {
    type Err = CoreError;

    /// Accepts either the display name (`Follow-up`) or the snake_case key (`follow_up`).
    fn from_str(s: &str) -> CoreResult<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.display_name().eq_ignore_ascii_case(s) || t.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown appointment type '{}'", s)))
    }
}

/// Lifecycle state of an appointment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
    Rescheduled,
    NoShow,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 6] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::Rescheduled,
        AppointmentStatus::NoShow,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::Rescheduled => "Rescheduled",
            AppointmentStatus::NoShow => "No Show",
        }
    }

    fn key(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Rescheduled => "rescheduled",
            AppointmentStatus::NoShow => "no_show",
        }
    }

    /// Cancelled and completed appointments never appear in upcoming lists.
    pub fn is_closed(self) -> bool {
        matches!(self, AppointmentStatus::Cancelled | AppointmentStatus::Completed)
    }

    /// Whether an appointment in this state still occupies the doctor's time.
    pub fn holds_slot(self) -> bool {
        matches!(
            self,
            AppointmentStatus::Scheduled
                | AppointmentStatus::Confirmed
                | AppointmentStatus::Rescheduled
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for AppointmentStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.display_name().eq_ignore_ascii_case(s) || t.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown appointment status '{}'", s)))
    }
}
