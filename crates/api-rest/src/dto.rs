//! Request and response bodies.
//!
//! Core models stay free of OpenAPI concerns; these types carry the `ToSchema` derives and the
//! presentation formatting (display dates, currency strings).

use clinic_core::datetime::{format_display_date, format_short_date};
use clinic_core::models::{
    Appointment, BillingItem, BillingSummary, JournalEntry, Medication, Patient, Report,
};
use clinic_core::settings::Settings;
use clinic_core::transcripts::TranscriptEntry;
use clinic_core::{AppointmentDraft, BillingDraft};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// QUERY PARAMETERS
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ListPatientsParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchPatientsParams {
    pub q: String,
    pub scope: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DateParams {
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpcomingParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PatientFilterParams {
    pub patient_id: Option<String>,
}

// ============================================================================
// RESPONSES
// ============================================================================

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientRes {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub doctor_id: String,
}

impl From<Patient> for PatientRes {
    fn from(p: Patient) -> Self {
        Self {
            id: p.id,
            name: p.name,
            age: p.age,
            gender: p.gender,
            doctor_id: p.doctor_id,
        }
    }
}

/// One page of the roster. An empty `patients` list means there are no more pages.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientPageRes {
    pub page: usize,
    pub page_size: usize,
    pub scope: String,
    pub patients: Vec<PatientRes>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientListRes {
    pub patients: Vec<PatientRes>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppointmentRes {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub doctor_id: String,
    pub doctor_name: String,
    /// ISO 8601 calendar date.
    pub date: String,
    /// e.g. `October 17, 2026`.
    pub display_date: String,
    pub time: String,
    pub duration_minutes: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub notes: String,
    pub reminder_set: bool,
}

impl From<Appointment> for AppointmentRes {
    fn from(a: Appointment) -> Self {
        Self {
            id: a.id.to_string(),
            display_date: format_display_date(a.date),
            date: a.date.to_string(),
            patient_id: a.patient_id,
            patient_name: a.patient_name,
            doctor_id: a.doctor_id,
            doctor_name: a.doctor_name,
            time: a.time,
            duration_minutes: a.duration_minutes,
            kind: a.kind.display_name().to_string(),
            status: a.status.display_name().to_string(),
            notes: a.notes,
            reminder_set: a.reminder_set,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppointmentListRes {
    pub appointments: Vec<AppointmentRes>,
}

/// A stored appointment plus any appointments it overlaps.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SavedAppointmentRes {
    pub appointment: AppointmentRes,
    pub conflicts: Vec<AppointmentRes>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BillingItemRes {
    pub id: String,
    pub patient_id: String,
    pub date: String,
    pub display_date: String,
    pub description: String,
    /// Major currency units.
    pub amount: f64,
    pub amount_display: String,
    pub paid: bool,
    pub category: String,
    pub notes: String,
}

impl From<BillingItem> for BillingItemRes {
    fn from(i: BillingItem) -> Self {
        Self {
            id: i.id.to_string(),
            patient_id: i.patient_id,
            date: i.date.to_string(),
            display_date: format_display_date(i.date),
            description: i.description,
            amount: i.amount.as_major(),
            amount_display: i.amount.to_string(),
            paid: i.paid,
            category: i.category.display_name().to_string(),
            notes: i.notes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BillingSummaryRes {
    pub outstanding: f64,
    pub outstanding_display: String,
    pub paid_last_month: f64,
    pub paid_last_month_display: String,
}

impl From<BillingSummary> for BillingSummaryRes {
    fn from(s: BillingSummary) -> Self {
        Self {
            outstanding: s.outstanding.as_major(),
            outstanding_display: s.outstanding.to_string(),
            paid_last_month: s.paid_last_month.as_major(),
            paid_last_month_display: s.paid_last_month.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BillingListRes {
    pub items: Vec<BillingItemRes>,
    pub summary: BillingSummaryRes,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JournalEntryRes {
    pub date: String,
    pub display_date: String,
    pub text: String,
}

impl From<JournalEntry> for JournalEntryRes {
    fn from(e: JournalEntry) -> Self {
        Self {
            date: e.date.to_string(),
            display_date: format_display_date(e.date),
            text: e.text,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MedicationRes {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub purpose: String,
    pub prescribed_by: String,
}

impl From<Medication> for MedicationRes {
    fn from(m: Medication) -> Self {
        Self {
            name: m.name,
            dosage: m.dosage,
            frequency: m.frequency,
            purpose: m.purpose,
            prescribed_by: m.prescribed_by,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportRes {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    pub display_date: String,
    pub author: String,
}

impl From<Report> for ReportRes {
    fn from(r: Report) -> Self {
        Self {
            title: r.title,
            kind: r.kind,
            date: r.date.to_string(),
            display_date: format_short_date(r.date),
            author: r.author,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SettingsRes {
    pub theme: String,
    pub font_style: String,
    pub text_size: f32,
    pub language: String,
}

impl From<Settings> for SettingsRes {
    fn from(s: Settings) -> Self {
        Self {
            theme: s.theme.display_name().to_string(),
            font_style: s.font_style.to_string(),
            text_size: s.text_size,
            language: s.language,
        }
    }
}

/// Element of the transcript history array.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TranscriptRes {
    pub text: String,
    pub received_at: String,
}

impl From<TranscriptEntry> for TranscriptRes {
    fn from(t: TranscriptEntry) -> Self {
        Self {
            text: t.text,
            received_at: t.received_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

// ============================================================================
// REQUESTS
// ============================================================================

/// Appointment form. Every field is optional so validation can name the missing one.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AppointmentReq {
    pub patient_id: Option<String>,
    /// `2026-10-17` or `October 17, 2026`.
    pub date: Option<String>,
    /// `09:30 AM` or `14:15`.
    pub time: Option<String>,
    /// `30` or `30 min`.
    pub duration: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub reminder_set: bool,
}

impl From<AppointmentReq> for AppointmentDraft {
    fn from(r: AppointmentReq) -> Self {
        Self {
            patient_id: r.patient_id,
            date: r.date,
            time: r.time,
            duration: r.duration,
            kind: r.kind,
            status: r.status,
            notes: r.notes,
            reminder_set: r.reminder_set,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusReq {
    /// Display name or key, e.g. `Cancelled` or `no_show`.
    pub status: String,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct BillingReq {
    pub patient_id: Option<String>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub paid: bool,
    pub notes: Option<String>,
}

impl From<BillingReq> for BillingDraft {
    fn from(r: BillingReq) -> Self {
        Self {
            patient_id: r.patient_id,
            description: r.description,
            amount: r.amount,
            category: r.category,
            date: r.date,
            paid: r.paid,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JournalEntryReq {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SettingsReq {
    /// `Light`, `Dark` or `System Default`.
    pub theme: String,
    /// `Normal`, `Bold` or `Italic`.
    pub font_style: String,
    pub text_size: f32,
    pub language: String,
}

/// Form body of a transcript submission.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TranscriptForm {
    pub text: String,
}
