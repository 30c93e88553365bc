//! HTTP handlers.
//!
//! Handlers only translate between JSON/form bodies and the core services; every rule lives in
//! `clinic-core`.

use crate::dto::*;
use crate::error::{core_error, ApiError, ApiResult};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Form,
};
use chrono::{Local, NaiveDate};
use clinic_core::constants::DEFAULT_PAGE_SIZE;
use clinic_core::datetime::parse_date;
use clinic_core::models::{AppointmentStatus, PatientScope};
use clinic_core::settings::{FontStyle, Settings, Theme};
use clinic_core::{CoreError, RecordId};

fn parse_id(raw: &str) -> Result<RecordId, ApiError> {
    RecordId::parse(raw).map_err(|e| core_error("parse id", CoreError::from(e)))
}

fn parse_scope(raw: Option<&str>) -> Result<PatientScope, ApiError> {
    raw.map(str::parse::<PatientScope>)
        .transpose()
        .map(Option::unwrap_or_default)
        .map_err(|e| core_error("parse scope", e))
}

fn date_or_today(raw: Option<&str>) -> Result<NaiveDate, ApiError> {
    match raw.map(str::trim).filter(|d| !d.is_empty()) {
        None => Ok(Local::now().date_naive()),
        Some(d) => parse_date(d).ok_or((StatusCode::BAD_REQUEST, format!("Invalid date: {d}"))),
    }
}

fn collect<T, R: From<T>>(items: Vec<T>) -> Vec<R> {
    items.into_iter().map(R::from).collect()
}

// ============================================================================
// HEALTH
// ============================================================================

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Liveness probe.
pub async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Clinic REST API is alive".into(),
    })
}

// ============================================================================
// PATIENTS
// ============================================================================

#[utoipa::path(
    get,
    path = "/patients",
    params(
        ("page" = Option<usize>, Query, description = "1-indexed page, default 1"),
        ("page_size" = Option<usize>, Query, description = "Page size, default 5"),
        ("scope" = Option<String>, Query, description = "`mine` or `all` (default)")
    ),
    responses(
        (status = 200, description = "One page of patients; empty when past the end", body = PatientPageRes),
        (status = 400, description = "Page or page size is zero, or unknown scope")
    )
)]
/// List patients page by page.
pub async fn list_patients(
    State(state): State<AppState>,
    Query(params): Query<ListPatientsParams>,
) -> ApiResult<PatientPageRes> {
    let scope = parse_scope(params.scope.as_deref())?;
    let page = params.page.unwrap_or(1);
    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    let patients = state
        .services
        .directory
        .get_patients(page, page_size, scope)
        .map_err(|e| core_error("list patients", e))?;

    Ok(Json(PatientPageRes {
        page,
        page_size,
        scope: scope.to_string(),
        patients: collect(patients),
    }))
}

#[utoipa::path(
    get,
    path = "/patients/search",
    params(
        ("q" = String, Query, description = "Name fragment; fewer than 3 characters returns everyone"),
        ("scope" = Option<String>, Query, description = "`mine` or `all` (default)")
    ),
    responses(
        (status = 200, description = "Matching patients in roster order", body = PatientListRes)
    )
)]
pub async fn search_patients(
    State(state): State<AppState>,
    Query(params): Query<SearchPatientsParams>,
) -> ApiResult<PatientListRes> {
    let scope = parse_scope(params.scope.as_deref())?;
    let patients = state
        .services
        .directory
        .search(&params.q, scope)
        .map_err(|e| core_error("search patients", e))?;
    Ok(Json(PatientListRes {
        patients: collect(patients),
    }))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/appointments",
    params(("id" = String, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "The acting doctor's appointments with this patient", body = AppointmentListRes),
        (status = 404, description = "Unknown patient")
    )
)]
pub async fn patient_appointments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<AppointmentListRes> {
    let services = &state.services;
    services
        .require_patient(&id)
        .map_err(|e| core_error("patient appointments", e))?;
    let appointments = services
        .schedule
        .appointments_by_patient(&id)
        .map_err(|e| core_error("patient appointments", e))?;
    Ok(Json(AppointmentListRes {
        appointments: collect(appointments),
    }))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/billing",
    params(("id" = String, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Billing items and totals for the patient", body = BillingListRes),
        (status = 404, description = "Unknown patient")
    )
)]
pub async fn patient_billing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<BillingListRes> {
    let services = &state.services;
    services
        .require_patient(&id)
        .map_err(|e| core_error("patient billing", e))?;
    let items = services
        .ledger
        .items_for_patient(&id)
        .map_err(|e| core_error("patient billing", e))?;
    let summary = services
        .ledger
        .summary(Some(&id))
        .map_err(|e| core_error("patient billing", e))?;
    Ok(Json(BillingListRes {
        items: collect(items),
        summary: summary.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/journal",
    params(("id" = String, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Journal entries, newest first", body = Vec<JournalEntryRes>),
        (status = 404, description = "Unknown patient")
    )
)]
pub async fn patient_journal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<JournalEntryRes>> {
    let services = &state.services;
    services
        .require_patient(&id)
        .map_err(|e| core_error("journal", e))?;
    let entries = services
        .chart
        .journal(&id)
        .map_err(|e| core_error("journal", e))?;
    Ok(Json(collect(entries)))
}

#[utoipa::path(
    post,
    path = "/patients/{id}/journal",
    params(("id" = String, Path, description = "Patient ID")),
    request_body = JournalEntryReq,
    responses(
        (status = 201, description = "Entry added", body = JournalEntryRes),
        (status = 400, description = "Empty text"),
        (status = 404, description = "Unknown patient")
    )
)]
pub async fn add_journal_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<JournalEntryReq>,
) -> Result<(StatusCode, Json<JournalEntryRes>), ApiError> {
    let entry = state
        .services
        .add_journal_entry(&id, &req.text, Local::now().date_naive())
        .map_err(|e| core_error("add journal entry", e))?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/medications",
    params(("id" = String, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Current medications", body = Vec<MedicationRes>),
        (status = 404, description = "Unknown patient")
    )
)]
pub async fn patient_medications(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<MedicationRes>> {
    let services = &state.services;
    services
        .require_patient(&id)
        .map_err(|e| core_error("medications", e))?;
    let medications = services
        .chart
        .medications(&id)
        .map_err(|e| core_error("medications", e))?;
    Ok(Json(collect(medications)))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/reports",
    params(("id" = String, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Attached reports, newest first", body = Vec<ReportRes>),
        (status = 404, description = "Unknown patient")
    )
)]
pub async fn patient_reports(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<ReportRes>> {
    let services = &state.services;
    services
        .require_patient(&id)
        .map_err(|e| core_error("reports", e))?;
    let reports = services
        .chart
        .reports(&id)
        .map_err(|e| core_error("reports", e))?;
    Ok(Json(collect(reports)))
}

// ============================================================================
// APPOINTMENTS
// ============================================================================

#[utoipa::path(
    get,
    path = "/appointments",
    params(("date" = Option<String>, Query, description = "Calendar date, default today")),
    responses(
        (status = 200, description = "Appointments on the date, ordered by time of day", body = AppointmentListRes),
        (status = 400, description = "Unparseable date")
    )
)]
pub async fn appointments_for_date(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> ApiResult<AppointmentListRes> {
    let date = date_or_today(params.date.as_deref())?;
    let appointments = state
        .services
        .schedule
        .appointments_for_date_by_time(date)
        .map_err(|e| core_error("appointments for date", e))?;
    Ok(Json(AppointmentListRes {
        appointments: collect(appointments),
    }))
}

#[utoipa::path(
    get,
    path = "/appointments/upcoming",
    params(("limit" = Option<usize>, Query, description = "Maximum entries, default 10")),
    responses(
        (status = 200, description = "Open appointments from today on, earliest first", body = AppointmentListRes)
    )
)]
pub async fn upcoming_appointments(
    State(state): State<AppState>,
    Query(params): Query<UpcomingParams>,
) -> ApiResult<AppointmentListRes> {
    let appointments = state
        .services
        .schedule
        .upcoming_appointments(params.limit)
        .map_err(|e| core_error("upcoming appointments", e))?;
    Ok(Json(AppointmentListRes {
        appointments: collect(appointments),
    }))
}

#[utoipa::path(
    post,
    path = "/appointments",
    request_body = AppointmentReq,
    responses(
        (status = 201, description = "Appointment created; overlapping appointments are listed", body = SavedAppointmentRes),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Overlaps an existing appointment and double booking is rejected")
    )
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(req): Json<AppointmentReq>,
) -> Result<(StatusCode, Json<SavedAppointmentRes>), ApiError> {
    let services = &state.services;
    let appointment = services
        .create_appointment(req.into())
        .map_err(|e| core_error("create appointment", e))?;
    let conflicts = services
        .schedule
        .find_conflicts(&appointment)
        .map_err(|e| core_error("create appointment", e))?;
    if !conflicts.is_empty() {
        tracing::warn!(
            "appointment {} overlaps {} existing appointment(s)",
            appointment.id,
            conflicts.len()
        );
    }
    Ok((
        StatusCode::CREATED,
        Json(SavedAppointmentRes {
            appointment: appointment.into(),
            conflicts: collect(conflicts),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/appointments/{id}",
    params(("id" = String, Path, description = "Appointment ID")),
    request_body = AppointmentReq,
    responses(
        (status = 200, description = "Appointment replaced", body = SavedAppointmentRes),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Unknown appointment"),
        (status = 409, description = "Overlaps an existing appointment and double booking is rejected")
    )
)]
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AppointmentReq>,
) -> ApiResult<SavedAppointmentRes> {
    let id = parse_id(&id)?;
    let services = &state.services;
    let appointment = services
        .update_appointment(id, req.into())
        .map_err(|e| core_error("update appointment", e))?;
    let conflicts = services
        .schedule
        .find_conflicts(&appointment)
        .map_err(|e| core_error("update appointment", e))?;
    Ok(Json(SavedAppointmentRes {
        appointment: appointment.into(),
        conflicts: collect(conflicts),
    }))
}

#[utoipa::path(
    post,
    path = "/appointments/{id}/status",
    params(("id" = String, Path, description = "Appointment ID")),
    request_body = StatusReq,
    responses(
        (status = 200, description = "Status changed", body = AppointmentRes),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Unknown appointment")
    )
)]
pub async fn set_appointment_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<StatusReq>,
) -> ApiResult<AppointmentRes> {
    let id = parse_id(&id)?;
    let status = req
        .status
        .parse::<AppointmentStatus>()
        .map_err(|e| core_error("set status", e))?;
    let appointment = state
        .services
        .schedule
        .set_status(id, status)
        .map_err(|e| core_error("set status", e))?;
    Ok(Json(appointment.into()))
}

#[utoipa::path(
    delete,
    path = "/appointments/{id}",
    params(("id" = String, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "The removed appointment", body = AppointmentRes),
        (status = 404, description = "Unknown appointment")
    )
)]
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<AppointmentRes> {
    let id = parse_id(&id)?;
    let removed = state
        .services
        .schedule
        .delete_appointment(id)
        .map_err(|e| core_error("delete appointment", e))?;
    Ok(Json(removed.into()))
}

// ============================================================================
// BILLING
// ============================================================================

#[utoipa::path(
    get,
    path = "/billing",
    params(("patient_id" = Option<String>, Query, description = "Restrict to one patient")),
    responses(
        (status = 200, description = "Billing items and totals", body = BillingListRes)
    )
)]
pub async fn list_billing(
    State(state): State<AppState>,
    Query(params): Query<PatientFilterParams>,
) -> ApiResult<BillingListRes> {
    let ledger = &state.services.ledger;
    let patient_id = params.patient_id.as_deref();
    let items = match patient_id {
        Some(patient_id) => ledger.items_for_patient(patient_id),
        None => ledger.all_items(),
    }
    .map_err(|e| core_error("list billing", e))?;
    let summary = ledger
        .summary(patient_id)
        .map_err(|e| core_error("list billing", e))?;
    Ok(Json(BillingListRes {
        items: collect(items),
        summary: summary.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/billing",
    request_body = BillingReq,
    responses(
        (status = 201, description = "Billing item created", body = BillingItemRes),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_billing_item(
    State(state): State<AppState>,
    Json(req): Json<BillingReq>,
) -> Result<(StatusCode, Json<BillingItemRes>), ApiError> {
    let item = state
        .services
        .create_billing_item(req.into())
        .map_err(|e| core_error("create billing item", e))?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

#[utoipa::path(
    put,
    path = "/billing/{id}",
    params(("id" = String, Path, description = "Billing item ID")),
    request_body = BillingReq,
    responses(
        (status = 200, description = "Billing item replaced", body = BillingItemRes),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Unknown billing item")
    )
)]
pub async fn update_billing_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<BillingReq>,
) -> ApiResult<BillingItemRes> {
    let id = parse_id(&id)?;
    let item = state
        .services
        .update_billing_item(id, req.into())
        .map_err(|e| core_error("update billing item", e))?;
    Ok(Json(item.into()))
}

#[utoipa::path(
    delete,
    path = "/billing/{id}",
    params(("id" = String, Path, description = "Billing item ID")),
    responses(
        (status = 200, description = "The removed billing item", body = BillingItemRes),
        (status = 404, description = "Unknown billing item")
    )
)]
pub async fn delete_billing_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<BillingItemRes> {
    let id = parse_id(&id)?;
    let removed = state
        .services
        .ledger
        .delete_item(id)
        .map_err(|e| core_error("delete billing item", e))?;
    Ok(Json(removed.into()))
}

#[utoipa::path(
    post,
    path = "/billing/{id}/paid",
    params(("id" = String, Path, description = "Billing item ID")),
    responses(
        (status = 200, description = "Item marked as paid", body = BillingItemRes),
        (status = 404, description = "Unknown billing item")
    )
)]
pub async fn mark_paid(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<BillingItemRes> {
    let id = parse_id(&id)?;
    let item = state
        .services
        .ledger
        .mark_as_paid(id)
        .map_err(|e| core_error("mark paid", e))?;
    Ok(Json(item.into()))
}

#[utoipa::path(
    get,
    path = "/billing/summary",
    params(("patient_id" = Option<String>, Query, description = "Restrict to one patient")),
    responses(
        (status = 200, description = "Outstanding balance and amount paid in the last month", body = BillingSummaryRes)
    )
)]
pub async fn billing_summary(
    State(state): State<AppState>,
    Query(params): Query<PatientFilterParams>,
) -> ApiResult<BillingSummaryRes> {
    let summary = state
        .services
        .ledger
        .summary(params.patient_id.as_deref())
        .map_err(|e| core_error("billing summary", e))?;
    Ok(Json(summary.into()))
}

// ============================================================================
// SETTINGS
// ============================================================================

#[utoipa::path(
    get,
    path = "/settings",
    responses(
        (status = 200, description = "Current preferences with defaults filled in", body = SettingsRes)
    )
)]
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<SettingsRes> {
    let settings = state
        .services
        .preferences
        .load()
        .map_err(|e| core_error("load settings", e))?;
    Ok(Json(settings.into()))
}

#[utoipa::path(
    put,
    path = "/settings",
    request_body = SettingsReq,
    responses(
        (status = 200, description = "Preferences saved", body = SettingsRes),
        (status = 400, description = "Invalid value")
    )
)]
pub async fn put_settings(
    State(state): State<AppState>,
    Json(req): Json<SettingsReq>,
) -> ApiResult<SettingsRes> {
    let settings = Settings {
        theme: req
            .theme
            .parse::<Theme>()
            .map_err(|e| core_error("save settings", e))?,
        font_style: req
            .font_style
            .parse::<FontStyle>()
            .map_err(|e| core_error("save settings", e))?,
        text_size: req.text_size,
        language: req.language.trim().to_ascii_lowercase(),
    };
    state
        .services
        .preferences
        .save(&settings)
        .map_err(|e| core_error("save settings", e))?;
    Ok(Json(settings.into()))
}

// ============================================================================
// TRANSCRIPTS
// ============================================================================

#[utoipa::path(
    post,
    path = "/transcripts",
    request_body(content = TranscriptForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "Transcript recorded", body = MessageRes),
        (status = 400, description = "Empty transcript")
    )
)]
/// Receive a dictated transcript as a form post with a single `text` field.
pub async fn submit_transcript(
    State(state): State<AppState>,
    Form(form): Form<TranscriptForm>,
) -> Result<(StatusCode, Json<MessageRes>), ApiError> {
    state
        .services
        .transcripts
        .record(&form.text)
        .map_err(|e| core_error("submit transcript", e))?;
    Ok((
        StatusCode::CREATED,
        Json(MessageRes {
            message: "Transcript received".into(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/transcripts",
    responses(
        (status = 200, description = "Submitted transcripts, oldest first", body = Vec<TranscriptRes>)
    )
)]
pub async fn transcript_history(State(state): State<AppState>) -> ApiResult<Vec<TranscriptRes>> {
    let entries = state
        .services
        .transcripts
        .entries()
        .map_err(|e| core_error("transcript history", e))?;
    Ok(Json(collect(entries)))
}
