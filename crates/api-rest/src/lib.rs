//! # API REST
//!
//! REST API for the clinic services.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON and form bodies, status codes, CORS)
//!
//! All behaviour is delegated to `clinic-core`.

#![warn(rust_2018_idioms)]

pub mod dto;
pub mod error;
pub mod handlers;

use axum::{
    routing::{get, post, put},
    Router,
};
use clinic_core::config::EnvValues;
use clinic_core::{ClinicServices, CoreConfig};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use dto::*;
use handlers::*;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub services: ClinicServices,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_patients,
        search_patients,
        patient_appointments,
        patient_billing,
        patient_journal,
        add_journal_entry,
        patient_medications,
        patient_reports,
        appointments_for_date,
        upcoming_appointments,
        create_appointment,
        update_appointment,
        set_appointment_status,
        delete_appointment,
        list_billing,
        create_billing_item,
        update_billing_item,
        delete_billing_item,
        mark_paid,
        billing_summary,
        get_settings,
        put_settings,
        submit_transcript,
        transcript_history,
    ),
    components(schemas(
        HealthRes,
        PatientRes,
        PatientPageRes,
        PatientListRes,
        AppointmentRes,
        AppointmentListRes,
        SavedAppointmentRes,
        BillingItemRes,
        BillingSummaryRes,
        BillingListRes,
        JournalEntryRes,
        MedicationRes,
        ReportRes,
        SettingsRes,
        TranscriptRes,
        MessageRes,
        AppointmentReq,
        StatusReq,
        BillingReq,
        JournalEntryReq,
        SettingsReq,
        TranscriptForm,
    ))
)]
pub struct ApiDoc;

/// Build the REST router, including Swagger UI at `/swagger-ui`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/patients", get(list_patients))
        .route("/patients/search", get(search_patients))
        .route("/patients/:id/appointments", get(patient_appointments))
        .route("/patients/:id/billing", get(patient_billing))
        .route(
            "/patients/:id/journal",
            get(patient_journal).post(add_journal_entry),
        )
        .route("/patients/:id/medications", get(patient_medications))
        .route("/patients/:id/reports", get(patient_reports))
        .route(
            "/appointments",
            get(appointments_for_date).post(create_appointment),
        )
        .route("/appointments/upcoming", get(upcoming_appointments))
        .route(
            "/appointments/:id",
            put(update_appointment).delete(delete_appointment),
        )
        .route("/appointments/:id/status", post(set_appointment_status))
        .route("/billing", get(list_billing).post(create_billing_item))
        .route("/billing/summary", get(billing_summary))
        .route(
            "/billing/:id",
            put(update_billing_item).delete(delete_billing_item),
        )
        .route("/billing/:id/paid", post(mark_paid))
        .route("/settings", get(get_settings).put(put_settings))
        .route(
            "/transcripts",
            get(transcript_history).post(submit_transcript),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Read the core configuration from the process environment.
///
/// See [`EnvValues`] for the variables consulted.
pub fn config_from_env() -> anyhow::Result<CoreConfig> {
    Ok(CoreConfig::from_env_values(EnvValues::read())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState {
            services: ClinicServices::demo(Arc::new(CoreConfig::default())),
        })
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.clone().oneshot(req).await.expect("request failed");
        let status = res.status();
        let bytes = res
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).expect("request")
    }

    fn json_req(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_patient_pages() {
        let app = app();
        let (status, body) = send(&app, get_req("/patients?page=1&page_size=2")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["patients"][0]["id"], "P1001");
        assert_eq!(body["patients"].as_array().unwrap().len(), 2);

        let (_, body) = send(&app, get_req("/patients?page=9&page_size=5")).await;
        assert!(body["patients"].as_array().unwrap().is_empty());

        let (status, _) = send(&app, get_req("/patients?page=0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, get_req("/patients?scope=mine")).await;
        assert_eq!(body["patients"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_search_short_query_returns_everyone() {
        let app = app();
        let (_, body) = send(&app, get_req("/patients/search?q=jo")).await;
        assert_eq!(body["patients"].as_array().unwrap().len(), 5);

        let (_, body) = send(&app, get_req("/patients/search?q=smi")).await;
        assert_eq!(body["patients"][0]["name"], "Jane Smith");
    }

    #[tokio::test]
    async fn test_unknown_patient_is_404() {
        let (status, _) = send(&app(), get_req("/patients/P9999/journal")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_appointment_and_reject_invalid() {
        let app = app();
        let (status, body) = send(
            &app,
            json_req(
                "POST",
                "/appointments",
                json!({
                    "patient_id": "P1003",
                    "date": "2031-03-04",
                    "time": "11:00 AM",
                    "duration": "45 min",
                    "type": "Follow-up"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["appointment"]["patient_name"], "Michael Johnson");
        assert_eq!(body["appointment"]["duration_minutes"], 45);
        assert!(body["conflicts"].as_array().unwrap().is_empty());

        let (_, listed) = send(&app, get_req("/appointments?date=2031-03-04")).await;
        assert_eq!(listed["appointments"].as_array().unwrap().len(), 1);

        let (status, body) = send(
            &app,
            json_req(
                "POST",
                "/appointments",
                json!({ "patient_id": "P1003", "date": "2031-03-04" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, Value::String("Please select a time".into()));
    }

    #[tokio::test]
    async fn test_delete_unknown_appointment_is_404() {
        let app = app();
        let uri = format!("/appointments/{}", clinic_core::RecordId::new());
        let req = Request::delete(uri).body(Body::empty()).expect("request");
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let req = Request::delete("/appointments/not-an-id")
            .body(Body::empty())
            .expect("request");
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_mark_paid_clears_outstanding() {
        let app = app();
        let (_, body) = send(&app, get_req("/billing?patient_id=P1001")).await;
        assert_eq!(body["summary"]["outstanding"], 150.0);
        let unpaid = body["items"]
            .as_array()
            .unwrap()
            .iter()
            .find(|i| i["paid"] == false)
            .expect("unpaid item")["id"]
            .as_str()
            .unwrap()
            .to_string();

        let req = Request::post(format!("/billing/{unpaid}/paid"))
            .body(Body::empty())
            .expect("request");
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["paid"], true);

        let (_, body) = send(&app, get_req("/billing/summary?patient_id=P1001")).await;
        assert_eq!(body["outstanding"], 0.0);
    }

    #[tokio::test]
    async fn test_settings_round_trip() {
        let app = app();
        let (status, body) = send(
            &app,
            json_req(
                "PUT",
                "/settings",
                json!({
                    "theme": "Dark",
                    "font_style": "Italic",
                    "text_size": 20.0,
                    "language": "fr"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["theme"], "Dark");

        let (_, body) = send(&app, get_req("/settings")).await;
        assert_eq!(body["font_style"], "Italic");
        assert_eq!(body["language"], "fr");

        let (status, _) = send(
            &app,
            json_req(
                "PUT",
                "/settings",
                json!({
                    "theme": "Sepia",
                    "font_style": "Normal",
                    "text_size": 18.0,
                    "language": "en"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_transcript_form_post() {
        let app = app();
        let req = Request::post("/transcripts")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("text=Patient+reports+mild+headache"))
            .expect("request");
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, body) = send(&app, get_req("/transcripts")).await;
        assert_eq!(body[0]["text"], "Patient reports mild headache");
    }
}
