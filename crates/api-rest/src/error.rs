//! Mapping of core errors onto HTTP responses.

use axum::{http::StatusCode, response::Json};
use clinic_core::CoreError;

/// Status code plus a short reason sent as the response body.
pub type ApiError = (StatusCode, String);

pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// Translate a core error for the client.
///
/// Caller mistakes carry their reason text; anything else is logged and reported as an
/// internal error without detail.
pub fn core_error(context: &str, e: CoreError) -> ApiError {
    match &e {
        CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
        CoreError::Validation(reason) => (StatusCode::BAD_REQUEST, reason.to_string()),
        CoreError::InvalidInput(_) | CoreError::Text(_) | CoreError::Uuid(_) => {
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        CoreError::DuplicateRecord { .. } | CoreError::ScheduleConflict { .. } => {
            (StatusCode::CONFLICT, e.to_string())
        }
        _ => {
            tracing::error!("{} error: {:?}", context, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_core::ValidationError;

    #[test]
    fn test_status_codes() {
        let (status, body) = core_error(
            "test",
            CoreError::NotFound {
                kind: "billing item",
                id: "abc".into(),
            },
        );
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "billing item not found: abc");

        let (status, body) = core_error("test", ValidationError::MissingTime.into());
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Please select a time");

        let (status, _) = core_error("test", CoreError::ScheduleConflict { id: "x".into() });
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = core_error("test", CoreError::LockPoisoned);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal error");
    }
}
