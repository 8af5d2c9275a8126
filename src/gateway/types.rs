//! HTTP boundary types: the error envelope and its domain-error conversions.
//!
//! Every failure path in the gateway renders through [`ApiError`], which keeps
//! the status mapping in one place:
//!
//! - validation failure → 400
//! - transport failure (timeout, unreachable) → 502
//! - upstream 400 → 400, upstream 404 → 404, other upstream non-2xx → 502
//! - malformed upstream 200 body → 502
//!
//! Internal detail (raw upstream bodies, transport error strings) is logged
//! where the failure happens and never placed in the envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::classifier::UpstreamRejection;
use crate::dispatcher::TransportError;
use crate::upstream::ShapeError;
use crate::validator::ValidationError;

/// JSON error envelope: `{ "error": string, ["issues": [string]] }`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
}

/// A terminal, client-safe request failure.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub issues: Option<Vec<String>>,
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            issues: None,
        }
    }

    pub fn with_issues(status: StatusCode, error: impl Into<String>, issues: Vec<String>) -> Self {
        Self {
            status,
            error: error.into(),
            issues: Some(issues),
        }
    }

    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            error: self.error,
            issues: self.issues,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::with_issues(
            StatusCode::BAD_REQUEST,
            "Invalid simulation request",
            vec![err.to_string()],
        )
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        // Timeout vs Unreachable is a log-level distinction; clients get one
        // stable message either way.
        let error = match err {
            TransportError::Timeout(_) => "Cannot reach upstream simulation service: timed out",
            TransportError::Unreachable(_) => "Cannot reach upstream simulation service",
        };
        ApiError::new(StatusCode::BAD_GATEWAY, error)
    }
}

impl From<ShapeError> for ApiError {
    fn from(_err: ShapeError) -> Self {
        ApiError::new(StatusCode::BAD_GATEWAY, "Upstream response invalid")
    }
}

impl From<UpstreamRejection> for ApiError {
    fn from(rej: UpstreamRejection) -> Self {
        let status = StatusCode::from_u16(rej.client_status).unwrap_or(StatusCode::BAD_GATEWAY);
        ApiError::new(status, rej.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use std::time::Duration;

    #[test]
    fn test_validation_error_maps_to_400_with_issues() {
        let api: ApiError = ValidationError::MissingField("country_code").into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.error, "Invalid simulation request");
        assert_eq!(
            api.issues.unwrap(),
            vec!["missing required field: country_code".to_string()]
        );
    }

    #[test]
    fn test_transport_errors_map_to_502() {
        let timeout: ApiError = TransportError::Timeout(Duration::from_secs(10)).into();
        assert_eq!(timeout.status, StatusCode::BAD_GATEWAY);
        assert!(timeout.error.contains("timed out"));

        let unreachable: ApiError = TransportError::Unreachable("dns failure".to_string()).into();
        assert_eq!(unreachable.status, StatusCode::BAD_GATEWAY);
        // transport detail is not echoed
        assert!(!unreachable.error.contains("dns failure"));
    }

    #[test]
    fn test_shape_error_maps_to_502_fixed_message() {
        let api: ApiError = ShapeError::MissingRequiredField("composite").into();
        assert_eq!(api.status, StatusCode::BAD_GATEWAY);
        assert_eq!(api.error, "Upstream response invalid");
    }

    #[test]
    fn test_rejection_statuses_pass_through() {
        let api: ApiError = classify(400, br#"{"detail": "bad input"}"#).into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.error, "bad input");

        let api: ApiError = classify(404, b"").into();
        assert_eq!(api.status, StatusCode::NOT_FOUND);

        let api: ApiError = classify(500, b"boom").into();
        assert_eq!(api.status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_envelope_omits_issues_when_absent() {
        let json = serde_json::to_value(ErrorEnvelope {
            error: "Method not allowed".to_string(),
            issues: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"error": "Method not allowed"}));
    }
}
