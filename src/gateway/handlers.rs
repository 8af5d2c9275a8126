//! Request handlers: the simulate orchestration, health, and 405 fallback.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::classifier::{classify, excerpt};
use crate::dispatcher::UpstreamPayload;
use crate::transform::{transform, ClientResponse};
use crate::upstream::validate_response;
use crate::validator::{validate, ValidationError};

use super::state::AppState;
use super::types::{ApiError, ApiResult};

/// Run one what-if simulation.
///
/// Stages run strictly in order: validate → dispatch → classify-or-validate
/// → transform. Every failure is terminal for its request; nothing is
/// retried and nothing is fatal to the process.
#[utoipa::path(
    post,
    path = "/api/v1/simulate",
    request_body(content = String, description = "Simulation request JSON: {country_code, adjustments, meta?}", content_type = "application/json"),
    responses(
        (status = 200, description = "Simulation result", body = ClientResponse, content_type = "application/json"),
        (status = 400, description = "Invalid request, or upstream rejected the input"),
        (status = 404, description = "Simulation target not found upstream"),
        (status = 502, description = "Upstream unreachable, failed, or returned an invalid body")
    ),
    tag = "Simulation"
)]
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<ClientResponse> {
    let trace_id = Uuid::new_v4();

    // Stage 1: validate and canonicalize the client request.
    let raw: serde_json::Value =
        serde_json::from_slice(&body).map_err(|_| ValidationError::MalformedBody)?;
    let req = validate(&raw).map_err(|e| {
        tracing::info!(%trace_id, error = %e, "simulation request rejected");
        ApiError::from(e)
    })?;
    tracing::info!(
        %trace_id,
        country = %req.country,
        axes = req.adjustments.len(),
        "simulation request accepted"
    );

    // Stage 2: one outbound call, hard timeout, no retries.
    let payload = UpstreamPayload::from_request(&req);
    let upstream = state.dispatcher.dispatch(&payload).await?;

    // Stage 3a: non-2xx flows to the classifier, never to shape validation.
    if !(200..300).contains(&upstream.status) {
        let rejection = classify(upstream.status, &upstream.body);
        tracing::info!(
            %trace_id,
            upstream_status = upstream.status,
            kind = ?rejection.kind,
            "upstream rejected simulation"
        );
        return Err(rejection.into());
    }

    // Stage 3b: a 200 the gateway cannot interpret is a 502, never forwarded.
    let resp = validate_response(&upstream.body).map_err(|e| {
        tracing::warn!(%trace_id, error = %e, body = %excerpt(&upstream.body), "upstream 200 body invalid");
        ApiError::from(e)
    })?;
    resp.check_axis_count(req.adjustments.len()).map_err(|e| {
        tracing::warn!(%trace_id, error = %e, "upstream axis count mismatch");
        ApiError::from(e)
    })?;

    // Stage 4: pure transformation.
    let out = transform(&req, &resp);
    tracing::info!(
        %trace_id,
        upstream_request_id = resp.request_id.as_deref().unwrap_or("-"),
        simulated_composite = out.simulated_composite,
        "simulation complete"
    );
    Ok(Json(out))
}

/// Fixed-body 405 for non-POST methods on the simulate path.
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

/// Health check response data.
#[derive(serde::Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub uptime_s: u64,
}

/// Liveness probe. The upstream is deliberately not pinged here: its failures
/// are classified per request, not surfaced as gateway unhealth.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json")
    ),
    tag = "System"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        uptime_s: state.started.elapsed().as_secs(),
    })
}
