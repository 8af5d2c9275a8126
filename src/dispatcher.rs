//! Upstream dispatcher: the single suspension point of a request.
//!
//! Issues exactly one outbound POST per call. There is no retry loop and no
//! backoff: the upstream simulation is treated as non-idempotent, so "at most
//! one upstream side effect per client request" is an invariant here, not a
//! tuning choice. A non-2xx status is NOT a transport error — it is a valid
//! response that flows to the classifier.

use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::contract::AdjustmentMap;
use crate::validator::ValidatedRequest;

/// The exact JSON object sent upstream: a pure projection of the validated
/// request. Nothing is added, nothing is dropped.
#[derive(Debug, Serialize)]
pub struct UpstreamPayload<'a> {
    country_code: &'a str,
    adjustments: &'a AdjustmentMap,
    meta: &'a Value,
}

impl<'a> UpstreamPayload<'a> {
    pub fn from_request(req: &'a ValidatedRequest) -> Self {
        Self {
            country_code: req.country.as_str(),
            adjustments: &req.adjustments,
            meta: &req.meta,
        }
    }
}

/// Any HTTP response the upstream produced, success or not. Status routing
/// (2xx → shape validation, other → classification) happens in the handler.
#[derive(Debug)]
pub struct RawUpstreamResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Failure to obtain any HTTP response at all. Always maps to 502.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("upstream simulation timed out after {0:?}")]
    Timeout(Duration),

    #[error("upstream simulation unreachable: {0}")]
    Unreachable(String),
}

/// Owns the outbound client and the resolved target URL. Built once at
/// startup; read-only afterwards.
pub struct Dispatcher {
    client: reqwest::Client,
    simulate_url: String,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        // The client-level timeout covers the whole exchange (connect, send,
        // read). On expiry reqwest drops the in-flight connection, so nothing
        // outlives the request that owned it.
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            simulate_url: format!("{}/simulate", base_url.trim_end_matches('/')),
            timeout,
        })
    }

    /// Resolved upstream endpoint, for logging and startup banners.
    pub fn simulate_url(&self) -> &str {
        &self.simulate_url
    }

    /// Issue the one outbound request for this client request.
    pub async fn dispatch(
        &self,
        payload: &UpstreamPayload<'_>,
    ) -> Result<RawUpstreamResponse, TransportError> {
        let started = Instant::now();

        let response = self
            .client
            .post(&self.simulate_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_send_error(e))?
            .to_vec();

        debug!(
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            body_len = body.len(),
            "upstream responded"
        );

        Ok(RawUpstreamResponse { status, body })
    }

    fn map_send_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            warn!(timeout_ms = self.timeout.as_millis() as u64, "upstream timed out");
            TransportError::Timeout(self.timeout)
        } else {
            warn!(error = %err, "upstream unreachable");
            TransportError::Unreachable(err.to_string())
        }
    }
}
