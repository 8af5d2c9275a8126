//! Response validator: upstream 200 bodies in, `ValidatedUpstreamResponse` out.
//!
//! Guiding invariant: never forward an upstream response the gateway cannot
//! itself interpret. A 200 with a structurally invalid body is a gateway
//! fault (502), not something to pass along. Partial-but-usable responses
//! are not accepted either — a composite computed over six axes must not be
//! presented as if computed over five.

use serde_json::Value;
use thiserror::Error;

use crate::contract::{CanonicalAxis, Classification};

/// Shape violation in an upstream success body. Always maps to 502.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("upstream body is not valid JSON: {0}")]
    NonJson(String),

    #[error("upstream body missing required field (or wrong type): {0}")]
    MissingRequiredField(&'static str),

    #[error("upstream field {field} invalid: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    #[error("upstream axes[{index}] invalid: {reason}")]
    InvalidAxisEntry { index: usize, reason: String },

    #[error("upstream returned {got} axes, request adjusted {expected}")]
    AxisCountMismatch { expected: usize, got: usize },
}

/// One scored axis from the upstream. Baseline is derived (`value - delta`),
/// never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisResult {
    pub slug: CanonicalAxis,
    pub value: f64,
    pub delta: f64,
}

/// An upstream success body that passed every shape gate.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedUpstreamResponse {
    pub composite: f64,
    pub rank: u32,
    pub classification: Classification,
    pub axes: Vec<AxisResult>,
    pub request_id: Option<String>,
}

impl ValidatedUpstreamResponse {
    /// The axis list must cover exactly the axes the request adjusted.
    pub fn check_axis_count(&self, expected: usize) -> Result<(), ShapeError> {
        if self.axes.len() == expected {
            Ok(())
        } else {
            Err(ShapeError::AxisCountMismatch {
                expected,
                got: self.axes.len(),
            })
        }
    }
}

/// Validate the parsed shape of an upstream 200 body.
pub fn validate_response(body: &[u8]) -> Result<ValidatedUpstreamResponse, ShapeError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ShapeError::NonJson(e.to_string()))?;
    let obj = value
        .as_object()
        .ok_or_else(|| ShapeError::NonJson("not a JSON object".to_string()))?;

    let composite = obj
        .get("composite")
        .and_then(Value::as_f64)
        .ok_or(ShapeError::MissingRequiredField("composite"))?;

    let rank_raw = obj
        .get("rank")
        .and_then(Value::as_u64)
        .ok_or(ShapeError::MissingRequiredField("rank"))?;
    if rank_raw < 1 {
        return Err(ShapeError::InvalidField {
            field: "rank",
            reason: "must be >= 1".to_string(),
        });
    }
    let rank = u32::try_from(rank_raw).map_err(|_| ShapeError::InvalidField {
        field: "rank",
        reason: format!("{rank_raw} exceeds u32"),
    })?;

    let classification_raw = obj
        .get("classification")
        .and_then(Value::as_str)
        .ok_or(ShapeError::MissingRequiredField("classification"))?;
    let classification =
        Classification::from_slug(classification_raw).ok_or_else(|| ShapeError::InvalidField {
            field: "classification",
            reason: format!("unknown band {classification_raw:?}"),
        })?;

    let axes_raw = obj
        .get("axes")
        .and_then(Value::as_array)
        .ok_or(ShapeError::MissingRequiredField("axes"))?;

    let mut axes = Vec::with_capacity(axes_raw.len());
    for (index, entry) in axes_raw.iter().enumerate() {
        axes.push(validate_axis_entry(index, entry)?);
    }

    // request_id is opaque and unused by the transformer; only string values
    // are carried, anything else is dropped rather than rejected.
    let request_id = obj
        .get("request_id")
        .and_then(Value::as_str)
        .map(String::from);

    Ok(ValidatedUpstreamResponse {
        composite,
        rank,
        classification,
        axes,
        request_id,
    })
}

fn validate_axis_entry(index: usize, entry: &Value) -> Result<AxisResult, ShapeError> {
    let invalid = |reason: String| ShapeError::InvalidAxisEntry { index, reason };

    let obj = entry
        .as_object()
        .ok_or_else(|| invalid("not an object".to_string()))?;

    let slug_raw = obj
        .get("slug")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("missing slug".to_string()))?;
    let slug = CanonicalAxis::from_slug(slug_raw)
        .ok_or_else(|| invalid(format!("unknown axis {slug_raw:?}")))?;

    let value = obj
        .get("value")
        .and_then(Value::as_f64)
        .ok_or_else(|| invalid("missing numeric value".to_string()))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(format!("value {value} outside [0, 1]")));
    }

    let delta = obj
        .get("delta")
        .and_then(Value::as_f64)
        .ok_or_else(|| invalid("missing numeric delta".to_string()))?;

    Ok(AxisResult { slug, value, delta })
}
