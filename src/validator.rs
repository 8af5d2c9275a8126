//! Request validator: untyped client JSON in, `ValidatedRequest` out.
//!
//! This is the only place where the inbound contract is enforced. Validation
//! is two-stage in spirit (shape first, then domain rules), mirrors the wire
//! slugs defined in [`crate::contract`], and fails fast on the first
//! violation. It is a pure function over its input: no I/O, no clock.

use serde_json::Value;
use thiserror::Error;

use crate::contract::{AdjustmentMap, CanonicalAxis, CountryCode, MAX_ADJUSTMENT};

/// Client-side request rejection. Always maps to HTTP 400.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("request body must be a JSON object")]
    MalformedBody,

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("country_code must be exactly two ASCII letters, got {0:?}")]
    InvalidCountryCode(String),

    #[error("unknown adjustment axis: {0:?}")]
    UnknownAxis(String),

    #[error("adjustment for {0} must be a JSON number")]
    NonNumericAdjustment(CanonicalAxis),

    #[error("adjustment for {axis} is {value}, allowed range is [-{limit}, +{limit}]")]
    OutOfRange {
        axis: CanonicalAxis,
        value: f64,
        limit: f64,
    },

    #[error("adjustments must contain at least one axis")]
    EmptyAdjustments,
}

/// A request that passed every inbound gate. Exists only between validation
/// and dispatch; owned exclusively by its request.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub country: CountryCode,
    pub adjustments: AdjustmentMap,
    /// Opaque client metadata, forwarded verbatim. Defaults to `{}`.
    pub meta: Value,
}

/// Validate a raw client payload.
///
/// Rejections are hard: an unknown axis key fails the whole request rather
/// than being dropped, so a score the user believes covers N axes can never
/// silently cover fewer.
pub fn validate(raw: &Value) -> Result<ValidatedRequest, ValidationError> {
    let obj = raw.as_object().ok_or(ValidationError::MalformedBody)?;

    let country_raw = obj
        .get("country_code")
        .ok_or(ValidationError::MissingField("country_code"))?;
    let country_str = country_raw
        .as_str()
        .ok_or_else(|| ValidationError::InvalidCountryCode(country_raw.to_string()))?;
    let country = CountryCode::parse(country_str)
        .ok_or_else(|| ValidationError::InvalidCountryCode(country_str.to_string()))?;

    // Absent and present-but-not-an-object are the same defect: there is no
    // adjustment container to read.
    let raw_adjustments = obj
        .get("adjustments")
        .and_then(Value::as_object)
        .ok_or(ValidationError::MissingField("adjustments"))?;

    let mut adjustments = AdjustmentMap::new();
    for (key, value) in raw_adjustments {
        let axis = CanonicalAxis::from_slug(key)
            .ok_or_else(|| ValidationError::UnknownAxis(key.clone()))?;
        let delta = value
            .as_f64()
            .ok_or(ValidationError::NonNumericAdjustment(axis))?;
        if !(-MAX_ADJUSTMENT..=MAX_ADJUSTMENT).contains(&delta) {
            return Err(ValidationError::OutOfRange {
                axis,
                value: delta,
                limit: MAX_ADJUSTMENT,
            });
        }
        adjustments.insert(axis, delta);
    }

    // Partial maps are fine; an empty one means there is nothing to simulate.
    if adjustments.is_empty() {
        return Err(ValidationError::EmptyAdjustments);
    }

    let meta = obj
        .get("meta")
        .cloned()
        .unwrap_or_else(|| Value::Object(Default::default()));

    Ok(ValidatedRequest {
        country,
        adjustments,
        meta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_minimal_request() {
        let raw = json!({"country_code": "SE", "adjustments": {"energy": 0.05}});
        let req = validate(&raw).unwrap();
        assert_eq!(req.country.as_str(), "SE");
        assert_eq!(req.adjustments.len(), 1);
        assert_eq!(req.adjustments[&CanonicalAxis::Energy], 0.05);
        assert_eq!(req.meta, json!({}));
    }

    #[test]
    fn test_validate_is_deterministic() {
        let raw = json!({
            "country_code": "de",
            "adjustments": {"finance": -0.1, "food": 0.0},
            "meta": {"source": "dashboard"}
        });
        let a = validate(&raw).unwrap();
        let b = validate(&raw).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_validate_normalizes_country_case() {
        let raw = json!({"country_code": "se", "adjustments": {"defense": 0.1}});
        assert_eq!(validate(&raw).unwrap().country.as_str(), "SE");
    }

    #[test]
    fn test_non_object_body_is_malformed() {
        for raw in [json!([1, 2]), json!("text"), json!(42), json!(null)] {
            assert_eq!(validate(&raw), Err(ValidationError::MalformedBody));
        }
    }

    #[test]
    fn test_missing_country_code() {
        let raw = json!({"adjustments": {"energy": 0.05}});
        assert_eq!(
            validate(&raw),
            Err(ValidationError::MissingField("country_code"))
        );
    }

    #[test]
    fn test_missing_adjustments_container() {
        let raw = json!({"country_code": "SE"});
        assert_eq!(
            validate(&raw),
            Err(ValidationError::MissingField("adjustments"))
        );
    }

    #[test]
    fn test_adjustments_wrong_type_counts_as_missing() {
        let raw = json!({"country_code": "SE", "adjustments": [0.05]});
        assert_eq!(
            validate(&raw),
            Err(ValidationError::MissingField("adjustments"))
        );
    }

    #[test]
    fn test_invalid_country_code() {
        let raw = json!({"country_code": "SWE", "adjustments": {"energy": 0.05}});
        assert!(matches!(
            validate(&raw),
            Err(ValidationError::InvalidCountryCode(_))
        ));
    }

    #[test]
    fn test_unknown_axis_is_hard_rejection() {
        // A single bad key fails the request even when every other key is fine.
        let raw = json!({
            "country_code": "SE",
            "adjustments": {"energy": 0.05, "cyber": 0.01}
        });
        assert_eq!(
            validate(&raw),
            Err(ValidationError::UnknownAxis("cyber".to_string()))
        );
    }

    #[test]
    fn test_all_six_axes_accepted() {
        let raw = json!({
            "country_code": "SE",
            "adjustments": {
                "energy": 0.01, "defense": -0.01, "raw_materials": 0.0,
                "technology": 0.2, "finance": -0.2, "food": 0.1
            }
        });
        let req = validate(&raw).unwrap();
        assert_eq!(req.adjustments.len(), 6);
    }

    #[test]
    fn test_range_boundary_inclusive() {
        let at_limit = json!({"country_code": "SE", "adjustments": {"energy": 0.20}});
        assert!(validate(&at_limit).is_ok());
        let at_neg_limit = json!({"country_code": "SE", "adjustments": {"energy": -0.20}});
        assert!(validate(&at_neg_limit).is_ok());
    }

    #[test]
    fn test_range_exceeded() {
        let raw = json!({"country_code": "SE", "adjustments": {"energy": 0.21}});
        assert!(matches!(
            validate(&raw),
            Err(ValidationError::OutOfRange { .. })
        ));
        let raw = json!({"country_code": "SE", "adjustments": {"energy": -0.3}});
        assert!(matches!(
            validate(&raw),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_non_numeric_adjustment() {
        let raw = json!({"country_code": "SE", "adjustments": {"energy": "0.05"}});
        assert_eq!(
            validate(&raw),
            Err(ValidationError::NonNumericAdjustment(CanonicalAxis::Energy))
        );
    }

    #[test]
    fn test_empty_adjustments_rejected() {
        let raw = json!({"country_code": "SE", "adjustments": {}});
        assert_eq!(validate(&raw), Err(ValidationError::EmptyAdjustments));
    }

    #[test]
    fn test_meta_passes_through_verbatim() {
        let raw = json!({
            "country_code": "SE",
            "adjustments": {"energy": 0.05},
            "meta": {"contract": "v1", "nested": {"k": [1, 2]}}
        });
        let req = validate(&raw).unwrap();
        assert_eq!(req.meta, json!({"contract": "v1", "nested": {"k": [1, 2]}}));
    }
}
