//! Contract layer: canonical identifiers and bounds shared by every stage.
//!
//! Everything in here is pure data. The six strategic axes and the four
//! classification bands are closed sets; membership checks against them are
//! the primary validation gates for both directions of traffic.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Contract version tag. A future `v2` mounts a sibling router; it does not
/// get a second copy of the validation rules.
pub const CONTRACT_VERSION: &str = "v1";

/// Per-axis adjustments must lie in [-MAX_ADJUSTMENT, +MAX_ADJUSTMENT],
/// boundary inclusive.
pub const MAX_ADJUSTMENT: f64 = 0.20;

/// The six strategic axes the upstream scores independently.
///
/// Closed enumeration: an adjustment key outside this set is a hard
/// rejection, never a filter-and-continue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalAxis {
    Energy,
    Defense,
    RawMaterials,
    Technology,
    Finance,
    Food,
}

impl CanonicalAxis {
    /// All six axes, in canonical order.
    pub const ALL: [CanonicalAxis; 6] = [
        CanonicalAxis::Energy,
        CanonicalAxis::Defense,
        CanonicalAxis::RawMaterials,
        CanonicalAxis::Technology,
        CanonicalAxis::Finance,
        CanonicalAxis::Food,
    ];

    /// Wire slug for this axis.
    pub fn slug(self) -> &'static str {
        match self {
            CanonicalAxis::Energy => "energy",
            CanonicalAxis::Defense => "defense",
            CanonicalAxis::RawMaterials => "raw_materials",
            CanonicalAxis::Technology => "technology",
            CanonicalAxis::Finance => "finance",
            CanonicalAxis::Food => "food",
        }
    }

    /// Resolve a wire slug to an axis. `None` for anything outside the six.
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.slug() == slug)
    }
}

impl fmt::Display for CanonicalAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Adjustment map: axis → bounded delta. BTreeMap keeps serialization order
/// deterministic, which keeps the upstream payload byte-stable for one input.
pub type AdjustmentMap = BTreeMap<CanonicalAxis, f64>;

/// Concentration band derived upstream from a composite score.
///
/// Closed four-value set; an unknown band in an upstream body is a shape
/// error, not a pass-through string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Diversified,
    ModeratelyConcentrated,
    HighlyConcentrated,
    Critical,
}

impl Classification {
    /// Wire slug for this band.
    pub fn slug(self) -> &'static str {
        match self {
            Classification::Diversified => "diversified",
            Classification::ModeratelyConcentrated => "moderately_concentrated",
            Classification::HighlyConcentrated => "highly_concentrated",
            Classification::Critical => "critical",
        }
    }

    /// Resolve a wire slug to a band.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "diversified" => Some(Classification::Diversified),
            "moderately_concentrated" => Some(Classification::ModeratelyConcentrated),
            "highly_concentrated" => Some(Classification::HighlyConcentrated),
            "critical" => Some(Classification::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Two-letter uppercase ISO country code, normalized at validation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CountryCode(String);

impl CountryCode {
    /// Parse and normalize. Accepts exactly two ASCII letters, any case.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(CountryCode(trimmed.to_ascii_uppercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_slug_round_trip() {
        for axis in CanonicalAxis::ALL {
            assert_eq!(CanonicalAxis::from_slug(axis.slug()), Some(axis));
        }
    }

    #[test]
    fn test_axis_unknown_slug() {
        assert_eq!(CanonicalAxis::from_slug("cyber"), None);
        assert_eq!(CanonicalAxis::from_slug("Energy"), None); // case-sensitive
        assert_eq!(CanonicalAxis::from_slug(""), None);
    }

    #[test]
    fn test_axis_serde_slug() {
        let json = serde_json::to_string(&CanonicalAxis::RawMaterials).unwrap();
        assert_eq!(json, r#""raw_materials""#);
        let axis: CanonicalAxis = serde_json::from_str(r#""energy""#).unwrap();
        assert_eq!(axis, CanonicalAxis::Energy);
    }

    #[test]
    fn test_classification_closed_set() {
        assert_eq!(
            Classification::from_slug("moderately_concentrated"),
            Some(Classification::ModeratelyConcentrated)
        );
        assert_eq!(Classification::from_slug("unconcentrated"), None);
    }

    #[test]
    fn test_country_code_normalizes_case() {
        assert_eq!(CountryCode::parse("se").unwrap().as_str(), "SE");
        assert_eq!(CountryCode::parse(" De ").unwrap().as_str(), "DE");
    }

    #[test]
    fn test_country_code_rejects_bad_input() {
        assert!(CountryCode::parse("SWE").is_none());
        assert!(CountryCode::parse("S").is_none());
        assert!(CountryCode::parse("S3").is_none());
        assert!(CountryCode::parse("").is_none());
    }
}
