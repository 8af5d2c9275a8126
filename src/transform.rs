//! Transformer: `(ValidatedRequest, ValidatedUpstreamResponse)` → `ClientResponse`.
//!
//! Pure and total — once both inputs are validated there is no failure mode
//! left. Baselines are derived per axis (`baseline = value - delta`);
//! simulated figures pass through verbatim, the gateway never second-guesses
//! the upstream's own scoring. All arithmetic is plain IEEE double; rounding
//! is a presentation concern and does not happen here.

use serde::Serialize;
use utoipa::ToSchema;

use crate::contract::{CanonicalAxis, Classification, CountryCode};
use crate::upstream::ValidatedUpstreamResponse;
use crate::validator::ValidatedRequest;

/// One axis in the client-facing result.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SimulatedAxis {
    pub axis_slug: CanonicalAxis,
    pub baseline: f64,
    pub simulated: f64,
    pub delta: f64,
}

/// The only entity handed back across the system boundary. Constructed fresh
/// per request, never persisted.
///
/// `baseline_rank` and `baseline_classification` are not computed by this
/// version; they serialize as explicit `null`, never omitted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClientResponse {
    pub country: CountryCode,
    pub simulated_axes: Vec<SimulatedAxis>,
    pub simulated_composite: f64,
    pub simulated_rank: u32,
    pub simulated_classification: Classification,
    pub baseline_composite: Option<f64>,
    pub baseline_rank: Option<u32>,
    pub baseline_classification: Option<Classification>,
    pub delta_from_baseline: Option<f64>,
}

/// Build the client response from a validated pair.
pub fn transform(req: &ValidatedRequest, resp: &ValidatedUpstreamResponse) -> ClientResponse {
    let simulated_axes: Vec<SimulatedAxis> = resp
        .axes
        .iter()
        .map(|axis| SimulatedAxis {
            axis_slug: axis.slug,
            baseline: axis.value - axis.delta,
            simulated: axis.value,
            delta: axis.delta,
        })
        .collect();

    // Mean over per-axis baselines; None on an empty axis list so the empty
    // case is null, never a division by zero or NaN.
    let baseline_composite = if simulated_axes.is_empty() {
        None
    } else {
        let sum: f64 = simulated_axes.iter().map(|a| a.baseline).sum();
        Some(sum / simulated_axes.len() as f64)
    };

    let delta_from_baseline = baseline_composite.map(|b| resp.composite - b);

    ClientResponse {
        country: req.country.clone(),
        simulated_axes,
        simulated_composite: resp.composite,
        simulated_rank: resp.rank,
        simulated_classification: resp.classification,
        baseline_composite,
        baseline_rank: None,
        baseline_classification: None,
        delta_from_baseline,
    }
}
