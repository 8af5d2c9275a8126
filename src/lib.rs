//! Scenario Simulation Gateway
//!
//! A same-origin mediator for "what-if" simulation of a country's
//! strategic-axis concentration scores. Per request, stages run strictly in
//! order:
//!
//! ```text
//! ┌──────────┐    ┌──────────┐    ┌─────────────┐    ┌───────────┐
//! │ Validate │───▶│ Dispatch │───▶│ Classify /  │───▶│ Transform │
//! │ (client) │    │(upstream)│    │ Shape-check │    │ (baseline)│
//! └──────────┘    └──────────┘    └─────────────┘    └───────────┘
//! ```
//!
//! # Modules
//!
//! - [`contract`] - Canonical axis and classification enums, bounds
//! - [`validator`] - Client request validation and canonicalization
//! - [`dispatcher`] - The single outbound call: timeout, no retries
//! - [`classifier`] - Non-2xx upstream outcomes → closed error taxonomy
//! - [`upstream`] - Shape validation of upstream success bodies
//! - [`transform`] - Pure baseline/delta derivation
//! - [`gateway`] - Axum router, handlers, error envelope
//!
//! No cross-request state: every request owns its own graph of values and
//! the only suspension point is the dispatcher's outbound call.

// Contract first: everything else speaks its types.
pub mod contract;

// Per-request pipeline stages
pub mod classifier;
pub mod dispatcher;
pub mod transform;
pub mod upstream;
pub mod validator;

// HTTP surface and process plumbing
pub mod config;
pub mod gateway;
pub mod logging;

// Convenient re-exports at crate root
pub use classifier::{RejectionKind, UpstreamRejection, classify};
pub use contract::{AdjustmentMap, CanonicalAxis, Classification, CountryCode, MAX_ADJUSTMENT};
pub use dispatcher::{Dispatcher, RawUpstreamResponse, TransportError, UpstreamPayload};
pub use transform::{ClientResponse, SimulatedAxis, transform};
pub use upstream::{AxisResult, ShapeError, ValidatedUpstreamResponse, validate_response};
pub use validator::{ValidatedRequest, ValidationError, validate};
