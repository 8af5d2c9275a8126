//! OpenAPI / Swagger UI documentation.
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::contract::{CanonicalAxis, Classification};
use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::ErrorEnvelope;
use crate::transform::{ClientResponse, SimulatedAxis};

/// Main API documentation struct.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Scenario Simulation Gateway API",
        version = "1.0.0",
        description = "Same-origin mediator for what-if strategic-axis simulations: validates adjustments, dispatches to the upstream simulation service, and derives baselines and deltas.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::simulate,
        crate::gateway::handlers::health_check,
    ),
    components(
        schemas(
            ClientResponse,
            SimulatedAxis,
            CanonicalAxis,
            Classification,
            ErrorEnvelope,
            HealthResponse,
        )
    ),
    tags(
        (name = "Simulation", description = "What-if simulation of strategic-axis scores"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_generates() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "Scenario Simulation Gateway API");
        assert_eq!(spec.info.version, "1.0.0");
    }

    #[test]
    fn test_endpoints_registered() {
        let spec = ApiDoc::openapi();
        assert!(spec.paths.paths.contains_key("/api/v1/simulate"));
        assert!(spec.paths.paths.contains_key("/api/v1/health"));
    }

    #[test]
    fn test_openapi_json_serializable() {
        let json = ApiDoc::openapi().to_json();
        assert!(json.is_ok());
        assert!(json.unwrap().contains("Scenario Simulation Gateway API"));
    }
}
