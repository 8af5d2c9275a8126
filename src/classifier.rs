//! Upstream error classifier: non-2xx statuses mapped onto a closed taxonomy.
//!
//! Decision table (never retried):
//!
//! | Upstream | Kind                  | Client status | Body handling            |
//! |----------|-----------------------|---------------|--------------------------|
//! | 400      | `ClientInputRejected` | 400           | upstream message surfaced|
//! | 404      | `TargetNotFound`      | 404           | fixed message            |
//! | other    | `UpstreamFault`       | 502           | logged, never echoed     |

use serde_json::Value;
use tracing::warn;

/// Max bytes of an upstream body quoted into messages and logs.
const BODY_EXCERPT_LEN: usize = 512;

/// Classification of a non-success upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionKind {
    /// Upstream judged the (already gateway-validated) input unacceptable.
    ClientInputRejected,
    /// Upstream does not know the simulation target.
    TargetNotFound,
    /// Anything else: the upstream failed, the client did not.
    UpstreamFault { status: u16 },
}

/// A classified upstream rejection, ready to render at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRejection {
    pub kind: RejectionKind,
    pub client_status: u16,
    pub message: String,
}

/// Classify a non-2xx upstream response. Must only be invoked for non-2xx
/// statuses; 2xx bodies go to shape validation instead.
pub fn classify(status: u16, body: &[u8]) -> UpstreamRejection {
    match status {
        400 => UpstreamRejection {
            kind: RejectionKind::ClientInputRejected,
            client_status: 400,
            message: extract_message(body),
        },
        404 => UpstreamRejection {
            kind: RejectionKind::TargetNotFound,
            client_status: 404,
            message: "Simulation target not found".to_string(),
        },
        other => {
            // Internal upstream detail stays in the server log.
            warn!(
                upstream_status = other,
                body = %excerpt(body),
                "upstream fault"
            );
            UpstreamRejection {
                kind: RejectionKind::UpstreamFault { status: other },
                client_status: 502,
                message: "Upstream simulation service failed".to_string(),
            }
        }
    }
}

/// Pull a human-readable message out of an upstream 400 body.
///
/// Checks `detail`, `error`, `message` in that priority order; non-JSON or
/// unparseable bodies degrade to their raw text rather than causing a
/// secondary failure.
fn extract_message(body: &[u8]) -> String {
    if let Ok(Value::Object(obj)) = serde_json::from_slice::<Value>(body) {
        for field in ["detail", "error", "message"] {
            if let Some(msg) = obj.get(field).and_then(Value::as_str) {
                return msg.to_string();
            }
        }
    }
    let raw = excerpt(body);
    if raw.is_empty() {
        "Upstream rejected the simulation request".to_string()
    } else {
        raw
    }
}

/// Lossy, bounded rendering of an upstream body for messages and logs.
pub(crate) fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.len() <= BODY_EXCERPT_LEN {
        text.to_string()
    } else {
        let mut cut = BODY_EXCERPT_LEN;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…", &text[..cut])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_400_surfaces_detail_first() {
        let body = br#"{"detail": "unknown country", "error": "nope", "message": "x"}"#;
        let r = classify(400, body);
        assert_eq!(r.kind, RejectionKind::ClientInputRejected);
        assert_eq!(r.client_status, 400);
        assert_eq!(r.message, "unknown country");
    }

    #[test]
    fn test_400_falls_back_error_then_message() {
        let r = classify(400, br#"{"error": "bad axis set"}"#);
        assert_eq!(r.message, "bad axis set");
        let r = classify(400, br#"{"message": "rejected"}"#);
        assert_eq!(r.message, "rejected");
    }

    #[test]
    fn test_400_non_json_body_degrades_to_raw_text() {
        let r = classify(400, b"plain text failure");
        assert_eq!(r.kind, RejectionKind::ClientInputRejected);
        assert_eq!(r.message, "plain text failure");
    }

    #[test]
    fn test_400_empty_body_gets_fixed_message() {
        let r = classify(400, b"");
        assert_eq!(r.message, "Upstream rejected the simulation request");
    }

    #[test]
    fn test_404_fixed_message_body_not_echoed() {
        let r = classify(404, br#"{"detail": "internal path /countries/SE"}"#);
        assert_eq!(r.kind, RejectionKind::TargetNotFound);
        assert_eq!(r.client_status, 404);
        assert_eq!(r.message, "Simulation target not found");
    }

    #[test]
    fn test_other_statuses_become_502_without_leaking_body() {
        for status in [401u16, 403, 409, 422, 429, 500, 503] {
            let r = classify(status, br#"{"detail": "stack trace here"}"#);
            assert_eq!(r.kind, RejectionKind::UpstreamFault { status });
            assert_eq!(r.client_status, 502);
            assert_eq!(r.message, "Upstream simulation service failed");
        }
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let body = "x".repeat(2000);
        let e = excerpt(body.as_bytes());
        assert!(e.len() < body.len());
        assert!(e.ends_with('…'));
    }
}
