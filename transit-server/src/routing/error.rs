//! Routing engine errors.

/// Classified failure from a routing engine call.
///
/// Every variant here is a transport-level failure from the composer's point
/// of view and triggers the direct-connection fallback. A successful response
/// carrying zero paths is deliberately *not* an error at this layer.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    /// The request exceeded the configured timeout.
    #[error("routing request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The engine could not be reached at all.
    #[error("could not reach routing engine: {0}")]
    Connection(String),

    /// The engine answered with a non-success status.
    #[error("routing engine returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The engine answered successfully but the body did not parse.
    #[error("could not decode routing response: {0}")]
    Decode(String),
}
