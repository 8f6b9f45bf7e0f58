use thiserror::Error;

/// Errors raised by the gateway transport.
///
/// None of these propagate beyond the registrar/serve tasks; they are logged
/// and either retried (inside the startup window) or end the secondary
/// transport quietly.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GatewayError {
    /// TCP connect to the gateway endpoint failed.
    #[error("failed to connect to gateway: {0}")]
    Connect(#[source] std::io::Error),

    /// I/O failure on an established session.
    #[error("gateway i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The gateway actively refused the registration.
    #[error("gateway rejected registration: {0}")]
    Rejected(String),

    /// The gateway answered with something other than the expected frame.
    #[error("gateway protocol violation: {0}")]
    Protocol(&'static str),

    /// A frame could not be encoded/decoded.
    #[error("gateway frame codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// One connection attempt exceeded its per-attempt timeout.
    #[error("gateway connection attempt timed out")]
    AttemptTimeout,
}
