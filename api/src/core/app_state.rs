use std::sync::Arc;

use agp_gateway::GatewayStatus;
use reviewer::CodeReviewer;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The review service both transports dispatch to.
    pub reviewer: Arc<CodeReviewer>,
    /// Registration outcome of the secondary transport; written once by the
    /// registrar task, read-only here.
    pub gateway: Arc<GatewayStatus>,
}
