use std::sync::OnceLock;

/// Process-wide outcome of the gateway registration attempt.
///
/// Set at most once during the startup window; read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayConnectionState {
    /// Registration was never attempted (no gateway configured, or the
    /// startup window is still open).
    NotAttempted,
    /// The gateway accepted the session; the secondary transport is live.
    Connected,
    /// The retry ceiling elapsed without a session; the secondary transport
    /// is not offered for the rest of the process lifetime.
    Abandoned,
}

impl GatewayConnectionState {
    /// Stable label for banners/diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            GatewayConnectionState::NotAttempted => "not_attempted",
            GatewayConnectionState::Connected => "connected",
            GatewayConnectionState::Abandoned => "abandoned",
        }
    }
}

/// Write-once holder for the registration outcome.
///
/// The single writer (the registrar task) resolves the cell exactly once;
/// readers before that point observe `NotAttempted`. The `OnceLock` makes
/// the write-once invariant structural, so no runtime lock is needed.
#[derive(Debug, Default)]
pub struct GatewayStatus {
    outcome: OnceLock<GatewayConnectionState>,
}

impl GatewayStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state; `NotAttempted` while the cell is unresolved.
    pub fn state(&self) -> GatewayConnectionState {
        self.outcome
            .get()
            .copied()
            .unwrap_or(GatewayConnectionState::NotAttempted)
    }

    /// Resolves the outcome to `Connected`. Later writes are ignored.
    pub fn mark_connected(&self) {
        let _ = self.outcome.set(GatewayConnectionState::Connected);
    }

    /// Resolves the outcome to `Abandoned`. Later writes are ignored.
    pub fn mark_abandoned(&self) {
        let _ = self.outcome.set(GatewayConnectionState::Abandoned);
    }
}
