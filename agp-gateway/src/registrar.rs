//! Startup registration with bounded retry.
//!
//! `Idle → Retrying → { Connected, Abandoned }`. The loop retries with a
//! short doubling delay (1s, then capped at 2s) until the cumulative
//! elapsed time reaches the 10s ceiling. Failed attempts are logged at
//! debug level and never surfaced to any client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reviewer::CodeReviewer;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::{
    client::GatewayClient, error_handler::GatewayError, state::GatewayStatus,
};

/// Bounded backoff policy for the startup window.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound for the per-attempt delay.
    pub max_delay: Duration,
    /// Ceiling on cumulative elapsed time; reaching it means `Abandoned`.
    pub max_duration: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(2),
            max_duration: Duration::from_secs(10),
        }
    }
}

/// One connection attempt, injectable so tests can drive a paused clock.
#[async_trait]
pub trait Connector: Send + Sync {
    type Session: Send + 'static;

    async fn attempt(&self) -> Result<Self::Session, GatewayError>;
}

#[async_trait]
impl Connector for GatewayClient {
    type Session = crate::client::GatewaySession;

    async fn attempt(&self) -> Result<Self::Session, GatewayError> {
        self.connect().await
    }
}

/// Runs the `Retrying` phase: attempts until success or the ceiling.
///
/// Returns `Some(session)` on success, `None` once `policy.max_duration`
/// of cumulative elapsed time has passed without one.
pub async fn connect_with_retry<C: Connector>(
    connector: &C,
    policy: &RetryPolicy,
) -> Option<C::Session> {
    let started = Instant::now();
    let mut delay = policy.initial_delay;
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        match connector.attempt().await {
            Ok(session) => {
                info!(attempt, elapsed_ms = started.elapsed().as_millis() as u64, "gateway connection established");
                return Some(session);
            }
            Err(err) => {
                debug!(attempt, error = %err, "gateway connection attempt failed");
            }
        }

        let elapsed = started.elapsed();
        if elapsed >= policy.max_duration {
            return None;
        }
        // Never sleep past the ceiling.
        sleep(delay.min(policy.max_duration - elapsed)).await;
        delay = (delay * 2).min(policy.max_delay);
    }
}

/// Full startup registration, spawned after the primary transport is bound.
///
/// Resolves the shared [`GatewayStatus`] exactly once, then (on success)
/// pumps gateway messages into the shared reviewer for the rest of the
/// session. Nothing here is fatal to the process.
pub async fn register(
    endpoint: Option<String>,
    agent: String,
    policy: RetryPolicy,
    status: Arc<GatewayStatus>,
    reviewer: Arc<CodeReviewer>,
) {
    let Some(endpoint) = endpoint else {
        info!("no gateway endpoint configured; secondary transport disabled");
        return;
    };

    let client = GatewayClient::new(endpoint.clone(), agent);
    match connect_with_retry(&client, &policy).await {
        Some(session) => {
            status.mark_connected();
            info!(%endpoint, "gateway registration succeeded; serving secondary transport");
            match session.serve(reviewer).await {
                Ok(()) => info!("gateway session closed"),
                Err(err) => warn!(error = %err, "gateway session ended with error"),
            }
        }
        None => {
            status.mark_abandoned();
            warn!(
                %endpoint,
                ceiling_secs = policy.max_duration.as_secs(),
                "gateway unreachable within retry ceiling; continuing REST-only"
            );
        }
    }
}
