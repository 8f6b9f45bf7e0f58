//! Optional secondary transport: registration with an external agent
//! gateway.
//!
//! The registrar runs once at startup, strictly after the primary (REST)
//! transport is bound, and follows a small state machine:
//!
//! `Idle → Retrying → { Connected, Abandoned }`
//!
//! Every failure in this crate is non-fatal to the process. When the
//! gateway never accepts a session within the retry ceiling, the outcome is
//! recorded as [`state::GatewayConnectionState::Abandoned`] and the service
//! keeps running REST-only for the rest of the process lifetime.

pub mod client;
pub mod error_handler;
pub mod messages;
pub mod registrar;
pub mod state;

pub use client::{GatewayClient, GatewaySession};
pub use error_handler::GatewayError;
pub use registrar::{Connector, RetryPolicy, connect_with_retry, register};
pub use state::{GatewayConnectionState, GatewayStatus};
