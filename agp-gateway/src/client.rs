//! Line-delimited JSON session against the agent gateway.
//!
//! One frame per line. Session setup is a `register` → `ack` handshake;
//! after that, every inbound frame is a stateless run envelope and every
//! outbound frame is either a `ReviewResponse` or an error reply.

use std::sync::Arc;
use std::time::Duration;

use reviewer::{CodeReviewer, ReviewError, RunCreateStateless};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
};
use tracing::{debug, info, warn};

use crate::{
    error_handler::GatewayError,
    messages::{ControlFrame, ErrorReply},
};

/// Per-attempt budget for connect + handshake.
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(3);

/// Factory for gateway sessions under a fixed endpoint and agent identity.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    endpoint: String,
    agent: String,
}

impl GatewayClient {
    pub fn new(endpoint: impl Into<String>, agent: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            agent: agent.into(),
        }
    }

    /// Connects and registers, bounded by the per-attempt timeout.
    ///
    /// # Errors
    /// - [`GatewayError::Connect`] when the TCP connect fails
    /// - [`GatewayError::Rejected`] when the gateway refuses the agent
    /// - [`GatewayError::AttemptTimeout`] when the attempt budget elapses
    pub async fn connect(&self) -> Result<GatewaySession, GatewayError> {
        tokio::time::timeout(ATTEMPT_TIMEOUT, self.connect_inner())
            .await
            .map_err(|_| GatewayError::AttemptTimeout)?
    }

    async fn connect_inner(&self) -> Result<GatewaySession, GatewayError> {
        let addr = normalize_endpoint(&self.endpoint);
        let stream = TcpStream::connect(addr.as_ref())
            .await
            .map_err(GatewayError::Connect)?;
        let (read_half, write_half) = stream.into_split();
        let mut session = GatewaySession {
            reader: BufReader::new(read_half),
            writer: write_half,
        };

        session
            .send_frame(&ControlFrame::Register {
                agent: self.agent.clone(),
            })
            .await?;

        match session.read_control().await? {
            ControlFrame::Ack => {
                debug!(endpoint = %self.endpoint, agent = %self.agent, "gateway registration acknowledged");
                Ok(session)
            }
            ControlFrame::Error { message } => Err(GatewayError::Rejected(message)),
            ControlFrame::Register { .. } => {
                Err(GatewayError::Protocol("expected ack, got register"))
            }
        }
    }
}

/// Strips an http(s) scheme and any path from the configured gateway URL,
/// leaving `host:port` for the TCP connect.
fn normalize_endpoint(endpoint: &str) -> std::borrow::Cow<'_, str> {
    let stripped = endpoint
        .strip_prefix("http://")
        .or_else(|| endpoint.strip_prefix("https://"))
        .unwrap_or(endpoint);
    match stripped.find('/') {
        Some(idx) => std::borrow::Cow::Borrowed(&stripped[..idx]),
        None => std::borrow::Cow::Borrowed(stripped),
    }
}

/// An established, registered gateway session.
#[derive(Debug)]
pub struct GatewaySession {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl GatewaySession {
    /// Pumps run envelopes from the gateway into the shared reviewer until
    /// the gateway closes the connection.
    ///
    /// Per-message failures are answered with an [`ErrorReply`] frame and do
    /// not end the session; only I/O errors do.
    pub async fn serve(mut self, reviewer: Arc<CodeReviewer>) -> Result<(), GatewayError> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self.reader.read_line(&mut line).await?;
            if read == 0 {
                info!("gateway closed the session");
                return Ok(());
            }
            let frame = line.trim();
            if frame.is_empty() {
                continue;
            }

            let reply = match serde_json::from_str::<RunCreateStateless>(frame) {
                Ok(run) => match reviewer.handle_run(&run).await {
                    Ok(response) => serde_json::to_string(&response)?,
                    Err(err) => {
                        warn!(error = %err, "gateway run failed");
                        error_reply(status_for(&err), &err.to_string())?
                    }
                },
                Err(err) => {
                    warn!(error = %err, "undecodable gateway frame");
                    error_reply(422, &format!("invalid run envelope: {err}"))?
                }
            };

            self.send_line(&reply).await?;
        }
    }

    async fn send_frame(&mut self, frame: &ControlFrame) -> Result<(), GatewayError> {
        let encoded = serde_json::to_string(frame)?;
        self.send_line(&encoded).await
    }

    async fn send_line(&mut self, line: &str) -> Result<(), GatewayError> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn read_control(&mut self) -> Result<ControlFrame, GatewayError> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line).await?;
        if read == 0 {
            return Err(GatewayError::Protocol("gateway closed during handshake"));
        }
        Ok(serde_json::from_str(line.trim())?)
    }
}

fn error_reply(status: u16, message: &str) -> Result<String, GatewayError> {
    Ok(serde_json::to_string(&ErrorReply {
        error: status,
        message: message.to_string(),
    })?)
}

/// Maps per-run failures onto the numeric codes the REST transport uses.
fn status_for(err: &ReviewError) -> u16 {
    match err {
        ReviewError::EmptyRun | ReviewError::InvalidPayload(_) => 422,
        ReviewError::Llm(_) | ReviewError::MalformedReply(_) => 502,
        _ => 500,
    }
}
