use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use reviewer::{ReviewResponse, RunCreateStateless};
use tracing::{debug, instrument};

use crate::{core::app_state::AppState, error_handler::AppResult};

/// HTTP endpoint for one stateless review run.
///
/// The body is a run envelope whose first input message carries a
/// JSON-encoded review request (context files, changes, optional static
/// analyzer report). On success the response echoes the envelope's
/// `agent_id`/`model`/message id and carries the review comments as a
/// JSON-encoded assistant message.
#[instrument(name = "create_run_route", skip(state, payload))]
pub async fn create_run_route(
    State(state): State<AppState>,
    payload: Result<Json<RunCreateStateless>, JsonRejection>,
) -> AppResult<Json<ReviewResponse>> {
    let Json(run) = payload?;
    debug!(
        agent_id = run.agent_id.as_deref().unwrap_or("default-agent"),
        "run accepted"
    );

    let response = state.reviewer.handle_run(&run).await?;
    Ok(Json(response))
}
