use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::core::app_state::AppState;

/// Liveness and status report for the whole service.
///
/// Always `200` once the listener is up, whatever the gateway outcome was:
/// an abandoned registration leaves the REST transport fully functional.
pub async fn root_route(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "agent": "tf_code_reviewer",
        "model": state.reviewer.model_name(),
        "gateway": state.gateway.state().as_str(),
    }))
}
