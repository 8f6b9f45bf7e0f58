//! Primary (REST) transport and process wiring.
//!
//! [`start`] builds the shared review service once, binds the HTTP
//! listener, and only then spawns the gateway registrar as a background
//! task. A gateway that never answers leaves the REST surface untouched.

use std::{env, sync::Arc};

pub mod core;
pub mod error_handler;
pub mod middleware_layer;
pub mod routes;

use agp_gateway::{GatewayStatus, RetryPolicy};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use llm_service::{
    chat_model::build_chat_model,
    config::default_config::{BackendEnv, select_backend},
};
use reviewer::CodeReviewer;
use tokio::signal;
use tracing::{info, warn};

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    middleware_layer::request_id::ensure_request_id,
    routes::{
        root_route::root_route,
        runs::{
            create_run_route::create_run_route,
            stub_routes::{stream_run_route, wait_run_route},
        },
    },
};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "8123";
const DEFAULT_AGENT_NAME: &str = "tf_code_reviewer";

/// Builds the full route tree over a ready [`AppState`].
pub fn router(state: AppState) -> Router {
    let runs = Router::new()
        .route("/runs", post(create_run_route))
        .route("/runs/stream", post(stream_run_route))
        .route("/runs/wait", post(wait_run_route));

    Router::new()
        .route("/", get(root_route))
        .nest("/api/v1", runs)
        .layer(middleware::from_fn(ensure_request_id))
        .with_state(state)
}

/// Boots the service: backend selection, listener bind, gateway registrar.
///
/// Backend selection is the only fatal step; a missing or unreachable
/// gateway degrades to REST-only operation.
pub async fn start() -> Result<(), AppError> {
    let backend = select_backend(&BackendEnv::from_env())?;
    let model = build_chat_model(backend)?;

    let reviewer = Arc::new(CodeReviewer::new(model));
    let gateway = Arc::new(GatewayStatus::new());
    let state = AppState {
        reviewer: reviewer.clone(),
        gateway: gateway.clone(),
    };

    let app = router(state);

    let host = env::var("TF_CODE_REVIEWER_HOST").unwrap_or_else(|_| DEFAULT_HOST.into());
    let port = env::var("TF_CODE_REVIEWER_PORT").unwrap_or_else(|_| DEFAULT_PORT.into());
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(AppError::Bind)?;
    info!(%addr, model = reviewer.model_name(), "review service listening");

    // Secondary transport goes up strictly after the primary is bound.
    let endpoint = env::var("AGP_GATEWAY_URL")
        .ok()
        .filter(|v| !v.trim().is_empty());
    let agent = env::var("AGP_AGENT_NAME").unwrap_or_else(|_| DEFAULT_AGENT_NAME.into());
    tokio::spawn(agp_gateway::register(
        endpoint,
        agent,
        RetryPolicy::default(),
        gateway,
        reviewer,
    ));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)
}

/// Resolves when Ctrl+C is received.
async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use agp_gateway::GatewayConnectionState;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use llm_service::{chat_model::ChatModel, error_handler::LlmError};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    struct ScriptedChat {
        reply: String,
    }

    #[async_trait]
    impl ChatModel for ScriptedChat {
        async fn generate(&self, _prompt: &str, _system: Option<&str>) -> Result<String, LlmError> {
            Ok(self.reply.clone())
        }

        fn model_name(&self) -> &str {
            "scripted-model"
        }
    }

    fn app_with_reply(reply: &str) -> (Router, Arc<GatewayStatus>) {
        let gateway = Arc::new(GatewayStatus::new());
        let state = AppState {
            reviewer: Arc::new(CodeReviewer::new(Arc::new(ScriptedChat {
                reply: reply.into(),
            }))),
            gateway: gateway.clone(),
        };
        (router(state), gateway)
    }

    fn post_run(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/runs")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn review_run() -> Value {
        let payload = json!({
            "context_files": [{"path": "variables.tf", "content": "variable \"region\" {}"}],
            "changes": [{"file": "main.tf", "diff": "resource \"aws_s3_bucket\" \"b\" {}"}]
        })
        .to_string();
        json!({
            "agent_id": "test-agent",
            "metadata": {"id": "run-42"},
            "input": {"messages": [{"role": "user", "content": payload}]}
        })
    }

    async fn body_json(res: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn valid_run_returns_filtered_comments() {
        let reply = json!({
            "issues": [
                {"filename": "main.tf", "line_number": 1, "comment": "bucket has no versioning", "status": "added"},
                {"filename": "main.tf", "line_number": 0, "comment": "general note", "status": "added"}
            ]
        })
        .to_string();
        let (app, _) = app_with_reply(&reply);

        let res = app.oneshot(post_run(review_run())).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = body_json(res).await;
        assert_eq!(body["agent_id"], "test-agent");
        assert_eq!(body["model"], "scripted-model");
        assert_eq!(body["metadata"]["id"], "run-42");

        let content = body["output"]["messages"][0]["content"].as_str().unwrap();
        let comments: Vec<Value> = serde_json::from_str(content).unwrap();
        // The file-level (line 0) comment is dropped.
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0]["filename"], "main.tf");
    }

    #[tokio::test]
    async fn run_without_input_field_is_unprocessable() {
        // Valid JSON, but not a run envelope: 422, not 400.
        let (app, _) = app_with_reply(r#"{"issues": []}"#);
        let res = app
            .oneshot(post_run(json!({"agent_id": "a"})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(res).await["error"], "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn non_json_body_is_a_bad_request() {
        let (app, _) = app_with_reply(r#"{"issues": []}"#);
        let res = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/runs")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("not json at all"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(res).await["error"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn run_with_undecodable_message_is_unprocessable() {
        let (app, _) = app_with_reply(r#"{"issues": []}"#);
        let run = json!({
            "input": {"messages": [{"role": "user", "content": "not a review request"}]}
        });
        let res = app.oneshot(post_run(run)).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(res).await["error"], "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn unusable_model_reply_is_a_bad_gateway() {
        let (app, _) = app_with_reply("I could not find any issues, great job!");
        let res = app.oneshot(post_run(review_run())).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(res).await["error"], "MALFORMED_MODEL_REPLY");
    }

    #[tokio::test]
    async fn root_reports_model_and_gateway_state() {
        let (app, _) = app_with_reply(r#"{"issues": []}"#);
        let res = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = body_json(res).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "scripted-model");
        assert_eq!(body["gateway"], "not_attempted");
    }

    #[tokio::test]
    async fn every_response_carries_a_request_id() {
        let (app, _) = app_with_reply(r#"{"issues": []}"#);
        let res = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let id = res.headers().get("X-Request-Id").unwrap().to_str().unwrap();
        assert!(id.starts_with("req-"));
    }

    #[tokio::test]
    async fn caller_request_id_is_echoed_back() {
        let (app, _) = app_with_reply(r#"{"issues": []}"#);
        let res = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("X-Request-Id", "caller-7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.headers().get("X-Request-Id").unwrap(), "caller-7");
    }

    #[tokio::test]
    async fn stream_and_wait_are_not_implemented() {
        for path in ["/api/v1/runs/stream", "/api/v1/runs/wait"] {
            let (app, _) = app_with_reply(r#"{"issues": []}"#);
            let res = app
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri(path)
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from("{}"))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::NOT_IMPLEMENTED);
        }
    }

    #[tokio::test]
    async fn rest_stays_responsive_while_registration_is_abandoned() {
        let (app, gateway) = app_with_reply(r#"{"issues": []}"#);
        let reviewer = Arc::new(CodeReviewer::new(Arc::new(ScriptedChat {
            reply: r#"{"issues": []}"#.into(),
        })));

        // Nothing listens on the discard port; registration must give up.
        let registrar = tokio::spawn(agp_gateway::register(
            Some("127.0.0.1:9".into()),
            DEFAULT_AGENT_NAME.into(),
            RetryPolicy {
                initial_delay: Duration::from_millis(10),
                max_delay: Duration::from_millis(20),
                max_duration: Duration::from_millis(100),
            },
            gateway.clone(),
            reviewer,
        ));

        // One request per backoff interval, throughout the retry window.
        for _ in 0..4 {
            let res = app.clone().oneshot(post_run(review_run())).await.unwrap();
            assert_eq!(res.status(), StatusCode::OK);
            tokio::time::sleep(Duration::from_millis(25)).await;
        }

        registrar.await.unwrap();
        assert_eq!(gateway.state(), GatewayConnectionState::Abandoned);
    }
}
