use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use llm_service::error_handler::LlmError;
use reviewer::ReviewError;
use serde::Serialize;
use thiserror::Error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Llm(#[from] LlmError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unprocessable request: {0}")]
    Unprocessable(String),

    /// The backend answered, but not in a shape we can use.
    #[error("bad upstream reply: {0}")]
    UpstreamReply(String),

    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // startup-only; surfaces as 500 if it ever reaches a handler
            AppError::Llm(LlmError::Config(_)) => StatusCode::INTERNAL_SERVER_ERROR,

            // one failed backend call, scoped to this request
            AppError::Llm(_) | AppError::UpstreamReply(_) => StatusCode::BAD_GATEWAY,

            // 4xx
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,

            // 5xx
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Llm(LlmError::Config(_)) => "CONFIG_ERROR",
            AppError::Llm(_) => "LLM_BACKEND_ERROR",
            AppError::UpstreamReply(_) => "MALFORMED_MODEL_REPLY",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Unprocessable(_) => "UNPROCESSABLE_ENTITY",
            AppError::NotImplemented(_) => "NOT_IMPLEMENTED",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Convert common Axum rejections to `AppError`.
///
/// A body that is not JSON at all is a 400; valid JSON that does not match
/// the run envelope (missing `input`, wrong types) is a 422.
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        use axum::extract::rejection::JsonRejection;
        match err {
            JsonRejection::JsonDataError(e) => AppError::Unprocessable(e.to_string()),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

/// Per-run review failures: undecodable payloads are the caller's fault,
/// backend trouble (including an unusable model reply) is a 502.
impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::EmptyRun | ReviewError::InvalidPayload(_) => {
                AppError::Unprocessable(err.to_string())
            }
            ReviewError::Llm(inner) => AppError::Llm(inner),
            other => AppError::UpstreamReply(other.to_string()),
        }
    }
}
