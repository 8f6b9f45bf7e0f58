use crate::error_handler::AppError;

/// `POST /api/v1/runs/stream` — declared for protocol parity, not offered.
pub async fn stream_run_route() -> AppError {
    AppError::NotImplemented("streaming runs are not supported")
}

/// `POST /api/v1/runs/wait` — declared for protocol parity, not offered.
pub async fn wait_run_route() -> AppError {
    AppError::NotImplemented("blocking waits are not supported")
}
