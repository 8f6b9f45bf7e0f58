use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Echoes the caller's `X-Request-Id` on the response, minting one when the
/// request carried none. The id stays in the header only, never in the body.
pub async fn ensure_request_id(req: Request<Body>, next: Next) -> Response {
    let incoming = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map(str::to_owned);

    let mut res = next.run(req).await;

    let id = incoming.unwrap_or_else(|| {
        let nanos = Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
        format!("req-{nanos}")
    });
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}
