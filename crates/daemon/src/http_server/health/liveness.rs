use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;

use crate::version::build_info;

#[tracing::instrument]
pub async fn handler() -> Response {
    let msg = serde_json::json!({"status": "ok", "build": build_info()});
    (StatusCode::OK, Json(msg)).into_response()
}
