use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tokio::time::timeout;

use super::data_source::*;

const READINESS_TIMEOUT: Duration = Duration::from_secs(5);

/// Ready once the database answers. Submissions are refused by the load
/// balancer until then.
#[tracing::instrument]
pub async fn handler(data_src: StateDataSource) -> Response {
    let failure = match timeout(READINESS_TIMEOUT, data_src.is_ready()).await {
        Ok(Ok(())) => {
            return (StatusCode::OK, Json(serde_json::json!({"status": "ok"}))).into_response()
        }
        Ok(Err(DataSourceError::DependencyFailure)) => "database is not available",
        Err(_) => "readiness check timed out",
    };

    let msg = serde_json::json!({"status": "failure", "message": failure});
    (StatusCode::SERVICE_UNAVAILABLE, Json(msg)).into_response()
}
