use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use release::prelude::{SubmitError, Submission};

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseResponse {
    pub release_id: i64,
    pub warnings: Vec<String>,
}

#[tracing::instrument(skip_all)]
pub async fn handler(
    State(state): State<ServiceState>,
    headers: HeaderMap,
    payload: Result<Json<Submission>, JsonRejection>,
) -> Result<impl IntoResponse, ReleaseError> {
    let token = bearer_token(&headers).ok_or(ReleaseError::MissingToken)?;
    let Json(submission) = payload?;
    tracing::info!(build_id = ?submission.build_id, version = ?submission.version, "release submitted");

    let submitted = state.pipeline().submit(&submission, token).await?;

    tracing::info!(
        release_id = submitted.release_id,
        warnings = submitted.warnings.len(),
        "release created"
    );
    Ok((
        StatusCode::CREATED,
        Json(ReleaseResponse {
            release_id: submitted.release_id,
            warnings: submitted.warnings,
        }),
    ))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    #[error("a bearer token is required")]
    MissingToken,
    #[error("Malformed release document: {}", .0.body_text())]
    MalformedDocument(#[from] JsonRejection),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

impl IntoResponse for ReleaseError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ReleaseError::MissingToken => (StatusCode::UNAUTHORIZED, self.to_string()),
            ReleaseError::MalformedDocument(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ReleaseError::Submit(e) => match e {
                SubmitError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                SubmitError::Authorization(msg) => (StatusCode::FORBIDDEN, msg.clone()),
                SubmitError::BuildArtifactGone(_) => (
                    StatusCode::GONE,
                    "The build artifact has already been deleted".to_string(),
                ),
                SubmitError::Artifact(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "The build artifact could not be repackaged".to_string(),
                ),
                SubmitError::Upstream(_) => (
                    StatusCode::BAD_GATEWAY,
                    "Could not verify with source control".to_string(),
                ),
                SubmitError::Resource(_) | SubmitError::Persistence(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                ),
            },
        };

        if status.is_server_error() || status == StatusCode::UNPROCESSABLE_ENTITY {
            tracing::error!("RELEASE ERROR: {:?}", self);
        } else {
            tracing::info!("release rejected: {}", self);
        }
        (status, Json(serde_json::json!({ "msg": msg }))).into_response()
    }
}

/// Client side of the release endpoint
#[derive(Debug, Clone)]
pub struct SubmitReleaseRequest {
    pub token: String,
    pub submission: Submission,
}

impl ApiRequest for SubmitReleaseRequest {
    type Response = ReleaseResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/release")?;
        Ok(client
            .post(full_url)
            .bearer_auth(self.token)
            .json(&self.submission))
    }
}
