use axum::routing::post;
use axum::Router;

pub mod release;

pub use release::{ReleaseResponse, SubmitReleaseRequest};

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/release", post(release::handler))
        .with_state(state)
}
