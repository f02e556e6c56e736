use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use super::service::DashboardError;
use crate::context::AppContext;
use crate::http::{current_actor, denied_response, repository_response};
use crate::store::Stores;

/// Router builder for the dashboard summary.
pub fn dashboard_router<S: Stores>(context: Arc<AppContext<S>>) -> Router {
    Router::new()
        .route("/api/v1/dashboard", get(dashboard_handler::<S>))
        .with_state(context)
}

fn error_response(error: &DashboardError) -> Response {
    match error {
        DashboardError::Denied(denied) => denied_response(denied),
        DashboardError::Repository(repository) => repository_response(repository),
    }
}

pub(crate) async fn dashboard_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    headers: HeaderMap,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context.dashboard().summary(&actor) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => error_response(&error),
    }
}
