//! Shared HTTP plumbing for the area routers: resolving the calling actor
//! from the `x-actor` header and translating the common error kinds into
//! responses.
//!
//! The denied body is a deliberately fixed signal: clients learn that access
//! was denied, never which permission was missing.

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::access::{AccessDenied, Actor, ActorId};
use crate::admin::repository::ActorRepository;
use crate::repository::RepositoryError;
use crate::validation::ValidationError;

pub(crate) const ACTOR_HEADER: &str = "x-actor";

/// Resolve the calling actor from the `x-actor` header. Any failure here is
/// an authentication problem (401), distinct from permission denials (403).
pub(crate) fn current_actor<S: ActorRepository>(
    store: &S,
    headers: &HeaderMap,
) -> Result<Actor, Response> {
    let raw = match headers.get(ACTOR_HEADER) {
        Some(value) => value,
        None => return Err(unauthorized("actor header missing")),
    };
    let id = raw
        .to_str()
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .ok_or_else(|| unauthorized("actor header must be a numeric id"))?;

    match store.fetch_actor(ActorId(id)) {
        Ok(Some(actor)) => Ok(actor),
        Ok(None) => Err(unauthorized("unknown actor")),
        Err(error) => Err(repository_response(&error)),
    }
}

fn unauthorized(message: &str) -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
}

pub(crate) fn denied_response(_denied: &AccessDenied) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": "access denied" })),
    )
        .into_response()
}

pub(crate) fn validation_response(error: &ValidationError) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "error": "validation failed",
            "fields": error.errors,
        })),
    )
        .into_response()
}

pub(crate) fn repository_response(error: &RepositoryError) -> Response {
    let status = match error {
        RepositoryError::NotFound { .. } => StatusCode::NOT_FOUND,
        RepositoryError::Conflict { .. }
        | RepositoryError::ReferentialConflict { .. }
        | RepositoryError::Serialization => StatusCode::CONFLICT,
        RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": error.to_string() }))).into_response()
}
