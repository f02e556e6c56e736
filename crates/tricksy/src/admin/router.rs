use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use super::repository::{ActorQuery, NewSubadmin};
use super::service::AdminError;
use crate::access::{catalog, PermissionSet};
use crate::context::AppContext;
use crate::http::{current_actor, denied_response, repository_response, validation_response};
use crate::store::Stores;

/// Router builder for account administration and the permission grant set.
pub fn admin_router<S: Stores>(context: Arc<AppContext<S>>) -> Router {
    Router::new()
        .route("/api/v1/actors", get(list_actors_handler::<S>))
        .route(
            "/api/v1/actors/subadmins",
            post(create_subadmin_handler::<S>),
        )
        .route(
            "/api/v1/roles/subadmin/permissions",
            get(subadmin_permissions_handler::<S>).put(set_subadmin_permissions_handler::<S>),
        )
        .route("/api/v1/permissions", get(permission_catalog_handler::<S>))
        .with_state(context)
}

/// Replacement grant set. Codes outside the catalog fail deserialization, so
/// they are rejected at the boundary before the service sees the request.
#[derive(Debug, Deserialize)]
pub(crate) struct GrantsBody {
    pub(crate) permissions: PermissionSet,
}

fn error_response(error: &AdminError) -> Response {
    match error {
        AdminError::Denied(denied) => denied_response(denied),
        AdminError::Validation(validation) => validation_response(validation),
        AdminError::Repository(repository) => repository_response(repository),
    }
}

pub(crate) async fn list_actors_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    Query(query): Query<ActorQuery>,
    headers: HeaderMap,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context.admin().list_actors(&actor, query) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn create_subadmin_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    headers: HeaderMap,
    Json(new): Json<NewSubadmin>,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context.admin().create_subadmin(&actor, new) {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn subadmin_permissions_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    headers: HeaderMap,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context.admin().subadmin_permissions(&actor) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn set_subadmin_permissions_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    headers: HeaderMap,
    Json(body): Json<GrantsBody>,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context
        .admin()
        .set_subadmin_permissions(&actor, body.permissions)
    {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(&error),
    }
}

/// The static code/label catalog. Any authenticated actor may read it; what
/// they can do with the codes is still decided by the grant checks.
pub(crate) async fn permission_catalog_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    headers: HeaderMap,
) -> Response {
    if let Err(response) = current_actor(context.store(), &headers) {
        return response;
    }
    (StatusCode::OK, Json(catalog())).into_response()
}
