use std::io::Cursor;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::json;

use super::domain::{CleanerDraft, CleanerId, CustomerDraft, CustomerId, ServiceDraft, ServiceId};
use super::roster::RosterImporter;
use super::service::DirectoryError;
use crate::context::AppContext;
use crate::http::{current_actor, denied_response, repository_response, validation_response};
use crate::store::Stores;

/// Router builder for customers, cleaners (including CSV roster import), and
/// the service catalog.
pub fn directory_router<S: Stores>(context: Arc<AppContext<S>>) -> Router {
    Router::new()
        .route(
            "/api/v1/customers",
            get(list_customers_handler::<S>).post(create_customer_handler::<S>),
        )
        .route(
            "/api/v1/customers/:customer_id",
            get(get_customer_handler::<S>)
                .put(update_customer_handler::<S>)
                .delete(delete_customer_handler::<S>),
        )
        .route(
            "/api/v1/cleaners",
            get(list_cleaners_handler::<S>).post(create_cleaner_handler::<S>),
        )
        .route(
            "/api/v1/cleaners/:cleaner_id",
            put(update_cleaner_handler::<S>).delete(delete_cleaner_handler::<S>),
        )
        .route("/api/v1/cleaners/import", post(import_roster_handler::<S>))
        .route(
            "/api/v1/services",
            get(list_services_handler::<S>).post(create_service_handler::<S>),
        )
        .route(
            "/api/v1/services/:service_id",
            get(get_service_handler::<S>)
                .put(update_service_handler::<S>)
                .delete(delete_service_handler::<S>),
        )
        .with_state(context)
}

fn error_response(error: &DirectoryError) -> Response {
    match error {
        DirectoryError::Denied(denied) => denied_response(denied),
        DirectoryError::Validation(validation) => validation_response(validation),
        DirectoryError::Repository(repository) => repository_response(repository),
    }
}

pub(crate) async fn list_customers_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    headers: HeaderMap,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context.directory().list_customers(&actor) {
        Ok(customers) => (StatusCode::OK, Json(customers)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn create_customer_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    headers: HeaderMap,
    Json(draft): Json<CustomerDraft>,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context.directory().create_customer(&actor, draft) {
        Ok(customer) => (StatusCode::CREATED, Json(customer)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn get_customer_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    Path(customer_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context.directory().get_customer(&actor, CustomerId(customer_id)) {
        Ok(customer) => (StatusCode::OK, Json(customer)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn update_customer_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    Path(customer_id): Path<u64>,
    headers: HeaderMap,
    Json(draft): Json<CustomerDraft>,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context
        .directory()
        .update_customer(&actor, CustomerId(customer_id), draft)
    {
        Ok(customer) => (StatusCode::OK, Json(customer)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn delete_customer_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    Path(customer_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context
        .directory()
        .delete_customer(&actor, CustomerId(customer_id))
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn list_cleaners_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    headers: HeaderMap,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context.directory().list_cleaners(&actor) {
        Ok(cleaners) => (StatusCode::OK, Json(cleaners)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn create_cleaner_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    headers: HeaderMap,
    Json(draft): Json<CleanerDraft>,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context.directory().create_cleaner(&actor, draft) {
        Ok(cleaner) => (StatusCode::CREATED, Json(cleaner)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn update_cleaner_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    Path(cleaner_id): Path<u64>,
    headers: HeaderMap,
    Json(draft): Json<CleanerDraft>,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context
        .directory()
        .update_cleaner(&actor, CleanerId(cleaner_id), draft)
    {
        Ok(cleaner) => (StatusCode::OK, Json(cleaner)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn delete_cleaner_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    Path(cleaner_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context
        .directory()
        .delete_cleaner(&actor, CleanerId(cleaner_id))
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(&error),
    }
}

/// Accepts the roster file as the raw request body. A CSV that does not parse
/// is a 400 before any row validation runs; row problems come back as the
/// usual 422 field list.
pub(crate) async fn import_roster_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    let drafts = match RosterImporter::from_reader(Cursor::new(body.into_bytes())) {
        Ok(drafts) => drafts,
        Err(error) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": error.to_string() })),
            )
                .into_response()
        }
    };
    match context.directory().import_roster(&actor, drafts) {
        Ok(cleaners) => (StatusCode::CREATED, Json(cleaners)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn list_services_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    headers: HeaderMap,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context.directory().list_services(&actor) {
        Ok(services) => (StatusCode::OK, Json(services)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn create_service_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    headers: HeaderMap,
    Json(draft): Json<ServiceDraft>,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context.directory().create_service(&actor, draft) {
        Ok(service) => (StatusCode::CREATED, Json(service)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn get_service_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    Path(service_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context.directory().get_service(&actor, ServiceId(service_id)) {
        Ok(service) => (StatusCode::OK, Json(service)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn update_service_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    Path(service_id): Path<u64>,
    headers: HeaderMap,
    Json(draft): Json<ServiceDraft>,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context
        .directory()
        .update_service(&actor, ServiceId(service_id), draft)
    {
        Ok(service) => (StatusCode::OK, Json(service)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn delete_service_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    Path(service_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context
        .directory()
        .delete_service(&actor, ServiceId(service_id))
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(&error),
    }
}
