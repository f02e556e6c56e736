use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;

use super::domain::{AssignmentRequest, BookingDraft, BookingId, BookingUpdate};
use super::service::BookingError;
use crate::context::AppContext;
use crate::http::{current_actor, denied_response, repository_response, validation_response};
use crate::repository::PageRequest;
use crate::store::Stores;

/// Router builder for booking CRUD, derived totals, and the assignment
/// workflow.
pub fn booking_router<S: Stores>(context: Arc<AppContext<S>>) -> Router {
    Router::new()
        .route(
            "/api/v1/bookings",
            get(list_bookings_handler::<S>).post(create_booking_handler::<S>),
        )
        .route(
            "/api/v1/bookings/:booking_id",
            get(get_booking_handler::<S>)
                .put(update_booking_handler::<S>)
                .delete(delete_booking_handler::<S>),
        )
        .route(
            "/api/v1/bookings/:booking_id/totals",
            get(booking_totals_handler::<S>),
        )
        .route(
            "/api/v1/bookings/:booking_id/assignment",
            put(assign_cleaners_handler::<S>),
        )
        .with_state(context)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BookingListQuery {
    #[serde(default)]
    page: Option<u32>,
}

fn error_response(error: &BookingError) -> Response {
    match error {
        BookingError::Denied(denied) => denied_response(denied),
        BookingError::Validation(validation) => validation_response(validation),
        BookingError::Repository(repository) => repository_response(repository),
    }
}

pub(crate) async fn list_bookings_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    Query(query): Query<BookingListQuery>,
    headers: HeaderMap,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    let page = PageRequest::new(query.page.unwrap_or(1));
    match context.bookings().list(&actor, page) {
        Ok(bookings) => (StatusCode::OK, Json(bookings)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn create_booking_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    headers: HeaderMap,
    Json(draft): Json<BookingDraft>,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context.bookings().create(&actor, draft) {
        Ok(booking) => (StatusCode::CREATED, Json(booking)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn get_booking_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    Path(booking_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context.bookings().get(&actor, BookingId(booking_id)) {
        Ok(booking) => (StatusCode::OK, Json(booking)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn update_booking_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    Path(booking_id): Path<u64>,
    headers: HeaderMap,
    Json(update): Json<BookingUpdate>,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context
        .bookings()
        .update(&actor, BookingId(booking_id), update)
    {
        Ok(booking) => (StatusCode::OK, Json(booking)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn delete_booking_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    Path(booking_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context.bookings().delete(&actor, BookingId(booking_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn booking_totals_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    Path(booking_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context.bookings().totals(&actor, BookingId(booking_id)) {
        Ok(totals) => (StatusCode::OK, Json(totals)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn assign_cleaners_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    Path(booking_id): Path<u64>,
    headers: HeaderMap,
    Json(request): Json<AssignmentRequest>,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context
        .bookings()
        .assign_cleaners(&actor, BookingId(booking_id), request)
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error) => error_response(&error),
    }
}
