use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use super::domain::PaymentDraft;
use super::service::PaymentError;
use crate::booking::BookingId;
use crate::context::AppContext;
use crate::http::{current_actor, denied_response, repository_response, validation_response};
use crate::store::Stores;

/// Router builder for the payment ledger: the full listing plus per-booking
/// reads and manual recording.
pub fn payments_router<S: Stores>(context: Arc<AppContext<S>>) -> Router {
    Router::new()
        .route("/api/v1/payments", get(list_payments_handler::<S>))
        .route(
            "/api/v1/bookings/:booking_id/payments",
            get(booking_payments_handler::<S>).post(record_payment_handler::<S>),
        )
        .with_state(context)
}

fn error_response(error: &PaymentError) -> Response {
    match error {
        PaymentError::Denied(denied) => denied_response(denied),
        PaymentError::Validation(validation) => validation_response(validation),
        PaymentError::Repository(repository) => repository_response(repository),
    }
}

pub(crate) async fn list_payments_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    headers: HeaderMap,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context.payments().list(&actor) {
        Ok(payments) => (StatusCode::OK, Json(payments)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn booking_payments_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    Path(booking_id): Path<u64>,
    headers: HeaderMap,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context
        .payments()
        .for_booking(&actor, BookingId(booking_id))
    {
        Ok(payments) => (StatusCode::OK, Json(payments)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn record_payment_handler<S: Stores>(
    State(context): State<Arc<AppContext<S>>>,
    Path(booking_id): Path<u64>,
    headers: HeaderMap,
    Json(draft): Json<PaymentDraft>,
) -> Response {
    let actor = match current_actor(context.store(), &headers) {
        Ok(actor) => actor,
        Err(response) => return response,
    };
    match context
        .payments()
        .record(&actor, BookingId(booking_id), draft)
    {
        Ok(payment) => (StatusCode::CREATED, Json(payment)).into_response(),
        Err(error) => error_response(&error),
    }
}
