use std::collections::BTreeSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::domain::{
    AssignmentRequest, Booking, BookingDraft, BookingId, BookingUpdate, CustomerRef, LineItem,
};
use super::repository::{BookingChanges, BookingRepository, CustomerSource, NewBooking};
use crate::access::{AccessDenied, AccessGuard, Actor, Permission, RolePermissionStore};
use crate::directory::{CleanerRepository, CustomerRepository, ServiceRepository};
use crate::payments::{Payment, PaymentDraft};
use crate::repository::{Page, PageRequest, RepositoryError};
use crate::validation::ValidationError;

/// Error raised by booking operations.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error(transparent)]
    Denied(#[from] AccessDenied),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result of a successful assignment run: the booking with its replaced
/// cleaner set and the payment appended for it.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentOutcome {
    pub booking: Booking,
    pub payment: Payment,
}

/// Derived figures for one booking, computed against the live service
/// catalog at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookingTotals {
    pub required_cleaners: u32,
    pub total_amount: Decimal,
}

/// How many fresh references to try when an insert collides on one. Eight
/// hex characters collide rarely enough that a second attempt is already
/// paranoia.
const MAX_REFERENCE_ATTEMPTS: u32 = 4;

fn generate_reference() -> String {
    let token = Uuid::new_v4().simple().to_string();
    format!("BK-{}", token[..8].to_uppercase())
}

/// Booking creation, editing, and the cleaner-assignment workflow.
///
/// Mutations sit behind the configured guard points; reads sit behind
/// `view_bookings`. Historically assignment shared the booking-mutation
/// permission even though a dedicated `assign_cleaners` code exists in the
/// catalog, so both entry points are wired through [`AccessGuard::points`]
/// instead of hard-coding either code.
pub struct BookingService<S> {
    store: Arc<S>,
    guard: AccessGuard<S>,
}

impl<S> Clone for BookingService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<S> BookingService<S>
where
    S: BookingRepository
        + CustomerRepository
        + CleanerRepository
        + ServiceRepository
        + RolePermissionStore
        + 'static,
{
    pub fn new(store: Arc<S>, guard: AccessGuard<S>) -> Self {
        let points = guard.points();
        info!(
            booking_mutation = points.booking_mutation.code(),
            cleaner_assignment = points.cleaner_assignment.code(),
            "booking service guard points active"
        );
        Self { store, guard }
    }

    /// Create a booking with its line items (and, when the draft carries one,
    /// its customer) in a single transaction. The reference is generated
    /// here and never changes afterwards; a collision with an existing
    /// booking retries with a fresh token a bounded number of times.
    pub fn create(&self, actor: &Actor, draft: BookingDraft) -> Result<Booking, BookingError> {
        let permission = self.guard.points().booking_mutation;
        self.guard.protect(actor, permission, || {
            draft.validate()?;

            let customer = match &draft.customer {
                CustomerRef::Existing(id) => {
                    self.store
                        .fetch_customer(*id)?
                        .ok_or(RepositoryError::NotFound { entity: "customer" })?;
                    CustomerSource::Existing(*id)
                }
                CustomerRef::New(customer_draft) => CustomerSource::New(customer_draft.clone()),
            };

            let line_items: Vec<LineItem> = draft
                .line_items
                .iter()
                .map(|item| LineItem {
                    service_id: item.service_id,
                    cleaner_count: item.cleaner_count,
                })
                .collect();
            for item in &line_items {
                self.store
                    .fetch_service(item.service_id)?
                    .ok_or(RepositoryError::NotFound { entity: "service" })?;
            }

            let mut attempts = 0;
            loop {
                let new = NewBooking {
                    customer: customer.clone(),
                    reference: generate_reference(),
                    schedule: draft.schedule,
                    cleaning_instructions: draft.cleaning_instructions.clone(),
                    special_request: draft.special_request.clone(),
                    entry_instruction: draft.entry_instruction.clone(),
                    created_by: actor.id,
                    line_items: line_items.clone(),
                };
                match self.store.insert_booking(new) {
                    Ok(booking) => {
                        info!(
                            booking = %booking.id,
                            reference = %booking.reference,
                            line_items = booking.line_items.len(),
                            "booking created"
                        );
                        return Ok(booking);
                    }
                    Err(RepositoryError::Conflict {
                        entity: "booking",
                        field: "reference",
                    }) if attempts + 1 < MAX_REFERENCE_ATTEMPTS => {
                        attempts += 1;
                    }
                    Err(other) => return Err(other.into()),
                }
            }
        })
    }

    /// Overwrite a booking's schedule and instructions and apply a batch of
    /// tagged line-item edits. The reference, creator, creation time,
    /// customer link, and current assignment all survive the update.
    pub fn update(
        &self,
        actor: &Actor,
        id: BookingId,
        update: BookingUpdate,
    ) -> Result<Booking, BookingError> {
        let permission = self.guard.points().booking_mutation;
        self.guard.protect(actor, permission, || {
            let booking = self
                .store
                .fetch_booking(id)?
                .ok_or(RepositoryError::NotFound { entity: "booking" })?;

            let line_items = update.resolve_line_items(&booking.line_items)?;
            for item in &line_items {
                if booking.line_item(item.service_id).is_none() {
                    self.store
                        .fetch_service(item.service_id)?
                        .ok_or(RepositoryError::NotFound { entity: "service" })?;
                }
            }

            let updated = self.store.update_booking(
                id,
                BookingChanges {
                    schedule: update.schedule,
                    cleaning_instructions: update.cleaning_instructions,
                    special_request: update.special_request,
                    entry_instruction: update.entry_instruction,
                    line_items,
                },
            )?;
            info!(booking = %updated.id, reference = %updated.reference, "booking updated");
            Ok(updated)
        })
    }

    /// Delete a booking; line items, assignments, and payments go with it.
    pub fn delete(&self, actor: &Actor, id: BookingId) -> Result<(), BookingError> {
        let permission = self.guard.points().booking_mutation;
        self.guard.protect(actor, permission, || {
            self.store.delete_booking(id)?;
            info!(booking = %id, "booking deleted with dependent rows");
            Ok(())
        })
    }

    pub fn get(&self, actor: &Actor, id: BookingId) -> Result<Booking, BookingError> {
        self.guard.protect(actor, Permission::ViewBookings, || {
            self.store
                .fetch_booking(id)?
                .ok_or(RepositoryError::NotFound { entity: "booking" })
                .map_err(BookingError::from)
        })
    }

    /// Bookings, newest first, one page at a time.
    pub fn list(&self, actor: &Actor, page: PageRequest) -> Result<Page<Booking>, BookingError> {
        self.guard.protect(actor, Permission::ViewBookings, || {
            Ok(Page::slice(self.store.list_bookings()?, page))
        })
    }

    /// Required cleaner count and total amount for one booking, priced
    /// against the service catalog as it stands right now.
    pub fn totals(&self, actor: &Actor, id: BookingId) -> Result<BookingTotals, BookingError> {
        self.guard.protect(actor, Permission::ViewBookings, || {
            let booking = self
                .store
                .fetch_booking(id)?
                .ok_or(RepositoryError::NotFound { entity: "booking" })?;
            Ok(BookingTotals {
                required_cleaners: booking.required_cleaners(),
                total_amount: self.total_amount(&booking)?,
            })
        })
    }

    /// Replace a booking's cleaner set and record the payment for it.
    ///
    /// Validation happens up front and reports every problem in one batch:
    /// duplicate cleaners in the list, a count that does not match the
    /// booking's requirement, and a missing payment method. Only a clean
    /// request reaches the store, where the replace-and-pay effect commits
    /// as one transaction. Re-running the workflow replaces the previous set
    /// and appends another payment; it is deliberately not idempotent.
    pub fn assign_cleaners(
        &self,
        actor: &Actor,
        id: BookingId,
        request: AssignmentRequest,
    ) -> Result<AssignmentOutcome, BookingError> {
        let permission = self.guard.points().cleaner_assignment;
        self.guard.protect(actor, permission, || {
            let booking = self
                .store
                .fetch_booking(id)?
                .ok_or(RepositoryError::NotFound { entity: "booking" })?;
            let required = booking.required_cleaners();

            const METHOD_REQUIRED: &str = "must be one of cash, card, or upi";
            let mut errors = ValidationError::new();
            let mut seen = BTreeSet::new();
            if !request.cleaners.iter().all(|cleaner| seen.insert(*cleaner)) {
                errors.push("cleaners", "duplicate cleaner in assignment list");
            }
            if request.cleaners.len() != required as usize {
                errors.push(
                    "cleaners",
                    format!(
                        "booking requires {required} cleaners, {} submitted",
                        request.cleaners.len()
                    ),
                );
            }
            if request.payment_method.is_none() {
                errors.push("payment_method", METHOD_REQUIRED);
            }
            errors.into_result()?;
            let method = request
                .payment_method
                .ok_or_else(|| ValidationError::single("payment_method", METHOD_REQUIRED))?;

            for cleaner in &request.cleaners {
                self.store
                    .fetch_cleaner(*cleaner)?
                    .ok_or(RepositoryError::NotFound { entity: "cleaner" })?;
            }

            let amount = self.total_amount(&booking)?;
            let (booking, payment) = self.store.commit_assignment(
                id,
                request.cleaners,
                PaymentDraft {
                    method,
                    amount,
                    discount: Decimal::ZERO,
                },
            )?;
            info!(
                booking = %booking.id,
                reference = %booking.reference,
                cleaners = booking.assigned_cleaners.len(),
                payment = %payment.id,
                net = %payment.net_amount,
                "cleaners assigned and payment recorded"
            );
            Ok(AssignmentOutcome { booking, payment })
        })
    }

    fn total_amount(&self, booking: &Booking) -> Result<Decimal, BookingError> {
        let mut total = Decimal::ZERO;
        for item in &booking.line_items {
            let service = self
                .store
                .fetch_service(item.service_id)?
                .ok_or(RepositoryError::NotFound { entity: "service" })?;
            total += service.base_price * Decimal::from(item.cleaner_count);
        }
        Ok(total)
    }
}
