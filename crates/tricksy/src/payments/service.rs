use std::sync::Arc;

use tracing::info;

use super::domain::{Payment, PaymentDraft};
use super::repository::PaymentRepository;
use crate::access::{AccessDenied, AccessGuard, Actor, Permission, RolePermissionStore};
use crate::booking::BookingId;
use crate::repository::RepositoryError;
use crate::validation::ValidationError;

/// Error raised by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error(transparent)]
    Denied(#[from] AccessDenied),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Append-only view over recorded payments, everything behind
/// `manage_payments`.
pub struct PaymentsLedger<S> {
    store: Arc<S>,
    guard: AccessGuard<S>,
}

impl<S> Clone for PaymentsLedger<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            guard: self.guard.clone(),
        }
    }
}

impl<S> PaymentsLedger<S>
where
    S: PaymentRepository + RolePermissionStore + 'static,
{
    pub fn new(store: Arc<S>, guard: AccessGuard<S>) -> Self {
        Self { store, guard }
    }

    /// Record a manual payment against a booking. The net amount is derived
    /// when the store writes the row, so a discount larger than the amount
    /// floors at zero instead of going negative.
    pub fn record(
        &self,
        actor: &Actor,
        booking_id: BookingId,
        draft: PaymentDraft,
    ) -> Result<Payment, PaymentError> {
        self.guard.protect(actor, Permission::ManagePayments, || {
            draft.validate()?;
            let payment = self.store.append_payment(booking_id, draft)?;
            info!(
                payment = %payment.id,
                booking = %payment.booking_id,
                net = %payment.net_amount,
                "payment recorded"
            );
            Ok(payment)
        })
    }

    pub fn for_booking(
        &self,
        actor: &Actor,
        booking_id: BookingId,
    ) -> Result<Vec<Payment>, PaymentError> {
        self.guard.protect(actor, Permission::ManagePayments, || {
            Ok(self.store.payments_for_booking(booking_id)?)
        })
    }

    pub fn list(&self, actor: &Actor) -> Result<Vec<Payment>, PaymentError> {
        self.guard.protect(actor, Permission::ManagePayments, || {
            Ok(self.store.list_payments()?)
        })
    }
}
