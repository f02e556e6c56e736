use super::domain::{Payment, PaymentDraft};
use crate::booking::BookingId;
use crate::repository::RepositoryError;

/// Storage abstraction for the payment ledger.
///
/// `append_payment` materializes the row: it stamps `paid_at`, derives the
/// net amount from the draft, and fails with `NotFound` when the booking does
/// not exist. There is deliberately no update or delete; the ledger only
/// grows.
pub trait PaymentRepository: Send + Sync {
    fn append_payment(
        &self,
        booking_id: BookingId,
        draft: PaymentDraft,
    ) -> Result<Payment, RepositoryError>;
    fn payments_for_booking(&self, booking_id: BookingId) -> Result<Vec<Payment>, RepositoryError>;
    fn list_payments(&self) -> Result<Vec<Payment>, RepositoryError>;
}
