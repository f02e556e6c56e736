use super::domain::{Booking, BookingId, LineItem, Schedule};
use crate::access::ActorId;
use crate::directory::{CleanerId, CustomerDraft, CustomerId};
use crate::payments::{Payment, PaymentDraft};
use crate::repository::RepositoryError;

/// Customer half of a booking insert: link an existing record or create one
/// in the same transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerSource {
    Existing(CustomerId),
    New(CustomerDraft),
}

/// Fully validated insert payload. The service layer has already checked the
/// draft; the store enforces the data-level constraints (unique reference,
/// one row per service, referenced records exist) and stamps `created_at`.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub customer: CustomerSource,
    pub reference: String,
    pub schedule: Schedule,
    pub cleaning_instructions: String,
    pub special_request: String,
    pub entry_instruction: String,
    pub created_by: ActorId,
    pub line_items: Vec<LineItem>,
}

/// Fully validated update payload: overwrites the schedule, instruction
/// fields, and line-item set while the reference, creator, creation time,
/// customer link, and assignment survive.
#[derive(Debug, Clone)]
pub struct BookingChanges {
    pub schedule: Schedule,
    pub cleaning_instructions: String,
    pub special_request: String,
    pub entry_instruction: String,
    pub line_items: Vec<LineItem>,
}

/// Storage abstraction for bookings and their owned rows.
///
/// Multi-row writes are transactional: `insert_booking` lands the customer
/// (when new), the booking, and every line item or nothing at all;
/// `delete_booking` cascades to line items, assignments, and payments.
///
/// `commit_assignment` is the one compound effect with a concurrency story:
/// it replaces the booking's cleaner set and appends the payment in a single
/// transaction, re-checking under that transaction that the submitted set
/// still matches the booking's required count. When a concurrent edit has
/// moved the requirement it fails with `Serialization` and the caller retries
/// the whole workflow against fresh state.
pub trait BookingRepository: Send + Sync {
    fn insert_booking(&self, new: NewBooking) -> Result<Booking, RepositoryError>;
    fn update_booking(
        &self,
        id: BookingId,
        changes: BookingChanges,
    ) -> Result<Booking, RepositoryError>;
    fn delete_booking(&self, id: BookingId) -> Result<(), RepositoryError>;
    fn fetch_booking(&self, id: BookingId) -> Result<Option<Booking>, RepositoryError>;
    /// All bookings, newest first.
    fn list_bookings(&self) -> Result<Vec<Booking>, RepositoryError>;
    fn commit_assignment(
        &self,
        id: BookingId,
        cleaners: Vec<CleanerId>,
        payment: PaymentDraft,
    ) -> Result<(Booking, Payment), RepositoryError>;
}
