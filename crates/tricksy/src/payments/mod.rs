//! The append-only payment ledger.
//!
//! Payments arrive two ways: the assignment workflow appends one
//! automatically when cleaners are committed to a booking, and operators
//! record manual entries (with discounts) here. Nothing ever updates or
//! deletes a ledger row directly; rows disappear only when their booking or
//! customer cascades away.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Payment, PaymentDraft, PaymentId, PaymentMethod, PaymentStatus};
pub use repository::PaymentRepository;
pub use router::payments_router;
pub use service::{PaymentError, PaymentsLedger};
