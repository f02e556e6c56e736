//! Bookings: scheduling, line items, and the cleaner-assignment workflow.
//!
//! A booking owns its line items (one row per catalog service, each with a
//! cleaner count) and carries the derived figures the rest of the system
//! works from: the required cleaner count is the sum over line items, the
//! total amount is priced against the live catalog. Assignment replaces the
//! booking's cleaner set wholesale and appends a payment in one transaction.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    AssignmentRequest, Booking, BookingDraft, BookingId, BookingUpdate, CustomerRef, LineItem,
    LineItemDraft, LineItemOp, Schedule,
};
pub use repository::{BookingChanges, BookingRepository, CustomerSource, NewBooking};
pub use router::booking_router;
pub use service::{AssignmentOutcome, BookingError, BookingService, BookingTotals};
