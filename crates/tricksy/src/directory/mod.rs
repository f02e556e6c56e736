//! Customers, cleaners, and the service catalog.
//!
//! These are the reference entities everything else points at: bookings hold
//! a customer and service line items, assignments hold cleaners. Deletion
//! semantics differ per entity and are enforced by the store: customers
//! cascade into their bookings, cleaners are detached from assignments, and
//! services still referenced by a booking refuse to go.

pub mod domain;
pub mod repository;
pub mod roster;
pub mod router;
pub mod service;

pub use domain::{
    Cleaner, CleanerDraft, CleanerId, Customer, CustomerDraft, CustomerId, Service, ServiceDraft,
    ServiceId,
};
pub use repository::{CleanerRepository, CustomerRepository, ServiceRepository};
pub use roster::{RosterImportError, RosterImporter};
pub use router::directory_router;
pub use service::{DirectoryError, DirectoryService};
