//! Storage backends.
//!
//! Every module talks to persistence through its own repository trait; the
//! [`Stores`] bound bundles them for code that needs the whole set, such as
//! the application context and the API routers. [`MemoryStore`] is the
//! process-local implementation backing the API service and the test suites.

pub mod memory;

use crate::access::RolePermissionStore;
use crate::admin::ActorRepository;
use crate::booking::BookingRepository;
use crate::directory::{CleanerRepository, CustomerRepository, ServiceRepository};
use crate::payments::PaymentRepository;

pub use memory::MemoryStore;

/// A backend that can serve every repository trait in the crate.
pub trait Stores:
    ActorRepository
    + RolePermissionStore
    + CustomerRepository
    + CleanerRepository
    + ServiceRepository
    + BookingRepository
    + PaymentRepository
    + 'static
{
}

impl<S> Stores for S where
    S: ActorRepository
        + RolePermissionStore
        + CustomerRepository
        + CleanerRepository
        + ServiceRepository
        + BookingRepository
        + PaymentRepository
        + 'static
{
}
