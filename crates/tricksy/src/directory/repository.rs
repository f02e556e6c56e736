use super::domain::{
    Cleaner, CleanerDraft, CleanerId, Customer, CustomerDraft, CustomerId, Service, ServiceDraft,
    ServiceId,
};
use crate::repository::RepositoryError;

/// Storage abstraction for customer records.
///
/// `delete_customer` cascades: the customer's bookings and their payments go
/// with it in the same transaction.
pub trait CustomerRepository: Send + Sync {
    fn insert_customer(&self, draft: CustomerDraft) -> Result<Customer, RepositoryError>;
    fn update_customer(
        &self,
        id: CustomerId,
        draft: CustomerDraft,
    ) -> Result<Customer, RepositoryError>;
    fn delete_customer(&self, id: CustomerId) -> Result<(), RepositoryError>;
    fn fetch_customer(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;
    fn list_customers(&self) -> Result<Vec<Customer>, RepositoryError>;
}

/// Storage abstraction for cleaner records.
///
/// `insert_cleaners` is all-or-nothing so a roster import never lands half a
/// file. `delete_cleaner` detaches the cleaner from any booking assignment
/// without touching the rest of the booking.
pub trait CleanerRepository: Send + Sync {
    fn insert_cleaner(&self, draft: CleanerDraft) -> Result<Cleaner, RepositoryError>;
    fn insert_cleaners(&self, drafts: Vec<CleanerDraft>) -> Result<Vec<Cleaner>, RepositoryError>;
    fn update_cleaner(
        &self,
        id: CleanerId,
        draft: CleanerDraft,
    ) -> Result<Cleaner, RepositoryError>;
    fn delete_cleaner(&self, id: CleanerId) -> Result<(), RepositoryError>;
    fn fetch_cleaner(&self, id: CleanerId) -> Result<Option<Cleaner>, RepositoryError>;
    fn list_cleaners(&self) -> Result<Vec<Cleaner>, RepositoryError>;
}

/// Storage abstraction for the service catalog.
///
/// `delete_service` must refuse with a referential conflict while any booking
/// line item still points at the service.
pub trait ServiceRepository: Send + Sync {
    fn insert_service(&self, draft: ServiceDraft) -> Result<Service, RepositoryError>;
    fn update_service(
        &self,
        id: ServiceId,
        draft: ServiceDraft,
    ) -> Result<Service, RepositoryError>;
    fn delete_service(&self, id: ServiceId) -> Result<(), RepositoryError>;
    fn fetch_service(&self, id: ServiceId) -> Result<Option<Service>, RepositoryError>;
    fn list_services(&self) -> Result<Vec<Service>, RepositoryError>;
}
