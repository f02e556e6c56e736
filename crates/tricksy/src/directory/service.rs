use std::sync::Arc;

use tracing::info;

use super::domain::{
    Cleaner, CleanerDraft, CleanerId, Customer, CustomerDraft, CustomerId, Service, ServiceDraft,
    ServiceId,
};
use super::repository::{CleanerRepository, CustomerRepository, ServiceRepository};
use crate::access::{AccessDenied, AccessGuard, Actor, Permission, RolePermissionStore};
use crate::repository::RepositoryError;
use crate::validation::ValidationError;

/// CRUD facade over the three reference collections, with the permission
/// checks for each entity applied up front.
pub struct DirectoryService<S> {
    store: Arc<S>,
    guard: AccessGuard<S>,
}

impl<S> Clone for DirectoryService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            guard: self.guard.clone(),
        }
    }
}

/// Error raised by directory operations.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error(transparent)]
    Denied(#[from] AccessDenied),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl<S> DirectoryService<S>
where
    S: CustomerRepository + CleanerRepository + ServiceRepository + RolePermissionStore + 'static,
{
    pub fn new(store: Arc<S>, guard: AccessGuard<S>) -> Self {
        Self { store, guard }
    }

    // Customers: reads behind `view_customers`, writes behind `manage_customers`.

    pub fn list_customers(&self, actor: &Actor) -> Result<Vec<Customer>, DirectoryError> {
        self.guard.protect(actor, Permission::ViewCustomers, || {
            Ok(self.store.list_customers()?)
        })
    }

    pub fn get_customer(&self, actor: &Actor, id: CustomerId) -> Result<Customer, DirectoryError> {
        self.guard.protect(actor, Permission::ViewCustomers, || {
            self.store
                .fetch_customer(id)?
                .ok_or(RepositoryError::NotFound { entity: "customer" })
                .map_err(DirectoryError::from)
        })
    }

    pub fn create_customer(
        &self,
        actor: &Actor,
        draft: CustomerDraft,
    ) -> Result<Customer, DirectoryError> {
        self.guard.protect(actor, Permission::ManageCustomers, || {
            draft.validate()?;
            let customer = self.store.insert_customer(draft)?;
            info!(customer = %customer.id, "customer created");
            Ok(customer)
        })
    }

    pub fn update_customer(
        &self,
        actor: &Actor,
        id: CustomerId,
        draft: CustomerDraft,
    ) -> Result<Customer, DirectoryError> {
        self.guard.protect(actor, Permission::ManageCustomers, || {
            draft.validate()?;
            Ok(self.store.update_customer(id, draft)?)
        })
    }

    pub fn delete_customer(&self, actor: &Actor, id: CustomerId) -> Result<(), DirectoryError> {
        self.guard.protect(actor, Permission::ManageCustomers, || {
            self.store.delete_customer(id)?;
            info!(customer = %id, "customer deleted with dependent bookings");
            Ok(())
        })
    }

    // Cleaners: managed behind `assign_cleaners`. Listing is open to any
    // authenticated actor so booking screens can render the roster without an
    // extra grant.

    pub fn list_cleaners(&self, _actor: &Actor) -> Result<Vec<Cleaner>, DirectoryError> {
        Ok(self.store.list_cleaners()?)
    }

    pub fn create_cleaner(
        &self,
        actor: &Actor,
        draft: CleanerDraft,
    ) -> Result<Cleaner, DirectoryError> {
        self.guard.protect(actor, Permission::AssignCleaners, || {
            draft.validate()?;
            Ok(self.store.insert_cleaner(draft)?)
        })
    }

    pub fn update_cleaner(
        &self,
        actor: &Actor,
        id: CleanerId,
        draft: CleanerDraft,
    ) -> Result<Cleaner, DirectoryError> {
        self.guard.protect(actor, Permission::AssignCleaners, || {
            draft.validate()?;
            Ok(self.store.update_cleaner(id, draft)?)
        })
    }

    pub fn delete_cleaner(&self, actor: &Actor, id: CleanerId) -> Result<(), DirectoryError> {
        self.guard.protect(actor, Permission::AssignCleaners, || {
            self.store.delete_cleaner(id)?;
            info!(cleaner = %id, "cleaner removed and detached from assignments");
            Ok(())
        })
    }

    /// Bulk-insert a parsed roster. Row validation runs over the whole file
    /// first so the response names every bad row; the insert itself is
    /// all-or-nothing.
    pub fn import_roster(
        &self,
        actor: &Actor,
        drafts: Vec<CleanerDraft>,
    ) -> Result<Vec<Cleaner>, DirectoryError> {
        self.guard.protect(actor, Permission::AssignCleaners, || {
            let mut errors = ValidationError::new();
            if drafts.is_empty() {
                errors.push("roster", "file contains no rows");
            }
            for (index, draft) in drafts.iter().enumerate() {
                if let Err(row_errors) = draft.validate() {
                    errors.absorb_prefixed(&format!("row {}", index + 1), row_errors);
                }
            }
            errors.into_result()?;

            let cleaners = self.store.insert_cleaners(drafts)?;
            info!(count = cleaners.len(), "cleaner roster imported");
            Ok(cleaners)
        })
    }

    // Services: reads behind `view_services`, writes behind `manage_services`.

    pub fn list_services(&self, actor: &Actor) -> Result<Vec<Service>, DirectoryError> {
        self.guard.protect(actor, Permission::ViewServices, || {
            Ok(self.store.list_services()?)
        })
    }

    pub fn get_service(&self, actor: &Actor, id: ServiceId) -> Result<Service, DirectoryError> {
        self.guard.protect(actor, Permission::ViewServices, || {
            self.store
                .fetch_service(id)?
                .ok_or(RepositoryError::NotFound { entity: "service" })
                .map_err(DirectoryError::from)
        })
    }

    pub fn create_service(
        &self,
        actor: &Actor,
        draft: ServiceDraft,
    ) -> Result<Service, DirectoryError> {
        self.guard.protect(actor, Permission::ManageServices, || {
            draft.validate()?;
            let service = self.store.insert_service(draft)?;
            info!(service = %service.id, name = %service.name, "service created");
            Ok(service)
        })
    }

    pub fn update_service(
        &self,
        actor: &Actor,
        id: ServiceId,
        draft: ServiceDraft,
    ) -> Result<Service, DirectoryError> {
        self.guard.protect(actor, Permission::ManageServices, || {
            draft.validate()?;
            Ok(self.store.update_service(id, draft)?)
        })
    }

    /// Refuses with a referential conflict while any booking still references
    /// the service.
    pub fn delete_service(&self, actor: &Actor, id: ServiceId) -> Result<(), DirectoryError> {
        self.guard.protect(actor, Permission::ManageServices, || {
            self.store.delete_service(id)?;
            Ok(())
        })
    }
}
