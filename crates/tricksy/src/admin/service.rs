use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::repository::{ActorQuery, ActorRepository, NewSubadmin};
use crate::access::catalog::{catalog, CatalogEntry};
use crate::access::{
    AccessDenied, AccessGuard, Actor, Permission, PermissionSet, Role, RolePermissionStore,
};
use crate::repository::{Page, RepositoryError};
use crate::validation::ValidationError;

/// Operator account and grant-set management. Creating accounts and replacing
/// the grant set are superadmin-only; browsing the account list is grantable
/// through `manage_subadmins`.
pub struct AdminService<S> {
    store: Arc<S>,
    guard: AccessGuard<S>,
}

impl<S> Clone for AdminService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            guard: self.guard.clone(),
        }
    }
}

/// Error raised by admin operations.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error(transparent)]
    Denied(#[from] AccessDenied),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// The grant-management view: current subadmin grants plus the full catalog
/// the management screen renders checkboxes from.
#[derive(Debug, Clone, Serialize)]
pub struct SubadminPermissionsView {
    pub granted: PermissionSet,
    pub catalog: Vec<CatalogEntry>,
}

impl<S> AdminService<S>
where
    S: ActorRepository + RolePermissionStore + 'static,
{
    pub fn new(store: Arc<S>, guard: AccessGuard<S>) -> Self {
        Self { store, guard }
    }

    /// Idempotent bootstrap of the initial superadmin account. Runs before
    /// any actor exists, so it is deliberately unguarded; callers invoke it
    /// from process startup only.
    pub fn ensure_superadmin(&self, username: &str) -> Result<Actor, RepositoryError> {
        if let Some(existing) = self.store.actor_by_username(username)? {
            return Ok(existing);
        }
        let actor = self
            .store
            .insert_actor(username.to_string(), Some(Role::Superadmin))?;
        info!(username = %actor.username, "superadmin account bootstrapped");
        Ok(actor)
    }

    pub fn create_subadmin(&self, actor: &Actor, new: NewSubadmin) -> Result<Actor, AdminError> {
        self.guard.require_superadmin(actor)?;
        new.validate()?;
        let created = self
            .store
            .insert_actor(new.username, Some(Role::Subadmin))?;
        info!(username = %created.username, "subadmin account created");
        Ok(created)
    }

    /// Browse accounts, optionally filtered by a username substring. Unlike
    /// the other admin operations this one is grantable: a subadmin holding
    /// `manage_subadmins` can read the list even though account creation and
    /// the grant set stay superadmin-only.
    pub fn list_actors(&self, actor: &Actor, query: ActorQuery) -> Result<Page<Actor>, AdminError> {
        self.guard
            .protect(actor, Permission::ManageSubadmins, || {
                self.store
                    .search_actors(query.search.as_deref(), query.page_request())
                    .map_err(AdminError::from)
            })
    }

    pub fn subadmin_permissions(&self, actor: &Actor) -> Result<SubadminPermissionsView, AdminError> {
        self.guard.require_superadmin(actor)?;
        let granted = self
            .store
            .permissions_for(Role::Subadmin)?
            .unwrap_or_default();
        Ok(SubadminPermissionsView {
            granted,
            catalog: catalog(),
        })
    }

    /// Replace the subadmin grant set wholesale. Codes outside the catalog
    /// never reach this point; the typed set is the validation boundary.
    pub fn set_subadmin_permissions(
        &self,
        actor: &Actor,
        permissions: PermissionSet,
    ) -> Result<SubadminPermissionsView, AdminError> {
        self.guard.require_superadmin(actor)?;
        self.store
            .replace_permissions(Role::Subadmin, permissions.clone())?;
        info!(granted = permissions.len(), "subadmin grant set replaced");
        Ok(SubadminPermissionsView {
            granted: permissions,
            catalog: catalog(),
        })
    }
}
