use std::sync::Arc;

use super::actor::{Actor, Role};
use super::catalog::{Permission, PermissionSet};
use crate::repository::RepositoryError;

/// Storage abstraction for the per-role grant sets.
pub trait RolePermissionStore: Send + Sync {
    /// Current grant set for a role, or `None` when nothing has been stored yet.
    fn permissions_for(&self, role: Role) -> Result<Option<PermissionSet>, RepositoryError>;
    /// Replace the role's grant set wholesale.
    fn replace_permissions(
        &self,
        role: Role,
        permissions: PermissionSet,
    ) -> Result<(), RepositoryError>;
}

/// Answers "may this actor do that" for the whole crate.
///
/// The decision ladder is fixed: no role denies, superadmin allows, subadmin
/// consults the stored grant set. A storage failure while reading the grant
/// set denies, so degraded persistence never widens access.
pub struct PermissionResolver<S> {
    store: Arc<S>,
}

impl<S> Clone for PermissionResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: RolePermissionStore> PermissionResolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn has_access(&self, actor: &Actor, permission: Permission) -> bool {
        match actor.role {
            None => false,
            Some(Role::Superadmin) => true,
            Some(Role::Subadmin) => match self.store.permissions_for(Role::Subadmin) {
                Ok(Some(granted)) => granted.contains(&permission),
                Ok(None) => false,
                Err(_) => false,
            },
        }
    }

    /// Check by raw code. The superadmin short-circuit comes before code
    /// parsing, so a superadmin passes even for codes outside the catalog.
    pub fn has_access_code(&self, actor: &Actor, code: &str) -> bool {
        match actor.role {
            None => false,
            Some(Role::Superadmin) => true,
            Some(Role::Subadmin) => match Permission::from_code(code) {
                Some(permission) => self.has_access(actor, permission),
                None => false,
            },
        }
    }
}
