use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::actor::Actor;
use super::catalog::Permission;
use super::resolver::{PermissionResolver, RolePermissionStore};

/// Raised when a permission check fails. The rendered message is a fixed
/// signal; callers translate it to their boundary's denied response and must
/// not leak which permission was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDenied {
    /// Permission that was required, `None` for superadmin-only operations.
    pub required: Option<Permission>,
}

impl fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("access denied")
    }
}

impl std::error::Error for AccessDenied {}

/// Which permission guards the two mutation points that historically drifted
/// between deployments. Both default to `manage_bookings`; the assignment
/// point can be remapped (typically to `assign_cleaners`) through
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardPoints {
    pub booking_mutation: Permission,
    pub cleaner_assignment: Permission,
}

impl Default for GuardPoints {
    fn default() -> Self {
        Self {
            booking_mutation: Permission::ManageBookings,
            cleaner_assignment: Permission::ManageBookings,
        }
    }
}

/// Wraps the resolver with the decorator applied around privileged operations.
pub struct AccessGuard<S> {
    resolver: PermissionResolver<S>,
    points: GuardPoints,
}

impl<S> Clone for AccessGuard<S> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            points: self.points,
        }
    }
}

impl<S: RolePermissionStore> AccessGuard<S> {
    pub fn new(store: Arc<S>, points: GuardPoints) -> Self {
        debug!(
            booking_mutation = points.booking_mutation.code(),
            cleaner_assignment = points.cleaner_assignment.code(),
            "access guard points configured"
        );
        Self {
            resolver: PermissionResolver::new(store),
            points,
        }
    }

    pub fn points(&self) -> GuardPoints {
        self.points
    }

    pub fn require(&self, actor: &Actor, permission: Permission) -> Result<(), AccessDenied> {
        if self.resolver.has_access(actor, permission) {
            Ok(())
        } else {
            debug!(
                actor = %actor.username,
                permission = permission.code(),
                "permission check failed"
            );
            Err(AccessDenied {
                required: Some(permission),
            })
        }
    }

    pub fn require_superadmin(&self, actor: &Actor) -> Result<(), AccessDenied> {
        if actor.is_superadmin() {
            Ok(())
        } else {
            debug!(actor = %actor.username, "superadmin check failed");
            Err(AccessDenied { required: None })
        }
    }

    /// Run `operation` only after the permission check passes. The closure is
    /// never entered on denial, so guarded work cannot leave partial effects
    /// behind a failed check.
    pub fn protect<T, E, F>(
        &self,
        actor: &Actor,
        permission: Permission,
        operation: F,
    ) -> Result<T, E>
    where
        E: From<AccessDenied>,
        F: FnOnce() -> Result<T, E>,
    {
        self.require(actor, permission)?;
        operation()
    }
}
