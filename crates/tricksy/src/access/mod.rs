//! Role and permission checks applied ahead of every privileged operation.
//!
//! Access control is two-tiered: superadmins pass every check, subadmins pass
//! when the requested permission is present in the single shared grant set
//! persisted for the subadmin role. Actors without a role fail every check.

pub mod actor;
pub mod catalog;
pub mod guard;
pub mod resolver;

pub use actor::{Actor, ActorId, Role};
pub use catalog::{catalog, CatalogEntry, Permission, PermissionSet};
pub use guard::{AccessDenied, AccessGuard, GuardPoints};
pub use resolver::{PermissionResolver, RolePermissionStore};
