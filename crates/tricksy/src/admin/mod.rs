//! Operator account management and the subadmin permission grant set.
//!
//! Everything here is the superadmin's territory: creating subadmin accounts,
//! browsing the account list, and replacing the single grant set that applies
//! to every subadmin.

pub mod repository;
pub mod router;
pub mod service;

pub use repository::{ActorQuery, ActorRepository, NewSubadmin};
pub use router::admin_router;
pub use service::{AdminError, AdminService, SubadminPermissionsView};
