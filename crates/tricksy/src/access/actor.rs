use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for operator accounts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two operator tiers. Accounts can also carry no role at all, which
/// denies every permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Superadmin,
    Subadmin,
}

/// An authenticated operator account as seen by the permission checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub username: String,
    pub role: Option<Role>,
}

impl Actor {
    pub fn is_superadmin(&self) -> bool {
        self.role == Some(Role::Superadmin)
    }
}
