use serde::{Deserialize, Serialize};

use crate::access::{Actor, ActorId, Role};
use crate::repository::{Page, PageRequest, RepositoryError};
use crate::validation::{is_blank, ValidationError};

/// Input payload for creating a subadmin account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubadmin {
    pub username: String,
}

impl NewSubadmin {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if is_blank(&self.username) {
            errors.push("username", "must not be blank");
        }
        errors.into_result()
    }
}

/// Search and paging parameters for the account list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ActorQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<u32>,
}

impl ActorQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page.unwrap_or(1))
    }
}

/// Storage abstraction for operator accounts. Usernames are unique;
/// `insert_actor` reports a conflict on reuse.
pub trait ActorRepository: Send + Sync {
    fn insert_actor(&self, username: String, role: Option<Role>) -> Result<Actor, RepositoryError>;
    fn fetch_actor(&self, id: ActorId) -> Result<Option<Actor>, RepositoryError>;
    fn actor_by_username(&self, username: &str) -> Result<Option<Actor>, RepositoryError>;
    /// Case-insensitive substring search over usernames, ordered by id.
    fn search_actors(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Actor>, RepositoryError>;
}
