//! Shared persistence contract: the error taxonomy every repository trait
//! reports through, plus the paging primitives used by list operations.

use serde::Serialize;

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error("{entity} already exists with that {field}")]
    Conflict {
        entity: &'static str,
        field: &'static str,
    },
    #[error("{entity} is still referenced by {referenced_by}")]
    ReferentialConflict {
        entity: &'static str,
        referenced_by: &'static str,
    },
    #[error("concurrent update detected, retry the operation")]
    Serialization,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub(crate) const DEFAULT_PAGE_SIZE: u32 = 10;

/// 1-based page selector for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.page_size.max(1) as usize
    }
}

/// One page of results plus enough metadata to render pagination controls.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl<T> Page<T> {
    /// Slice a fully ordered collection down to the requested page.
    pub fn slice(ordered: Vec<T>, request: PageRequest) -> Self {
        let total = ordered.len() as u64;
        let page_size = request.page_size.max(1);
        let items = ordered
            .into_iter()
            .skip(request.offset())
            .take(page_size as usize)
            .collect();
        Self {
            items,
            page: request.page.max(1),
            page_size,
            total,
        }
    }
}
