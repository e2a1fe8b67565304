/*
 * Responsibility
 * - Store contracts (traits) for customers / projects / issues / comments
 * - Stores: the bundle handed to AppState
 *
 * Notes
 * - Only an in-process implementation ships. Anything persistent plugs in behind
 *   the same traits.
 */
use std::sync::Arc;

pub mod comment_repo;
pub mod customer_repo;
pub mod error;
pub mod issue_repo;
pub mod project_repo;

pub use comment_repo::{CommentRepo, InMemoryCommentRepo};
pub use customer_repo::{CustomerRepo, InMemoryCustomerRepo};
pub use error::StoreError;
pub use issue_repo::{InMemoryIssueRepo, IssueRepo};
pub use project_repo::{InMemoryProjectRepo, ProjectRepo};

/// Filter + page for list queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Case-insensitive substring; empty matches everything.
    pub query: String,
    pub limit: usize,
    pub offset: usize,
}

impl ListOptions {
    pub fn matches(&self, field: &str) -> bool {
        self.query.is_empty() || field.to_lowercase().contains(&self.query.to_lowercase())
    }

    /// Applies the filter to `field(row)` and then offset/limit, keeping order.
    pub fn page<'a, T, F>(&self, rows: impl IntoIterator<Item = &'a T>, field: F) -> Vec<T>
    where
        T: Clone + 'a,
        F: Fn(&T) -> &str,
    {
        rows.into_iter()
            .filter(|row| self.matches(field(row)))
            .skip(self.offset)
            .take(self.limit)
            .cloned()
            .collect()
    }
}

#[derive(Clone)]
pub struct Stores {
    pub customers: Arc<dyn CustomerRepo>,
    pub projects: Arc<dyn ProjectRepo>,
    pub issues: Arc<dyn IssueRepo>,
    pub comments: Arc<dyn CommentRepo>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            customers: Arc::new(InMemoryCustomerRepo::default()),
            projects: Arc::new(InMemoryProjectRepo::default()),
            issues: Arc::new(InMemoryIssueRepo::default()),
            comments: Arc::new(InMemoryCommentRepo::default()),
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
