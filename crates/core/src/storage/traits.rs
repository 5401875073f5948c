use async_trait::async_trait;

use super::{Fields, Page, PageRequest, Query, Record, Result};

/// Persistence contract a repository delegates to.
#[async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    /// Creates a new record from `fields`.
    async fn create(&self, fields: Fields) -> Result<T>;

    /// Merges `fields` into `record` and persists it.
    ///
    /// On success `record` reflects the stored state. On failure it is left
    /// untouched.
    async fn update(&self, record: &mut T, fields: Fields) -> Result<()>;

    /// Runs a query and returns the matching records.
    async fn query(&self, query: &Query) -> Result<Vec<T>>;

    /// Returns one page of records with default scoping applied.
    async fn paginate(&self, includes: &[String], request: PageRequest) -> Result<Page<T>>;
}
