//! Repository trait definitions for database operations.
//!
//! - [`error`]: Error types for repository operations
//! - [`FactRepository`]: the five fact operations plus connection health
//!
//! Implementations live in [`crate::db::repositories`].

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::api::{Fact, FactId};

/// Repository trait for fact storage.
///
/// Absence is reported through [`RepositoryError::NotFound`]; any other
/// error variant is an unexpected failure of the store.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait FactRepository: Send + Sync {
    /// Check if the database connection is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Retrieve the text of a single fact.
    ///
    /// # Returns
    /// * `Ok(String)` - The stored text
    /// * `Err(RepositoryError::NotFound)` - If no fact has this id
    async fn get_fact(&self, fact_id: FactId) -> RepositoryResult<String>;

    /// Retrieve several facts, ordered by id.
    ///
    /// With `ids == None` every stored fact is returned (possibly none).
    /// With a filter, the matching subset is returned; if nothing matches
    /// the call fails with `NotFound`.
    async fn get_facts(&self, ids: Option<&[FactId]>) -> RepositoryResult<Vec<Fact>>;

    /// Insert a new fact. The store assigns the id.
    async fn insert_fact(&self, text: &str) -> RepositoryResult<Fact>;

    /// Replace the text of an existing fact.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no fact has this id
    async fn update_fact(&self, fact_id: FactId, text: &str) -> RepositoryResult<()>;

    /// Remove a fact. Its id is never handed out again.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no fact has this id
    async fn delete_fact(&self, fact_id: FactId) -> RepositoryResult<()>;

    /// Release the underlying store. Called once on shutdown.
    ///
    /// Backends holding connections drop them here; later calls on the
    /// same repository may fail with a connection error.
    async fn close(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

/// Builds the `NotFound` error for a single fact id.
pub(crate) fn fact_not_found(operation: &str, fact_id: FactId) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("Fact with id {} not found.", fact_id),
        ErrorContext::new(operation)
            .with_entity("fact")
            .with_entity_id(fact_id),
    )
}

/// Builds the `NotFound` error for a filtered multi-id lookup.
pub(crate) fn facts_not_found(ids: &[FactId]) -> RepositoryError {
    let joined = ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    RepositoryError::not_found_with_context(
        format!("Facts with ids {} not found", joined),
        ErrorContext::new("get_facts")
            .with_entity("fact")
            .with_entity_id(&joined),
    )
}
