//! High-level database service layer.
//!
//! Repository-agnostic entry points used by the HTTP handlers. They add the
//! logging around each store call and nothing else; absence and failure are
//! passed through untouched as [`RepositoryError`] values.
//!
//! ```no_run
//! use facts_backend::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let fact = services::insert_fact(&repo, "Chuck Norris can slam a revolving door.").await?;
//!     println!("Stored fact {}", fact.id);
//!     Ok(())
//! }
//! ```

use tracing::{debug, error, info, warn};

use super::repository::{FactRepository, RepositoryError, RepositoryResult};
use crate::api::{Fact, FactId};

/// Check if the database connection is healthy.
pub async fn health_check<R: FactRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Fetch the text of one fact.
pub async fn get_fact<R: FactRepository + ?Sized>(
    repo: &R,
    fact_id: FactId,
) -> RepositoryResult<String> {
    debug!(%fact_id, "Fetching fact");
    repo.get_fact(fact_id)
        .await
        .inspect_err(|e| log_failure("get_fact", e))
}

/// Fetch all facts, or only those whose id is in `ids`.
pub async fn get_facts<R: FactRepository + ?Sized>(
    repo: &R,
    ids: Option<&[FactId]>,
) -> RepositoryResult<Vec<Fact>> {
    debug!(filter = ?ids, "Fetching facts");
    let facts = repo
        .get_facts(ids)
        .await
        .inspect_err(|e| log_failure("get_facts", e))?;

    if let Some(ids) = ids {
        if facts.len() < ids.len() {
            debug!(
                requested = ids.len(),
                found = facts.len(),
                "Some requested facts do not exist"
            );
        }
    }
    Ok(facts)
}

/// Store a new fact and return it with its assigned id.
pub async fn insert_fact<R: FactRepository + ?Sized>(
    repo: &R,
    text: &str,
) -> RepositoryResult<Fact> {
    let fact = repo
        .insert_fact(text)
        .await
        .inspect_err(|e| log_failure("insert_fact", e))?;
    info!(fact_id = %fact.id, "Fact created");
    Ok(fact)
}

/// Replace the text of an existing fact.
pub async fn update_fact<R: FactRepository + ?Sized>(
    repo: &R,
    fact_id: FactId,
    text: &str,
) -> RepositoryResult<()> {
    repo.update_fact(fact_id, text)
        .await
        .inspect_err(|e| log_failure("update_fact", e))?;
    info!(%fact_id, "Fact updated");
    Ok(())
}

/// Remove a fact.
pub async fn delete_fact<R: FactRepository + ?Sized>(
    repo: &R,
    fact_id: FactId,
) -> RepositoryResult<()> {
    repo.delete_fact(fact_id)
        .await
        .inspect_err(|e| log_failure("delete_fact", e))?;
    info!(%fact_id, "Fact deleted");
    Ok(())
}

fn log_failure(operation: &str, err: &RepositoryError) {
    if err.is_not_found() {
        warn!(operation, "{}", err);
    } else {
        error!(operation, "{}", err);
    }
}
