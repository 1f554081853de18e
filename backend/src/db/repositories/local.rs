//! In-memory local repository implementation.
//!
//! Suitable for unit testing and local development. Facts live in a
//! `BTreeMap` keyed by id, so listings come back in ascending id order
//! without an explicit sort.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::api::{Fact, FactId};
use crate::db::repository::{
    fact_not_found, facts_not_found, FactRepository, RepositoryError, RepositoryResult,
};

/// In-memory local repository.
///
/// Cloning shares the underlying storage.
///
/// # Example
/// ```
/// use facts_backend::db::repositories::LocalRepository;
/// use facts_backend::db::FactRepository;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repo = LocalRepository::new();
/// let fact = repo.insert_fact("Chuck Norris can divide by zero.").await.unwrap();
/// assert_eq!(repo.get_fact(fact.id).await.unwrap(), fact.fact);
/// # });
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    facts: BTreeMap<FactId, String>,
    // Only ever grows, so deleted ids are retired for good.
    next_fact_id: FactId,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            facts: BTreeMap::new(),
            next_fact_id: FactId(1),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository pre-populated with the given texts, ids 1..=n.
    pub fn with_facts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let repo = Self::new();
        {
            let mut data = repo.data.write();
            for text in texts {
                let id = data.next_fact_id;
                data.next_fact_id = FactId(id.0 + 1);
                data.facts.insert(id, text.into());
            }
        }
        repo
    }

    /// Set the health status for testing connection failures.
    ///
    /// While unhealthy every fact operation fails with a connection error.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Get the number of facts stored.
    pub fn fact_count(&self) -> usize {
        self.data.read().facts.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Database is not healthy"));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FactRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn get_fact(&self, fact_id: FactId) -> RepositoryResult<String> {
        self.check_health()?;
        self.data
            .read()
            .facts
            .get(&fact_id)
            .cloned()
            .ok_or_else(|| fact_not_found("get_fact", fact_id))
    }

    async fn get_facts(&self, ids: Option<&[FactId]>) -> RepositoryResult<Vec<Fact>> {
        self.check_health()?;
        let data = self.data.read();
        match ids {
            None => Ok(data
                .facts
                .iter()
                .map(|(id, text)| Fact::new(*id, text.clone()))
                .collect()),
            Some(ids) => {
                let found: Vec<Fact> = data
                    .facts
                    .iter()
                    .filter(|(id, _)| ids.contains(id))
                    .map(|(id, text)| Fact::new(*id, text.clone()))
                    .collect();
                if found.is_empty() {
                    return Err(facts_not_found(ids));
                }
                Ok(found)
            }
        }
    }

    async fn insert_fact(&self, text: &str) -> RepositoryResult<Fact> {
        self.check_health()?;
        let mut data = self.data.write();
        let id = data.next_fact_id;
        data.next_fact_id = FactId(id.0 + 1);
        data.facts.insert(id, text.to_string());
        Ok(Fact::new(id, text))
    }

    async fn update_fact(&self, fact_id: FactId, text: &str) -> RepositoryResult<()> {
        self.check_health()?;
        match self.data.write().facts.get_mut(&fact_id) {
            Some(stored) => {
                *stored = text.to_string();
                Ok(())
            }
            None => Err(fact_not_found("update_fact", fact_id)),
        }
    }

    async fn delete_fact(&self, fact_id: FactId) -> RepositoryResult<()> {
        self.check_health()?;
        self.data
            .write()
            .facts
            .remove(&fact_id)
            .map(|_| ())
            .ok_or_else(|| fact_not_found("delete_fact", fact_id))
    }
}
