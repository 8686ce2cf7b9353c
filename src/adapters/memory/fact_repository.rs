//! In-memory fact repository for testing.
//!
//! # Security Note
//!
//! This adapter is for **testing only** and should not be used in production.
//! It uses `.expect()` on lock operations which will panic if locks are
//! poisoned. Production deployments integrate the external persistence
//! collaborator instead.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::exchange::CoordinationFact;
use crate::domain::foundation::{CoordinationError, ExchangeId, FactId};
use crate::ports::FactRepository;

/// In-memory fact store.
///
/// # Panics
///
/// Methods may panic if internal locks are poisoned.
#[derive(Debug, Default)]
pub struct InMemoryFactRepository {
    facts: RwLock<HashMap<FactId, CoordinationFact>>,
}

impl InMemoryFactRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored facts (for test assertions).
    pub fn fact_count(&self) -> usize {
        self.facts
            .read()
            .expect("InMemoryFactRepository: facts lock poisoned")
            .len()
    }

    /// Clears all stored facts (for test isolation).
    pub fn clear(&self) {
        self.facts
            .write()
            .expect("InMemoryFactRepository: facts write lock poisoned")
            .clear();
    }
}

#[async_trait]
impl FactRepository for InMemoryFactRepository {
    async fn save(&self, fact: &CoordinationFact) -> Result<(), CoordinationError> {
        self.facts
            .write()
            .expect("InMemoryFactRepository: facts write lock poisoned")
            .insert(*fact.id(), fact.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &FactId,
    ) -> Result<Option<CoordinationFact>, CoordinationError> {
        Ok(self
            .facts
            .read()
            .expect("InMemoryFactRepository: facts lock poisoned")
            .get(id)
            .cloned())
    }

    async fn find_by_exchange(
        &self,
        exchange: &ExchangeId,
    ) -> Result<Vec<CoordinationFact>, CoordinationError> {
        let mut facts: Vec<CoordinationFact> = self
            .facts
            .read()
            .expect("InMemoryFactRepository: facts lock poisoned")
            .values()
            .filter(|fact| fact.exchange_id() == exchange)
            .cloned()
            .collect();
        facts.sort_by_key(CoordinationFact::ordinal);
        Ok(facts)
    }

    async fn find_latest(
        &self,
        exchange: &ExchangeId,
    ) -> Result<Option<CoordinationFact>, CoordinationError> {
        Ok(self
            .facts
            .read()
            .expect("InMemoryFactRepository: facts lock poisoned")
            .values()
            .filter(|fact| fact.exchange_id() == exchange)
            .max_by_key(|fact| fact.ordinal())
            .cloned())
    }

    async fn delete(&self, id: &FactId) -> Result<u64, CoordinationError> {
        let removed = self
            .facts
            .write()
            .expect("InMemoryFactRepository: facts write lock poisoned")
            .remove(id);
        Ok(u64::from(removed.is_some()))
    }
}
