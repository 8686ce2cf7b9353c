//! In-memory exchange repository for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::exchange::Exchange;
use crate::domain::foundation::{CoordinationError, ExchangeId};
use crate::ports::ExchangeRepository;

/// In-memory exchange store.
///
/// # Panics
///
/// Methods may panic if internal locks are poisoned. This is acceptable for
/// test code but this adapter should NOT be used in production.
#[derive(Debug, Default)]
pub struct InMemoryExchangeRepository {
    exchanges: RwLock<HashMap<ExchangeId, Exchange>>,
}

impl InMemoryExchangeRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored exchanges (for test assertions).
    pub fn exchange_count(&self) -> usize {
        self.exchanges
            .read()
            .expect("InMemoryExchangeRepository: exchanges lock poisoned")
            .len()
    }
}

#[async_trait]
impl ExchangeRepository for InMemoryExchangeRepository {
    async fn save(&self, exchange: &Exchange) -> Result<(), CoordinationError> {
        self.exchanges
            .write()
            .expect("InMemoryExchangeRepository: exchanges write lock poisoned")
            .insert(*exchange.id(), exchange.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ExchangeId) -> Result<Option<Exchange>, CoordinationError> {
        Ok(self
            .exchanges
            .read()
            .expect("InMemoryExchangeRepository: exchanges lock poisoned")
            .get(id)
            .cloned())
    }

    async fn exists(&self, id: &ExchangeId) -> Result<bool, CoordinationError> {
        Ok(self
            .exchanges
            .read()
            .expect("InMemoryExchangeRepository: exchanges lock poisoned")
            .contains_key(id))
    }
}
