//! Fact repository port.
//!
//! Contract with the persistence collaborator for coordination facts. The
//! core requires nothing beyond "a fact, once saved, is retrievable by its
//! identity"; transactional semantics stay with the adapter.

use async_trait::async_trait;

use crate::domain::exchange::CoordinationFact;
use crate::domain::foundation::{CoordinationError, ExchangeId, FactId};

/// Repository port for coordination fact persistence.
#[async_trait]
pub trait FactRepository: Send + Sync {
    /// Persist a fact.
    ///
    /// # Errors
    ///
    /// - `Storage` on persistence failure
    async fn save(&self, fact: &CoordinationFact) -> Result<(), CoordinationError>;

    /// Find a fact by its identity.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &FactId) -> Result<Option<CoordinationFact>, CoordinationError>;

    /// All facts of one exchange, in ascending ordinal order.
    async fn find_by_exchange(
        &self,
        exchange: &ExchangeId,
    ) -> Result<Vec<CoordinationFact>, CoordinationError>;

    /// The fact with the highest ordinal of one exchange.
    async fn find_latest(
        &self,
        exchange: &ExchangeId,
    ) -> Result<Option<CoordinationFact>, CoordinationError>;

    /// Delete a fact, returning the number of records removed.
    async fn delete(&self, id: &FactId) -> Result<u64, CoordinationError>;
}
