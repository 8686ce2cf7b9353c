//! Exchange repository port.

use async_trait::async_trait;

use crate::domain::exchange::Exchange;
use crate::domain::foundation::{CoordinationError, ExchangeId};

/// Repository port for exchange persistence.
#[async_trait]
pub trait ExchangeRepository: Send + Sync {
    /// Persist an exchange.
    ///
    /// # Errors
    ///
    /// - `Storage` on persistence failure
    async fn save(&self, exchange: &Exchange) -> Result<(), CoordinationError>;

    /// Find an exchange by its identity.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &ExchangeId) -> Result<Option<Exchange>, CoordinationError>;

    /// Check if an exchange exists.
    async fn exists(&self, id: &ExchangeId) -> Result<bool, CoordinationError>;
}
