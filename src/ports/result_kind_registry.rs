//! Result kind registry port.

use async_trait::async_trait;

use crate::domain::exchange::ResultKind;
use crate::domain::foundation::{CoordinationError, ResultKindId};

/// Registry port for the result kinds participants can exchange.
#[async_trait]
pub trait ResultKindRegistry: Send + Sync {
    /// Register a result kind; re-registering the same identity replaces it.
    async fn register(&self, kind: ResultKind) -> Result<(), CoordinationError>;

    /// Find a result kind by its identity.
    ///
    /// Returns `None` if not registered.
    async fn find_by_id(&self, id: &ResultKindId)
        -> Result<Option<ResultKind>, CoordinationError>;

    /// All registered result kinds.
    async fn all(&self) -> Result<Vec<ResultKind>, CoordinationError>;
}
