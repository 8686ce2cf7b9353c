//! In-memory result kind registry for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::exchange::ResultKind;
use crate::domain::foundation::{CoordinationError, ResultKindId};
use crate::ports::ResultKindRegistry;

/// In-memory result kind registry.
///
/// # Panics
///
/// Methods may panic if internal locks are poisoned. This is acceptable for
/// test code but this adapter should NOT be used in production.
#[derive(Debug, Default)]
pub struct InMemoryResultKindRegistry {
    kinds: RwLock<HashMap<ResultKindId, ResultKind>>,
}

impl InMemoryResultKindRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultKindRegistry for InMemoryResultKindRegistry {
    async fn register(&self, kind: ResultKind) -> Result<(), CoordinationError> {
        self.kinds
            .write()
            .expect("InMemoryResultKindRegistry: kinds write lock poisoned")
            .insert(kind.id().clone(), kind);
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ResultKindId,
    ) -> Result<Option<ResultKind>, CoordinationError> {
        Ok(self
            .kinds
            .read()
            .expect("InMemoryResultKindRegistry: kinds lock poisoned")
            .get(id)
            .cloned())
    }

    async fn all(&self) -> Result<Vec<ResultKind>, CoordinationError> {
        let mut kinds: Vec<ResultKind> = self
            .kinds
            .read()
            .expect("InMemoryResultKindRegistry: kinds lock poisoned")
            .values()
            .cloned()
            .collect();
        kinds.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(kinds)
    }
}
