//! UUID-backed identity provider.

use crate::domain::foundation::{ExchangeId, FactId};
use crate::ports::IdentityProvider;

/// Generates random version-4 UUID identities.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdentityProvider;

impl UuidIdentityProvider {
    /// Creates a new provider.
    pub fn new() -> Self {
        Self
    }
}

impl IdentityProvider for UuidIdentityProvider {
    fn next_fact_id(&self) -> FactId {
        FactId::new()
    }

    fn next_exchange_id(&self) -> ExchangeId {
        ExchangeId::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_identities_are_unique() {
        let ids = UuidIdentityProvider::new();
        assert_ne!(ids.next_fact_id(), ids.next_fact_id());
        assert_ne!(ids.next_exchange_id(), ids.next_exchange_id());
    }
}
