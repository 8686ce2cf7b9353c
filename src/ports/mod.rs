//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! coordination core and the outside world; adapters implement them.
//!
//! - `FactRepository` / `ExchangeRepository` / `ResultKindRegistry` - the
//!   persistence collaborator
//! - `Clock` - the clock collaborator stamping fact occurrence times
//! - `IdentityProvider` - the identity collaborator supplying fresh ids
//! - `FactSource` - the multicast stream a participant exposes
//! - `Actor` - the capability every participant exposes

mod actor;
mod clock;
mod exchange_repository;
mod fact_repository;
mod fact_stream;
mod identity_provider;
mod result_kind_registry;

pub use actor::{Actor, FactFilter, FilteredFacts};
pub use clock::Clock;
pub use exchange_repository::ExchangeRepository;
pub use fact_repository::FactRepository;
pub use fact_stream::{FactPublisher, FactSource, FactStreamItem, FactSubscription, SubscriptionId};
pub use identity_provider::IdentityProvider;
pub use result_kind_registry::ResultKindRegistry;
