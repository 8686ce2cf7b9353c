//! In-memory adapters for testing and simulation harnesses.

mod exchange_repository;
mod fact_repository;
mod fact_stream;
mod result_kind_registry;

pub use exchange_repository::InMemoryExchangeRepository;
pub use fact_repository::InMemoryFactRepository;
pub use fact_stream::{BroadcastActor, FactBroadcast};
pub use result_kind_registry::InMemoryResultKindRegistry;
