//! Identity adapters.

mod uuid_provider;

pub use uuid_provider::UuidIdentityProvider;
