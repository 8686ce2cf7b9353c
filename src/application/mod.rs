//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates the protocol core and coordinates between ports.
//! Handlers own the caller obligations the core leaves open: ordinal
//! assignment (latest + 1, single-writer discipline) and fact publication.

pub mod handlers;

pub use handlers::{
    AdvanceExchangeCommand, AdvanceExchangeHandler, AdvanceOutcome, CancellationScope,
    OpenCancellationCommand, OpenCancellationHandler, OpenExchangeCommand, OpenExchangeHandler,
    OpenExchangeResult,
};
