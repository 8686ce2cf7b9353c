//! Command handlers for driving exchanges.

mod advance_exchange;
mod open_cancellation;
mod open_exchange;

pub use advance_exchange::{AdvanceExchangeCommand, AdvanceExchangeHandler, AdvanceOutcome};
pub use open_cancellation::{
    CancellationScope, OpenCancellationCommand, OpenCancellationHandler,
};
pub use open_exchange::{OpenExchangeCommand, OpenExchangeHandler, OpenExchangeResult};
