//! Exchange module - concrete transaction instances.
//!
//! A [`ResultKind`] names what is being produced; an [`Exchange`] is one
//! running attempt between a concrete initiator and executor; each protocol
//! step is recorded as an immutable [`CoordinationFact`], causally tied to
//! earlier facts through [`FactLink`]s.

mod exchange;
mod fact;
mod fact_link;
mod progression;
mod result_kind;

pub use exchange::Exchange;
pub use fact::CoordinationFact;
pub use fact_link::{FactLink, FactLinkKind};
pub use progression::controlling_fact;
pub use result_kind::{ParticipantType, ResultKind};
