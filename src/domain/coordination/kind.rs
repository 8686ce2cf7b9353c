//! CoordinationKind enum for the two protocol families.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The protocol family an act or fact belongs to.
///
/// The transaction family drives an exchange toward its result; each of the
/// four cancellation sub-protocols lets one role retract a pending fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinationKind {
    Transaction,
    Cancellation,
}

impl fmt::Display for CoordinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CoordinationKind::Transaction => "transaction",
            CoordinationKind::Cancellation => "cancellation",
        };
        write!(f, "{}", s)
    }
}
