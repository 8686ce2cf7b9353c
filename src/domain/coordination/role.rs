//! Role enum for the two transaction parties.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two parties of a result exchange.
///
/// The initiator asks for a result; the executor produces it. Every fact in
/// an exchange assigns at most one of the two roles as the next to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Initiator,
    Executor,
}

impl Role {
    /// Returns the counterpart role.
    pub const fn opposite(self) -> Role {
        match self {
            Role::Initiator => Role::Executor,
            Role::Executor => Role::Initiator,
        }
    }

    /// All roles, for exhaustive iteration in checks and tests.
    pub const ALL: [Role; 2] = [Role::Initiator, Role::Executor];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Initiator => "initiator",
            Role::Executor => "executor",
        };
        write!(f, "{}", s)
    }
}
