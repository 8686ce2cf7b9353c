//! Error types for the domain layer.

use thiserror::Error;

use crate::domain::coordination::{ActKind, FactKind, Role};
use crate::domain::foundation::{ExchangeId, ResultKindId};

/// Errors that occur during value object construction.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField {
            field: field.into(),
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Malformed static transition tables.
///
/// Raised while verifying the act/fact definitions; a violation means the
/// tables themselves are wrong and initialization must not proceed.
#[derive(Debug, Clone, Error)]
#[error("transition table definition error: {message}")]
pub struct DefinitionError {
    pub message: String,
}

impl DefinitionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors raised by the coordination engine and its boundary ports.
#[derive(Debug, Error)]
pub enum CoordinationError {
    /// `is_valid_default_response` was called for arguments that have no
    /// default response. Callers must check `default_response` first.
    #[error("no default response for {fact} as {role} (proceed: {proceed})")]
    NoDefaultResponse {
        fact: FactKind,
        role: Role,
        proceed: bool,
    },

    /// A proposed act is not a legal response to the current fact.
    #[error("{response} is not a valid response to {fact}")]
    InvalidResponse { fact: FactKind, response: ActKind },

    /// A name was resolved against an exchange it does not participate in.
    #[error("'{name}' is not a participant of exchange {exchange}")]
    NotAParticipant { name: String, exchange: ExchangeId },

    /// A fact was offered to a stream with a stale ordinal.
    #[error("out-of-order fact for exchange {exchange}: ordinal {offered} after {last}")]
    OutOfOrderFact {
        exchange: ExchangeId,
        last: u64,
        offered: u64,
    },

    /// The fact stream has already signalled completion or failure.
    #[error("fact stream is closed")]
    StreamClosed,

    /// No exchange with the given identity is known.
    #[error("unknown exchange {0}")]
    UnknownExchange(ExchangeId),

    /// No result kind with the given identity is registered.
    #[error("unknown result kind '{0}'")]
    UnknownResultKind(ResultKindId),

    /// The exchange has reached a terminal transaction fact.
    #[error("exchange {0} is closed")]
    ExchangeClosed(ExchangeId),

    /// A cancellation sub-protocol is already running on the exchange.
    #[error("a cancellation is already in progress on exchange {0}")]
    CancellationInProgress(ExchangeId),

    /// An exchange exists but carries no facts yet.
    #[error("exchange {0} has no facts")]
    EmptyExchange(ExchangeId),

    #[error("storage failure: {0}")]
    Storage(String),

    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("actor_ref");
        assert_eq!(format!("{}", err), "Field 'actor_ref' cannot be empty");
    }

    #[test]
    fn validation_error_invalid_format_displays_correctly() {
        let err = ValidationError::invalid_format("actor_ref", "bad separator");
        assert_eq!(
            format!("{}", err),
            "Field 'actor_ref' has invalid format: bad separator"
        );
    }

    #[test]
    fn no_default_response_displays_arguments() {
        let err = CoordinationError::NoDefaultResponse {
            fact: FactKind::Accepted,
            role: Role::Initiator,
            proceed: true,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("accepted"));
        assert!(msg.contains("initiator"));
    }

    #[test]
    fn definition_error_displays_message() {
        let err = DefinitionError::new("dangling response act");
        assert_eq!(
            format!("{}", err),
            "transition table definition error: dangling response act"
        );
    }

    #[test]
    fn validation_error_converts_into_coordination_error() {
        let err: CoordinationError = ValidationError::empty_field("x").into();
        assert!(matches!(err, CoordinationError::Validation(_)));
    }
}
