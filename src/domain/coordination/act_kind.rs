//! ActKind enum - the performable coordination acts.
//!
//! Each act is one transition of the protocol: it names its family, the role
//! that performs it, the fact kind that must be the current exchange state
//! for it to be legal (absent only for the exchange-initiating act), and the
//! fact kind it produces. The table is pure data; consistency with the fact
//! table is checked by [`verify_definitions`](super::verify_definitions).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{CoordinationKind, FactKind, Role};

/// A performable act: one transition of the coordination protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActKind {
    // Transaction family
    Initiating,
    Requesting,
    Promising,
    Declining,
    Quitting,
    Executing,
    Stating,
    Accepting,
    Rejecting,
    Stopping,
    // Cancellation of a pending request
    CancellingRequest,
    AllowingRequestCancellation,
    RefusingRequestCancellation,
    // Cancellation of a pending promise
    CancellingPromise,
    AllowingPromiseCancellation,
    RefusingPromiseCancellation,
    // Cancellation of a pending state
    CancellingState,
    AllowingStateCancellation,
    RefusingStateCancellation,
    // Cancellation of a pending accept
    CancellingAccept,
    AllowingAcceptCancellation,
    RefusingAcceptCancellation,
}

/// The fixed definition row of one act.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ActRow {
    pub family: CoordinationKind,
    pub performer: Role,
    pub listener: Role,
    pub condition: Option<FactKind>,
    pub outcome: FactKind,
}

/// Builds a row; the listener is derived from the performer once, here.
const fn row(
    family: CoordinationKind,
    performer: Role,
    condition: Option<FactKind>,
    outcome: FactKind,
) -> ActRow {
    ActRow {
        family,
        performer,
        listener: performer.opposite(),
        condition,
        outcome,
    }
}

use super::CoordinationKind::{Cancellation, Transaction};
use super::Role::{Executor, Initiator};

impl ActKind {
    /// All acts, in definition order.
    pub const ALL: [ActKind; 22] = [
        ActKind::Initiating,
        ActKind::Requesting,
        ActKind::Promising,
        ActKind::Declining,
        ActKind::Quitting,
        ActKind::Executing,
        ActKind::Stating,
        ActKind::Accepting,
        ActKind::Rejecting,
        ActKind::Stopping,
        ActKind::CancellingRequest,
        ActKind::AllowingRequestCancellation,
        ActKind::RefusingRequestCancellation,
        ActKind::CancellingPromise,
        ActKind::AllowingPromiseCancellation,
        ActKind::RefusingPromiseCancellation,
        ActKind::CancellingState,
        ActKind::AllowingStateCancellation,
        ActKind::RefusingStateCancellation,
        ActKind::CancellingAccept,
        ActKind::AllowingAcceptCancellation,
        ActKind::RefusingAcceptCancellation,
    ];

    pub(crate) const fn definition(self) -> ActRow {
        use ActKind::*;
        use FactKind as F;
        match self {
            Initiating => row(Transaction, Executor, None, F::Initiated),
            Requesting => row(Transaction, Initiator, Some(F::Initiated), F::Requested),
            Promising => row(Transaction, Executor, Some(F::Requested), F::Promised),
            Declining => row(Transaction, Executor, Some(F::Requested), F::Declined),
            Quitting => row(Transaction, Initiator, Some(F::Declined), F::Quit),
            Executing => row(Transaction, Executor, Some(F::Promised), F::Executed),
            Stating => row(Transaction, Executor, Some(F::Executed), F::Stated),
            Accepting => row(Transaction, Initiator, Some(F::Stated), F::Accepted),
            Rejecting => row(Transaction, Initiator, Some(F::Stated), F::Rejected),
            Stopping => row(Transaction, Executor, Some(F::Rejected), F::Stopped),
            CancellingRequest => row(
                Cancellation,
                Initiator,
                Some(F::RequestCancellationInitiated),
                F::RequestCancelled,
            ),
            AllowingRequestCancellation => row(
                Cancellation,
                Executor,
                Some(F::RequestCancelled),
                F::RequestCancellationAllowed,
            ),
            RefusingRequestCancellation => row(
                Cancellation,
                Executor,
                Some(F::RequestCancelled),
                F::RequestCancellationRefused,
            ),
            CancellingPromise => row(
                Cancellation,
                Executor,
                Some(F::PromiseCancellationInitiated),
                F::PromiseCancelled,
            ),
            AllowingPromiseCancellation => row(
                Cancellation,
                Initiator,
                Some(F::PromiseCancelled),
                F::PromiseCancellationAllowed,
            ),
            RefusingPromiseCancellation => row(
                Cancellation,
                Initiator,
                Some(F::PromiseCancelled),
                F::PromiseCancellationRefused,
            ),
            CancellingState => row(
                Cancellation,
                Executor,
                Some(F::StateCancellationInitiated),
                F::StateCancelled,
            ),
            AllowingStateCancellation => row(
                Cancellation,
                Initiator,
                Some(F::StateCancelled),
                F::StateCancellationAllowed,
            ),
            RefusingStateCancellation => row(
                Cancellation,
                Initiator,
                Some(F::StateCancelled),
                F::StateCancellationRefused,
            ),
            CancellingAccept => row(
                Cancellation,
                Initiator,
                Some(F::AcceptCancellationInitiated),
                F::AcceptCancelled,
            ),
            AllowingAcceptCancellation => row(
                Cancellation,
                Executor,
                Some(F::AcceptCancelled),
                F::AcceptCancellationAllowed,
            ),
            RefusingAcceptCancellation => row(
                Cancellation,
                Executor,
                Some(F::AcceptCancelled),
                F::AcceptCancellationRefused,
            ),
        }
    }

    /// The protocol family this act belongs to.
    pub fn coordination_kind(self) -> CoordinationKind {
        self.definition().family
    }

    /// The role that performs this act.
    pub fn performer(self) -> Role {
        self.definition().performer
    }

    /// The role that observes and awaits the outcome.
    pub fn listener(self) -> Role {
        self.definition().listener
    }

    /// The fact kind that must be the current exchange state for this act to
    /// be legal; absent only for the exchange-initiating act.
    pub fn condition(self) -> Option<FactKind> {
        self.definition().condition
    }

    /// The fact kind produced by performing this act.
    pub fn outcome(self) -> FactKind {
        self.definition().outcome
    }

    /// Checks whether the given fact kind is this act's condition.
    pub fn has_requirement(self, fact: FactKind) -> bool {
        self.condition() == Some(fact)
    }

    /// Checks whether the given fact kind is this act's outcome.
    pub fn is_outcome(self, fact: FactKind) -> bool {
        self.outcome() == fact
    }
}

impl fmt::Display for ActKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ActKind::*;
        let s = match self {
            Initiating => "initiating",
            Requesting => "requesting",
            Promising => "promising",
            Declining => "declining",
            Quitting => "quitting",
            Executing => "executing",
            Stating => "stating",
            Accepting => "accepting",
            Rejecting => "rejecting",
            Stopping => "stopping",
            CancellingRequest => "cancelling_request",
            AllowingRequestCancellation => "allowing_request_cancellation",
            RefusingRequestCancellation => "refusing_request_cancellation",
            CancellingPromise => "cancelling_promise",
            AllowingPromiseCancellation => "allowing_promise_cancellation",
            RefusingPromiseCancellation => "refusing_promise_cancellation",
            CancellingState => "cancelling_state",
            AllowingStateCancellation => "allowing_state_cancellation",
            RefusingStateCancellation => "refusing_state_cancellation",
            CancellingAccept => "cancelling_accept",
            AllowingAcceptCancellation => "allowing_accept_cancellation",
            RefusingAcceptCancellation => "refusing_accept_cancellation",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_initiating_act_has_no_condition() {
        for act in ActKind::ALL {
            if act == ActKind::Initiating {
                assert!(act.condition().is_none());
            } else {
                assert!(act.condition().is_some(), "{act} must have a condition");
            }
        }
    }

    #[test]
    fn listener_is_opposite_of_performer() {
        for act in ActKind::ALL {
            assert_eq!(act.listener(), act.performer().opposite());
        }
    }

    #[test]
    fn has_requirement_matches_condition() {
        assert!(ActKind::Requesting.has_requirement(FactKind::Initiated));
        assert!(!ActKind::Requesting.has_requirement(FactKind::Requested));
        assert!(!ActKind::Initiating.has_requirement(FactKind::Initiated));
    }

    #[test]
    fn is_outcome_matches_outcome() {
        assert!(ActKind::Promising.is_outcome(FactKind::Promised));
        assert!(!ActKind::Promising.is_outcome(FactKind::Requested));
    }

    #[test]
    fn outcome_stays_within_the_acts_family() {
        for act in ActKind::ALL {
            assert_eq!(
                act.outcome().coordination_kind(),
                act.coordination_kind(),
                "{act} crosses families"
            );
        }
    }

    #[test]
    fn cancellation_acts_cover_all_four_sub_protocols() {
        let cancelling = ActKind::ALL
            .iter()
            .filter(|a| a.coordination_kind() == CoordinationKind::Cancellation)
            .count();
        assert_eq!(cancelling, 12);
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&ActKind::CancellingRequest).unwrap(),
            "\"cancelling_request\""
        );
        let act: ActKind = serde_json::from_str("\"allowing_state_cancellation\"").unwrap();
        assert_eq!(act, ActKind::AllowingStateCancellation);
    }

    #[test]
    fn display_matches_wire_token() {
        for act in ActKind::ALL {
            let json = serde_json::to_string(&act).unwrap();
            assert_eq!(json, format!("\"{}\"", act));
        }
    }
}
