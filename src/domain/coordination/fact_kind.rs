//! FactKind enum - the protocol states - and the decision algorithm.
//!
//! Each fact is one state of an exchange. A fact names the role expected to
//! respond (none for terminal states) and up to two candidate response acts:
//! the forward response first, then the regress response if the state can be
//! rolled back. [`FactKind::default_response`] is the decision procedure a
//! participant runs against the latest fact of its exchange.
//!
//! The transaction family is a single chain:
//!
//! ```text
//! Initiated -> Requested -> {Promised | Declined -> Quit}
//! Promised -> Executed -> Stated -> {Accepted | Rejected -> Stopped}
//! ```
//!
//! The four cancellation sub-protocols are structurally identical diamonds
//! over a pending request, promise, state or accept:
//!
//! ```text
//! XCancellationInitiated -> XCancelled -> {XCancellationAllowed | XCancellationRefused}
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{CoordinationError, DefinitionError};

use super::{ActKind, CoordinationKind, Role};

/// A coordination fact: one state of a result exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
    // Transaction family
    Initiated,
    Requested,
    Declined,
    Quit,
    Promised,
    Executed,
    Stated,
    Rejected,
    Stopped,
    Accepted,
    // Cancellation of a pending request
    RequestCancellationInitiated,
    RequestCancelled,
    RequestCancellationAllowed,
    RequestCancellationRefused,
    // Cancellation of a pending promise
    PromiseCancellationInitiated,
    PromiseCancelled,
    PromiseCancellationAllowed,
    PromiseCancellationRefused,
    // Cancellation of a pending state
    StateCancellationInitiated,
    StateCancelled,
    StateCancellationAllowed,
    StateCancellationRefused,
    // Cancellation of a pending accept
    AcceptCancellationInitiated,
    AcceptCancelled,
    AcceptCancellationAllowed,
    AcceptCancellationRefused,
}

/// The fixed definition row of one fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FactRow {
    pub family: CoordinationKind,
    pub responder: Option<Role>,
    /// Candidate responses: index 0 is the forward act, index 1 the regress.
    pub responses: &'static [ActKind],
}

const fn row(
    family: CoordinationKind,
    responder: Option<Role>,
    responses: &'static [ActKind],
) -> FactRow {
    FactRow {
        family,
        responder,
        responses,
    }
}

use super::ActKind as A;
use super::CoordinationKind::{Cancellation, Transaction};
use super::Role::{Executor, Initiator};

impl FactKind {
    /// All facts, in definition order.
    pub const ALL: [FactKind; 26] = [
        FactKind::Initiated,
        FactKind::Requested,
        FactKind::Declined,
        FactKind::Quit,
        FactKind::Promised,
        FactKind::Executed,
        FactKind::Stated,
        FactKind::Rejected,
        FactKind::Stopped,
        FactKind::Accepted,
        FactKind::RequestCancellationInitiated,
        FactKind::RequestCancelled,
        FactKind::RequestCancellationAllowed,
        FactKind::RequestCancellationRefused,
        FactKind::PromiseCancellationInitiated,
        FactKind::PromiseCancelled,
        FactKind::PromiseCancellationAllowed,
        FactKind::PromiseCancellationRefused,
        FactKind::StateCancellationInitiated,
        FactKind::StateCancelled,
        FactKind::StateCancellationAllowed,
        FactKind::StateCancellationRefused,
        FactKind::AcceptCancellationInitiated,
        FactKind::AcceptCancelled,
        FactKind::AcceptCancellationAllowed,
        FactKind::AcceptCancellationRefused,
    ];

    pub(crate) const fn definition(self) -> FactRow {
        use FactKind::*;
        match self {
            Initiated => row(Transaction, Some(Initiator), &[A::Requesting]),
            Requested => row(Transaction, Some(Executor), &[A::Promising, A::Declining]),
            Declined => row(Transaction, Some(Initiator), &[A::Quitting]),
            Quit => row(Transaction, None, &[]),
            Promised => row(Transaction, Some(Executor), &[A::Executing]),
            Executed => row(Transaction, Some(Executor), &[A::Stating]),
            Stated => row(Transaction, Some(Initiator), &[A::Accepting, A::Rejecting]),
            Rejected => row(Transaction, Some(Executor), &[A::Stopping]),
            Stopped => row(Transaction, None, &[]),
            Accepted => row(Transaction, None, &[]),
            RequestCancellationInitiated => {
                row(Cancellation, Some(Initiator), &[A::CancellingRequest])
            }
            RequestCancelled => row(
                Cancellation,
                Some(Executor),
                &[
                    A::AllowingRequestCancellation,
                    A::RefusingRequestCancellation,
                ],
            ),
            RequestCancellationAllowed => row(Cancellation, None, &[]),
            RequestCancellationRefused => row(Cancellation, None, &[]),
            PromiseCancellationInitiated => {
                row(Cancellation, Some(Executor), &[A::CancellingPromise])
            }
            PromiseCancelled => row(
                Cancellation,
                Some(Initiator),
                &[
                    A::AllowingPromiseCancellation,
                    A::RefusingPromiseCancellation,
                ],
            ),
            PromiseCancellationAllowed => row(Cancellation, None, &[]),
            PromiseCancellationRefused => row(Cancellation, None, &[]),
            StateCancellationInitiated => row(Cancellation, Some(Executor), &[A::CancellingState]),
            StateCancelled => row(
                Cancellation,
                Some(Initiator),
                &[A::AllowingStateCancellation, A::RefusingStateCancellation],
            ),
            StateCancellationAllowed => row(Cancellation, None, &[]),
            StateCancellationRefused => row(Cancellation, None, &[]),
            AcceptCancellationInitiated => {
                row(Cancellation, Some(Initiator), &[A::CancellingAccept])
            }
            AcceptCancelled => row(
                Cancellation,
                Some(Executor),
                &[A::AllowingAcceptCancellation, A::RefusingAcceptCancellation],
            ),
            AcceptCancellationAllowed => row(Cancellation, None, &[]),
            AcceptCancellationRefused => row(Cancellation, None, &[]),
        }
    }

    /// The protocol family this fact belongs to.
    pub fn coordination_kind(self) -> CoordinationKind {
        self.definition().family
    }

    /// The role expected to respond to this fact; `None` for terminal facts.
    pub fn responder_role(self) -> Option<Role> {
        self.definition().responder
    }

    /// The role that produced this fact, derived as the responder's opposite.
    pub fn creator_role(self) -> Option<Role> {
        self.responder_role().map(Role::opposite)
    }

    /// The candidate response acts: forward first, then regress if present.
    pub fn response_acts(self) -> &'static [ActKind] {
        ensure_verified();
        self.definition().responses
    }

    /// A fact is terminal when no further acts are defined for either role.
    pub fn is_terminal(self) -> bool {
        self.response_acts().is_empty()
    }

    /// True if this fact obliges the given role to respond with some act.
    pub fn is_agendum_for(self, role: Role) -> bool {
        self.default_response(role, true).is_some()
    }

    /// A proposed act is a legal response iff the proposer is not the role
    /// whose turn it is (the waiting party may act unsolicited, which covers
    /// cancellation attempts), or the act is one of this fact's responses.
    pub fn is_valid_response(self, response: ActKind) -> bool {
        self.responder_role() != Some(response.performer())
            || self.response_acts().contains(&response)
    }

    /// The decision procedure: which act should a participant in `role`
    /// perform next, observing this fact as the latest state of its exchange?
    ///
    /// Returns `None` when the participant must wait or the exchange (or
    /// cancellation sub-protocol) has ended; callers must treat that as an
    /// ordinary outcome, never as an error.
    pub fn default_response(self, role: Role, proceed: bool) -> Option<ActKind> {
        ensure_verified();
        if self.is_terminal() {
            return None;
        }
        match self.responder_role() {
            Some(responder) if responder != role => {
                // Not this role's turn. Proceeding means waiting, and a
                // cancellation may not itself be cancelled.
                if proceed || self.coordination_kind() == Cancellation {
                    None
                } else {
                    self.rollback_target()
                }
            }
            _ => {
                let responses = self.response_acts();
                if proceed {
                    responses.first().copied()
                } else if responses.len() < 2 {
                    None
                } else {
                    Some(responses[1])
                }
            }
        }
    }

    /// Composes [`is_valid_response`](Self::is_valid_response) with
    /// [`default_response`](Self::default_response).
    ///
    /// # Errors
    ///
    /// - `NoDefaultResponse` if there is no default response for the given
    ///   arguments; callers must check `default_response` first.
    pub fn is_valid_default_response(
        self,
        role: Role,
        proceed: bool,
    ) -> Result<bool, CoordinationError> {
        match self.default_response(role, proceed) {
            Some(response) => Ok(self.is_valid_response(response)),
            None => Err(CoordinationError::NoDefaultResponse {
                fact: self,
                role,
                proceed,
            }),
        }
    }

    /// The single cancellation act that rolls back this pending fact.
    ///
    /// Only five transaction states are rollback-eligible and they map onto
    /// two targets, so the promise and accept cancellation sub-protocols are
    /// not reachable through this path. Flagged for product-owner review;
    /// do not extend the mapping without one.
    fn rollback_target(self) -> Option<ActKind> {
        use FactKind::*;
        match self {
            Requested | Promised | Executed | Rejected => Some(A::CancellingRequest),
            Stated => Some(A::CancellingState),
            _ => None,
        }
    }
}

impl fmt::Display for FactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FactKind::*;
        let s = match self {
            Initiated => "initiated",
            Requested => "requested",
            Declined => "declined",
            Quit => "quit",
            Promised => "promised",
            Executed => "executed",
            Stated => "stated",
            Rejected => "rejected",
            Stopped => "stopped",
            Accepted => "accepted",
            RequestCancellationInitiated => "request_cancellation_initiated",
            RequestCancelled => "request_cancelled",
            RequestCancellationAllowed => "request_cancellation_allowed",
            RequestCancellationRefused => "request_cancellation_refused",
            PromiseCancellationInitiated => "promise_cancellation_initiated",
            PromiseCancelled => "promise_cancelled",
            PromiseCancellationAllowed => "promise_cancellation_allowed",
            PromiseCancellationRefused => "promise_cancellation_refused",
            StateCancellationInitiated => "state_cancellation_initiated",
            StateCancelled => "state_cancelled",
            StateCancellationAllowed => "state_cancellation_allowed",
            StateCancellationRefused => "state_cancellation_refused",
            AcceptCancellationInitiated => "accept_cancellation_initiated",
            AcceptCancelled => "accept_cancelled",
            AcceptCancellationAllowed => "accept_cancellation_allowed",
            AcceptCancellationRefused => "accept_cancellation_refused",
        };
        write!(f, "{}", s)
    }
}

/// One-time verification of both transition tables, forced on first use of
/// the decision algorithm. A malformed table aborts here.
static VERIFIED: Lazy<()> = Lazy::new(|| {
    if let Err(err) = verify_definitions() {
        panic!("{err}");
    }
});

fn ensure_verified() {
    Lazy::force(&VERIFIED);
}

/// Verifies the cross-references of the act and fact tables.
///
/// Checked invariants:
/// - only the exchange-initiating act lacks a condition;
/// - every other act's condition assigns its performer as responder;
/// - every act's listener is the performer's opposite;
/// - every act's outcome stays within the act's family;
/// - a fact defines at most two response acts;
/// - a fact has a responder exactly when it has responses;
/// - every response act's condition is the fact that lists it;
/// - every rollback target is a cancellation act validly performable by the
///   waiting role of its source state.
pub fn verify_definitions() -> Result<(), DefinitionError> {
    for act in ActKind::ALL {
        let def = act.definition();
        if def.listener != def.performer.opposite() {
            return Err(DefinitionError::new(format!(
                "act {act}: listener must be the performer's opposite"
            )));
        }
        if def.outcome.definition().family != def.family {
            return Err(DefinitionError::new(format!(
                "act {act}: outcome {} leaves the {} family",
                def.outcome, def.family
            )));
        }
        match def.condition {
            None => {
                if act != ActKind::Initiating {
                    return Err(DefinitionError::new(format!(
                        "act {act}: only the exchange-initiating act may lack a condition"
                    )));
                }
            }
            Some(condition) => {
                if condition.definition().responder != Some(def.performer) {
                    return Err(DefinitionError::new(format!(
                        "act {act}: condition {condition} does not assign {} as responder",
                        def.performer
                    )));
                }
            }
        }
    }

    for fact in FactKind::ALL {
        let def = fact.definition();
        if def.responses.len() > 2 {
            return Err(DefinitionError::new(format!(
                "fact {fact}: more than two response acts"
            )));
        }
        if def.responder.is_none() != def.responses.is_empty() {
            return Err(DefinitionError::new(format!(
                "fact {fact}: responder and responses must be absent together"
            )));
        }
        for response in def.responses {
            if response.definition().condition != Some(fact) {
                return Err(DefinitionError::new(format!(
                    "fact {fact}: response act {response} is not conditioned on it"
                )));
            }
        }
    }

    for fact in FactKind::ALL {
        if let Some(target) = fact.rollback_target() {
            let responder = fact.definition().responder.ok_or_else(|| {
                DefinitionError::new(format!("fact {fact}: terminal fact has a rollback target"))
            })?;
            if target.definition().family != Cancellation {
                return Err(DefinitionError::new(format!(
                    "fact {fact}: rollback target {target} is not a cancellation act"
                )));
            }
            if target.definition().performer != responder.opposite() {
                return Err(DefinitionError::new(format!(
                    "fact {fact}: rollback target {target} is not performed by the waiting role"
                )));
            }
        }
    }

    Ok(())
}
