//! Controlling-fact resolution over an exchange's fact history.
//!
//! The latest fact of an exchange is not always the one that governs the
//! next act: once a cancellation sub-protocol ends, control returns to the
//! transaction chain. A refusal leaves the pending transaction fact in
//! charge; an allowance additionally undoes the cancelled fact, so control
//! falls back to the transaction fact before it. Allowing a promise
//! cancellation therefore puts the executor back on the pending request,
//! whose regress act is declining.

use crate::domain::coordination::{CoordinationKind, FactKind};

use super::CoordinationFact;

/// The fact governing the next act, given the exchange's facts in ascending
/// ordinal order.
///
/// Returns the latest fact while the transaction chain or a cancellation
/// sub-protocol is live; after a finished sub-protocol, the governing
/// transaction fact. `None` only for an empty history.
pub fn controlling_fact(facts: &[CoordinationFact]) -> Option<&CoordinationFact> {
    let latest = facts.last()?;
    if latest.kind().coordination_kind() == CoordinationKind::Transaction || !latest.is_terminal()
    {
        return Some(latest);
    }

    // A cancellation sub-protocol just ended; control returns to the
    // transaction chain, minus the fact an allowance undid.
    let mut undone = rolled_back_kind(latest.kind());
    for fact in facts.iter().rev() {
        if fact.kind().coordination_kind() != CoordinationKind::Transaction {
            continue;
        }
        if undone == Some(fact.kind()) {
            undone = None;
            continue;
        }
        return Some(fact);
    }
    None
}

/// The transaction fact a finished cancellation outcome undoes, if any.
fn rolled_back_kind(outcome: FactKind) -> Option<FactKind> {
    match outcome {
        FactKind::RequestCancellationAllowed => Some(FactKind::Requested),
        FactKind::PromiseCancellationAllowed => Some(FactKind::Promised),
        FactKind::StateCancellationAllowed => Some(FactKind::Stated),
        FactKind::AcceptCancellationAllowed => Some(FactKind::Accepted),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coordination::{ActKind, Role};
    use crate::domain::exchange::{Exchange, ParticipantType, ResultKind};
    use crate::domain::foundation::{ActorRef, ExchangeId, FactId, ResultKindId, Timestamp};

    fn history(kinds: &[FactKind]) -> Vec<CoordinationFact> {
        let exchange = Exchange::new(
            ExchangeId::new(),
            ResultKind::new(
                ResultKindId::new("transport.delivery").unwrap(),
                ParticipantType::new("carrier").unwrap(),
                [],
            ),
            ActorRef::parse("region-1/carrier-7").unwrap(),
            Some(ActorRef::parse("region-1/retailer-2").unwrap()),
        );
        kinds
            .iter()
            .enumerate()
            .map(|(ordinal, kind)| {
                CoordinationFact::new(
                    FactId::new(),
                    *kind,
                    exchange.clone(),
                    ordinal as u64,
                    Timestamp::from_unix_secs(1000 + ordinal as u64),
                )
            })
            .collect()
    }

    #[test]
    fn empty_history_has_no_controlling_fact() {
        assert!(controlling_fact(&[]).is_none());
    }

    #[test]
    fn a_live_transaction_is_controlled_by_its_latest_fact() {
        let facts = history(&[FactKind::Initiated, FactKind::Requested]);
        assert_eq!(controlling_fact(&facts).unwrap().kind(), FactKind::Requested);
    }

    #[test]
    fn a_live_cancellation_is_controlled_by_its_latest_fact() {
        let facts = history(&[
            FactKind::Initiated,
            FactKind::Requested,
            FactKind::RequestCancelled,
        ]);
        assert_eq!(
            controlling_fact(&facts).unwrap().kind(),
            FactKind::RequestCancelled
        );
    }

    #[test]
    fn a_refused_cancellation_leaves_the_pending_fact_in_charge() {
        let facts = history(&[
            FactKind::Initiated,
            FactKind::Requested,
            FactKind::RequestCancelled,
            FactKind::RequestCancellationRefused,
        ]);
        assert_eq!(controlling_fact(&facts).unwrap().kind(), FactKind::Requested);
    }

    #[test]
    fn an_allowed_request_cancellation_falls_back_to_initiated() {
        let facts = history(&[
            FactKind::Initiated,
            FactKind::Requested,
            FactKind::RequestCancelled,
            FactKind::RequestCancellationAllowed,
        ]);
        assert_eq!(controlling_fact(&facts).unwrap().kind(), FactKind::Initiated);
    }

    #[test]
    fn an_allowed_promise_cancellation_returns_control_to_declining() {
        let facts = history(&[
            FactKind::Initiated,
            FactKind::Requested,
            FactKind::Promised,
            FactKind::PromiseCancellationInitiated,
            FactKind::PromiseCancelled,
            FactKind::PromiseCancellationAllowed,
        ]);
        let controlling = controlling_fact(&facts).unwrap();
        assert_eq!(controlling.kind(), FactKind::Requested);
        // The executor, released from its promise, may now decline.
        assert_eq!(
            controlling.kind().default_response(Role::Executor, false),
            Some(ActKind::Declining)
        );
    }

    #[test]
    fn only_the_most_recent_occurrence_is_undone() {
        // Two requests: the allowance undoes the later one only.
        let facts = history(&[
            FactKind::Initiated,
            FactKind::Requested,
            FactKind::RequestCancelled,
            FactKind::RequestCancellationRefused,
            FactKind::Requested,
            FactKind::RequestCancelled,
            FactKind::RequestCancellationAllowed,
        ]);
        assert_eq!(controlling_fact(&facts).unwrap().kind(), FactKind::Requested);
        assert_eq!(controlling_fact(&facts).unwrap().ordinal(), 1);
    }

    #[test]
    fn a_terminal_transaction_fact_stays_in_charge() {
        let facts = history(&[
            FactKind::Initiated,
            FactKind::Requested,
            FactKind::Promised,
            FactKind::Executed,
            FactKind::Stated,
            FactKind::Accepted,
        ]);
        assert_eq!(controlling_fact(&facts).unwrap().kind(), FactKind::Accepted);
    }
}
