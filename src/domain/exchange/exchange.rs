//! Exchange aggregate - one concrete run of the protocol.

use serde::{Deserialize, Serialize};

use crate::domain::coordination::{FactKind, Role};
use crate::domain::foundation::{ActorRef, CoordinationError, ExchangeId};

use super::ResultKind;

/// One running transaction instance between a concrete initiator and
/// executor, toward one result.
///
/// # Invariants
///
/// - Immutable once created; every protocol step is a new fact, never a
///   mutation of the exchange.
/// - The initiator defaults to the executor when self-initiated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    /// Unique identifier for this exchange.
    id: ExchangeId,

    /// What this exchange produces.
    result_kind: ResultKind,

    /// The participant holding the executor role.
    executor_ref: ActorRef,

    /// The participant holding the initiator role.
    initiator_ref: ActorRef,
}

impl Exchange {
    /// Creates a new exchange.
    ///
    /// When `initiator_ref` is `None` the exchange is self-initiated and the
    /// executor fills both roles.
    pub fn new(
        id: ExchangeId,
        result_kind: ResultKind,
        executor_ref: ActorRef,
        initiator_ref: Option<ActorRef>,
    ) -> Self {
        let initiator_ref = initiator_ref.unwrap_or_else(|| executor_ref.clone());
        Self {
            id,
            result_kind,
            executor_ref,
            initiator_ref,
        }
    }

    /// Returns the exchange ID.
    pub fn id(&self) -> &ExchangeId {
        &self.id
    }

    /// Returns the result kind this exchange produces.
    pub fn result_kind(&self) -> &ResultKind {
        &self.result_kind
    }

    /// Returns the executor's name.
    pub fn executor_ref(&self) -> &ActorRef {
        &self.executor_ref
    }

    /// Returns the initiator's name.
    pub fn initiator_ref(&self) -> &ActorRef {
        &self.initiator_ref
    }

    /// Returns the participant holding the given role.
    pub fn participant_ref(&self, role: Role) -> &ActorRef {
        match role {
            Role::Initiator => &self.initiator_ref,
            Role::Executor => &self.executor_ref,
        }
    }

    /// Returns the exchange's aggregation root, derived from the executor.
    pub fn root_ref(&self) -> &ActorRef {
        self.executor_ref.root_ref()
    }

    /// True when the executor initiated the exchange for itself.
    pub fn is_self_initiated(&self) -> bool {
        self.initiator_ref == self.executor_ref
    }

    /// Returns the counterpart of the given participant.
    ///
    /// # Errors
    ///
    /// - `NotAParticipant` if the name holds neither role; this signals a
    ///   caller logic error, not a recoverable condition.
    pub fn opposite_ref(&self, name: &ActorRef) -> Result<&ActorRef, CoordinationError> {
        if name == &self.executor_ref {
            Ok(&self.initiator_ref)
        } else if name == &self.initiator_ref {
            Ok(&self.executor_ref)
        } else {
            Err(CoordinationError::NotAParticipant {
                name: name.path(),
                exchange: self.id,
            })
        }
    }

    /// Resolves the creator role of the given fact kind to a participant.
    pub fn creator_ref(&self, kind: FactKind) -> Option<&ActorRef> {
        kind.creator_role().map(|role| self.participant_ref(role))
    }

    /// Resolves the responder role of the given fact kind to a participant.
    pub fn responder_ref(&self, kind: FactKind) -> Option<&ActorRef> {
        kind.responder_role().map(|role| self.participant_ref(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ResultKindId;
    use crate::domain::exchange::ParticipantType;

    fn delivery_kind() -> ResultKind {
        ResultKind::new(
            ResultKindId::new("transport.delivery").unwrap(),
            ParticipantType::new("carrier").unwrap(),
            [ParticipantType::new("retailer").unwrap()],
        )
    }

    fn two_party_exchange() -> Exchange {
        Exchange::new(
            ExchangeId::new(),
            delivery_kind(),
            ActorRef::parse("region-1/carrier-7").unwrap(),
            Some(ActorRef::parse("region-1/retailer-2").unwrap()),
        )
    }

    #[test]
    fn participant_ref_is_total_over_both_roles() {
        let exchange = two_party_exchange();
        assert_eq!(
            exchange.participant_ref(Role::Executor).value(),
            "carrier-7"
        );
        assert_eq!(
            exchange.participant_ref(Role::Initiator).value(),
            "retailer-2"
        );
    }

    #[test]
    fn self_initiated_exchange_defaults_initiator_to_executor() {
        let executor = ActorRef::parse("region-1/carrier-7").unwrap();
        let exchange = Exchange::new(ExchangeId::new(), delivery_kind(), executor.clone(), None);

        assert!(exchange.is_self_initiated());
        assert_eq!(exchange.initiator_ref(), &executor);
        assert_eq!(exchange.opposite_ref(&executor).unwrap(), &executor);
    }

    #[test]
    fn two_party_exchange_is_not_self_initiated() {
        assert!(!two_party_exchange().is_self_initiated());
    }

    #[test]
    fn opposite_ref_swaps_participants() {
        let exchange = two_party_exchange();
        assert_eq!(
            exchange.opposite_ref(exchange.executor_ref()).unwrap(),
            &ActorRef::parse("region-1/retailer-2").unwrap()
        );
        assert_eq!(
            exchange.opposite_ref(exchange.initiator_ref()).unwrap(),
            &ActorRef::parse("region-1/carrier-7").unwrap()
        );
    }

    #[test]
    fn opposite_ref_fails_for_strangers() {
        let exchange = two_party_exchange();
        let stranger = ActorRef::parse("region-9/bank-1").unwrap();
        let err = exchange.opposite_ref(&stranger).unwrap_err();
        assert!(matches!(err, CoordinationError::NotAParticipant { .. }));
    }

    #[test]
    fn root_ref_is_derived_from_the_executor() {
        let exchange = two_party_exchange();
        assert_eq!(exchange.root_ref().value(), "region-1");
    }

    #[test]
    fn creator_and_responder_resolve_through_roles() {
        let exchange = two_party_exchange();
        // Requested: created by the initiator, awaiting the executor.
        assert_eq!(
            exchange.creator_ref(FactKind::Requested).unwrap().value(),
            "retailer-2"
        );
        assert_eq!(
            exchange.responder_ref(FactKind::Requested).unwrap().value(),
            "carrier-7"
        );
        // Terminal facts resolve to nobody.
        assert_eq!(exchange.creator_ref(FactKind::Accepted), None);
        assert_eq!(exchange.responder_ref(FactKind::Accepted), None);
    }

    #[test]
    fn serialization_round_trips() {
        let exchange = two_party_exchange();
        let json = serde_json::to_string(&exchange).unwrap();
        let restored: Exchange = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, exchange);
    }
}
