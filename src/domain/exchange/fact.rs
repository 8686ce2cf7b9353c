//! CoordinationFact - one emitted protocol event.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::coordination::{FactKind, Role};
use crate::domain::foundation::{
    ActorRef, CoordinationError, ExchangeId, FactDetails, FactId, Timestamp,
};

use super::{Exchange, FactLink};

/// One protocol step of an exchange, immutable once created.
///
/// # Invariants
///
/// - Created by the role identified as the kind's creator for the owning
///   exchange; a new fact is created, never mutated, for every step.
/// - `ordinal` is unique and strictly increasing within one exchange. The
///   assignment is a caller obligation (single-writer discipline); the
///   stream adapters reject violations rather than reorder.
/// - `occur` is an opaque hint from the clock collaborator; `ordinal` is the
///   authoritative order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinationFact {
    /// Unique identifier for this fact.
    id: FactId,

    /// The protocol state this fact establishes.
    kind: FactKind,

    /// The exchange this fact belongs to.
    exchange: Exchange,

    /// Position of this fact within its exchange.
    ordinal: u64,

    /// When the fact occurred, per the external clock.
    occur: Timestamp,

    /// Causal and conditional predecessors.
    links: Vec<FactLink>,

    /// Open payload extension bag.
    details: FactDetails,
}

impl CoordinationFact {
    /// Creates a new fact with no links and empty details.
    pub fn new(
        id: FactId,
        kind: FactKind,
        exchange: Exchange,
        ordinal: u64,
        occur: Timestamp,
    ) -> Self {
        Self {
            id,
            kind,
            exchange,
            ordinal,
            occur,
            links: Vec::new(),
            details: FactDetails::new(),
        }
    }

    /// Adds a link to a related fact.
    pub fn with_link(mut self, link: FactLink) -> Self {
        self.links.push(link);
        self
    }

    /// Replaces the details bag.
    pub fn with_details(mut self, details: FactDetails) -> Self {
        self.details = details;
        self
    }

    /// Adds one detail attribute.
    ///
    /// # Errors
    ///
    /// - `Serialization` if the value cannot be represented as JSON
    pub fn with_detail<V: Serialize>(
        mut self,
        key: impl Into<String>,
        value: V,
    ) -> Result<Self, CoordinationError> {
        self.details.insert(key, value)?;
        Ok(self)
    }

    /// Returns the fact ID.
    pub fn id(&self) -> &FactId {
        &self.id
    }

    /// Returns the protocol state this fact establishes.
    pub fn kind(&self) -> FactKind {
        self.kind
    }

    /// Returns the owning exchange.
    pub fn exchange(&self) -> &Exchange {
        &self.exchange
    }

    /// Returns the owning exchange's identity.
    pub fn exchange_id(&self) -> &ExchangeId {
        self.exchange.id()
    }

    /// Returns this fact's position within its exchange.
    pub fn ordinal(&self) -> u64 {
        self.ordinal
    }

    /// Returns when the fact occurred.
    pub fn occur(&self) -> &Timestamp {
        &self.occur
    }

    /// Returns the causal and conditional predecessors.
    pub fn links(&self) -> &[FactLink] {
        &self.links
    }

    /// Returns the open attribute bag.
    pub fn details(&self) -> &FactDetails {
        &self.details
    }

    /// Reads one detail attribute as a concrete type.
    pub fn detail<V: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<V>, CoordinationError> {
        self.details.get(key)
    }

    /// Returns the raw JSON value of one detail attribute.
    pub fn detail_raw(&self, key: &str) -> Option<&Value> {
        self.details.get_raw(key)
    }

    /// The participant that produced this fact, if the kind names one.
    pub fn creator_ref(&self) -> Option<&ActorRef> {
        self.exchange.creator_ref(self.kind)
    }

    /// The participant expected to respond, if the kind names one.
    pub fn responder_ref(&self) -> Option<&ActorRef> {
        self.exchange.responder_ref(self.kind)
    }

    /// True when no further acts are defined for either role.
    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }

    /// True if this fact obliges the given role to respond.
    pub fn is_agendum_for(&self, role: Role) -> bool {
        self.kind.is_agendum_for(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::exchange::{FactLinkKind, ParticipantType, ResultKind};
    use crate::domain::foundation::ResultKindId;

    fn delivery_exchange() -> Exchange {
        Exchange::new(
            ExchangeId::new(),
            ResultKind::new(
                ResultKindId::new("transport.delivery").unwrap(),
                ParticipantType::new("carrier").unwrap(),
                [ParticipantType::new("retailer").unwrap()],
            ),
            ActorRef::parse("region-1/carrier-7").unwrap(),
            Some(ActorRef::parse("region-1/retailer-2").unwrap()),
        )
    }

    fn fact(kind: FactKind, ordinal: u64) -> CoordinationFact {
        CoordinationFact::new(
            FactId::new(),
            kind,
            delivery_exchange(),
            ordinal,
            Timestamp::from_unix_secs(1000 + ordinal),
        )
    }

    #[test]
    fn new_fact_has_no_links_and_empty_details() {
        let fact = fact(FactKind::Initiated, 0);
        assert!(fact.links().is_empty());
        assert!(fact.details().is_empty());
        assert_eq!(fact.ordinal(), 0);
    }

    #[test]
    fn creator_and_responder_resolve_against_the_exchange() {
        let fact = fact(FactKind::Requested, 1);
        assert_eq!(fact.creator_ref().unwrap().value(), "retailer-2");
        assert_eq!(fact.responder_ref().unwrap().value(), "carrier-7");
    }

    #[test]
    fn terminal_fact_resolves_nobody() {
        let fact = fact(FactKind::Accepted, 7);
        assert!(fact.is_terminal());
        assert_eq!(fact.creator_ref(), None);
        assert_eq!(fact.responder_ref(), None);
    }

    #[test]
    fn is_agendum_for_delegates_to_the_kind() {
        let fact = fact(FactKind::Requested, 1);
        assert!(fact.is_agendum_for(Role::Executor));
        assert!(!fact.is_agendum_for(Role::Initiator));
    }

    #[test]
    fn with_link_records_the_settled_agendum() {
        let agendum = fact(FactKind::Requested, 1);
        let response = fact(FactKind::Promised, 2).with_link(FactLink::cause(&agendum));

        assert_eq!(response.links().len(), 1);
        assert_eq!(response.links()[0].kind(), FactLinkKind::Cause);
        assert_eq!(response.links()[0].fact_ref(), agendum.id());
    }

    #[test]
    fn with_detail_extends_the_bag() {
        let fact = fact(FactKind::Requested, 1)
            .with_detail("quantity", 3)
            .unwrap()
            .with_detail("unit", "pallet")
            .unwrap();

        assert_eq!(fact.detail::<u32>("quantity").unwrap(), Some(3));
        assert_eq!(fact.detail_raw("unit").unwrap(), "pallet");
        assert_eq!(fact.detail::<u32>("absent").unwrap(), None);
    }

    #[test]
    fn serialization_round_trips() {
        let agendum = fact(FactKind::Requested, 1);
        let original = fact(FactKind::Promised, 2)
            .with_link(FactLink::cause(&agendum))
            .with_detail("note", "by friday")
            .unwrap();

        let json = serde_json::to_string(&original).unwrap();
        let restored: CoordinationFact = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, original);
        assert_eq!(restored.kind(), FactKind::Promised);
        assert_eq!(restored.links()[0].fact_ref(), agendum.id());
        assert_eq!(
            restored.detail::<String>("note").unwrap(),
            Some("by friday".into())
        );
    }
}
