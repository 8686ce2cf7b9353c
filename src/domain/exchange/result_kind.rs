//! ResultKind - what a transaction produces.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::domain::foundation::{ResultKindId, ValidationError};

/// The capability classification of a participant (e.g. "retailer", "bank").
///
/// The engine never enforces role claims; result kinds merely advertise which
/// participant types fit each role so that registries and front-ends can.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantType(String);

impl ParticipantType {
    /// Creates a new ParticipantType, returning error if empty.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::empty_field("participant_type"));
        }
        Ok(Self(name))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named result capability: the participant type required of the executor
/// and the set of participant types acceptable as initiator.
///
/// Two result kinds are equal iff their identities are equal; the type sets
/// are descriptive, not part of identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultKind {
    id: ResultKindId,
    executor_type: ParticipantType,
    initiator_types: BTreeSet<ParticipantType>,
}

impl ResultKind {
    /// Creates a new result kind.
    pub fn new(
        id: ResultKindId,
        executor_type: ParticipantType,
        initiator_types: impl IntoIterator<Item = ParticipantType>,
    ) -> Self {
        Self {
            id,
            executor_type,
            initiator_types: initiator_types.into_iter().collect(),
        }
    }

    /// Returns the result kind identity.
    pub fn id(&self) -> &ResultKindId {
        &self.id
    }

    /// Returns the participant type required of the executor.
    pub fn executor_type(&self) -> &ParticipantType {
        &self.executor_type
    }

    /// Returns the participant types acceptable as initiator.
    pub fn initiator_types(&self) -> &BTreeSet<ParticipantType> {
        &self.initiator_types
    }

    /// Checks whether the given type may claim the executor role.
    pub fn accepts_executor_type(&self, participant_type: &ParticipantType) -> bool {
        &self.executor_type == participant_type
    }

    /// Checks whether the given type may claim the initiator role.
    pub fn accepts_initiator_type(&self, participant_type: &ParticipantType) -> bool {
        self.initiator_types.contains(participant_type)
    }
}

impl PartialEq for ResultKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ResultKind {}

impl Hash for ResultKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delivery() -> ResultKind {
        ResultKind::new(
            ResultKindId::new("transport.delivery").unwrap(),
            ParticipantType::new("carrier").unwrap(),
            [
                ParticipantType::new("retailer").unwrap(),
                ParticipantType::new("household").unwrap(),
            ],
        )
    }

    #[test]
    fn participant_type_rejects_empty_name() {
        assert!(ParticipantType::new("").is_err());
    }

    #[test]
    fn equality_is_by_identity_only() {
        let a = delivery();
        let b = ResultKind::new(
            ResultKindId::new("transport.delivery").unwrap(),
            ParticipantType::new("other-carrier").unwrap(),
            [],
        );
        assert_eq!(a, b);
    }

    #[test]
    fn different_identities_are_not_equal() {
        let a = delivery();
        let b = ResultKind::new(
            ResultKindId::new("retail.sale").unwrap(),
            ParticipantType::new("carrier").unwrap(),
            [],
        );
        assert_ne!(a, b);
    }

    #[test]
    fn accepts_executor_type_matches_required_type() {
        let kind = delivery();
        assert!(kind.accepts_executor_type(&ParticipantType::new("carrier").unwrap()));
        assert!(!kind.accepts_executor_type(&ParticipantType::new("retailer").unwrap()));
    }

    #[test]
    fn accepts_initiator_type_checks_the_set() {
        let kind = delivery();
        assert!(kind.accepts_initiator_type(&ParticipantType::new("retailer").unwrap()));
        assert!(kind.accepts_initiator_type(&ParticipantType::new("household").unwrap()));
        assert!(!kind.accepts_initiator_type(&ParticipantType::new("carrier").unwrap()));
    }

    #[test]
    fn serialization_round_trips() {
        let kind = delivery();
        let json = serde_json::to_string(&kind).unwrap();
        let restored: ResultKind = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, kind);
        assert_eq!(restored.initiator_types().len(), 2);
    }
}
