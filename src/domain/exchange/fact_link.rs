//! FactLink - typed weak references between coordination facts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{FactId, ResultKindId};
use crate::ports::FactRepository;

use super::CoordinationFact;

/// How the linked fact relates to the linking one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactLinkKind {
    /// The linked fact is the agendum this fact settles.
    Cause,
    /// The linked fact conditions this one without being settled by it.
    Condition,
}

impl fmt::Display for FactLinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FactLinkKind::Cause => "cause",
            FactLinkKind::Condition => "condition",
        };
        write!(f, "{}", s)
    }
}

/// A reference from one fact to a causally or conditionally related fact.
///
/// This is a weak reference, not an ownership relation: the linked fact may
/// not be locally available, and resolution legitimately yielding nothing is
/// an ordinary outcome, never an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactLink {
    kind: FactLinkKind,
    fact_ref: FactId,
    result_kind: ResultKindId,
    /// Locally cached handle to the linked fact, when it was in hand at link
    /// creation. Not part of the wire representation.
    #[serde(skip)]
    fact: Option<Box<CoordinationFact>>,
}

impl FactLink {
    /// Links to a fact that is locally in hand, caching the handle.
    pub fn to_fact(kind: FactLinkKind, fact: &CoordinationFact) -> Self {
        Self {
            kind,
            fact_ref: *fact.id(),
            result_kind: fact.exchange().result_kind().id().clone(),
            fact: Some(Box::new(fact.clone())),
        }
    }

    /// Links to the agendum fact this fact settles.
    pub fn cause(fact: &CoordinationFact) -> Self {
        Self::to_fact(FactLinkKind::Cause, fact)
    }

    /// Links to a conditioning fact.
    pub fn condition(fact: &CoordinationFact) -> Self {
        Self::to_fact(FactLinkKind::Condition, fact)
    }

    /// Creates an unresolved link from identities alone.
    pub fn unresolved(kind: FactLinkKind, fact_ref: FactId, result_kind: ResultKindId) -> Self {
        Self {
            kind,
            fact_ref,
            result_kind,
            fact: None,
        }
    }

    /// Returns the relation kind of this link.
    pub fn kind(&self) -> FactLinkKind {
        self.kind
    }

    /// Returns the linked fact's identity.
    pub fn fact_ref(&self) -> &FactId {
        &self.fact_ref
    }

    /// Returns the result kind of the exchange the linked fact belongs to.
    pub fn result_kind(&self) -> &ResultKindId {
        &self.result_kind
    }

    /// Returns the locally cached handle, if any.
    pub fn fact(&self) -> Option<&CoordinationFact> {
        self.fact.as_deref()
    }

    /// Best-effort resolution of the linked fact.
    ///
    /// Uses the cached handle when present, otherwise looks the fact up in
    /// the given repository. Returns `None` when the fact is not locally
    /// available, including when the lookup itself fails.
    pub async fn resolve(&self, facts: &dyn FactRepository) -> Option<CoordinationFact> {
        if let Some(fact) = &self.fact {
            return Some(fact.as_ref().clone());
        }
        match facts.find_by_id(&self.fact_ref).await {
            Ok(found) => found,
            Err(err) => {
                tracing::debug!("link to {} did not resolve: {err}", self.fact_ref);
                None
            }
        }
    }
}

impl PartialEq for FactLink {
    /// Link equality ignores the cached handle.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.fact_ref == other.fact_ref
            && self.result_kind == other.result_kind
    }
}

impl Eq for FactLink {}
