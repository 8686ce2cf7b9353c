//! Actor port - the capability every participant exposes.
//!
//! An actor does not own exchanges; it merely observes and produces facts.
//! Its stream is filterable by fact kind or result kind; the filters are
//! pure predicates over the stream and create no new facts.

use crate::domain::coordination::FactKind;
use crate::domain::exchange::CoordinationFact;
use crate::domain::foundation::{ActorRef, ResultKindId};

use super::{FactSource, FactStreamItem, FactSubscription, SubscriptionId};

/// Predicate selecting facts on a filtered subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum FactFilter {
    /// Only facts of one kind.
    Kind(FactKind),
    /// Only facts of exchanges producing one result kind.
    Result(ResultKindId),
}

impl FactFilter {
    /// Applies the predicate to one fact.
    pub fn matches(&self, fact: &CoordinationFact) -> bool {
        match self {
            FactFilter::Kind(kind) => fact.kind() == *kind,
            FactFilter::Result(id) => fact.exchange().result_kind().id() == id,
        }
    }
}

/// A subscription that only yields facts matching a predicate.
///
/// Terminal signals pass through unfiltered.
#[derive(Debug)]
pub struct FilteredFacts {
    inner: FactSubscription,
    filter: FactFilter,
}

impl FilteredFacts {
    /// Wraps a subscription with a predicate.
    pub fn new(inner: FactSubscription, filter: FactFilter) -> Self {
        Self { inner, filter }
    }

    /// Returns the underlying subscription's identity.
    pub fn id(&self) -> SubscriptionId {
        self.inner.id()
    }

    /// The next matching delivery, or `None` once the source is gone.
    pub async fn next(&mut self) -> Option<FactStreamItem> {
        loop {
            match self.inner.next().await? {
                FactStreamItem::Fact(fact) if !self.filter.matches(&fact) => continue,
                item => return Some(item),
            }
        }
    }

    /// The next matching fact, or `None` once the stream ended.
    pub async fn next_fact(&mut self) -> Option<CoordinationFact> {
        match self.next().await {
            Some(FactStreamItem::Fact(fact)) => Some(fact),
            _ => None,
        }
    }
}

/// The capability a participant must expose: an identity and a multicast
/// stream of the facts it has produced.
pub trait Actor: Send + Sync {
    /// This participant's hierarchical name.
    fn name(&self) -> &ActorRef;

    /// The multicast stream of facts this participant has produced.
    fn fact_source(&self) -> &dyn FactSource;

    /// Subscribes to this participant's facts of one kind.
    fn emit(&self, kind: FactKind) -> FilteredFacts {
        FilteredFacts::new(self.fact_source().subscribe(), FactFilter::Kind(kind))
    }

    /// Subscribes to this participant's facts toward one result kind.
    fn emit_for(&self, result_kind: ResultKindId) -> FilteredFacts {
        FilteredFacts::new(
            self.fact_source().subscribe(),
            FactFilter::Result(result_kind),
        )
    }
}
