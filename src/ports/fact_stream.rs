//! Fact stream port - the multicast push stream participants expose.
//!
//! Any number of independent consumers may subscribe; each receives every
//! fact emitted after subscription, in emission order, until it unsubscribes
//! or the source signals completion or failure. There is no replay for late
//! subscribers unless the adapter providing the stream adds one.
//!
//! Ordering contract: for a single exchange, facts must reach every
//! subscriber in strictly increasing ordinal order; adapters reject
//! out-of-order publication rather than silently reorder.

use futures::Stream;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::exchange::CoordinationFact;

/// Unique identifier for one stream subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Creates a new random SubscriptionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One delivery on a fact stream.
#[derive(Debug, Clone, PartialEq)]
pub enum FactStreamItem {
    /// A newly emitted fact.
    Fact(CoordinationFact),
    /// The source will emit nothing further.
    Completed,
    /// The source failed and will emit nothing further.
    Failed(String),
}

/// A consumer's handle on a fact stream.
///
/// Dropping the subscription is equivalent to unsubscribing.
#[derive(Debug)]
pub struct FactSubscription {
    id: SubscriptionId,
    receiver: mpsc::UnboundedReceiver<FactStreamItem>,
}

impl FactSubscription {
    /// Wraps a receiver registered with a fact source.
    pub fn new(id: SubscriptionId, receiver: mpsc::UnboundedReceiver<FactStreamItem>) -> Self {
        Self { id, receiver }
    }

    /// Returns this subscription's identity, usable for unsubscription.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The next delivery, or `None` once the source is gone.
    pub async fn next(&mut self) -> Option<FactStreamItem> {
        self.receiver.recv().await
    }

    /// The next fact, or `None` once the stream completed, failed or is gone.
    pub async fn next_fact(&mut self) -> Option<CoordinationFact> {
        match self.next().await {
            Some(FactStreamItem::Fact(fact)) => Some(fact),
            _ => None,
        }
    }

    /// Turns the subscription into an asynchronous stream of deliveries.
    pub fn into_stream(self) -> impl Stream<Item = FactStreamItem> {
        futures::stream::unfold(self, |mut subscription| async move {
            subscription
                .next()
                .await
                .map(|item| (item, subscription))
        })
    }
}

/// Port for a participant's multicast fact stream.
pub trait FactSource: Send + Sync {
    /// Registers a new subscriber; it receives every subsequent emission.
    fn subscribe(&self) -> FactSubscription;

    /// Removes a subscriber. Idempotent; never affects other subscribers or
    /// the underlying fact history.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Port for emitting facts onto a stream.
#[async_trait::async_trait]
pub trait FactPublisher: Send + Sync {
    /// Publish a single fact to every subscriber, in emission order.
    ///
    /// # Errors
    ///
    /// - `StreamClosed` after completion or failure
    /// - `OutOfOrderFact` when the ordinal does not strictly increase within
    ///   its exchange
    async fn publish(&self, fact: CoordinationFact) -> Result<(), crate::domain::foundation::CoordinationError>;
}
