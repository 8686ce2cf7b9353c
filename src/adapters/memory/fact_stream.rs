//! In-process multicast fact stream.
//!
//! `FactBroadcast` is a registry of channel senders invoked in emission
//! order. It enforces the per-exchange ordering contract (out-of-order
//! publication is rejected, never reordered), signals completion or failure
//! exactly once, and keeps the emitted history for test assertions and
//! optional late-subscriber replay.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use crate::domain::coordination::FactKind;
use crate::domain::exchange::CoordinationFact;
use crate::domain::foundation::{ActorRef, CoordinationError, ExchangeId};
use crate::ports::{Actor, FactSource, FactStreamItem, FactSubscription, SubscriptionId};

struct Subscriber {
    id: SubscriptionId,
    sender: mpsc::UnboundedSender<FactStreamItem>,
}

#[derive(Default)]
struct Inner {
    subscribers: Vec<Subscriber>,
    last_ordinals: HashMap<ExchangeId, u64>,
    history: Vec<CoordinationFact>,
    /// Terminal signal once the stream has completed or failed.
    closed: Option<FactStreamItem>,
}

/// Multicast push stream over coordination facts.
///
/// # Panics
///
/// Methods may panic if the internal lock is poisoned. This adapter is meant
/// for in-process use (tests, simulation harnesses).
#[derive(Default)]
pub struct FactBroadcast {
    inner: Mutex<Inner>,
    replay_on_subscribe: bool,
}

impl FactBroadcast {
    /// Creates a stream without replay: late subscribers only see facts
    /// emitted after they subscribe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a stream that replays the full history to late subscribers.
    pub fn with_replay() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            replay_on_subscribe: true,
        }
    }

    /// Creates a stream honoring the configured replay behavior.
    pub fn from_config(config: &crate::config::StreamConfig) -> Self {
        if config.replay_on_subscribe {
            Self::with_replay()
        } else {
            Self::new()
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("FactBroadcast: inner lock poisoned")
    }

    /// Publishes one fact to every live subscriber, in subscription order.
    ///
    /// # Errors
    ///
    /// - `StreamClosed` after completion or failure
    /// - `OutOfOrderFact` when the ordinal does not strictly increase within
    ///   its exchange
    pub fn publish(&self, fact: CoordinationFact) -> Result<(), CoordinationError> {
        let mut inner = self.lock();
        if inner.closed.is_some() {
            return Err(CoordinationError::StreamClosed);
        }

        let exchange = *fact.exchange_id();
        if let Some(&last) = inner.last_ordinals.get(&exchange) {
            if fact.ordinal() <= last {
                tracing::warn!(
                    "rejecting out-of-order fact {} for exchange {exchange}: ordinal {} after {last}",
                    fact.kind(),
                    fact.ordinal()
                );
                return Err(CoordinationError::OutOfOrderFact {
                    exchange,
                    last,
                    offered: fact.ordinal(),
                });
            }
        }
        inner.last_ordinals.insert(exchange, fact.ordinal());
        inner.history.push(fact.clone());

        // Deliver in registration order; drop subscribers that went away.
        inner
            .subscribers
            .retain(|subscriber| subscriber.sender.send(FactStreamItem::Fact(fact.clone())).is_ok());

        tracing::debug!("published {} (ordinal {}) for exchange {exchange}", fact.kind(), fact.ordinal());
        Ok(())
    }

    /// Signals that no further facts will be emitted. Idempotent.
    pub fn complete(&self) {
        self.close(FactStreamItem::Completed);
    }

    /// Signals failure; no further facts will be emitted. Idempotent.
    pub fn fail(&self, reason: impl Into<String>) {
        self.close(FactStreamItem::Failed(reason.into()));
    }

    fn close(&self, signal: FactStreamItem) {
        let mut inner = self.lock();
        if inner.closed.is_some() {
            return;
        }
        for subscriber in &inner.subscribers {
            let _ = subscriber.sender.send(signal.clone());
        }
        inner.subscribers.clear();
        inner.closed = Some(signal);
    }

    // === Test Helpers ===

    /// Returns all facts emitted so far (for test assertions).
    pub fn published_facts(&self) -> Vec<CoordinationFact> {
        self.lock().history.clone()
    }

    /// Returns emitted facts of a specific kind.
    pub fn facts_of_kind(&self, kind: FactKind) -> Vec<CoordinationFact> {
        self.published_facts()
            .into_iter()
            .filter(|fact| fact.kind() == kind)
            .collect()
    }

    /// Returns emitted facts of a specific exchange.
    pub fn facts_for_exchange(&self, exchange: &ExchangeId) -> Vec<CoordinationFact> {
        self.published_facts()
            .into_iter()
            .filter(|fact| fact.exchange_id() == exchange)
            .collect()
    }

    /// Returns the count of emitted facts.
    pub fn fact_count(&self) -> usize {
        self.lock().history.len()
    }

    /// Checks if a fact of the given kind was emitted.
    pub fn has_fact(&self, kind: FactKind) -> bool {
        self.lock().history.iter().any(|fact| fact.kind() == kind)
    }
}

#[async_trait::async_trait]
impl crate::ports::FactPublisher for FactBroadcast {
    async fn publish(&self, fact: CoordinationFact) -> Result<(), CoordinationError> {
        FactBroadcast::publish(self, fact)
    }
}

impl FactSource for FactBroadcast {
    fn subscribe(&self) -> FactSubscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = SubscriptionId::new();
        let mut inner = self.lock();

        if self.replay_on_subscribe {
            for fact in &inner.history {
                let _ = sender.send(FactStreamItem::Fact(fact.clone()));
            }
        }

        match &inner.closed {
            Some(signal) => {
                // The stream already ended; the subscriber only gets the
                // terminal signal (after any replay).
                let _ = sender.send(signal.clone());
            }
            None => inner.subscribers.push(Subscriber { id, sender }),
        }

        FactSubscription::new(id, receiver)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().subscribers.retain(|subscriber| subscriber.id != id);
    }
}

/// Minimal [`Actor`] over a shared [`FactBroadcast`].
///
/// A freshly created actor emits nothing until something is published on its
/// source.
pub struct BroadcastActor {
    name: ActorRef,
    source: Arc<FactBroadcast>,
}

impl BroadcastActor {
    /// Creates an actor with a fresh, silent fact source.
    pub fn new(name: ActorRef) -> Self {
        Self {
            name,
            source: Arc::new(FactBroadcast::new()),
        }
    }

    /// Creates an actor over an existing source.
    pub fn with_source(name: ActorRef, source: Arc<FactBroadcast>) -> Self {
        Self { name, source }
    }

    /// Returns the shared source for publishing.
    pub fn source(&self) -> Arc<FactBroadcast> {
        Arc::clone(&self.source)
    }
}

impl Actor for BroadcastActor {
    fn name(&self) -> &ActorRef {
        &self.name
    }

    fn fact_source(&self) -> &dyn FactSource {
        self.source.as_ref()
    }
}
