//! OpenCancellationHandler - Command handler for entering a cancellation
//! sub-protocol explicitly.
//!
//! The rollback shortcut in the decision algorithm jumps straight to the
//! cancelling act; this handler records the sub-protocol's entry fact
//! instead, for callers that announce a cancellation before stating it.

use std::sync::Arc;

use crate::domain::coordination::{CoordinationKind, FactKind};
use crate::domain::exchange::{controlling_fact, CoordinationFact, FactLink};
use crate::domain::foundation::{CoordinationError, ExchangeId, FactDetails};
use crate::ports::{Clock, ExchangeRepository, FactPublisher, FactRepository, IdentityProvider};

/// Which pending fact the cancellation sub-protocol targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationScope {
    Request,
    Promise,
    State,
    Accept,
}

impl CancellationScope {
    /// The entry state of the targeted sub-protocol.
    pub fn entry_fact(self) -> FactKind {
        match self {
            CancellationScope::Request => FactKind::RequestCancellationInitiated,
            CancellationScope::Promise => FactKind::PromiseCancellationInitiated,
            CancellationScope::State => FactKind::StateCancellationInitiated,
            CancellationScope::Accept => FactKind::AcceptCancellationInitiated,
        }
    }
}

/// Command to announce a cancellation on an open exchange.
#[derive(Debug, Clone)]
pub struct OpenCancellationCommand {
    pub exchange_id: ExchangeId,
    pub scope: CancellationScope,
    pub details: FactDetails,
}

/// Handler for announcing cancellations.
pub struct OpenCancellationHandler {
    exchanges: Arc<dyn ExchangeRepository>,
    facts: Arc<dyn FactRepository>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdentityProvider>,
    publisher: Arc<dyn FactPublisher>,
}

impl OpenCancellationHandler {
    pub fn new(
        exchanges: Arc<dyn ExchangeRepository>,
        facts: Arc<dyn FactRepository>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdentityProvider>,
        publisher: Arc<dyn FactPublisher>,
    ) -> Self {
        Self {
            exchanges,
            facts,
            clock,
            ids,
            publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: OpenCancellationCommand,
    ) -> Result<CoordinationFact, CoordinationError> {
        // 1. Load the exchange and its latest fact
        let exchange = self
            .exchanges
            .find_by_id(&cmd.exchange_id)
            .await?
            .ok_or(CoordinationError::UnknownExchange(cmd.exchange_id))?;

        let history = self.facts.find_by_exchange(&cmd.exchange_id).await?;
        let latest_ordinal = history
            .last()
            .map(CoordinationFact::ordinal)
            .ok_or(CoordinationError::EmptyExchange(cmd.exchange_id))?;
        let controlling = controlling_fact(&history)
            .cloned()
            .ok_or(CoordinationError::EmptyExchange(cmd.exchange_id))?;

        // 2. Only a pending transaction fact can be cancelled
        if controlling.kind().coordination_kind() == CoordinationKind::Cancellation {
            return Err(CoordinationError::CancellationInProgress(cmd.exchange_id));
        }
        if controlling.is_terminal() {
            return Err(CoordinationError::ExchangeClosed(cmd.exchange_id));
        }

        // 3. Record the sub-protocol entry fact, conditioned on the pending one
        let fact = CoordinationFact::new(
            self.ids.next_fact_id(),
            cmd.scope.entry_fact(),
            exchange,
            latest_ordinal + 1,
            self.clock.now(),
        )
        .with_link(FactLink::condition(&controlling))
        .with_details(cmd.details);
        self.facts.save(&fact).await?;

        // 4. Publish to the stream
        self.publisher.publish(fact.clone()).await?;

        tracing::info!(
            "cancellation announced on {}: {} while {} pending",
            cmd.exchange_id,
            fact.kind(),
            controlling.kind(),
        );
        Ok(fact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::ManualClock;
    use crate::adapters::identity::UuidIdentityProvider;
    use crate::adapters::memory::{
        FactBroadcast, InMemoryExchangeRepository, InMemoryFactRepository,
        InMemoryResultKindRegistry,
    };
    use crate::application::handlers::{
        AdvanceExchangeCommand, AdvanceExchangeHandler, OpenExchangeCommand, OpenExchangeHandler,
    };
    use crate::domain::coordination::Role;
    use crate::domain::exchange::{FactLinkKind, ParticipantType, ResultKind};
    use crate::domain::foundation::{ActorRef, ResultKindId, Timestamp};
    use crate::ports::ResultKindRegistry;

    struct Fixture {
        open: OpenExchangeHandler,
        advance: AdvanceExchangeHandler,
        cancel: OpenCancellationHandler,
    }

    async fn fixture() -> Fixture {
        let result_kinds = Arc::new(InMemoryResultKindRegistry::new());
        result_kinds
            .register(ResultKind::new(
                ResultKindId::new("transport.delivery").unwrap(),
                ParticipantType::new("carrier").unwrap(),
                [ParticipantType::new("retailer").unwrap()],
            ))
            .await
            .unwrap();

        let exchanges = Arc::new(InMemoryExchangeRepository::new());
        let facts = Arc::new(InMemoryFactRepository::new());
        let stream = Arc::new(FactBroadcast::new());
        let clock = Arc::new(ManualClock::starting_at(Timestamp::from_unix_secs(1000)));
        let ids = Arc::new(UuidIdentityProvider::new());

        Fixture {
            open: OpenExchangeHandler::new(
                result_kinds,
                exchanges.clone(),
                facts.clone(),
                clock.clone(),
                ids.clone(),
                stream.clone(),
            ),
            advance: AdvanceExchangeHandler::new(
                exchanges.clone(),
                facts.clone(),
                clock.clone(),
                ids.clone(),
                stream.clone(),
            ),
            cancel: OpenCancellationHandler::new(exchanges, facts, clock, ids, stream),
        }
    }

    async fn opened(fixture: &Fixture) -> ExchangeId {
        let result = fixture
            .open
            .handle(OpenExchangeCommand {
                result_kind: ResultKindId::new("transport.delivery").unwrap(),
                executor_ref: ActorRef::parse("region-1/carrier-7").unwrap(),
                initiator_ref: Some(ActorRef::parse("region-1/retailer-2").unwrap()),
                details: FactDetails::new(),
            })
            .await
            .unwrap();
        *result.exchange.id()
    }

    async fn advance(fixture: &Fixture, exchange_id: ExchangeId, role: Role, proceed: bool) {
        fixture
            .advance
            .handle(AdvanceExchangeCommand {
                exchange_id,
                role,
                proceed,
                details: FactDetails::new(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn announcing_records_the_entry_fact_with_a_condition_link() {
        let fixture = fixture().await;
        let exchange_id = opened(&fixture).await;
        advance(&fixture, exchange_id, Role::Initiator, true).await; // Requested
        advance(&fixture, exchange_id, Role::Executor, true).await; // Promised

        let fact = fixture
            .cancel
            .handle(OpenCancellationCommand {
                exchange_id,
                scope: CancellationScope::Promise,
                details: FactDetails::new(),
            })
            .await
            .unwrap();

        assert_eq!(fact.kind(), FactKind::PromiseCancellationInitiated);
        assert_eq!(fact.ordinal(), 3);
        assert_eq!(fact.links().len(), 1);
        assert_eq!(fact.links()[0].kind(), FactLinkKind::Condition);
    }

    #[tokio::test]
    async fn every_scope_maps_to_its_entry_state() {
        assert_eq!(
            CancellationScope::Request.entry_fact(),
            FactKind::RequestCancellationInitiated
        );
        assert_eq!(
            CancellationScope::Promise.entry_fact(),
            FactKind::PromiseCancellationInitiated
        );
        assert_eq!(
            CancellationScope::State.entry_fact(),
            FactKind::StateCancellationInitiated
        );
        assert_eq!(
            CancellationScope::Accept.entry_fact(),
            FactKind::AcceptCancellationInitiated
        );
    }

    #[tokio::test]
    async fn a_closed_exchange_cannot_be_cancelled() {
        let fixture = fixture().await;
        let exchange_id = opened(&fixture).await;
        // Walk to the terminal Accepted fact.
        advance(&fixture, exchange_id, Role::Initiator, true).await;
        advance(&fixture, exchange_id, Role::Executor, true).await;
        advance(&fixture, exchange_id, Role::Executor, true).await;
        advance(&fixture, exchange_id, Role::Executor, true).await;
        advance(&fixture, exchange_id, Role::Initiator, true).await;

        let err = fixture
            .cancel
            .handle(OpenCancellationCommand {
                exchange_id,
                scope: CancellationScope::Accept,
                details: FactDetails::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CoordinationError::ExchangeClosed(_)));
    }

    #[tokio::test]
    async fn a_second_announcement_is_rejected_while_one_is_running() {
        let fixture = fixture().await;
        let exchange_id = opened(&fixture).await;
        advance(&fixture, exchange_id, Role::Initiator, true).await; // Requested

        fixture
            .cancel
            .handle(OpenCancellationCommand {
                exchange_id,
                scope: CancellationScope::Request,
                details: FactDetails::new(),
            })
            .await
            .unwrap();

        let err = fixture
            .cancel
            .handle(OpenCancellationCommand {
                exchange_id,
                scope: CancellationScope::Request,
                details: FactDetails::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CoordinationError::CancellationInProgress(_)));
    }

    #[tokio::test]
    async fn unknown_exchange_is_rejected() {
        let fixture = fixture().await;
        let err = fixture
            .cancel
            .handle(OpenCancellationCommand {
                exchange_id: ExchangeId::new(),
                scope: CancellationScope::Request,
                details: FactDetails::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CoordinationError::UnknownExchange(_)));
    }
}
