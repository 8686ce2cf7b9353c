//! OpenExchangeHandler - Command handler for starting new exchanges.

use std::sync::Arc;

use crate::domain::coordination::{ActKind, FactKind};
use crate::domain::exchange::{CoordinationFact, Exchange};
use crate::domain::foundation::{ActorRef, CoordinationError, FactDetails, ResultKindId};
use crate::ports::{Clock, ExchangeRepository, FactPublisher, FactRepository, IdentityProvider, ResultKindRegistry};

/// Command to open a new exchange toward a registered result kind.
#[derive(Debug, Clone)]
pub struct OpenExchangeCommand {
    pub result_kind: ResultKindId,
    pub executor_ref: ActorRef,
    /// Absent for a self-initiated exchange.
    pub initiator_ref: Option<ActorRef>,
    pub details: FactDetails,
}

/// Result of successfully opening an exchange.
#[derive(Debug, Clone)]
pub struct OpenExchangeResult {
    pub exchange: Exchange,
    pub fact: CoordinationFact,
}

/// Handler for opening exchanges.
pub struct OpenExchangeHandler {
    result_kinds: Arc<dyn ResultKindRegistry>,
    exchanges: Arc<dyn ExchangeRepository>,
    facts: Arc<dyn FactRepository>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdentityProvider>,
    publisher: Arc<dyn FactPublisher>,
}

impl OpenExchangeHandler {
    pub fn new(
        result_kinds: Arc<dyn ResultKindRegistry>,
        exchanges: Arc<dyn ExchangeRepository>,
        facts: Arc<dyn FactRepository>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdentityProvider>,
        publisher: Arc<dyn FactPublisher>,
    ) -> Self {
        Self {
            result_kinds,
            exchanges,
            facts,
            clock,
            ids,
            publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: OpenExchangeCommand,
    ) -> Result<OpenExchangeResult, CoordinationError> {
        // 1. Resolve the result kind
        let result_kind = self
            .result_kinds
            .find_by_id(&cmd.result_kind)
            .await?
            .ok_or(CoordinationError::UnknownResultKind(cmd.result_kind))?;

        // 2. Create and persist the exchange
        let exchange = Exchange::new(
            self.ids.next_exchange_id(),
            result_kind,
            cmd.executor_ref,
            cmd.initiator_ref,
        );
        self.exchanges.save(&exchange).await?;

        // 3. Record the initiating fact
        let fact = CoordinationFact::new(
            self.ids.next_fact_id(),
            ActKind::Initiating.outcome(),
            exchange.clone(),
            0,
            self.clock.now(),
        )
        .with_details(cmd.details);
        self.facts.save(&fact).await?;

        // 4. Publish to the stream
        self.publisher.publish(fact.clone()).await?;

        tracing::info!(
            "opened exchange {} for {} between {} and {}",
            exchange.id(),
            exchange.result_kind().id(),
            exchange.initiator_ref(),
            exchange.executor_ref(),
        );

        debug_assert_eq!(fact.kind(), FactKind::Initiated);
        Ok(OpenExchangeResult { exchange, fact })
    }
}
