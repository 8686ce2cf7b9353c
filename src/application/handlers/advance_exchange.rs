//! AdvanceExchangeHandler - Command handler for performing the next act.
//!
//! Given "whose turn is it" and "continue or roll back", consults the
//! decision algorithm and records the resulting fact. A missing default
//! response means the caller must wait or the exchange is finished; it is
//! reported as [`AdvanceOutcome::Idle`], never as an error.

use std::sync::Arc;

use crate::domain::coordination::Role;
use crate::domain::exchange::{controlling_fact, CoordinationFact, FactLink};
use crate::domain::foundation::{CoordinationError, ExchangeId, FactDetails};
use crate::ports::{Clock, ExchangeRepository, FactPublisher, FactRepository, IdentityProvider};

/// Command to perform the next default act on an exchange.
#[derive(Debug, Clone)]
pub struct AdvanceExchangeCommand {
    pub exchange_id: ExchangeId,
    /// The role the caller holds in the exchange.
    pub role: Role,
    /// Advance the protocol forward, or roll back the pending decision.
    pub proceed: bool,
    pub details: FactDetails,
}

/// Outcome of an advance attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// The act was performed and its outcome fact recorded.
    Performed(CoordinationFact),
    /// Nothing to do: the caller must wait, or the exchange (or its
    /// cancellation sub-protocol) has ended.
    Idle,
}

/// Handler for advancing exchanges.
pub struct AdvanceExchangeHandler {
    exchanges: Arc<dyn ExchangeRepository>,
    facts: Arc<dyn FactRepository>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdentityProvider>,
    publisher: Arc<dyn FactPublisher>,
}

impl AdvanceExchangeHandler {
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
        cmd: AdvanceExchangeCommand,
    ) -> Result<AdvanceOutcome, CoordinationError> {
        // 1. Load the exchange and its fact history
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
        let controlling = match controlling_fact(&history) {
            Some(fact) => fact.clone(),
            None => return Ok(AdvanceOutcome::Idle),
        };

        // 2. Ask the decision algorithm for the next act
        let act = match controlling.kind().default_response(cmd.role, cmd.proceed) {
            Some(act) => act,
            None => {
                tracing::debug!(
                    "{} has nothing to perform on {} at {}",
                    cmd.role,
                    cmd.exchange_id,
                    controlling.kind(),
                );
                return Ok(AdvanceOutcome::Idle);
            }
        };
        if !controlling.kind().is_valid_response(act) {
            return Err(CoordinationError::InvalidResponse {
                fact: controlling.kind(),
                response: act,
            });
        }

        // 3. Record the outcome fact, settling the controlling agendum
        let fact = CoordinationFact::new(
            self.ids.next_fact_id(),
            act.outcome(),
            exchange,
            latest_ordinal + 1,
            self.clock.now(),
        )
        .with_link(FactLink::cause(&controlling))
        .with_details(cmd.details);
        self.facts.save(&fact).await?;

        // 4. Publish to the stream
        self.publisher.publish(fact.clone()).await?;

        tracing::info!(
            "{} performed {} on {}: {} -> {}",
            cmd.role,
            act,
            cmd.exchange_id,
            controlling.kind(),
            fact.kind(),
        );
        Ok(AdvanceOutcome::Performed(fact))
    }
}
