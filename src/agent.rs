use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::error::AgentResult;
use crate::stores::{ErrorStore, TransactionStore};
use crate::throwable::Throwable;
use crate::transaction::{Context, Transaction};
use crate::transport::{HttpTransport, Payload, Transport};

/// In-process APM agent: one instance per logical unit of work (request,
/// job, invocation), owning a transaction store and an error store and
/// flushing both to a remote collector via an injected [`Transport`].
///
/// The agent is passed by reference to whatever needs it; there is no
/// process-wide singleton.
pub struct Agent {
    config: Config,
    transactions: TransactionStore,
    errors: ErrorStore,
    transport: Box<dyn Transport>,
}

impl Agent {
    /// Builds an agent with the default HTTP transport.
    pub fn new(config: Config) -> AgentResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Box::new(transport)))
    }

    /// Builds an agent with a caller-supplied delivery mechanism.
    pub fn with_transport(config: Config, transport: Box<dyn Transport>) -> Self {
        Self {
            config,
            transactions: TransactionStore::new(),
            errors: ErrorStore::new(),
            transport,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Starts the named transaction now, with no context.
    pub fn start_transaction(&mut self, name: &str) -> AgentResult<&mut Transaction> {
        self.start_transaction_with(name, Context::new(), None)
    }

    /// Starts the named transaction, optionally backdated via `started_at`.
    /// Re-entry for an in-flight name returns the existing transaction
    /// unchanged rather than creating a duplicate timer.
    pub fn start_transaction_with(
        &mut self,
        name: &str,
        context: Context,
        started_at: Option<DateTime<Utc>>,
    ) -> AgentResult<&mut Transaction> {
        self.transactions.get_or_create(name, context, started_at)
    }

    /// Stops the named transaction. Fails with `UnknownTransaction` when the
    /// name was never started — the same code [`get_transaction`](Self::get_transaction)
    /// surfaces, since both route through the same store lookup.
    pub fn stop_transaction(&mut self, name: &str) -> AgentResult<()> {
        self.transactions.get_mut(name)?.stop()
    }

    pub fn get_transaction(&self, name: &str) -> AgentResult<&Transaction> {
        self.transactions.get(name)
    }

    /// Records `error` in the error store. Infallible: capture is
    /// best-effort and must never introduce a secondary failure.
    pub fn capture_throwable(&mut self, error: &dyn Throwable) {
        self.capture_throwable_with(error, Context::new(), None);
    }

    /// As [`capture_throwable`](Self::capture_throwable), with context and an
    /// optional associated transaction name (recorded as-is, not validated —
    /// the reference is weak).
    pub fn capture_throwable_with(
        &mut self,
        error: &dyn Throwable,
        context: Context,
        transaction: Option<&str>,
    ) {
        self.errors.capture(error, context, transaction);
    }

    /// Transactions accumulated since the last `send()`.
    pub fn pending_transactions(&self) -> usize {
        self.transactions.len()
    }

    /// Errors accumulated since the last `send()`.
    pub fn pending_errors(&self) -> usize {
        self.errors.len()
    }

    /// Transmits the contents of both stores to the collector and resets
    /// them.
    ///
    /// Both stores are drained before the transmission attempt, so the reset
    /// holds whether the agent is active, the payload is empty, or the
    /// transport fails — an inactive agent must not accumulate memory across
    /// calls, and a transport failure is surfaced only after the state is
    /// already clean.
    pub async fn send(&mut self) -> AgentResult<()> {
        let transactions = self.transactions.take_all();
        let errors = self.errors.take_all();
        if !self.config.active {
            return Ok(());
        }
        let payload = Payload::new(&self.config, &transactions, &errors);
        if payload.is_empty() {
            return Ok(());
        }
        if let Err(err) = self.transport.send(&payload).await {
            log::debug!("apm payload delivery failed: {err}");
            return Err(err);
        }
        Ok(())
    }
}
