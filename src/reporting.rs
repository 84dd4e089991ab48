use crate::agent::Agent;
use crate::throwable::Throwable;
use crate::transaction::Context;

/// Adapter between a host's unhandled-error hook and the agent.
///
/// `report` captures the error and flushes the agent, logging — never
/// re-raising — any delivery failure. A broken collector must not suppress
/// the original error report: the host's own pipeline (render, log, notify)
/// always proceeds after this returns.
pub struct ErrorReporter {
    agent: Agent,
}

impl ErrorReporter {
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut Agent {
        &mut self.agent
    }

    pub fn into_agent(self) -> Agent {
        self.agent
    }

    pub async fn report(&mut self, error: &dyn Throwable) {
        self.report_with(error, Context::new()).await;
    }

    pub async fn report_with(&mut self, error: &dyn Throwable, context: Context) {
        self.agent.capture_throwable_with(error, context, None);
        if let Err(err) = self.agent.send().await {
            log::error!("failed to deliver error report: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::{transport_error, AgentResult};
    use crate::transport::{Payload, Transport};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingTransport {
        payloads: Arc<Mutex<Vec<Payload>>>,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, payload: &Payload) -> AgentResult<()> {
            self.payloads.lock().unwrap().push(payload.clone());
            Ok(())
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        async fn send(&self, _payload: &Payload) -> AgentResult<()> {
            Err(transport_error("collector unreachable"))
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn report_captures_and_flushes() {
        let transport = RecordingTransport::default();
        let agent =
            Agent::with_transport(Config::new("svc").unwrap(), Box::new(transport.clone()));
        let mut reporter = ErrorReporter::new(agent);

        let boom = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        reporter.report(&boom).await;

        let sent = transport.payloads.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].errors.len(), 1);
        assert_eq!(sent[0].errors[0].message, "boom");
        assert_eq!(reporter.agent().pending_errors(), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn report_swallows_delivery_failure() {
        let agent = Agent::with_transport(Config::new("svc").unwrap(), Box::new(FailingTransport));
        let mut reporter = ErrorReporter::new(agent);

        let boom = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        // Must not panic or propagate; the host pipeline continues after this.
        reporter.report(&boom).await;

        assert_eq!(reporter.agent().pending_errors(), 0);
        assert_eq!(reporter.agent().pending_transactions(), 0);
    }
}
