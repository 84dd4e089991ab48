use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use url::Url;

use crate::config::Config;
use crate::error::{transport_error, AgentResult};
use crate::stacktrace::StackFrame;
use crate::stores::ErrorRecord;
use crate::transaction::{Context, Transaction};

/// Delivery seam between the agent and a remote collector. Injected so hosts
/// can substitute their own delivery (and tests can record instead of send).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, payload: &Payload) -> AgentResult<()>;
}

/// Snapshot of both stores at the moment of `send()`, plus the metadata the
/// collector needs to attribute it.
#[derive(Clone, Debug, Serialize)]
pub struct Payload {
    pub app_name: String,
    pub app_version: Option<String>,
    pub environment: Option<String>,
    pub framework_name: Option<String>,
    pub framework_version: Option<String>,
    pub agent_name: String,
    pub agent_version: String,
    pub request_time_ms: String,
    pub transactions: Vec<TransactionSnapshot>,
    pub errors: Vec<ErrorSnapshot>,
}

impl Payload {
    pub fn new(config: &Config, transactions: &[Transaction], errors: &[ErrorRecord]) -> Self {
        Self {
            app_name: config.app_name.clone(),
            app_version: config.app_version.clone(),
            environment: config.environment.clone(),
            framework_name: config.framework_name.clone(),
            framework_version: config.framework_version.clone(),
            agent_name: env!("CARGO_PKG_NAME").to_string(),
            agent_version: env!("CARGO_PKG_VERSION").to_string(),
            request_time_ms: format!("{}", Utc::now().timestamp_millis()),
            transactions: transactions.iter().map(TransactionSnapshot::from).collect(),
            errors: errors.iter().map(ErrorSnapshot::from).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty() && self.errors.is_empty()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TransactionSnapshot {
    pub name: String,
    pub start_time_ms: i64,
    pub duration_ms: Option<i64>,
    pub backtrace: Vec<StackFrame>,
    pub context: Context,
}

impl From<&Transaction> for TransactionSnapshot {
    fn from(trx: &Transaction) -> Self {
        Self {
            name: trx.name().to_string(),
            start_time_ms: trx.started_at().timestamp_millis(),
            duration_ms: trx.duration_ms(),
            backtrace: trx.backtrace().to_vec(),
            context: trx.context().clone(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ErrorSnapshot {
    pub message: String,
    pub kind: String,
    pub captured_at_ms: i64,
    pub backtrace: Vec<StackFrame>,
    pub transaction: Option<String>,
    pub context: Context,
}

impl From<&ErrorRecord> for ErrorSnapshot {
    fn from(record: &ErrorRecord) -> Self {
        Self {
            message: record.message.clone(),
            kind: record.kind.clone(),
            captured_at_ms: record.captured_at.timestamp_millis(),
            backtrace: record.backtrace.clone(),
            transaction: record.transaction.clone(),
            context: record.context.clone(),
        }
    }
}

/// Default delivery: POSTs the payload as JSON to the configured collector
/// endpoint, with bearer auth when a secret token is configured. Requests are
/// bounded by the configured timeout so a stalled collector cannot hang the
/// caller indefinitely.
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
    secret_token: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &Config) -> AgentResult<Self> {
        let endpoint = Url::parse(&config.server_url)
            .map_err(|err| transport_error(format!("invalid server url: {err}")))?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| transport_error(err.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            secret_token: config.secret_token.clone(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, payload: &Payload) -> AgentResult<()> {
        let mut request = self.client.post(self.endpoint.clone()).json(payload);
        if let Some(token) = &self.secret_token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|err| transport_error(err.to_string()))?;
        if !response.status().is_success() {
            return Err(transport_error(format!(
                "collector responded with status {}",
                response.status()
            )));
        }
        Ok(())
    }
}
