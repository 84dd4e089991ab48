#![doc = include_str!("../README.md")]

mod agent;
mod config;
mod error;
mod reporting;
mod stacktrace;
mod stores;
mod throwable;
mod transaction;
mod transport;

#[doc(inline)]
pub use agent::Agent;

#[doc(inline)]
pub use config::Config;

#[doc(inline)]
pub use error::{
    already_stopped, invalid_argument, not_stopped, transport_error, unknown_transaction,
    AgentError, AgentErrorCode, AgentResult,
};

#[doc(inline)]
pub use reporting::ErrorReporter;

#[doc(inline)]
pub use stacktrace::StackFrame;

#[doc(inline)]
pub use stores::{ErrorRecord, ErrorStore, TransactionStore};

#[doc(inline)]
pub use throwable::Throwable;

#[doc(inline)]
pub use transaction::{Context, Summary, Transaction};

#[doc(inline)]
pub use transport::{ErrorSnapshot, HttpTransport, Payload, Transport, TransactionSnapshot};
