use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::{unknown_transaction, AgentResult};
use crate::stacktrace::StackFrame;
use crate::throwable::Throwable;
use crate::transaction::{Context, Transaction};

/// Name-keyed registry of in-flight and finished transactions.
///
/// Owned exclusively by one [`Agent`](crate::Agent); mutation goes through
/// `&mut self`, which is what confines a store to one unit of work at a time.
#[derive(Debug, Default)]
pub struct TransactionStore {
    entries: HashMap<String, Transaction>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the in-flight transaction for `name`, creating it on first
    /// call. Re-entry is idempotent: the existing transaction wins and the
    /// new arguments are ignored, so no duplicate timer is silently created.
    pub fn get_or_create(
        &mut self,
        name: &str,
        context: Context,
        started_at: Option<DateTime<Utc>>,
    ) -> AgentResult<&mut Transaction> {
        if !self.entries.contains_key(name) {
            let transaction = Transaction::new(name, context, started_at)?;
            self.entries.insert(name.to_string(), transaction);
        }
        self.get_mut(name)
    }

    pub fn get(&self, name: &str) -> AgentResult<&Transaction> {
        self.entries
            .get(name)
            .ok_or_else(|| unknown_transaction(name))
    }

    pub fn get_mut(&mut self, name: &str) -> AgentResult<&mut Transaction> {
        self.entries
            .get_mut(name)
            .ok_or_else(|| unknown_transaction(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empties the store, yielding the evicted transactions.
    pub fn take_all(&mut self) -> Vec<Transaction> {
        self.entries.drain().map(|(_, trx)| trx).collect()
    }

    /// Discards all entries unconditionally. Purely in-memory.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

/// A captured error awaiting transmission.
#[derive(Clone, Debug)]
pub struct ErrorRecord {
    pub message: String,
    pub kind: String,
    pub captured_at: DateTime<Utc>,
    pub backtrace: Vec<StackFrame>,
    /// Weak reference to the transaction this error occurred under, by name.
    pub transaction: Option<String>,
    pub context: Context,
}

/// Order-preserving registry of captured errors, bounded only by the
/// send/reset cadence.
#[derive(Debug, Default)]
pub struct ErrorStore {
    records: Vec<ErrorRecord>,
}

impl ErrorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record for `error`. Best-effort and infallible: whatever the
    /// throwable yields for message/kind/backtrace is recorded as-is, with a
    /// placeholder kind when introspection produces nothing.
    pub fn capture(&mut self, error: &dyn Throwable, context: Context, transaction: Option<&str>) {
        let mut kind = error.kind();
        if kind.trim().is_empty() {
            kind = "unknown".to_string();
        }
        self.records.push(ErrorRecord {
            message: error.message(),
            kind,
            captured_at: Utc::now(),
            backtrace: error.backtrace(),
            transaction: transaction.map(str::to_string),
            context,
        });
    }

    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn take_all(&mut self) -> Vec<ErrorRecord> {
        std::mem::take(&mut self.records)
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }
}
