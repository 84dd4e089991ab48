use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{already_stopped, invalid_argument, not_stopped, AgentResult};
use crate::stacktrace::{self, StackFrame};

/// Free-form metadata attached to transactions and error records.
pub type Context = HashMap<String, Value>;

/// A single timed unit of work.
///
/// Lifecycle: created running, stopped exactly once (a second `stop()` is an
/// error — silently ignoring it would mask a double-stop bug in the caller),
/// evicted when the owning store resets.
#[derive(Clone, Debug)]
pub struct Transaction {
    name: String,
    context: Context,
    started_at: DateTime<Utc>,
    stopped_at: Option<DateTime<Utc>>,
    backtrace: Vec<StackFrame>,
}

impl Transaction {
    /// `started_at` defaults to now; an explicit past timestamp backdates the
    /// transaction to cover work that began before instrumentation attached.
    pub(crate) fn new(
        name: &str,
        context: Context,
        started_at: Option<DateTime<Utc>>,
    ) -> AgentResult<Self> {
        if name.trim().is_empty() {
            return Err(invalid_argument("Transaction name must not be empty"));
        }
        Ok(Self {
            name: name.to_string(),
            context,
            started_at: started_at.unwrap_or_else(Utc::now),
            stopped_at: None,
            backtrace: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped_at.is_some()
    }

    /// Frames captured at stop time; empty while the transaction is running.
    pub fn backtrace(&self) -> &[StackFrame] {
        &self.backtrace
    }

    /// Marks the transaction terminal: records the stop time and snapshots
    /// the current call stack.
    pub fn stop(&mut self) -> AgentResult<()> {
        if self.stopped_at.is_some() {
            return Err(already_stopped(&self.name));
        }
        self.stopped_at = Some(Utc::now());
        self.backtrace = stacktrace::capture();
        Ok(())
    }

    /// Elapsed whole milliseconds, rounded half up so sub-millisecond work is
    /// not systematically reported as zero. `None` until stopped.
    pub fn duration_ms(&self) -> Option<i64> {
        let stopped_at = self.stopped_at?;
        let micros = (stopped_at - self.started_at)
            .num_microseconds()
            .unwrap_or(i64::MAX - 500);
        Some((micros + 500).div_euclid(1000))
    }

    pub fn summary(&self) -> AgentResult<Summary> {
        match self.duration_ms() {
            Some(duration_ms) => Ok(Summary {
                duration_ms,
                backtrace: self.backtrace.clone(),
            }),
            None => Err(not_stopped(&self.name)),
        }
    }
}

/// Read-only view of a finished transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub duration_ms: i64,
    pub backtrace: Vec<StackFrame>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgentErrorCode;
    use chrono::TimeDelta;

    #[test]
    fn empty_name_is_rejected() {
        let err = Transaction::new("", Context::new(), None).unwrap_err();
        assert_eq!(err.code, AgentErrorCode::InvalidArgument);
        let err = Transaction::new("   ", Context::new(), None).unwrap_err();
        assert_eq!(err.code, AgentErrorCode::InvalidArgument);
    }

    #[test]
    fn stop_records_duration_and_backtrace() {
        let mut trx = Transaction::new("trx", Context::new(), None).unwrap();
        assert!(!trx.is_stopped());
        trx.stop().unwrap();
        assert!(trx.is_stopped());
        assert!(trx.duration_ms().unwrap() >= 0);
        assert!(!trx.backtrace().is_empty());
    }

    #[test]
    fn double_stop_is_rejected() {
        let mut trx = Transaction::new("trx", Context::new(), None).unwrap();
        trx.stop().unwrap();
        let err = trx.stop().unwrap_err();
        assert_eq!(err.code, AgentErrorCode::AlreadyStopped);
    }

    #[test]
    fn summary_before_stop_is_rejected() {
        let trx = Transaction::new("trx", Context::new(), None).unwrap();
        let err = trx.summary().unwrap_err();
        assert_eq!(err.code, AgentErrorCode::NotStopped);
    }

    #[test]
    fn summary_exposes_duration_and_backtrace() {
        let mut trx = Transaction::new("trx", Context::new(), None).unwrap();
        trx.stop().unwrap();
        let summary = trx.summary().unwrap();
        assert_eq!(Some(summary.duration_ms), trx.duration_ms());
        assert!(!summary.backtrace.is_empty());
    }

    #[test]
    fn duration_rounds_half_up() {
        let mut trx = Transaction::new("trx", Context::new(), None).unwrap();
        trx.stopped_at = Some(trx.started_at + TimeDelta::microseconds(1_500));
        assert_eq!(trx.duration_ms(), Some(2));

        trx.stopped_at = Some(trx.started_at + TimeDelta::microseconds(1_499));
        assert_eq!(trx.duration_ms(), Some(1));

        trx.stopped_at = Some(trx.started_at + TimeDelta::microseconds(400));
        assert_eq!(trx.duration_ms(), Some(0));
    }

    #[test]
    fn backdated_start_extends_duration() {
        let started = Utc::now() - TimeDelta::milliseconds(250);
        let mut trx = Transaction::new("trx", Context::new(), Some(started)).unwrap();
        trx.stop().unwrap();
        let duration = trx.duration_ms().unwrap();
        assert!(duration >= 250, "duration was {duration}ms");
    }
}
