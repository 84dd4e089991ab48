use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AgentErrorCode {
    InvalidArgument,
    UnknownTransaction,
    AlreadyStopped,
    NotStopped,
    Transport,
}

impl AgentErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentErrorCode::InvalidArgument => "apm/invalid-argument",
            AgentErrorCode::UnknownTransaction => "apm/unknown-transaction",
            AgentErrorCode::AlreadyStopped => "apm/already-stopped",
            AgentErrorCode::NotStopped => "apm/not-stopped",
            AgentErrorCode::Transport => "apm/transport",
        }
    }
}

#[derive(Clone, Debug)]
pub struct AgentError {
    pub code: AgentErrorCode,
    message: String,
}

impl AgentError {
    pub fn new(code: AgentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl Display for AgentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for AgentError {}

pub type AgentResult<T> = Result<T, AgentError>;

pub fn invalid_argument(message: impl Into<String>) -> AgentError {
    AgentError::new(AgentErrorCode::InvalidArgument, message)
}

pub fn unknown_transaction(name: &str) -> AgentError {
    AgentError::new(
        AgentErrorCode::UnknownTransaction,
        format!("Transaction \"{name}\" was never started"),
    )
}

pub fn already_stopped(name: &str) -> AgentError {
    AgentError::new(
        AgentErrorCode::AlreadyStopped,
        format!("Transaction \"{name}\" is already stopped"),
    )
}

pub fn not_stopped(name: &str) -> AgentError {
    AgentError::new(
        AgentErrorCode::NotStopped,
        format!("Transaction \"{name}\" is still running"),
    )
}

pub fn transport_error(message: impl Into<String>) -> AgentError {
    AgentError::new(AgentErrorCode::Transport, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code() {
        let err = unknown_transaction("checkout");
        assert!(err.to_string().contains("apm/unknown-transaction"));
        assert!(err.to_string().contains("checkout"));
    }
}
