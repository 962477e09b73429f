// Error taxonomy shared by every dashboard action
use serde::Serialize;

/// Failure of a single dashboard action. None of these are fatal: each is
/// scoped to the load, save or command that produced it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DashboardError {
    #[error("device unreachable while requesting {endpoint}: {reason}")]
    SourceUnavailable { endpoint: String, reason: String },

    #[error("device did not answer {endpoint} within {timeout_ms} ms")]
    RequestTimedOut { endpoint: String, timeout_ms: u64 },

    #[error("malformed log at line {line}: {reason}")]
    MalformedLog { line: usize, reason: String },

    #[error("malformed config document: {0}")]
    MalformedConfig(String),

    #[error("device rejected {endpoint} with status {status}: {body}")]
    DeviceRejected {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("{0}")]
    LocalValidationFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    SourceUnavailable,
    RequestTimedOut,
    MalformedLog,
    MalformedConfig,
    DeviceRejected,
    LocalValidationFailed,
}

/// What the operator gets to see when an action fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub kind: ErrorKind,
    pub message: String,
}

impl DashboardError {
    pub fn malformed_log(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedLog {
            line,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SourceUnavailable { .. } => ErrorKind::SourceUnavailable,
            Self::RequestTimedOut { .. } => ErrorKind::RequestTimedOut,
            Self::MalformedLog { .. } => ErrorKind::MalformedLog,
            Self::MalformedConfig(_) => ErrorKind::MalformedConfig,
            Self::DeviceRejected { .. } => ErrorKind::DeviceRejected,
            Self::LocalValidationFailed(_) => ErrorKind::LocalValidationFailed,
        }
    }

    /// Rejections show the device's own explanation verbatim.
    pub fn notification(&self) -> Notification {
        let message = match self {
            Self::DeviceRejected { body, .. } if !body.trim().is_empty() => body.clone(),
            other => other.to_string(),
        };
        Notification {
            kind: self.kind(),
            message,
        }
    }
}
