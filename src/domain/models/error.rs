use std::error::Error as StdError;
use std::io;

use thiserror::Error;

use super::SessionRecord;

/// A required input is missing or malformed. Raised before any remote or
/// filesystem work starts.
#[derive(Debug, Error)]
#[error("provide {usage} (--{flag}): {reason}")]
pub struct ValidationError {
    pub flag: String,
    pub usage: String,
    pub reason: String,
}

/// The tracker could not be reached, or refused a request.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("{operation}: status code {status} - {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },
    #[error("{operation}: {source}")]
    Transport {
        operation: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    #[error("{operation}: {source}")]
    Decode {
        operation: String,
        #[source]
        source: serde_json::Error,
    },
}

impl RemoteError {
    /// Prefixes the operation with an outer one, keeping the cause.
    pub fn within(self, outer: &str) -> RemoteError {
        match self {
            RemoteError::Status {
                operation,
                status,
                body,
            } => {
                return RemoteError::Status {
                    operation: format!("{outer}: {operation}"),
                    status,
                    body,
                };
            }
            RemoteError::Transport { operation, source } => {
                return RemoteError::Transport {
                    operation: format!("{outer}: {operation}"),
                    source,
                };
            }
            RemoteError::Decode { operation, source } => {
                return RemoteError::Decode {
                    operation: format!("{outer}: {operation}"),
                    source,
                };
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum PersistStage {
    Hostname,
    CreateDir,
    CreateFile,
    Open,
    Serialize,
    Write,
    Sync,
    Close,
}

/// Writing the session log failed. Carries the full record so it can be
/// appended by hand.
#[derive(Debug, Error)]
#[error("could not save data ({stage}) {record}: {source}")]
pub struct PersistenceError {
    pub stage: PersistStage,
    pub record: Box<SessionRecord>,
    #[source]
    pub source: io::Error,
}

impl PersistenceError {
    pub fn new(stage: PersistStage, record: &SessionRecord, source: io::Error) -> PersistenceError {
        return PersistenceError {
            stage,
            record: Box::new(record.clone()),
            source,
        };
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("remote assignment task did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),
}
