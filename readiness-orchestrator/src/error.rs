use readiness_common::events::{WaitErrorKind, WaitErrorPayload};
use readiness_common::PendingInstance;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WaitError {
    /// Attempt ceiling reached. `pending` is what the last round reported as not ready.
    #[error("Timeout waiting for instances to be ready")]
    Timeout {
        rounds: u32,
        pending: Vec<PendingInstance>,
    },

    /// The status query itself failed; the loop stops on the failing round.
    #[error("instance status query failed on round {round}: {source:#}")]
    Upstream {
        round: u32,
        #[source]
        source: anyhow::Error,
    },

    #[error("wait cancelled after {rounds} round(s)")]
    Cancelled { rounds: u32 },
}

impl WaitError {
    pub fn kind(&self) -> WaitErrorKind {
        match self {
            WaitError::Timeout { .. } => WaitErrorKind::Timeout,
            WaitError::Upstream { .. } => WaitErrorKind::UpstreamQueryFailure,
            WaitError::Cancelled { .. } => WaitErrorKind::Cancelled,
        }
    }

    /// Rounds (queries) performed before the error was raised.
    pub fn rounds(&self) -> u32 {
        match self {
            WaitError::Timeout { rounds, .. } | WaitError::Cancelled { rounds } => *rounds,
            WaitError::Upstream { round, .. } => *round,
        }
    }

    pub fn to_payload(&self) -> WaitErrorPayload {
        let pending = match self {
            WaitError::Timeout { pending, .. } => pending.clone(),
            _ => vec![],
        };
        WaitErrorPayload {
            error_type: self.kind(),
            error_message: self.to_string(),
            pending,
        }
    }
}
