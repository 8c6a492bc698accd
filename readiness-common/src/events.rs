use serde::{Deserialize, Serialize};

use crate::PendingInstance;

// -----------------------------------------------------------------------------
// Fixed messages
// -----------------------------------------------------------------------------

pub const READY_MESSAGE: &str = "All instances are running and ready";
pub const TIMEOUT_MESSAGE: &str = "Timeout waiting for instances to be ready";

// -----------------------------------------------------------------------------
// Invocation (request / response)
// -----------------------------------------------------------------------------

/// Invocation payload. Only `instanceIds` is recognised; other keys are ignored.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WaitForInstancesEvent {
    #[serde(rename = "instanceIds")]
    pub instance_ids: Vec<String>,
}

impl WaitForInstancesEvent {
    pub fn new<I, S>(instance_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            instance_ids: instance_ids.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WaitResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl WaitResponse {
    pub fn ready() -> Self {
        Self {
            status_code: 200,
            body: READY_MESSAGE.to_string(),
        }
    }
}

// -----------------------------------------------------------------------------
// Failures
// -----------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum WaitErrorKind {
    Timeout,
    UpstreamQueryFailure,
    Cancelled,
}

impl WaitErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitErrorKind::Timeout => "Timeout",
            WaitErrorKind::UpstreamQueryFailure => "UpstreamQueryFailure",
            WaitErrorKind::Cancelled => "Cancelled",
        }
    }
}

/// Error body returned to the invoker. `pending` is only filled on timeout.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WaitErrorPayload {
    #[serde(rename = "errorType")]
    pub error_type: WaitErrorKind,
    #[serde(rename = "errorMessage")]
    pub error_message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pending: Vec<PendingInstance>,
}
