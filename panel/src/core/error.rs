use std::time::Duration;

use thiserror::Error;

/// Failures talking to the simulator or reading configuration documents.
/// Distinct from an empty result: a command that ran and printed nothing
/// yields `Ok("")`, never an error.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("{url} sent nothing for {idle:?}")]
    Idle { url: String, idle: Duration },

    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("expected {expected} command outputs, received {actual}")]
    OutputMismatch { expected: usize, actual: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Problems with a single widget's declaration. These never abort loading the
/// rest of a document.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("`{selector}` is not a valid entry: {reason}")]
    InvalidEntry { selector: String, reason: String },

    #[error("no element matches `{selector}`")]
    MissingElement { selector: String },

    #[error("rotary switch `{selector}` has no settings")]
    EmptySettings { selector: String },

    #[error("rotary switch `{selector}` has no 0 degree setting")]
    MissingDefaultDetent { selector: String },
}
