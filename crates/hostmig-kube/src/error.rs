//! Error types for the cluster gateway.

use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Every variant is fatal to the running phase; nothing here is retried.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to execute `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write input to `{command}`: {source}")]
    Stdin {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed (exit code: {code}): {stderr}")]
    Failed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("`{command}` returned output that is not valid JSON: {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("`{command}` was expected to return JSON but returned raw output")]
    NotJson { command: String },
}
