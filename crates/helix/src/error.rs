//! Client-wide error types.

use thiserror::Error;

/// Client-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by a Helix lookup.
///
/// All of these are per-request failures. Callers that batch requests
/// treat any variant as "this chunk contributed nothing" and move on.
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to spawn fetch command '{command}': {source}")]
    CommandSpawn {
        command: String,
        source: std::io::Error,
    },

    #[error("fetch command '{command}' exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("credential is not a valid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}
