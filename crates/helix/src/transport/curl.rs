//! Subprocess transport that shells out to `curl`.
//!
//! Kept interchangeable with the in-process transport for environments
//! where the system fetch tool should own TLS. Same headers, same logical
//! response: the body on stdout, failures as errors.

use std::process::Stdio;

use async_trait::async_trait;
use tracing::debug;

use super::{Credentials, Transport};
use crate::{Error, Result};

/// Transport that spawns an external `curl` process per request.
pub struct CurlTransport {
    program: String,
    credentials: Credentials,
}

impl CurlTransport {
    /// Create a transport using `curl` from `PATH`.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_program("curl", credentials)
    }

    /// Create a transport with an explicit binary path.
    pub fn with_program(program: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            program: program.into(),
            credentials,
        }
    }

    /// Argument vector for one request. `--fail` turns HTTP errors into a
    /// non-zero exit status so they surface the same way spawn errors do.
    fn build_args(&self, url: &str) -> Vec<String> {
        vec![
            "--silent".to_string(),
            "--show-error".to_string(),
            "--fail".to_string(),
            "--header".to_string(),
            format!("Client-Id: {}", self.credentials.client_id),
            "--header".to_string(),
            format!("Authorization: Bearer {}", self.credentials.token),
            url.to_string(),
        ]
    }
}

#[async_trait]
impl Transport for CurlTransport {
    async fn get(&self, url: &str) -> Result<String> {
        debug!(url, program = %self.program, "spawning fetch command");

        let output = tokio::process::Command::new(&self.program)
            .args(self.build_args(url))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| Error::CommandSpawn {
                command: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
