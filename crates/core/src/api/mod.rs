pub mod http;

pub use http::HttpApi;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::build::Build;
use crate::request::BuildRequest;

/// Errors from the Buildkite API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The token was rejected or lacks the required scope (`write_builds`
    /// to trigger, `read_builds` to poll).
    #[error("Buildkite rejected the access token ({status}): {message}")]
    Auth { status: StatusCode, message: String },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unexpected response from Buildkite ({status}): {message}")]
    Status { status: StatusCode, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode Buildkite response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether a poll attempt hitting this error may be retried. Network
    /// failures and server-side 5xx responses are transient; auth problems,
    /// missing builds and undecodable bodies are not.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }
}

/// The two Buildkite calls this action makes.
///
/// Implemented by [`HttpApi`] against the real API, and by in-memory fakes
/// in tests so the trigger/poll flow runs without a network.
#[async_trait]
pub trait BuildkiteApi {
    /// Create a new build on the request's pipeline and return it. This call
    /// is never retried; a failure here is fatal.
    async fn create_build(&self, request: &BuildRequest) -> Result<Build, ApiError>;

    /// Fetch the current representation of a build by its API URL.
    async fn get_build(&self, url: &str) -> Result<Build, ApiError>;
}
