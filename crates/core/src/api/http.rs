use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::api::{ApiError, BuildkiteApi};
use crate::build::Build;
use crate::request::{BuildRequest, PipelineRef};

const DEFAULT_API_URL: &str = "https://api.buildkite.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Buildkite REST API client authenticated with a bearer token.
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpApi {
    /// Creates a client against the public Buildkite endpoint.
    pub fn new(token: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_API_URL, token)
    }

    /// Creates a client against a custom endpoint. Tests point this at an
    /// in-process fake server.
    pub fn with_base_url(
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(HttpApi {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn builds_url(&self, pipeline: &PipelineRef) -> String {
        format!(
            "{}/v2/organizations/{}/pipelines/{}/builds",
            self.base_url, pipeline.organization, pipeline.slug
        )
    }

    async fn decode_build(response: Response) -> Result<Build, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = read_error_message(response).await;
            return Err(error_for_status(status, message));
        }
        let body = response.text().await?;
        let raw: Value = serde_json::from_str(&body)?;
        Ok(Build::from_value(raw)?)
    }
}

#[async_trait]
impl BuildkiteApi for HttpApi {
    async fn create_build(&self, request: &BuildRequest) -> Result<Build, ApiError> {
        let url = self.builds_url(&request.pipeline);
        debug!(url = %url, branch = %request.branch, "creating build");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;
        Self::decode_build(response).await
    }

    async fn get_build(&self, url: &str) -> Result<Build, ApiError> {
        debug!(url = %url, "fetching build");

        let response = self.client.get(url).bearer_auth(&self.token).send().await?;
        Self::decode_build(response).await
    }
}

fn error_for_status(status: StatusCode, message: String) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Auth { status, message },
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        _ => ApiError::Status { status, message },
    }
}

// Buildkite error bodies look like {"message": "..."}; fall back to the raw
// body when they don't.
async fn read_error_message(response: Response) -> String {
    match response.text().await {
        Ok(body) => match serde_json::from_str::<Value>(&body) {
            Ok(json) => json
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or(body),
            Err(_) => body,
        },
        Err(_) => String::new(),
    }
}
