use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use bk_trigger_core::request::{BuildRequest, PipelineRef, parse_env_map};

use crate::github::GithubContext;

const DEFAULT_API_URL: &str = "https://api.buildkite.com";
const DEFAULT_MESSAGE: &str = ":github: Triggered from GitHub Actions";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Raw command line. The Actions runner passes every input as an `INPUT_*`
/// environment variable, so each argument is also readable from its variable;
/// unset inputs arrive as empty strings and are normalized during resolution.
#[derive(Debug, Parser)]
#[command(name = "bk-trigger")]
#[command(about = "Trigger a Buildkite pipeline and wait for the build")]
pub struct Cli {
    /// Buildkite API base URL
    #[arg(long, env = "BUILDKITE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// API access token with the write_builds scope (read_builds to wait)
    #[arg(long, env = "INPUT_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Pipeline to trigger, as "organization/pipeline"
    #[arg(long, env = "INPUT_PIPELINE")]
    pub pipeline: Option<String>,

    /// Branch to build (defaults to the branch this workflow ran for)
    #[arg(long, env = "INPUT_BRANCH")]
    pub branch: Option<String>,

    /// Commit to build (defaults to the commit this workflow ran for)
    #[arg(long, env = "INPUT_COMMIT")]
    pub commit: Option<String>,

    /// Message shown on the build
    #[arg(long, env = "INPUT_MESSAGE")]
    pub message: Option<String>,

    /// JSON object of environment variables to set on the build
    #[arg(long, env = "INPUT_ENV")]
    pub env: Option<String>,

    /// Return right after triggering instead of waiting for the build
    #[arg(
        long = "async",
        env = "INPUT_ASYNC",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub async_mode: Option<String>,

    /// Seconds between build status polls
    #[arg(long, env = "INPUT_POLL_INTERVAL")]
    pub poll_interval: Option<String>,
}

/// Fully resolved and validated action configuration.
#[derive(Debug)]
pub struct Inputs {
    pub api_url: String,
    pub access_token: String,
    pub request: BuildRequest,
    pub async_mode: bool,
    pub poll_interval: Duration,
}

impl Inputs {
    /// Resolves the raw command line against the workflow context, applying
    /// defaults and validating everything before any network call.
    pub fn resolve(cli: Cli, context: &GithubContext) -> Result<Inputs> {
        let access_token =
            non_empty(cli.access_token).context("Missing required input: access_token")?;
        let pipeline: PipelineRef = non_empty(cli.pipeline)
            .context("Missing required input: pipeline")?
            .parse()?;
        let branch = non_empty(cli.branch)
            .or_else(|| context.branch())
            .context("No branch given and none found in the workflow context")?;
        let commit = non_empty(cli.commit)
            .or_else(|| context.sha())
            .context("No commit given and none found in the workflow context")?;
        let message = non_empty(cli.message).unwrap_or_else(|| DEFAULT_MESSAGE.to_string());
        let env = match non_empty(cli.env) {
            Some(raw) => parse_env_map(&raw)?,
            None => HashMap::new(),
        };
        let async_mode = non_empty(cli.async_mode).is_some_and(|v| is_truthy(&v));
        let poll_interval = match non_empty(cli.poll_interval) {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .with_context(|| format!("Invalid poll_interval: {raw:?}"))?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_POLL_INTERVAL,
        };

        Ok(Inputs {
            api_url: cli.api_url,
            access_token,
            request: BuildRequest {
                pipeline,
                commit,
                branch,
                message,
                author: context.author(),
                env,
            },
            async_mode,
            poll_interval,
        })
    }
}

// Unset action inputs reach the process as empty strings.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Truthy values: `"1"`, `"true"`, `"yes"`, `"on"` (case-insensitive).
fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
