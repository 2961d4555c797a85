use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors raised while assembling a build request, before any
/// network call is made.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("pipeline must be in the form 'organization/pipeline', got {0:?}")]
    InvalidPipeline(String),

    #[error("env must be a JSON object of string values: {0}")]
    InvalidEnv(String),
}

/// A pipeline identified as `organization/slug`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRef {
    pub organization: String,
    pub slug: String,
}

impl FromStr for PipelineRef {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((organization, slug)) = s.split_once('/') else {
            return Err(RequestError::InvalidPipeline(s.to_string()));
        };
        if organization.is_empty() || slug.is_empty() || slug.contains('/') {
            return Err(RequestError::InvalidPipeline(s.to_string()));
        }
        Ok(PipelineRef {
            organization: organization.to_string(),
            slug: slug.to_string(),
        })
    }
}

impl fmt::Display for PipelineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.organization, self.slug)
    }
}

/// Commit author attached to a triggered build, taken from the workflow's
/// push event when available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Everything needed to create one build.
///
/// Constructed once from resolved inputs and serialized verbatim as the
/// create-build payload; the pipeline reference only selects the endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct BuildRequest {
    #[serde(skip)]
    pub pipeline: PipelineRef,
    pub commit: String,
    pub branch: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    pub env: HashMap<String, String>,
}

/// Parses the `env` input: a JSON object whose values are all strings.
pub fn parse_env_map(input: &str) -> Result<HashMap<String, String>, RequestError> {
    serde_json::from_str(input).map_err(|e| RequestError::InvalidEnv(e.to_string()))
}
