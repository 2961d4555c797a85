use std::fmt;

use serde::Deserialize;
use serde_json::Value;

/// Lifecycle state of a Buildkite build.
///
/// Only `scheduled` and `running` make further progress; everything else is
/// terminal. States this tool does not model (Buildkite also reports e.g.
/// `blocked` or `canceling`) are kept verbatim in [`BuildState::Other`] and
/// treated as terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildState {
    Scheduled,
    Running,
    Passed,
    Failed,
    Canceled,
    Skipped,
    NotRun,
    Other(String),
}

impl BuildState {
    pub fn as_str(&self) -> &str {
        match self {
            BuildState::Scheduled => "scheduled",
            BuildState::Running => "running",
            BuildState::Passed => "passed",
            BuildState::Failed => "failed",
            BuildState::Canceled => "canceled",
            BuildState::Skipped => "skipped",
            BuildState::NotRun => "not_run",
            BuildState::Other(state) => state,
        }
    }

    /// Whether the build has stopped making progress.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BuildState::Scheduled | BuildState::Running)
    }

    /// States that do not fail the action: a build that passed, or one we
    /// deliberately did not wait for.
    pub fn is_successful(&self) -> bool {
        matches!(
            self,
            BuildState::Scheduled | BuildState::Running | BuildState::Passed
        )
    }

    /// Emoji shown next to this state on the console.
    pub fn emoji(&self) -> &'static str {
        match self {
            BuildState::Scheduled => "🔗️",
            BuildState::Running => "🏃",
            BuildState::Passed => "💚",
            _ => "💔",
        }
    }
}

impl From<&str> for BuildState {
    fn from(s: &str) -> Self {
        match s {
            "scheduled" => BuildState::Scheduled,
            "running" => BuildState::Running,
            "passed" => BuildState::Passed,
            "failed" => BuildState::Failed,
            "canceled" => BuildState::Canceled,
            "skipped" => BuildState::Skipped,
            "not_run" => BuildState::NotRun,
            other => BuildState::Other(other.to_string()),
        }
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// The fields this tool actually reads out of a build document.
#[derive(Debug, Deserialize)]
struct BuildFields {
    id: String,
    number: i64,
    url: String,
    web_url: String,
    state: String,
}

/// One build of a pipeline, as returned by the Buildkite API.
///
/// Keeps the raw response document alongside the typed fields so the `data`
/// output always carries exactly what the API said.
#[derive(Debug, Clone)]
pub struct Build {
    pub id: String,
    pub number: i64,
    pub url: String,
    pub web_url: String,
    pub state: BuildState,
    raw: Value,
}

impl Build {
    /// Builds the typed view over a raw API document. Fails if the document
    /// is missing any of the fields the action surfaces as outputs.
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let fields = BuildFields::deserialize(&raw)?;
        Ok(Build {
            id: fields.id,
            number: fields.number,
            url: fields.url,
            web_url: fields.web_url,
            state: BuildState::from(fields.state.as_str()),
            raw,
        })
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The raw build document as compact (single-line) JSON.
    pub fn raw_json(&self) -> String {
        self.raw.to_string()
    }
}
