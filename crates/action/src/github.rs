use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use bk_trigger_core::request::Author;

/// Workflow context the runner exposes through environment variables.
#[derive(Debug, Default)]
pub struct GithubContext {
    pub(crate) head_ref: Option<String>,
    pub(crate) git_ref: Option<String>,
    pub(crate) sha: Option<String>,
    pub(crate) author: Option<Author>,
    pub(crate) output_path: Option<PathBuf>,
}

impl GithubContext {
    pub fn from_env() -> Self {
        let event_path = env_var("GITHUB_EVENT_PATH");
        GithubContext {
            head_ref: env_var("GITHUB_HEAD_REF"),
            git_ref: env_var("GITHUB_REF"),
            sha: env_var("GITHUB_SHA"),
            author: event_path.as_deref().and_then(author_from_event),
            output_path: env_var("GITHUB_OUTPUT").map(PathBuf::from),
        }
    }

    /// The branch the workflow ran for: the pull request head branch when
    /// there is one, otherwise the push ref with `refs/heads/` stripped.
    /// Non-branch refs (tags) pass through unchanged.
    pub fn branch(&self) -> Option<String> {
        if let Some(head_ref) = &self.head_ref {
            return Some(head_ref.clone());
        }
        let git_ref = self.git_ref.as_ref()?;
        Some(
            git_ref
                .strip_prefix("refs/heads/")
                .unwrap_or(git_ref)
                .to_string(),
        )
    }

    /// The commit the workflow ran for.
    pub fn sha(&self) -> Option<String> {
        self.sha.clone()
    }

    /// The push author from the event payload, if the event had one.
    pub fn author(&self) -> Option<Author> {
        self.author.clone()
    }

    /// Where step outputs should be written, when the runner provides a file.
    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }
}

// The runner represents unset values as empty strings; treat both as absent.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[derive(Deserialize)]
struct Event {
    pusher: Option<Author>,
}

/// Reads the push author out of the workflow event payload. Events without a
/// pusher, or an unreadable file, leave the author off the build.
fn author_from_event(path: &str) -> Option<Author> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            debug!(path, error = %err, "could not read event payload");
            return None;
        }
    };
    match serde_json::from_str::<Event>(&contents) {
        Ok(event) => event.pusher,
        Err(err) => {
            debug!(path, error = %err, "could not parse event payload");
            None
        }
    }
}
