use std::fs::OpenOptions;
use std::io::Write;

use anyhow::{Context, Result};
use tracing::debug;

use bk_trigger_core::Build;

use crate::github::GithubContext;

/// Publishes the build as step outputs: `id`, `number`, `url`, `web_url`,
/// `state`, and `data` (the raw build document as compact JSON).
///
/// Appends to the file named by `GITHUB_OUTPUT` when the runner provides one,
/// otherwise falls back to the legacy `::set-output` workflow commands on
/// stdout.
pub fn write(build: &Build, context: &GithubContext) -> Result<()> {
    let pairs = output_pairs(build);
    match context.output_path() {
        Some(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open output file {}", path.display()))?;
            for (name, value) in &pairs {
                writeln!(file, "{name}={value}")
                    .with_context(|| format!("Failed to write output {name}"))?;
            }
            debug!(path = %path.display(), "wrote step outputs");
        }
        None => {
            for (name, value) in &pairs {
                println!("::set-output name={name}::{value}");
            }
        }
    }
    Ok(())
}

// Every value stays on one line: compact JSON escapes newlines, and the rest
// are identifiers and URLs.
fn output_pairs(build: &Build) -> [(&'static str, String); 6] {
    [
        ("id", build.id.clone()),
        ("number", build.number.to_string()),
        ("url", build.url.clone()),
        ("web_url", build.web_url.clone()),
        ("state", build.state.to_string()),
        ("data", build.raw_json()),
    ]
}
