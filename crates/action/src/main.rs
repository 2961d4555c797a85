mod github;
mod inputs;
mod outputs;
mod trigger;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::github::GithubContext;
use crate::inputs::{Cli, Inputs};

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr; stdout is reserved for progress lines and
    // the legacy output commands.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let context = GithubContext::from_env();
    let inputs = Inputs::resolve(cli, &context)?;

    trigger::execute(inputs, &context).await
}
