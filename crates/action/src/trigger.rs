use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

use bk_trigger_core::{Build, BuildkiteApi, HttpApi, Sleeper, TokioSleeper};

use crate::github::GithubContext;
use crate::inputs::Inputs;
use crate::outputs;

// The nth consecutive transient poll failure that aborts the run.
const MAX_TRANSIENT_FAILURES: u32 = 3;

/// Runs the action: trigger the build, wait for it unless async mode was
/// requested, publish the outputs, and fail unless the final state is one
/// the caller considers a success.
pub async fn execute(inputs: Inputs, context: &GithubContext) -> Result<()> {
    let api = HttpApi::with_base_url(&inputs.api_url, &inputs.access_token)?;
    let request = &inputs.request;

    println!(
        "🪁 Triggering {} for {}@{}",
        request.pipeline, request.branch, request.commit
    );
    let mut build = api
        .create_build(request)
        .await
        .context("Failed to trigger build")?;
    report_state(&build);

    if !inputs.async_mode {
        build = wait_for_build(&api, &TokioSleeper, build, inputs.poll_interval).await?;
    }

    outputs::write(&build, context)?;
    if !build.state.is_successful() {
        bail!("Build finished with state '{}'", build.state);
    }
    Ok(())
}

/// Polls the build at a fixed interval until its state is terminal, and
/// returns the last fetched representation.
///
/// An already-terminal build is returned as-is, without sleeping. Transient
/// failures (network errors, 5xx responses) are tolerated twice in a row;
/// a third consecutive one, or any other error, aborts.
async fn wait_for_build(
    api: &dyn BuildkiteApi,
    sleeper: &dyn Sleeper,
    mut build: Build,
    interval: Duration,
) -> Result<Build> {
    if build.state.is_terminal() {
        return Ok(build);
    }

    println!("⌛ Waiting for build to finish");
    let notice_every = polls_per_notice(interval);
    let mut last_reported = build.state.clone();
    let mut transient_failures: u32 = 0;
    let mut polls: u64 = 0;

    loop {
        sleeper.sleep(interval).await;
        polls += 1;
        if polls % notice_every == 0 {
            println!("⌛ Still waiting for build to finish");
        }

        let polled = api.get_build(&build.url).await;
        match polled {
            Ok(current) => {
                transient_failures = 0;
                debug!(state = %current.state, "polled build");
                if current.state != last_reported {
                    report_state(&current);
                    last_reported = current.state.clone();
                }
                build = current;
                if build.state.is_terminal() {
                    return Ok(build);
                }
            }
            Err(err) if err.is_transient() && transient_failures + 1 < MAX_TRANSIENT_FAILURES => {
                transient_failures += 1;
                warn!(error = %err, attempt = transient_failures, "poll failed, will retry");
            }
            Err(err) => return Err(err).context("Failed to poll build status"),
        }
    }
}

fn report_state(build: &Build) {
    println!(
        "{} Build {} → {}",
        build.state.emoji(),
        build.state,
        build.web_url
    );
}

// "Still waiting" roughly once a minute, counted in completed intervals.
fn polls_per_notice(interval: Duration) -> u64 {
    (60 / interval.as_secs().max(1)).max(1)
}
