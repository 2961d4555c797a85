use std::time::Duration;

use async_trait::async_trait;

/// Sleep seam for the poll loop. Tests substitute a recording fake so the
/// loop runs without real time passing.
#[async_trait]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
