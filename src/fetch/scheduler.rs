//! Periodic refresh timer.

use super::orchestrator::FetchTrigger;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Background task sending [`FetchTrigger::Periodic`] every `period`.
///
/// The first tick fires one full period after spawning. The task stops when
/// the receiver is dropped and is aborted when the scheduler is dropped.
#[derive(Debug)]
pub struct RefreshScheduler {
    period: Duration,
    handle: JoinHandle<()>,
}

impl RefreshScheduler {
    /// Spawns the timer on the current tokio runtime.
    #[must_use]
    pub fn spawn(period: Duration, triggers: mpsc::Sender<FetchTrigger>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                tracing::debug!(period_secs = period.as_secs(), "periodic refresh due");
                if triggers.send(FetchTrigger::Periodic).await.is_err() {
                    tracing::debug!("refresh receiver gone, stopping timer");
                    break;
                }
            }
        });

        tracing::debug!(period_secs = period.as_secs(), "refresh scheduler started");
        Self { period, handle }
    }

    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!("refresh scheduler stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let (tx, mut rx) = mpsc::channel(4);
        let scheduler = RefreshScheduler::spawn(Duration::from_secs(300), tx);
        assert_eq!(scheduler.period(), Duration::from_secs(300));

        tokio::time::sleep(Duration::from_secs(299)).await;
        assert!(rx.try_recv().is_err());

        assert_eq!(rx.recv().await, Some(FetchTrigger::Periodic));
        assert_eq!(rx.recv().await, Some(FetchTrigger::Periodic));
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_the_timer() {
        let (tx, mut rx) = mpsc::channel(4);
        let scheduler = RefreshScheduler::spawn(Duration::from_secs(1), tx);
        assert!(scheduler.is_running());
        drop(scheduler);

        // The aborted task drops its sender, closing the channel.
        assert_eq!(rx.recv().await, None);
    }
}
