//! Cancellable per-question countdown.
//!
//! The countdown is a tokio task that sends one [`Tick`] per period over an
//! unbounded channel. Each tick carries the index of the question it was
//! started for so a late tick from a previous question can be discarded.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// One countdown step for question `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub index: usize,
}

/// Handle to the running countdown task, if any. Dropping it cancels the task.
#[derive(Debug)]
pub struct Countdown {
    period: Duration,
    handle: Option<JoinHandle<()>>,
}

impl Countdown {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Start ticking for question `index`, cancelling any previous countdown.
    pub fn start(&mut self, index: usize, ticks: UnboundedSender<Tick>) {
        self.cancel();
        let period = self.period;
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if ticks.send(Tick { index }).is_err() {
                    tracing::trace!(index, "countdown receiver dropped");
                    break;
                }
            }
        }));
    }

    /// Stop the countdown. Safe to call when nothing is running.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut countdown = Countdown::new(Duration::from_secs(1));
        countdown.start(3, tx);

        let start = Instant::now();
        assert_eq!(rx.recv().await, Some(Tick { index: 3 }));
        assert_eq!(start.elapsed(), Duration::from_secs(1));
        assert_eq!(rx.recv().await, Some(Tick { index: 3 }));
        assert_eq!(start.elapsed(), Duration::from_secs(2));
        assert!(countdown.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut countdown = Countdown::new(Duration::from_secs(1));
        countdown.start(0, tx);
        assert!(rx.recv().await.is_some());

        countdown.cancel();
        assert!(!countdown.is_running());
        // The aborted task drops its sender, closing the channel.
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_previous_countdown() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut countdown = Countdown::new(Duration::from_secs(1));
        countdown.start(0, tx.clone());
        countdown.start(1, tx);

        assert_eq!(rx.recv().await, Some(Tick { index: 1 }));
        assert_eq!(rx.recv().await, Some(Tick { index: 1 }));
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        {
            let mut countdown = Countdown::new(Duration::from_secs(1));
            countdown.start(0, tx);
        }
        assert_eq!(rx.recv().await, None);
    }
}
