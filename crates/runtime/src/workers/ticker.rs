//! Pausable interval driving the decay step.

use std::future;

use tokio::time::{Duration, Instant, Interval, MissedTickBehavior, interval_at};

/// `Active` while an interval is armed, `Paused` otherwise.
///
/// Resuming re-arms the interval one full period from now, so ticks missed
/// while paused are never replayed.
pub(crate) struct DecayTicker {
    period: Duration,
    interval: Option<Interval>,
}

impl DecayTicker {
    pub(crate) fn new(period: Duration, paused: bool) -> Self {
        let mut ticker = Self {
            period: period.max(Duration::from_millis(1)),
            interval: None,
        };
        if !paused {
            ticker.resume();
        }
        ticker
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.interval.is_none()
    }

    /// Returns `false` if already paused.
    pub(crate) fn pause(&mut self) -> bool {
        self.interval.take().is_some()
    }

    /// Returns `false` if already active.
    pub(crate) fn resume(&mut self) -> bool {
        if self.interval.is_some() {
            return false;
        }
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
        true
    }

    /// Completes at the next tick; never completes while paused.
    pub(crate) async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => future::pending::<()>().await,
        }
    }
}
