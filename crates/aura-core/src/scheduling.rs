//! ---
//! aura_section: "01-core-functionality"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Runtime helpers supporting the session owner task."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Fixed-period ticker. The first tick fires one full period after creation.
#[derive(Debug)]
pub struct RateLimiter {
    interval: tokio::time::Interval,
}

impl RateLimiter {
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub async fn tick(&mut self) -> Instant {
        self.interval.tick().await
    }
}

/// Tracks spawned timer tasks so they can be cancelled together.
#[derive(Debug, Default)]
pub struct PendingSteps {
    tasks: Vec<JoinHandle<()>>,
}

impl PendingSteps {
    pub fn spawn<F>(&mut self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.retain(|task| !task.is_finished());
        self.tasks.push(tokio::spawn(fut));
    }

    /// Abort every task still waiting. Returns how many were aborted.
    pub fn abort_all(&mut self) -> usize {
        let mut aborted = 0;
        for task in self.tasks.drain(..) {
            if !task.is_finished() {
                task.abort();
                aborted += 1;
            }
        }
        aborted
    }

    pub fn len(&self) -> usize {
        self.tasks.iter().filter(|task| !task.is_finished()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
