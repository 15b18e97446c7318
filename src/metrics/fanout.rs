//! Fan-out with cancel-on-first-error
//!
//! Runs a batch of independent fallible operations concurrently under one
//! shared deadline. The first failure (or the deadline) cancels every
//! sibling still in flight and is returned to the caller.

use std::time::Duration;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{Error, Result};

/// Absolute point in time a whole scrape must finish by
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    pub at: Instant,
    pub budget: Duration,
}

impl Deadline {
    /// Deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }
}

/// One named unit of work in a fan-out
pub struct Task<'a> {
    pub name: &'static str,
    pub future: BoxFuture<'a, Result<()>>,
}

impl<'a> Task<'a> {
    pub fn new(name: &'static str, future: BoxFuture<'a, Result<()>>) -> Self {
        Self { name, future }
    }
}

/// Run every task to completion, or stop at the first error.
///
/// On failure `cancel` is triggered and the remaining tasks are dropped at
/// their next await point. Work a sibling already finished is not undone.
pub async fn run_all(
    tasks: Vec<Task<'_>>,
    deadline: Deadline,
    cancel: &CancellationToken,
) -> Result<()> {
    if deadline.is_expired() {
        cancel.cancel();
        return Err(Error::ScrapeTimeout(deadline.budget));
    }

    let mut pending: FuturesUnordered<_> = tasks
        .into_iter()
        .map(|task| {
            let token = cancel.clone();
            async move {
                let outcome = tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(Error::ScrapeCancelled(task.name.to_string())),
                    result = task.future => result,
                };
                (task.name, outcome)
            }
        })
        .collect();

    loop {
        match tokio::time::timeout_at(deadline.at, pending.next()).await {
            Err(_) => {
                cancel.cancel();
                return Err(Error::ScrapeTimeout(deadline.budget));
            }
            Ok(None) => return Ok(()),
            Ok(Some((name, Ok(())))) => {
                debug!(task = name, "Task completed");
            }
            Ok(Some((name, Err(e)))) => {
                debug!(task = name, error = %e, "Task failed, cancelling siblings");
                cancel.cancel();
                return Err(e);
            }
        }
    }
}
