//! Background jobs of the host binary
//!
//! - [`TaskKind::Warmup`]: one-shot job at startup (audit chain verification)
//! - [`TaskKind::Periodic`]: timer loop until shutdown (integrity check,
//!   stale entry sweep)
//!
//! Every job shares one [`CancellationToken`]; [`BackgroundTasks::shutdown`]
//! cancels it and joins the jobs in registration order.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Warmup,
    Periodic,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TaskKind::Warmup => "warmup",
            TaskKind::Periodic => "periodic",
        })
    }
}

struct Job {
    name: &'static str,
    kind: TaskKind,
    handle: JoinHandle<()>,
}

/// Registry of running background jobs
///
/// ```ignore
/// let mut tasks = BackgroundTasks::new();
/// let sweeper = StaleEntrySweeper::new(engine.clone(), tasks.shutdown_token());
/// tasks.spawn("stale_entry_sweeper", TaskKind::Periodic, sweeper.run());
/// tasks.shutdown().await;
/// ```
#[derive(Default)]
pub struct BackgroundTasks {
    jobs: Vec<Job>,
    shutdown: CancellationToken,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Start a job; a panic inside it is logged instead of tearing down the runtime
    pub fn spawn<F>(&mut self, name: &'static str, kind: TaskKind, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let shutdown = self.shutdown.clone();
        let handle = tokio::spawn(async move {
            match AssertUnwindSafe(job).catch_unwind().await {
                // A periodic loop only returns once shutdown is requested
                Ok(()) if kind == TaskKind::Periodic && !shutdown.is_cancelled() => {
                    tracing::warn!(task = name, kind = %kind, "Background job exited before shutdown");
                }
                Ok(()) => tracing::debug!(task = name, kind = %kind, "Background job finished"),
                Err(payload) => tracing::error!(
                    task = name,
                    kind = %kind,
                    panic = %panic_message(payload.as_ref()),
                    "Background job panicked"
                ),
            }
        });
        tracing::debug!(task = name, kind = %kind, "Background job started");
        self.jobs.push(Job { name, kind, handle });
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn log_summary(&self) {
        let names: Vec<String> = self
            .jobs
            .iter()
            .map(|j| format!("{} ({})", j.name, j.kind))
            .collect();
        tracing::info!(count = self.jobs.len(), jobs = %names.join(", "), "Background jobs running");
    }

    /// Signal every job and wait for all of them
    pub async fn shutdown(self) {
        tracing::info!(count = self.jobs.len(), "Stopping background jobs");
        self.shutdown.cancel();

        for job in self.jobs {
            if let Err(e) = job.handle.await {
                tracing::error!(task = job.name, error = %e, "Background job did not stop cleanly");
            }
        }
        tracing::info!("Background jobs stopped");
    }
}
