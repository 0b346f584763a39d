//! Stale entry sweep
//!
//! Cancels `waiting` entries whose appointment time plus the configured
//! grace period has passed. Checked-in patients are left alone. It goes through the ordinary
//! `cancel` transition with a null actor and adds no queue logic itself.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::core::QueueEngine;
use crate::db::repository::appointment;
use crate::error::{EngineError, EngineResult};
use crate::utils::time;

pub const STALE_REASON: &str = "appointment time has passed";

/// Registered as `TaskKind::Periodic`
pub struct StaleEntrySweeper {
    engine: QueueEngine,
    shutdown: CancellationToken,
}

impl StaleEntrySweeper {
    pub fn new(engine: QueueEngine, shutdown: CancellationToken) -> Self {
        Self { engine, shutdown }
    }

    pub async fn run(self) {
        let interval = Duration::from_secs(self.engine.config().stale_sweep_interval_secs);
        tracing::info!("Stale entry sweeper started (every {}s)", interval.as_secs());

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Stale entry sweeper received shutdown signal");
                    break;
                }
            }
            if let Err(e) = self.sweep_once(shared::util::now_millis()).await {
                tracing::error!("Stale entry sweep failed: {}", e);
            }
        }

        tracing::info!("Stale entry sweeper stopped");
    }

    /// Cancel every open entry that went stale before `now`; returns the ids
    pub async fn sweep_once(&self, now: i64) -> EngineResult<Vec<i64>> {
        let config = self.engine.config();
        let tz = config.timezone;
        let grace_millis = config.stale_grace_minutes * 60_000;

        let open = {
            let mut conn = self.engine.pool().acquire().await?;
            appointment::find_waiting_entries_until(&mut conn, time::business_date_at(now, tz)).await?
        };

        let mut cancelled = Vec::new();
        for candidate in open {
            let due = time::local_millis(candidate.scheduled_date, candidate.scheduled_time, tz) + grace_millis;
            if due > now {
                continue;
            }
            match self.engine.queue().cancel(candidate.entry_id, STALE_REASON, None).await {
                Ok(_) => cancelled.push(candidate.entry_id),
                // Moved on since the scan
                Err(EngineError::InvalidState { entry_id, current, .. }) => {
                    tracing::debug!(entry_id, current = %current, "Skipping entry that is no longer open");
                }
                Err(e) => return Err(e),
            }
        }

        if !cancelled.is_empty() {
            tracing::info!(count = cancelled.len(), "Cancelled stale queue entries");
        }
        Ok(cancelled)
    }
}
