//! Periodic audit integrity check
//!
//! One full check (every queue day) at startup, then the current business
//! day every `integrity_check_interval_secs`.

use std::time::Duration;

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;

use super::AuditService;
use crate::utils::time;

/// Registered as `TaskKind::Periodic`
pub struct AuditIntegrityScheduler {
    audit: AuditService,
    shutdown: CancellationToken,
    interval: Duration,
    tz: chrono_tz::Tz,
}

impl AuditIntegrityScheduler {
    pub fn new(audit: AuditService, shutdown: CancellationToken, interval: Duration, tz: chrono_tz::Tz) -> Self {
        Self {
            audit,
            shutdown,
            interval,
            tz,
        }
    }

    pub async fn run(self) {
        tracing::info!("Audit integrity scheduler started");

        self.check(None).await;

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Audit integrity scheduler received shutdown signal");
                    break;
                }
            }
            self.check(Some(time::business_date(self.tz))).await;
        }

        tracing::info!("Audit integrity scheduler stopped");
    }

    async fn check(&self, date: Option<NaiveDate>) {
        if let Err(e) = self.audit.integrity_check(date).await {
            tracing::error!("Audit integrity check failed: {}", e);
        }
    }
}
