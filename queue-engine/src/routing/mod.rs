//! Routing Resolver / station statistics
//!
//! Read side of the queue: which station a new entry lands on, a station's
//! queue in service order, and live counts per station.

use chrono::NaiveDate;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::core::EngineContext;
use crate::db::repository::{RepoResult, queue_entry, station};
use crate::error::EngineResult;
use shared::models::{QueueEntry, QueueStats, QueueStatus, Station, StatusCounts};

/// Lowest-numbered active and open station for the service, else the
/// lowest-numbered active and open station of any service
pub(crate) async fn default_station(conn: &mut SqliteConnection, service_id: i64) -> RepoResult<Option<Station>> {
    if let Some(station) = station::first_open(conn, Some(service_id)).await? {
        return Ok(Some(station));
    }
    let fallback = station::first_open(conn, None).await?;
    if let Some(s) = &fallback {
        debug!(service_id, station_id = s.id, "No open station for service, using system-wide fallback");
    }
    Ok(fallback)
}

#[derive(Clone)]
pub struct RoutingResolver {
    ctx: EngineContext,
}

impl RoutingResolver {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// `None` when no station is both active and open
    pub async fn default_station_for_service(&self, service_id: i64) -> EngineResult<Option<i64>> {
        let mut conn = self.ctx.read().await?;
        Ok(default_station(&mut conn, service_id).await?.map(|s| s.id))
    }

    /// A station's queue for one day, by priority then queue number
    pub async fn station_queue(
        &self,
        station_id: i64,
        status: Option<QueueStatus>,
        date: NaiveDate,
        limit: Option<i64>,
    ) -> EngineResult<Vec<QueueEntry>> {
        let mut conn = self.ctx.read().await?;
        Ok(queue_entry::find_for_station(&mut conn, station_id, date, status, limit).await?)
    }

    pub async fn station_queue_stats(&self, station_id: i64, date: NaiveDate) -> EngineResult<QueueStats> {
        let mut conn = self.ctx.read().await?;
        let mut counts = StatusCounts::default();
        for (status, n) in queue_entry::status_counts(&mut conn, station_id, date).await? {
            counts.add(status, n);
        }
        let average_turnaround = queue_entry::average_turnaround(&mut conn, station_id, date).await?;
        let next = queue_entry::next_candidate(&mut conn, station_id, date).await?;

        Ok(QueueStats {
            station_id,
            date,
            counts,
            average_turnaround,
            next_entry_id: next.as_ref().map(|e| e.id),
            next_queue_number: next.as_ref().and_then(|e| e.queue_number),
            next_queue_code: next.and_then(|e| e.queue_code),
        })
    }
}
