//! Station Registry
//!
//! Stations are created by administrative setup and only ever toggled
//! afterwards (`is_open`, `is_active`); there is no delete.

use tracing::info;

use crate::core::EngineContext;
use crate::db::repository::{RepoError, station};
use crate::error::{EngineError, EngineResult};
use shared::error::ErrorCode;
use shared::models::{Station, StationCreate};
use shared::util::now_millis;

#[derive(Clone)]
pub struct StationRegistry {
    ctx: EngineContext,
}

impl StationRegistry {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Register a station, numbered after the last one of its type
    pub async fn create_station(&self, data: StationCreate) -> EngineResult<Station> {
        let mut tx = self.ctx.begin_write().await?;
        let station = station::create(tx.conn(), &data, now_millis()).await?;
        tx.commit().await?;
        info!(
            station_id = station.id,
            station_type = station.station_type.as_str(),
            station_number = station.station_number,
            service_id = station.service_id,
            "Station created"
        );
        Ok(station)
    }

    /// Open or close a station for new patients
    pub async fn set_open(&self, station_id: i64, open: bool) -> EngineResult<Station> {
        let mut tx = self.ctx.begin_write().await?;
        let station = station::set_open(tx.conn(), station_id, open, now_millis())
            .await
            .map_err(|e| station_not_found(e, station_id))?;
        tx.commit().await?;
        info!(station_id, open, "Station open flag changed");
        Ok(station)
    }

    pub async fn set_active(&self, station_id: i64, active: bool) -> EngineResult<Station> {
        let mut tx = self.ctx.begin_write().await?;
        let station = station::set_active(tx.conn(), station_id, active, now_millis())
            .await
            .map_err(|e| station_not_found(e, station_id))?;
        tx.commit().await?;
        info!(station_id, active, "Station active flag changed");
        Ok(station)
    }

    pub async fn find_station(&self, station_id: i64) -> EngineResult<Station> {
        let mut conn = self.ctx.read().await?;
        station::find_by_id(&mut conn, station_id)
            .await?
            .ok_or_else(|| {
                EngineError::not_found(ErrorCode::StationNotFound, format!("Station {} not found", station_id))
            })
    }

    pub async fn list_stations(&self, include_inactive: bool) -> EngineResult<Vec<Station>> {
        let mut conn = self.ctx.read().await?;
        Ok(station::find_all(&mut conn, include_inactive).await?)
    }
}

fn station_not_found(err: RepoError, station_id: i64) -> EngineError {
    match err {
        RepoError::NotFound(_) => {
            EngineError::not_found(ErrorCode::StationNotFound, format!("Station {} not found", station_id))
        }
        other => other.into(),
    }
}
