//! Queue Entry State Machine
//!
//! Creates queue entries and drives them through their lifecycle. Each
//! operation is one write transaction covering the validation reads, the
//! state change and its `queue_log` row.

use chrono::NaiveDate;
use sqlx::SqliteConnection;
use tracing::{info, warn};

use super::code::{MAX_SLOT_SEQUENCE, TimeSlot, format_queue_code};
use super::machine::QueueTransition;
use crate::audit::storage::record_queue_log;
use crate::audit::QueueLogInput;
use crate::core::EngineContext;
use crate::db::repository::queue_entry::{self, NewQueueEntry};
use crate::db::repository::{appointment, queue_log, visit};
use crate::error::{EngineError, EngineResult};
use crate::routing::default_station;
use crate::utils::time;
use shared::error::ErrorCode;
use shared::models::{QueueAction, QueueEntry, QueueEntryCreate, QueueLog};
use shared::util::{elapsed_minutes, now_millis};

#[derive(Clone)]
pub struct QueueService {
    ctx: EngineContext,
}

impl QueueService {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Book a patient into the queue of the service's default open station
    ///
    /// Primary-facility appointments get a slot-scoped number and code; any
    /// failure rolls back the visit as well.
    pub async fn create(&self, req: QueueEntryCreate) -> EngineResult<QueueEntry> {
        let config = self.ctx.config.clone();
        let now = now_millis();
        let mut tx = self.ctx.begin_write().await?;

        let appointment = match req.appointment_id {
            Some(id) => {
                let appt = appointment::find_by_id(tx.conn(), id).await?.ok_or_else(|| {
                    EngineError::not_found(ErrorCode::AppointmentNotFound, format!("Appointment {} not found", id))
                })?;
                if appt.patient_id != req.patient_id {
                    return Err(EngineError::validation(format!(
                        "Appointment {} does not belong to patient {}",
                        id, req.patient_id
                    )));
                }
                if appt.service_id != req.service_id {
                    return Err(EngineError::validation(format!(
                        "Appointment {} is for service {}, not {}",
                        id, appt.service_id, req.service_id
                    )));
                }
                if let Some(existing) = queue_entry::find_open_for_appointment(tx.conn(), id).await? {
                    warn!(appointment_id = id, entry_id = existing.id, "Queue entry rejected: appointment already queued");
                    return Err(EngineError::validation(format!(
                        "Appointment {} is already queued as entry {}{}",
                        id,
                        existing.id,
                        existing.queue_code.map(|c| format!(" ({})", c)).unwrap_or_default()
                    )));
                }
                Some(appt)
            }
            None => None,
        };

        let station = default_station(tx.conn(), req.service_id).await?.ok_or_else(|| {
            warn!(service_id = req.service_id, "Queue entry rejected: no open station");
            EngineError::NoOpenStation {
                service_id: req.service_id,
            }
        })?;

        let primary = appointment
            .as_ref()
            .filter(|a| a.facility_id == config.primary_facility_id);
        let queue_date = match primary {
            Some(a) => a.scheduled_date,
            None => time::business_date_at(now, config.timezone),
        };

        let visit_id = visit::create(tx.conn(), req.patient_id, req.appointment_id, queue_date, now).await?;

        let (time_slot, slot_order, queue_number, queue_code) = match primary {
            Some(appt) => {
                let slot_key = TimeSlot::for_time(
                    appt.scheduled_time,
                    config.business_start_hour,
                    config.business_end_hour,
                );
                let slot = slot_key.label();
                let taken = queue_entry::count_active_in_slot(tx.conn(), queue_date, &slot).await?;
                if taken >= config.slot_capacity {
                    warn!(date = %queue_date, slot = %slot, taken, "Queue entry rejected: slot full");
                    return Err(EngineError::Capacity {
                        date: queue_date,
                        slot,
                        capacity: config.slot_capacity,
                    });
                }
                let number = queue_entry::next_slot_number(tx.conn(), queue_date, &slot).await?;
                if number > MAX_SLOT_SEQUENCE {
                    warn!(date = %queue_date, slot = %slot, number, "Queue entry rejected: slot sequence exhausted");
                    return Err(EngineError::Capacity {
                        date: queue_date,
                        slot,
                        capacity: config.slot_capacity,
                    });
                }
                let code = format_queue_code(queue_date, &slot, number);
                (Some(slot), Some(slot_key.ordinal()), Some(number), Some(code))
            }
            None => (None, None, None, None),
        };

        let entry = queue_entry::insert(
            tx.conn(),
            &NewQueueEntry {
                visit_id,
                appointment_id: req.appointment_id,
                patient_id: req.patient_id,
                service_id: req.service_id,
                station_id: station.id,
                queue_type: req.queue_type,
                queue_date,
                time_slot,
                slot_order,
                queue_number,
                queue_code,
                priority_level: req.priority_level,
            },
            now,
        )
        .await?;

        record_queue_log(
            tx.conn(),
            QueueLogInput {
                queue_entry_id: entry.id,
                action: QueueAction::Created,
                old_status: None,
                new_status: entry.status,
                remarks: None,
                performed_by: req.performed_by,
            },
            now,
        )
        .await;
        tx.commit().await?;

        info!(
            entry_id = entry.id,
            station_id = entry.station_id,
            queue_code = ?entry.queue_code,
            priority = ?entry.priority_level,
            "Queue entry created"
        );
        Ok(entry)
    }

    /// `waiting → arrived`; stamps the visit's arrival time
    pub async fn check_in(&self, entry_id: i64, actor: Option<i64>) -> EngineResult<QueueEntry> {
        self.transition(entry_id, QueueTransition::CheckIn, actor, None).await
    }

    /// Serve the highest-priority, lowest-numbered waiting entry of a station
    pub async fn call_next(&self, station_id: i64, date: NaiveDate, actor: Option<i64>) -> EngineResult<QueueEntry> {
        let now = now_millis();
        let mut tx = self.ctx.begin_write().await?;
        let entry = queue_entry::next_candidate(tx.conn(), station_id, date)
            .await?
            .ok_or(EngineError::NoPatientsWaiting { station_id, date })?;
        let called = apply(tx.conn(), entry, QueueTransition::CallNext, actor, None, now).await?;
        tx.commit().await?;
        Ok(called)
    }

    pub async fn complete(&self, entry_id: i64, actor: Option<i64>) -> EngineResult<QueueEntry> {
        self.transition(entry_id, QueueTransition::Complete, actor, None).await
    }

    pub async fn skip(&self, entry_id: i64, actor: Option<i64>, remarks: Option<String>) -> EngineResult<QueueEntry> {
        self.transition(entry_id, QueueTransition::Skip, actor, remarks).await
    }

    /// `waiting | in_progress → no_show`; a checked-in patient is never a no-show
    pub async fn mark_no_show(&self, entry_id: i64, actor: Option<i64>) -> EngineResult<QueueEntry> {
        self.transition(entry_id, QueueTransition::NoShow, actor, None).await
    }

    /// Cancel from any non-terminal status; `actor = None` is patient-initiated
    pub async fn cancel(&self, entry_id: i64, reason: &str, actor: Option<i64>) -> EngineResult<QueueEntry> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(EngineError::validation("A cancellation reason is required"));
        }
        self.transition(entry_id, QueueTransition::Cancel, actor, Some(reason.to_string()))
            .await
    }

    /// `no_show → waiting`; clears the completion timestamps
    pub async fn reinstate(&self, entry_id: i64, actor: Option<i64>) -> EngineResult<QueueEntry> {
        self.transition(entry_id, QueueTransition::Reinstate, actor, None).await
    }

    pub async fn find_entry(&self, entry_id: i64) -> EngineResult<QueueEntry> {
        let mut conn = self.ctx.read().await?;
        require_entry(&mut conn, entry_id).await
    }

    /// Audit trail of an entry, oldest first
    pub async fn history(&self, entry_id: i64) -> EngineResult<Vec<QueueLog>> {
        let mut conn = self.ctx.read().await?;
        Ok(queue_log::find_by_entry(&mut conn, entry_id).await?)
    }

    async fn transition(
        &self,
        entry_id: i64,
        transition: QueueTransition,
        actor: Option<i64>,
        remarks: Option<String>,
    ) -> EngineResult<QueueEntry> {
        let now = now_millis();
        let mut tx = self.ctx.begin_write().await?;
        let entry = require_entry(tx.conn(), entry_id).await?;
        let updated = apply(tx.conn(), entry, transition, actor, remarks, now).await?;
        tx.commit().await?;
        Ok(updated)
    }
}

async fn require_entry(conn: &mut SqliteConnection, entry_id: i64) -> EngineResult<QueueEntry> {
    queue_entry::find_by_id(conn, entry_id).await?.ok_or_else(|| {
        EngineError::not_found(
            ErrorCode::QueueEntryNotFound,
            format!("Queue entry {} not found", entry_id),
        )
    })
}

/// Validate, compute the new timing fields, persist, then log
async fn apply(
    conn: &mut SqliteConnection,
    entry: QueueEntry,
    transition: QueueTransition,
    actor: Option<i64>,
    remarks: Option<String>,
    now: i64,
) -> EngineResult<QueueEntry> {
    let from = entry.status;
    if !transition.permits(from) {
        warn!(entry_id = entry.id, current = %from, attempted = transition.name(), "Transition rejected");
        return Err(EngineError::InvalidState {
            entry_id: entry.id,
            current: from,
            attempted: transition.name(),
        });
    }

    let mut next = entry;
    next.status = transition.target();
    next.updated_at = now;
    match transition {
        QueueTransition::CallNext => {
            next.time_started = Some(now);
            next.waiting_time = Some(elapsed_minutes(next.time_in, now));
        }
        QueueTransition::Reinstate => {
            next.time_completed = None;
            next.turnaround_time = None;
        }
        t if t.completes() => {
            next.time_completed = Some(now);
            next.turnaround_time = Some(elapsed_minutes(next.time_in, now));
        }
        _ => {}
    }

    if !queue_entry::update_progress(conn, &next, from).await? {
        let current = queue_entry::find_by_id(conn, next.id)
            .await?
            .map(|e| e.status)
            .unwrap_or(from);
        return Err(EngineError::InvalidState {
            entry_id: next.id,
            current,
            attempted: transition.name(),
        });
    }
    if transition == QueueTransition::CheckIn {
        visit::stamp_arrival(conn, next.visit_id, now).await?;
    }

    record_queue_log(
        conn,
        QueueLogInput {
            queue_entry_id: next.id,
            action: transition.action(),
            old_status: Some(from),
            new_status: next.status,
            remarks,
            performed_by: actor,
        },
        now,
    )
    .await;

    info!(
        entry_id = next.id,
        from = %from,
        to = %next.status,
        actor = ?actor,
        "Queue entry transitioned"
    );
    Ok(next)
}
