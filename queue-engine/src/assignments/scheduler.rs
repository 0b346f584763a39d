//! Assignment Scheduler
//!
//! Date-ranged employee ↔ station bindings. Every mutating operation runs
//! its conflict checks and its writes inside one write transaction, so two
//! concurrent requests can never both pass validation and both commit.

use chrono::{Days, NaiveDate};
use serde_json::json;
use sqlx::SqliteConnection;
use tracing::{debug, info, warn};

use super::range::{DateRange, ShiftWindow};
use crate::audit::storage::record_assignment_log;
use crate::audit::AssignmentLogInput;
use crate::core::EngineContext;
use crate::db::repository::assignment::{self, NewSchedule};
use crate::db::repository::{employee, station};
use crate::error::{EngineError, EngineResult};
use shared::error::ErrorCode;
use shared::models::{
    AssignRequest, AssignmentAction, AssignmentSchedule, AssignmentType, ConflictReport, Employee,
    EmployeeCreate, ReassignRequest, RemoveMode, RemoveRequest, Station, StationWithSchedule,
};
use shared::util::now_millis;

#[derive(Clone)]
pub struct AssignmentScheduler {
    ctx: EngineContext,
}

impl AssignmentScheduler {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Employees
    // ========================================================================

    pub async fn create_employee(&self, data: EmployeeCreate) -> EngineResult<Employee> {
        let mut tx = self.ctx.begin_write().await?;
        let employee = employee::create(tx.conn(), &data, now_millis()).await?;
        tx.commit().await?;
        info!(employee_id = employee.id, name = %employee.name, "Employee created");
        Ok(employee)
    }

    pub async fn find_employee(&self, employee_id: i64) -> EngineResult<Employee> {
        let mut conn = self.ctx.read().await?;
        require_employee(&mut conn, employee_id).await
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Bind an employee to a station from `start_date`
    ///
    /// An inactive row for the same (employee, station, start date) is
    /// reactivated with the new terms instead of inserting a duplicate.
    pub async fn assign(&self, req: AssignRequest) -> EngineResult<AssignmentSchedule> {
        let shift = ShiftWindow::new(req.shift_start, req.shift_end);
        if !shift.is_valid() {
            return Err(EngineError::invalid_shift_window(format!(
                "Shift start {} must be before shift end {}",
                req.shift_start.format("%H:%M"),
                req.shift_end.format("%H:%M")
            )));
        }
        let end_date = self.resolve_end_date(&req)?;
        let data = NewSchedule {
            employee_id: req.employee_id,
            station_id: req.station_id,
            start_date: req.start_date,
            end_date,
            shift_start: req.shift_start,
            shift_end: req.shift_end,
            assignment_type: req.assignment_type,
            assigned_by: req.assigned_by,
        };

        let now = now_millis();
        let mut tx = self.ctx.begin_write().await?;
        let employee = require_employee(tx.conn(), req.employee_id).await?;
        let station = require_station(tx.conn(), req.station_id).await?;
        if !station.is_active {
            return Err(EngineError::validation(format!(
                "Station {} is inactive and cannot take assignments",
                station.name
            )));
        }

        let (schedule, action) = place_schedule(tx.conn(), &employee, &station, &data, now).await?;
        record_assignment_log(
            tx.conn(),
            AssignmentLogInput {
                schedule_id: schedule.id,
                station_id: schedule.station_id,
                employee_id: schedule.employee_id,
                action,
                details: schedule_details(&schedule),
                performed_by: req.assigned_by,
            },
            now,
        )
        .await;
        tx.commit().await?;

        info!(
            schedule_id = schedule.id,
            employee_id = employee.id,
            station_id = station.id,
            action = action.as_str(),
            start_date = %schedule.start_date,
            end_date = ?schedule.end_date,
            "Assignment saved"
        );
        Ok(schedule)
    }

    /// Hand a station over to another employee from `effective_date`
    ///
    /// The current occupant's schedule ends the day before (or is
    /// deactivated when it would start on or after that day). The new
    /// schedule keeps the old end date, shift window and type.
    pub async fn reassign(&self, req: ReassignRequest) -> EngineResult<AssignmentSchedule> {
        let now = now_millis();
        let mut tx = self.ctx.begin_write().await?;
        let station = require_station(tx.conn(), req.station_id).await?;
        let new_employee = require_employee(tx.conn(), req.new_employee_id).await?;

        let current = assignment::find_active_for_station_from(tx.conn(), station.id, req.effective_date)
            .await?
            .into_iter()
            .find(|s| s.covers(req.effective_date))
            .ok_or_else(|| {
                EngineError::not_found(
                    ErrorCode::ScheduleNotFound,
                    format!(
                        "Station {} has no active assignment on {}",
                        station.name, req.effective_date
                    ),
                )
            })?;
        if current.employee_id == new_employee.id {
            return Err(EngineError::validation(format!(
                "{} is already assigned to station {} on {}",
                new_employee.name, station.name, req.effective_date
            )));
        }

        let (closed, close_action) = match req.effective_date.pred_opt() {
            Some(day_before) if day_before >= current.start_date => (
                assignment::set_end_date(tx.conn(), current.id, day_before, now).await?,
                AssignmentAction::Ended,
            ),
            _ => (
                assignment::deactivate(tx.conn(), current.id, now).await?,
                AssignmentAction::Deactivated,
            ),
        };
        record_assignment_log(
            tx.conn(),
            AssignmentLogInput {
                schedule_id: closed.id,
                station_id: closed.station_id,
                employee_id: closed.employee_id,
                action: close_action,
                details: json!({
                    "end_date": closed.end_date,
                    "is_active": closed.is_active,
                    "replaced_by_employee_id": new_employee.id,
                }),
                performed_by: req.assigned_by,
            },
            now,
        )
        .await;

        let data = NewSchedule {
            employee_id: new_employee.id,
            station_id: station.id,
            start_date: req.effective_date,
            end_date: current.end_date,
            shift_start: current.shift_start,
            shift_end: current.shift_end,
            assignment_type: current.assignment_type,
            assigned_by: req.assigned_by,
        };
        let (schedule, _) = place_schedule(tx.conn(), &new_employee, &station, &data, now).await?;

        let mut details = schedule_details(&schedule);
        details["previous_schedule_id"] = json!(current.id);
        details["previous_employee_id"] = json!(current.employee_id);
        record_assignment_log(
            tx.conn(),
            AssignmentLogInput {
                schedule_id: schedule.id,
                station_id: schedule.station_id,
                employee_id: schedule.employee_id,
                action: AssignmentAction::Reassigned,
                details,
                performed_by: req.assigned_by,
            },
            now,
        )
        .await;
        tx.commit().await?;

        info!(
            station_id = station.id,
            from_employee = current.employee_id,
            to_employee = new_employee.id,
            effective_date = %req.effective_date,
            "Station reassigned"
        );
        Ok(schedule)
    }

    /// Take the station's occupant off from `effective_date`
    pub async fn remove(&self, req: RemoveRequest) -> EngineResult<AssignmentSchedule> {
        let now = now_millis();
        let mut tx = self.ctx.begin_write().await?;
        let station = require_station(tx.conn(), req.station_id).await?;

        let candidates =
            assignment::find_active_for_station_from(tx.conn(), station.id, req.effective_date).await?;
        let target = candidates
            .iter()
            .find(|s| s.covers(req.effective_date))
            .or_else(|| candidates.first())
            .cloned()
            .ok_or_else(|| {
                EngineError::not_found(
                    ErrorCode::ScheduleNotFound,
                    format!(
                        "Station {} has no active assignment on or after {}",
                        station.name, req.effective_date
                    ),
                )
            })?;

        if req.effective_date < target.start_date {
            warn!(
                schedule_id = target.id,
                effective_date = %req.effective_date,
                start_date = %target.start_date,
                "Remove rejected: effective date precedes the assignment"
            );
            return Err(EngineError::invalid_date_range(format!(
                "Effective date {} is before the assignment start date {}; the end date cannot precede the start date",
                req.effective_date, target.start_date
            )));
        }

        let (schedule, action) = match req.mode {
            RemoveMode::EndAssignment => {
                let end = req
                    .effective_date
                    .pred_opt()
                    .filter(|day_before| *day_before >= target.start_date)
                    .unwrap_or(target.start_date);
                (
                    assignment::set_end_date(tx.conn(), target.id, end, now).await?,
                    AssignmentAction::Ended,
                )
            }
            RemoveMode::Deactivate => (
                assignment::deactivate(tx.conn(), target.id, now).await?,
                AssignmentAction::Deactivated,
            ),
        };
        record_assignment_log(
            tx.conn(),
            AssignmentLogInput {
                schedule_id: schedule.id,
                station_id: schedule.station_id,
                employee_id: schedule.employee_id,
                action,
                details: json!({
                    "effective_date": req.effective_date,
                    "end_date": schedule.end_date,
                    "is_active": schedule.is_active,
                }),
                performed_by: req.performed_by,
            },
            now,
        )
        .await;
        tx.commit().await?;

        info!(
            schedule_id = schedule.id,
            station_id = station.id,
            action = action.as_str(),
            "Assignment removed"
        );
        Ok(schedule)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// The employee's active schedule covering `date`, earliest shift first
    pub async fn active_assignment_for(
        &self,
        employee_id: i64,
        date: NaiveDate,
    ) -> EngineResult<Option<AssignmentSchedule>> {
        let mut conn = self.ctx.read().await?;
        let schedules = assignment::find_active_for_employee_on(&mut conn, employee_id, date).await?;
        debug!(employee_id, %date, found = schedules.len(), "Resolved active assignment");
        Ok(schedules.into_iter().next())
    }

    /// Every active station with whoever covers it on `date`
    pub async fn all_stations_with_assignments(&self, date: NaiveDate) -> EngineResult<Vec<StationWithSchedule>> {
        let mut conn = self.ctx.read().await?;
        let stations = station::find_all(&mut conn, false).await?;
        let schedules = assignment::find_active_on(&mut conn, date).await?;

        let mut result = Vec::with_capacity(stations.len());
        for station in stations {
            let schedule = schedules.iter().find(|s| s.station_id == station.id).cloned();
            let employee_name = match &schedule {
                Some(s) => employee::find_by_id(&mut conn, s.employee_id).await?.map(|e| e.name),
                None => None,
            };
            result.push(StationWithSchedule {
                station,
                schedule,
                employee_name,
            });
        }
        Ok(result)
    }

    /// Non-mutating pre-check for an assignment
    ///
    /// `shift` defaults to the whole day, which reports every employee
    /// booking that overlaps the dates.
    pub async fn check_conflicts(
        &self,
        employee_id: i64,
        station_id: i64,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
        shift: Option<ShiftWindow>,
    ) -> EngineResult<ConflictReport> {
        if end_date.is_some_and(|end| end < start_date) {
            return Err(EngineError::invalid_date_range(format!(
                "End date must not be before start date {}",
                start_date
            )));
        }
        let mut conn = self.ctx.read().await?;
        find_conflicts(
            &mut conn,
            employee_id,
            station_id,
            DateRange::new(start_date, end_date),
            shift.unwrap_or_else(ShiftWindow::full_day),
        )
        .await
    }

    /// Full history of a station, active and inactive, newest first
    pub async fn schedules_for_station(&self, station_id: i64) -> EngineResult<Vec<AssignmentSchedule>> {
        let mut conn = self.ctx.read().await?;
        Ok(assignment::find_by_station(&mut conn, station_id).await?)
    }

    fn resolve_end_date(&self, req: &AssignRequest) -> EngineResult<Option<NaiveDate>> {
        match (req.end_date, req.assignment_type) {
            (Some(end), _) if end < req.start_date => Err(EngineError::invalid_date_range(format!(
                "End date {} is before start date {}",
                end, req.start_date
            ))),
            (Some(end), _) => Ok(Some(end)),
            (None, AssignmentType::Permanent) => Ok(None),
            (None, AssignmentType::Temporary) => {
                let days = self.ctx.config.temporary_assignment_days.max(1) as u64;
                req.start_date
                    .checked_add_days(Days::new(days - 1))
                    .map(Some)
                    .ok_or_else(|| EngineError::invalid_date_range("Temporary assignment window is out of range"))
            }
        }
    }
}

async fn require_employee(conn: &mut SqliteConnection, employee_id: i64) -> EngineResult<Employee> {
    employee::find_by_id(conn, employee_id).await?.ok_or_else(|| {
        EngineError::not_found(
            ErrorCode::EmployeeNotFound,
            format!("Employee {} not found", employee_id),
        )
    })
}

async fn require_station(conn: &mut SqliteConnection, station_id: i64) -> EngineResult<Station> {
    station::find_by_id(conn, station_id).await?.ok_or_else(|| {
        EngineError::not_found(
            ErrorCode::StationNotFound,
            format!("Station {} not found", station_id),
        )
    })
}

/// Station conflicts: any other active schedule on the station with
/// overlapping dates. Employee conflicts: the employee's active schedules on
/// other stations with overlapping dates and shift windows.
async fn find_conflicts(
    conn: &mut SqliteConnection,
    employee_id: i64,
    station_id: i64,
    range: DateRange,
    shift: ShiftWindow,
) -> EngineResult<ConflictReport> {
    let candidates = assignment::find_conflict_candidates(conn, employee_id, station_id).await?;
    let mut report = ConflictReport::default();
    for candidate in candidates {
        if !range.overlaps(&DateRange::from(&candidate)) {
            continue;
        }
        if candidate.station_id == station_id {
            report.station_conflicts.push(candidate);
        } else if candidate.employee_id == employee_id && shift.overlaps(&ShiftWindow::from(&candidate)) {
            report.employee_conflicts.push(candidate);
        }
    }
    Ok(report)
}

/// Conflict-check then insert or reactivate, on the caller's transaction
async fn place_schedule(
    conn: &mut SqliteConnection,
    employee: &Employee,
    station: &Station,
    data: &NewSchedule,
    now: i64,
) -> EngineResult<(AssignmentSchedule, AssignmentAction)> {
    let report = find_conflicts(
        conn,
        employee.id,
        station.id,
        DateRange::new(data.start_date, data.end_date),
        ShiftWindow::new(data.shift_start, data.shift_end),
    )
    .await?;
    if !report.station_conflicts.is_empty() {
        warn!(
            station_id = station.id,
            employee_id = employee.id,
            conflicts = report.station_conflicts.len(),
            "Assignment rejected: station already occupied"
        );
        return Err(EngineError::station_conflict(&station.name, report.station_conflicts));
    }
    if !report.employee_conflicts.is_empty() {
        warn!(
            station_id = station.id,
            employee_id = employee.id,
            conflicts = report.employee_conflicts.len(),
            "Assignment rejected: employee already bound elsewhere"
        );
        return Err(EngineError::employee_conflict(&employee.name, report.employee_conflicts));
    }

    let existing = assignment::find_by_tuple(conn, employee.id, station.id, data.start_date).await?;
    match existing {
        Some(inactive) if !inactive.is_active => Ok((
            assignment::reactivate(conn, inactive.id, data, now).await?,
            AssignmentAction::Reactivated,
        )),
        _ => Ok((assignment::insert(conn, data, now).await?, AssignmentAction::Assigned)),
    }
}

fn schedule_details(schedule: &AssignmentSchedule) -> serde_json::Value {
    json!({
        "start_date": schedule.start_date,
        "end_date": schedule.end_date,
        "shift_start": schedule.shift_start.format("%H:%M").to_string(),
        "shift_end": schedule.shift_end.format("%H:%M").to_string(),
        "assignment_type": schedule.assignment_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Config, QueueEngine};
    use crate::db::DbService;
    use chrono::NaiveTime;
    use shared::models::{StationCreate, StationType};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    struct Fixture {
        engine: QueueEngine,
        e1: Employee,
        e2: Employee,
        s1: Station,
        s2: Station,
    }

    async fn fixture() -> Fixture {
        let db = DbService::in_memory().await.unwrap();
        let engine = QueueEngine::new(db, Config::for_tests());
        let scheduler = engine.assignments();
        let e1 = scheduler.create_employee(EmployeeCreate { name: "Ana Cruz".into() }).await.unwrap();
        let e2 = scheduler.create_employee(EmployeeCreate { name: "Ben Reyes".into() }).await.unwrap();
        let stations = engine.stations();
        let s1 = stations
            .create_station(StationCreate {
                name: "Triage 1".into(),
                station_type: StationType::Triage,
                service_id: 1,
            })
            .await
            .unwrap();
        let s2 = stations
            .create_station(StationCreate {
                name: "Consultation 1".into(),
                station_type: StationType::Consultation,
                service_id: 2,
            })
            .await
            .unwrap();
        Fixture { engine, e1, e2, s1, s2 }
    }

    fn request(employee: &Employee, station: &Station, start: &str, shift: (u32, u32)) -> AssignRequest {
        AssignRequest {
            employee_id: employee.id,
            station_id: station.id,
            start_date: d(start),
            assignment_type: AssignmentType::Permanent,
            shift_start: t(shift.0),
            shift_end: t(shift.1),
            assigned_by: Some(99),
            end_date: None,
        }
    }

    #[tokio::test]
    async fn test_assign_logs_and_resolves() {
        let f = fixture().await;
        let scheduler = f.engine.assignments();
        let schedule = scheduler.assign(request(&f.e1, &f.s1, "2025-01-10", (8, 17))).await.unwrap();
        assert!(schedule.is_active);
        assert_eq!(schedule.end_date, None);

        let active = scheduler.active_assignment_for(f.e1.id, d("2025-02-01")).await.unwrap();
        assert_eq!(active.map(|s| s.id), Some(schedule.id));
        assert!(scheduler.active_assignment_for(f.e1.id, d("2025-01-09")).await.unwrap().is_none());

        let history = f.engine.audit().assignment_history(schedule.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, AssignmentAction::Assigned);
        assert_eq!(history[0].performed_by, Some(99));
    }

    #[tokio::test]
    async fn test_station_conflict_ignores_shift() {
        let f = fixture().await;
        let scheduler = f.engine.assignments();
        scheduler.assign(request(&f.e1, &f.s1, "2025-01-10", (7, 12))).await.unwrap();

        let err = scheduler
            .assign(request(&f.e2, &f.s1, "2025-01-20", (13, 17)))
            .await
            .unwrap_err();
        match err {
            EngineError::StationConflict { message, conflicts } => {
                assert!(message.contains("Triage 1"));
                assert!(message.contains("Ana Cruz"));
                assert_eq!(conflicts.len(), 1);
            }
            other => panic!("expected station conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_back_to_back_shifts_on_two_stations() {
        let f = fixture().await;
        let scheduler = f.engine.assignments();
        scheduler.assign(request(&f.e1, &f.s1, "2025-01-10", (7, 12))).await.unwrap();
        scheduler.assign(request(&f.e1, &f.s2, "2025-01-10", (12, 17))).await.unwrap();

        let report = scheduler
            .check_conflicts(f.e1.id, f.s2.id, d("2025-01-15"), None, Some(ShiftWindow::new(t(11), t(13))))
            .await
            .unwrap();
        assert_eq!(report.employee_conflicts.len(), 1);
        assert_eq!(report.station_conflicts.len(), 1);
        assert!(!report.is_clear());
    }

    #[tokio::test]
    async fn test_temporary_defaults_to_window() {
        let f = fixture().await;
        let mut req = request(&f.e1, &f.s1, "2025-01-10", (8, 17));
        req.assignment_type = AssignmentType::Temporary;
        let schedule = f.engine.assignments().assign(req).await.unwrap();
        assert_eq!(schedule.end_date, Some(d("2025-02-08")));
    }

    #[tokio::test]
    async fn test_rejects_bad_inputs() {
        let f = fixture().await;
        let scheduler = f.engine.assignments();

        let err = scheduler.assign(request(&f.e1, &f.s1, "2025-01-10", (17, 8))).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidShiftWindow);

        let mut req = request(&f.e1, &f.s1, "2025-01-10", (8, 17));
        req.end_date = Some(d("2025-01-09"));
        let err = scheduler.assign(req).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidDateRange);

        let mut req = request(&f.e1, &f.s1, "2025-01-10", (8, 17));
        req.employee_id = 404;
        let err = scheduler.assign(req).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::EmployeeNotFound);
    }

    #[tokio::test]
    async fn test_deactivate_then_reassign_same_tuple_reactivates() {
        let f = fixture().await;
        let scheduler = f.engine.assignments();
        let first = scheduler.assign(request(&f.e1, &f.s1, "2025-01-10", (8, 17))).await.unwrap();

        scheduler
            .remove(RemoveRequest {
                station_id: f.s1.id,
                effective_date: d("2025-01-12"),
                mode: RemoveMode::Deactivate,
                performed_by: None,
            })
            .await
            .unwrap();

        let again = scheduler.assign(request(&f.e1, &f.s1, "2025-01-10", (9, 15))).await.unwrap();
        assert_eq!(again.id, first.id);
        assert!(again.is_active);
        assert_eq!(again.shift_start, t(9));
        assert_eq!(scheduler.schedules_for_station(f.s1.id).await.unwrap().len(), 1);

        let actions: Vec<_> = f
            .engine
            .audit()
            .assignment_history(first.id)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.action)
            .collect();
        assert_eq!(
            actions,
            vec![AssignmentAction::Assigned, AssignmentAction::Deactivated, AssignmentAction::Reactivated]
        );
    }

    #[tokio::test]
    async fn test_reassign_hands_over_station() {
        let f = fixture().await;
        let scheduler = f.engine.assignments();
        let old = scheduler.assign(request(&f.e1, &f.s1, "2025-01-10", (8, 17))).await.unwrap();

        let new = scheduler
            .reassign(ReassignRequest {
                station_id: f.s1.id,
                new_employee_id: f.e2.id,
                effective_date: d("2025-01-20"),
                assigned_by: Some(1),
            })
            .await
            .unwrap();
        assert_eq!(new.employee_id, f.e2.id);
        assert_eq!(new.start_date, d("2025-01-20"));
        assert_eq!(new.shift_start, old.shift_start);
        assert_eq!(new.assignment_type, old.assignment_type);

        let on_19 = scheduler.all_stations_with_assignments(d("2025-01-19")).await.unwrap();
        let s1_on_19 = on_19.iter().find(|s| s.station.id == f.s1.id).unwrap();
        assert_eq!(s1_on_19.employee_name.as_deref(), Some("Ana Cruz"));

        let on_20 = scheduler.all_stations_with_assignments(d("2025-01-20")).await.unwrap();
        let s1_on_20 = on_20.iter().find(|s| s.station.id == f.s1.id).unwrap();
        assert_eq!(s1_on_20.employee_name.as_deref(), Some("Ben Reyes"));
        let s2_on_20 = on_20.iter().find(|s| s.station.id == f.s2.id).unwrap();
        assert!(s2_on_20.schedule.is_none());

        let err = scheduler
            .reassign(ReassignRequest {
                station_id: f.s1.id,
                new_employee_id: f.e2.id,
                effective_date: d("2025-01-25"),
                assigned_by: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn test_reassign_without_occupant() {
        let f = fixture().await;
        let err = f
            .engine
            .assignments()
            .reassign(ReassignRequest {
                station_id: f.s1.id,
                new_employee_id: f.e2.id,
                effective_date: d("2025-01-20"),
                assigned_by: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ScheduleNotFound);
    }

    #[tokio::test]
    async fn test_end_assignment_clamps_to_start() {
        let f = fixture().await;
        let scheduler = f.engine.assignments();
        scheduler.assign(request(&f.e1, &f.s1, "2025-01-10", (8, 17))).await.unwrap();
        let ended = scheduler
            .remove(RemoveRequest {
                station_id: f.s1.id,
                effective_date: d("2025-01-10"),
                mode: RemoveMode::EndAssignment,
                performed_by: None,
            })
            .await
            .unwrap();
        assert_eq!(ended.end_date, Some(d("2025-01-10")));
        assert!(ended.is_active);
    }
}
