use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use crate::db::repositories::assignment_repository::{AssignedShiftRecord, AssignmentRepository};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::conflict::{ConflictSeverity, TimeConflict, TimeConflictKind};
use crate::models::shift::{
    format_shift_date, format_shift_time, parse_shift_date, parse_shift_time,
};
use crate::services::policy::DetectionPolicy;
use crate::services::schedule_utils;

/// Scans an employee's other active assignments for collisions with a
/// candidate shift window. The three scans are independent; one pair of
/// shifts may legitimately appear in more than one category.
#[derive(Clone)]
pub struct TimeConflictService {
    db: DbPool,
    policy: DetectionPolicy,
}

impl TimeConflictService {
    pub fn new(db: DbPool, policy: DetectionPolicy) -> Self {
        Self { db, policy }
    }

    pub fn check(
        &self,
        employee_id: &str,
        shift_id: &str,
        shift_date: &str,
        start_time: &str,
        end_time: &str,
    ) -> AppResult<Vec<TimeConflict>> {
        let date = parse_shift_date(shift_date)?;
        let start = parse_shift_time(start_time)?;
        let end = parse_shift_time(end_time)?;
        schedule_utils::ensure_window(start, end)?;

        let prev_day = date
            .pred_opt()
            .ok_or_else(|| AppError::validation("shift date out of calendar range"))?;
        let next_day = date
            .succ_opt()
            .ok_or_else(|| AppError::validation("shift date out of calendar range"))?;

        let dates = vec![
            format_shift_date(prev_day),
            format_shift_date(date),
            format_shift_date(next_day),
        ];
        let assigned = self.db.with_connection(|conn| {
            AssignmentRepository::for_employee_on_dates(conn, employee_id, &dates, shift_id)
        })?;

        let mut conflicts = Vec::new();
        for existing in &assigned {
            if existing.shift_date == date {
                self.scan_overlap(existing, start, end, &mut conflicts);
                self.scan_back_to_back(existing, start, end, &mut conflicts);
            } else {
                self.scan_rest_period(existing, date, start, end, &mut conflicts);
            }
        }

        debug!(
            target: "app::conflict",
            employee_id,
            shift_id,
            count = conflicts.len(),
            "time conflict scan complete"
        );

        Ok(conflicts)
    }

    fn scan_overlap(
        &self,
        existing: &AssignedShiftRecord,
        start: NaiveTime,
        end: NaiveTime,
        out: &mut Vec<TimeConflict>,
    ) {
        if schedule_utils::overlaps(start, end, existing.start_time, existing.end_time) {
            out.push(TimeConflict {
                conflicting_shift_id: existing.shift_id.clone(),
                kind: TimeConflictKind::Overlap,
                severity: ConflictSeverity::High,
                description: format!(
                    "Overlaps the {} shift for {} ({}) on {}",
                    schedule_utils::format_window(existing.start_time, existing.end_time),
                    existing.job_name,
                    existing.client_name,
                    format_shift_date(existing.shift_date),
                ),
            });
        }
    }

    fn scan_back_to_back(
        &self,
        existing: &AssignedShiftRecord,
        start: NaiveTime,
        end: NaiveTime,
        out: &mut Vec<TimeConflict>,
    ) {
        let window = self.policy.back_to_back_window_mins;
        let before = schedule_utils::gap_minutes(existing.end_time, start);
        let after = schedule_utils::gap_minutes(end, existing.start_time);

        let description = if (0..=window).contains(&before) {
            format!(
                "Only {} minutes after the {} shift for {} ends",
                before,
                schedule_utils::format_window(existing.start_time, existing.end_time),
                existing.job_name,
            )
        } else if (0..=window).contains(&after) {
            format!(
                "Only {} minutes before the {} shift for {} starts",
                after,
                schedule_utils::format_window(existing.start_time, existing.end_time),
                existing.job_name,
            )
        } else {
            return;
        };

        out.push(TimeConflict {
            conflicting_shift_id: existing.shift_id.clone(),
            kind: TimeConflictKind::BackToBack,
            severity: ConflictSeverity::Medium,
            description,
        });
    }

    fn scan_rest_period(
        &self,
        existing: &AssignedShiftRecord,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        out: &mut Vec<TimeConflict>,
    ) {
        let min_rest_mins = self.policy.min_rest_hours * 60;

        let (rest, description) = if existing.shift_date < date {
            let rest = schedule_utils::minutes_between(
                schedule_utils::combine(existing.shift_date, existing.end_time),
                schedule_utils::combine(date, start),
            );
            let description = format!(
                "Only {:.1} hours of rest after the shift ending {} on {}",
                rest as f64 / 60.0,
                format_shift_time(existing.end_time),
                format_shift_date(existing.shift_date),
            );
            (rest, description)
        } else {
            let rest = schedule_utils::minutes_between(
                schedule_utils::combine(date, end),
                schedule_utils::combine(existing.shift_date, existing.start_time),
            );
            let description = format!(
                "Only {:.1} hours of rest before the shift starting {} on {}",
                rest as f64 / 60.0,
                format_shift_time(existing.start_time),
                format_shift_date(existing.shift_date),
            );
            (rest, description)
        };

        if (0..min_rest_mins).contains(&rest) {
            out.push(TimeConflict {
                conflicting_shift_id: existing.shift_id.clone(),
                kind: TimeConflictKind::RestPeriod,
                severity: ConflictSeverity::Low,
                description,
            });
        }
    }
}
