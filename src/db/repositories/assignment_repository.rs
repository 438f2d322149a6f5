use std::convert::TryFrom;

use chrono::{NaiveDate, NaiveTime};
use rusqlite::{named_params, params_from_iter, Connection, Row};

use crate::error::{AppError, AppResult};
use crate::models::shift::{
    parse_shift_date, parse_shift_time, AssignmentCreateInput, AssignmentRecord, AssignmentStatus,
    RoleCode, ShiftStatus,
};

/// An employee's existing assignment joined with its shift window, the unit
/// the conflict scans operate on.
#[derive(Debug, Clone)]
pub struct AssignedShiftRecord {
    pub shift_id: String,
    pub job_name: String,
    pub client_name: String,
    pub shift_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: ShiftStatus,
    pub role_code: RoleCode,
}

#[derive(Debug, Clone)]
pub struct AssignedShiftRow {
    pub shift_id: String,
    pub job_name: String,
    pub client_name: String,
    pub shift_date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub role_code: String,
}

impl AssignedShiftRow {
    pub fn into_record(self) -> AppResult<AssignedShiftRecord> {
        Ok(AssignedShiftRecord {
            shift_id: self.shift_id,
            job_name: self.job_name,
            client_name: self.client_name,
            shift_date: parse_shift_date(&self.shift_date)?,
            start_time: parse_shift_time(&self.start_time)?,
            end_time: parse_shift_time(&self.end_time)?,
            status: ShiftStatus::parse(&self.status)?,
            role_code: RoleCode::parse(&self.role_code)?,
        })
    }
}

impl TryFrom<&Row<'_>> for AssignedShiftRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            shift_id: row.get("shift_id")?,
            job_name: row.get("job_name")?,
            client_name: row.get("client_name")?,
            shift_date: row.get("shift_date")?,
            start_time: row.get("start_time")?,
            end_time: row.get("end_time")?,
            status: row.get("status")?,
            role_code: row.get("role_code")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AssignmentRow {
    pub id: String,
    pub shift_id: String,
    pub employee_id: String,
    pub role_code: String,
    pub status: String,
    pub created_at: String,
}

impl AssignmentRow {
    pub fn into_record(self) -> AppResult<AssignmentRecord> {
        Ok(AssignmentRecord {
            id: self.id,
            shift_id: self.shift_id,
            employee_id: self.employee_id,
            role_code: RoleCode::parse(&self.role_code)?,
            status: AssignmentStatus::parse(&self.status)?,
            created_at: self.created_at,
        })
    }
}

impl TryFrom<&Row<'_>> for AssignmentRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            shift_id: row.get("shift_id")?,
            employee_id: row.get("employee_id")?,
            role_code: row.get("role_code")?,
            status: row.get("status")?,
            created_at: row.get("created_at")?,
        })
    }
}

pub struct AssignmentRepository;

impl AssignmentRepository {
    pub fn insert(conn: &Connection, input: &AssignmentCreateInput) -> AppResult<String> {
        let role = RoleCode::parse(&input.role_code)?;
        let status = match &input.status {
            Some(raw) => AssignmentStatus::parse(raw)?,
            None => AssignmentStatus::Assigned,
        };
        let id = uuid::Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().to_rfc3339();

        conn.execute(
            r#"
                INSERT INTO assigned_personnel (
                    id,
                    shift_id,
                    employee_id,
                    role_code,
                    status,
                    created_at
                ) VALUES (
                    :id,
                    :shift_id,
                    :employee_id,
                    :role_code,
                    :status,
                    :created_at
                )
            "#,
            named_params! {
                ":id": &id,
                ":shift_id": &input.shift_id,
                ":employee_id": &input.employee_id,
                ":role_code": role.as_str(),
                ":status": status.as_str(),
                ":created_at": &created_at,
            },
        )?;

        Ok(id)
    }

    /// Current roster of a shift, oldest assignment first.
    pub fn find_for_shift(conn: &Connection, shift_id: &str) -> AppResult<Vec<AssignmentRecord>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT id, shift_id, employee_id, role_code, status, created_at
            FROM assigned_personnel
            WHERE shift_id = :shift_id
            ORDER BY created_at
            "#,
        )?;

        let rows = stmt
            .query_map(named_params! {":shift_id": shift_id}, |row| {
                AssignmentRow::try_from(row)
            })?
            .map(|row| {
                row.map_err(AppError::from)
                    .and_then(|row| row.into_record())
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }

    /// Non-cancelled assignments of `employee_id` landing on any of `dates`,
    /// excluding the shift under edit. The date list is bound as parameters,
    /// never spliced into the SQL text.
    pub fn for_employee_on_dates(
        conn: &Connection,
        employee_id: &str,
        dates: &[String],
        exclude_shift_id: &str,
    ) -> AppResult<Vec<AssignedShiftRecord>> {
        if dates.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; dates.len()].join(", ");
        let sql = format!(
            r#"
            SELECT
                s.id AS shift_id,
                j.name AS job_name,
                c.name AS client_name,
                s.shift_date,
                s.start_time,
                s.end_time,
                s.status,
                ap.role_code
            FROM assigned_personnel ap
            JOIN shifts s ON s.id = ap.shift_id
            JOIN jobs j ON j.id = s.job_id
            JOIN clients c ON c.id = j.client_id
            WHERE ap.employee_id = ?
              AND s.id != ?
              AND s.status != 'Cancelled'
              AND s.shift_date IN ({placeholders})
            ORDER BY s.shift_date, s.start_time
            "#
        );

        let mut params: Vec<String> = vec![employee_id.to_string(), exclude_shift_id.to_string()];
        params.extend(dates.iter().cloned());

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                AssignedShiftRow::try_from(row)
            })?
            .map(|row| {
                row.map_err(AppError::from)
                    .and_then(|row| row.into_record())
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }
}
