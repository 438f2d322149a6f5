use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use crate::error::AppResult;
use crate::models::shift::{
    format_shift_date, format_shift_time, parse_shift_date, parse_shift_time, ShiftCreateInput,
    ShiftRecord, ShiftStatus,
};

const BASE_SELECT: &str = r#"
    SELECT
        shifts.id,
        shifts.job_id,
        jobs.name AS job_name,
        clients.name AS client_name,
        shifts.shift_date,
        shifts.start_time,
        shifts.end_time,
        shifts.status,
        shifts.created_at
    FROM shifts
    JOIN jobs ON jobs.id = shifts.job_id
    JOIN clients ON clients.id = jobs.client_id
"#;

#[derive(Debug, Clone)]
pub struct ShiftRow {
    pub id: String,
    pub job_id: String,
    pub job_name: String,
    pub client_name: String,
    pub shift_date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub created_at: String,
}

impl ShiftRow {
    pub fn into_record(self) -> AppResult<ShiftRecord> {
        Ok(ShiftRecord {
            id: self.id,
            job_id: self.job_id,
            job_name: self.job_name,
            client_name: self.client_name,
            shift_date: parse_shift_date(&self.shift_date)?,
            start_time: parse_shift_time(&self.start_time)?,
            end_time: parse_shift_time(&self.end_time)?,
            status: ShiftStatus::parse(&self.status)?,
            created_at: self.created_at,
        })
    }
}

impl TryFrom<&Row<'_>> for ShiftRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            job_id: row.get("job_id")?,
            job_name: row.get("job_name")?,
            client_name: row.get("client_name")?,
            shift_date: row.get("shift_date")?,
            start_time: row.get("start_time")?,
            end_time: row.get("end_time")?,
            status: row.get("status")?,
            created_at: row.get("created_at")?,
        })
    }
}

pub struct ShiftRepository;

impl ShiftRepository {
    pub fn insert(conn: &Connection, id: &str, input: &ShiftCreateInput) -> AppResult<()> {
        // Reject malformed values before they reach the table; scans assume
        // zero-padded HH:MM strings so lexicographic SQL comparisons hold.
        let date = parse_shift_date(&input.shift_date)?;
        let start = parse_shift_time(&input.start_time)?;
        let end = parse_shift_time(&input.end_time)?;
        let status = match &input.status {
            Some(raw) => ShiftStatus::parse(raw)?,
            None => ShiftStatus::Upcoming,
        };
        let created_at = chrono::Utc::now().to_rfc3339();

        conn.execute(
            r#"
                INSERT INTO shifts (
                    id,
                    job_id,
                    shift_date,
                    start_time,
                    end_time,
                    status,
                    created_at
                ) VALUES (
                    :id,
                    :job_id,
                    :shift_date,
                    :start_time,
                    :end_time,
                    :status,
                    :created_at
                )
            "#,
            named_params! {
                ":id": id,
                ":job_id": &input.job_id,
                ":shift_date": format_shift_date(date),
                ":start_time": format_shift_time(start),
                ":end_time": format_shift_time(end),
                ":status": status.as_str(),
                ":created_at": &created_at,
            },
        )?;

        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> AppResult<Option<ShiftRecord>> {
        let sql = format!("{BASE_SELECT} WHERE shifts.id = :id");
        let mut stmt = conn.prepare(&sql)?;

        let row = stmt
            .query_row(named_params! {":id": id}, |row| ShiftRow::try_from(row))
            .optional()?;

        row.map(|row| row.into_record()).transpose()
    }

    pub fn update_status(conn: &Connection, id: &str, status: ShiftStatus) -> AppResult<()> {
        conn.execute(
            "UPDATE shifts SET status = :status WHERE id = :id",
            named_params! {":status": status.as_str(), ":id": id},
        )?;
        Ok(())
    }
}
