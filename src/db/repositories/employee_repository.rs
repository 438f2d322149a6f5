use std::convert::TryFrom;

use rusqlite::types::ToSql;
use rusqlite::{named_params, params_from_iter, Connection, OptionalExtension, Row};

use crate::error::{AppError, AppResult};
use crate::models::employee::{EmployeeCreateInput, EmployeeRecord, StaffTitle};
use crate::models::shift::RoleCode;

const BASE_SELECT: &str = r#"
    SELECT
        id,
        name,
        title,
        crew_chief_eligible,
        fork_operator_eligible,
        performance,
        created_at
    FROM users
"#;

#[derive(Debug, Clone)]
pub struct EmployeeRow {
    pub id: String,
    pub name: String,
    pub title: String,
    pub crew_chief_eligible: bool,
    pub fork_operator_eligible: bool,
    pub performance: Option<f64>,
    pub created_at: String,
}

impl EmployeeRow {
    pub fn into_record(self) -> AppResult<EmployeeRecord> {
        Ok(EmployeeRecord {
            id: self.id,
            name: self.name,
            title: StaffTitle::parse(&self.title)?,
            crew_chief_eligible: self.crew_chief_eligible,
            fork_operator_eligible: self.fork_operator_eligible,
            performance: self.performance,
            created_at: self.created_at,
        })
    }
}

impl TryFrom<&Row<'_>> for EmployeeRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            title: row.get("title")?,
            crew_chief_eligible: row.get("crew_chief_eligible")?,
            fork_operator_eligible: row.get("fork_operator_eligible")?,
            performance: row.get("performance")?,
            created_at: row.get("created_at")?,
        })
    }
}

pub struct EmployeeRepository;

impl EmployeeRepository {
    pub fn insert(conn: &Connection, id: &str, input: &EmployeeCreateInput) -> AppResult<()> {
        let title = input.title.as_deref().unwrap_or("Employee");
        StaffTitle::parse(title)?;
        let created_at = chrono::Utc::now().to_rfc3339();

        conn.execute(
            r#"
                INSERT INTO users (
                    id,
                    name,
                    title,
                    crew_chief_eligible,
                    fork_operator_eligible,
                    performance,
                    created_at
                ) VALUES (
                    :id,
                    :name,
                    :title,
                    :crew_chief_eligible,
                    :fork_operator_eligible,
                    :performance,
                    :created_at
                )
            "#,
            named_params! {
                ":id": id,
                ":name": &input.name,
                ":title": title,
                ":crew_chief_eligible": input.crew_chief_eligible,
                ":fork_operator_eligible": input.fork_operator_eligible,
                ":performance": &input.performance,
                ":created_at": &created_at,
            },
        )?;

        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> AppResult<Option<EmployeeRecord>> {
        let sql = format!("{BASE_SELECT} WHERE id = :id");
        let mut stmt = conn.prepare(&sql)?;

        let row = stmt
            .query_row(named_params! {":id": id}, |row| EmployeeRow::try_from(row))
            .optional()?;

        row.map(|row| row.into_record()).transpose()
    }

    /// SQL predicate mirroring the eligibility rule table. Static fragments
    /// only; caller-supplied values are always bound as parameters.
    fn role_predicate(role: RoleCode) -> &'static str {
        match role {
            RoleCode::CrewChief => {
                "(crew_chief_eligible = 1 OR title IN ('Crew Chief', 'Manager-Admin'))"
            }
            RoleCode::ForkOperator | RoleCode::ReachForkOperator => {
                "(fork_operator_eligible = 1 OR title = 'Manager-Admin')"
            }
            RoleCode::StageHand | RoleCode::Rigger | RoleCode::GeneralLabor => "1 = 1",
        }
    }

    /// Employees eligible for `role`, minus `exclude_ids`, ordered by
    /// seniority (Manager-Admin, Crew Chief, rest) and then name.
    pub fn eligible_for_role(
        conn: &Connection,
        role: RoleCode,
        exclude_ids: &[String],
    ) -> AppResult<Vec<EmployeeRecord>> {
        let mut sql = format!("{BASE_SELECT} WHERE {}", Self::role_predicate(role));
        if !exclude_ids.is_empty() {
            let placeholders = vec!["?"; exclude_ids.len()].join(", ");
            sql.push_str(&format!(" AND id NOT IN ({placeholders})"));
        }
        sql.push_str(
            " ORDER BY CASE title WHEN 'Manager-Admin' THEN 0 WHEN 'Crew Chief' THEN 1 ELSE 2 END, name",
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(exclude_ids.iter()), |row| {
                EmployeeRow::try_from(row)
            })?
            .map(|row| {
                row.map_err(AppError::from)
                    .and_then(|row| row.into_record())
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }

    /// Eligible employees with no non-cancelled assignment overlapping the
    /// candidate window on `shift_date`, in the same seniority/name order.
    pub fn available_for_role(
        conn: &Connection,
        role: RoleCode,
        shift_date: &str,
        start_time: &str,
        end_time: &str,
        exclude_ids: &[String],
        limit: usize,
    ) -> AppResult<Vec<EmployeeRecord>> {
        let mut sql = format!(
            r#"{BASE_SELECT}
            WHERE {}
              AND NOT EXISTS (
                SELECT 1
                FROM assigned_personnel ap
                JOIN shifts s ON s.id = ap.shift_id
                WHERE ap.employee_id = users.id
                  AND s.shift_date = ?
                  AND s.status != 'Cancelled'
                  AND s.start_time < ?
                  AND ? < s.end_time
              )"#,
            Self::role_predicate(role)
        );
        if !exclude_ids.is_empty() {
            let placeholders = vec!["?"; exclude_ids.len()].join(", ");
            sql.push_str(&format!(" AND id NOT IN ({placeholders})"));
        }
        sql.push_str(
            " ORDER BY CASE title WHEN 'Manager-Admin' THEN 0 WHEN 'Crew Chief' THEN 1 ELSE 2 END, name LIMIT ?",
        );

        let mut params: Vec<Box<dyn ToSql>> = vec![
            Box::new(shift_date.to_string()),
            Box::new(end_time.to_string()),
            Box::new(start_time.to_string()),
        ];
        for id in exclude_ids {
            params.push(Box::new(id.clone()));
        }
        params.push(Box::new(limit as i64));

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(params), |row| EmployeeRow::try_from(row))?
            .map(|row| {
                row.map_err(AppError::from)
                    .and_then(|row| row.into_record())
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(rows)
    }
}
