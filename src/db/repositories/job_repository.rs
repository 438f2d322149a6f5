use rusqlite::{named_params, Connection};

use crate::error::AppResult;

// Jobs and clients only feed the human-readable side of conflict
// descriptions, so this repository stays write-and-lookup thin.
pub struct JobRepository;

impl JobRepository {
    pub fn insert_client(conn: &Connection, id: &str, name: &str) -> AppResult<()> {
        let created_at = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO clients (id, name, created_at) VALUES (:id, :name, :created_at)",
            named_params! {":id": id, ":name": name, ":created_at": &created_at},
        )?;
        Ok(())
    }

    pub fn insert_job(conn: &Connection, id: &str, client_id: &str, name: &str) -> AppResult<()> {
        let created_at = chrono::Utc::now().to_rfc3339();
        conn.execute(
            r#"
                INSERT INTO jobs (id, client_id, name, created_at)
                VALUES (:id, :client_id, :name, :created_at)
            "#,
            named_params! {
                ":id": id,
                ":client_id": client_id,
                ":name": name,
                ":created_at": &created_at,
            },
        )?;
        Ok(())
    }
}
