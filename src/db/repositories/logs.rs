use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::{parse_category, parse_datetime, to_i64, to_u32},
};
use crate::models::{Category, LogRecord};

fn row_to_log(row: &Row) -> Result<LogRecord> {
    let date: String = row.get("date")?;
    let category: String = row.get("category")?;
    let created_at: String = row.get("created_at")?;
    let duration_minutes: i64 = row.get("duration_minutes")?;

    Ok(LogRecord {
        id: row.get("id")?,
        date: parse_datetime(&date, "date")?,
        drill_name: row.get("drill_name")?,
        category: parse_category(&category)?,
        duration_minutes: to_u32(duration_minutes, "duration_minutes")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    /// Append a new log record. The id is assigned here; callers get the
    /// stored record back so failures are never silent.
    pub async fn insert_log(
        &self,
        date: DateTime<Utc>,
        drill_name: String,
        category: Category,
        duration_minutes: u32,
    ) -> Result<LogRecord> {
        self.execute(move |conn| {
            let record = LogRecord {
                id: Uuid::new_v4().to_string(),
                date,
                drill_name,
                category,
                duration_minutes,
                created_at: Utc::now(),
            };

            conn.execute(
                "INSERT INTO logs (id, date, drill_name, category, duration_minutes, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.id,
                    record.date.to_rfc3339(),
                    record.drill_name,
                    record.category.as_str(),
                    to_i64(record.duration_minutes),
                    record.created_at.to_rfc3339(),
                ],
            )?;

            Ok(record)
        })
        .await
    }

    pub async fn list_logs(&self) -> Result<Vec<LogRecord>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, date, drill_name, category, duration_minutes, created_at
                 FROM logs
                 ORDER BY date DESC, created_at DESC",
            )?;

            let mut rows = stmt.query([])?;
            let mut logs = Vec::new();
            while let Some(row) = rows.next()? {
                logs.push(row_to_log(row)?);
            }

            Ok(logs)
        })
        .await
    }

    /// Duration is the only mutable field on a log record.
    pub async fn update_log_duration(
        &self,
        log_id: &str,
        duration_minutes: u32,
    ) -> Result<LogRecord> {
        let log_id = log_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "UPDATE logs SET duration_minutes = ?1 WHERE id = ?2",
                params![to_i64(duration_minutes), log_id],
            )?;

            if rows_affected == 0 {
                return Err(anyhow!("log {log_id} not found"));
            }

            let mut stmt = conn.prepare(
                "SELECT id, date, drill_name, category, duration_minutes, created_at
                 FROM logs
                 WHERE id = ?1",
            )?;
            let mut rows = stmt.query(params![log_id])?;
            match rows.next()? {
                Some(row) => row_to_log(row),
                None => Err(anyhow!("log not found after update")),
            }
        })
        .await
    }

    pub async fn delete_log(&self, log_id: &str) -> Result<()> {
        let log_id = log_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute("DELETE FROM logs WHERE id = ?1", params![log_id])?;

            if rows_affected == 0 {
                return Err(anyhow!("log {log_id} not found"));
            }

            Ok(())
        })
        .await
    }
}
