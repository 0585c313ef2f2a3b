use anyhow::{anyhow, Result};
use chrono::Utc;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::{parse_category, parse_datetime, to_i64, to_u32},
};
use crate::models::{drill::default_drills, Drill, DrillInput};

fn row_to_drill(row: &Row) -> Result<Drill> {
    let category: String = row.get("category")?;
    let created_at: String = row.get("created_at")?;
    let updated_at: String = row.get("updated_at")?;
    let default_minutes: i64 = row.get("default_minutes")?;

    Ok(Drill {
        id: row.get("id")?,
        name: row.get("name")?,
        default_minutes: to_u32(default_minutes, "default_minutes")?,
        category: parse_category(&category)?,
        created_at: parse_datetime(&created_at, "created_at")?,
        updated_at: parse_datetime(&updated_at, "updated_at")?,
    })
}

impl Database {
    pub async fn insert_drill(&self, input: DrillInput) -> Result<Drill> {
        self.execute(move |conn| {
            let now = Utc::now();
            let drill = Drill {
                id: Uuid::new_v4().to_string(),
                name: input.name,
                default_minutes: input.default_minutes,
                category: input.category,
                created_at: now,
                updated_at: now,
            };

            conn.execute(
                "INSERT INTO drills (id, name, default_minutes, category, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    drill.id,
                    drill.name,
                    to_i64(drill.default_minutes),
                    drill.category.as_str(),
                    drill.created_at.to_rfc3339(),
                    drill.updated_at.to_rfc3339(),
                ],
            )?;

            Ok(drill)
        })
        .await
    }

    pub async fn list_drills(&self) -> Result<Vec<Drill>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, default_minutes, category, created_at, updated_at
                 FROM drills
                 ORDER BY created_at ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut drills = Vec::new();
            while let Some(row) = rows.next()? {
                drills.push(row_to_drill(row)?);
            }

            Ok(drills)
        })
        .await
    }

    pub async fn get_drill(&self, drill_id: &str) -> Result<Drill> {
        let drill_id = drill_id.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, default_minutes, category, created_at, updated_at
                 FROM drills
                 WHERE id = ?1",
            )?;

            let mut rows = stmt.query(params![drill_id])?;
            match rows.next()? {
                Some(row) => row_to_drill(row),
                None => Err(anyhow!("drill {drill_id} not found")),
            }
        })
        .await
    }

    pub async fn update_drill(&self, drill_id: &str, input: DrillInput) -> Result<Drill> {
        let drill_id = drill_id.to_string();
        self.execute(move |conn| {
            let now = Utc::now();
            let rows_affected = conn.execute(
                "UPDATE drills
                 SET name = ?1,
                     default_minutes = ?2,
                     category = ?3,
                     updated_at = ?4
                 WHERE id = ?5",
                params![
                    input.name,
                    to_i64(input.default_minutes),
                    input.category.as_str(),
                    now.to_rfc3339(),
                    drill_id,
                ],
            )?;

            if rows_affected == 0 {
                return Err(anyhow!("drill {drill_id} not found"));
            }

            let mut stmt = conn.prepare(
                "SELECT id, name, default_minutes, category, created_at, updated_at
                 FROM drills
                 WHERE id = ?1",
            )?;
            let mut rows = stmt.query(params![drill_id])?;
            match rows.next()? {
                Some(row) => row_to_drill(row),
                None => Err(anyhow!("drill not found after update")),
            }
        })
        .await
    }

    /// Delete a drill template. Existing log records keep their copied
    /// name and category, so history is unaffected.
    pub async fn delete_drill(&self, drill_id: &str) -> Result<()> {
        let drill_id = drill_id.to_string();
        self.execute(move |conn| {
            let rows_affected =
                conn.execute("DELETE FROM drills WHERE id = ?1", params![drill_id])?;

            if rows_affected == 0 {
                return Err(anyhow!("drill {drill_id} not found"));
            }

            Ok(())
        })
        .await
    }

    /// Insert the default drill library if the table is empty.
    pub async fn seed_default_drills(&self) -> Result<usize> {
        self.execute(|conn| {
            let existing: i64 = conn.query_row("SELECT COUNT(*) FROM drills", [], |row| row.get(0))?;
            if existing > 0 {
                return Ok(0);
            }

            let now = Utc::now().to_rfc3339();
            let defaults = default_drills();
            let mut inserted = 0;
            for input in &defaults {
                conn.execute(
                    "INSERT INTO drills (id, name, default_minutes, category, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        Uuid::new_v4().to_string(),
                        input.name,
                        to_i64(input.default_minutes),
                        input.category.as_str(),
                        now,
                        now,
                    ],
                )?;
                inserted += 1;
            }

            Ok(inserted)
        })
        .await
    }
}
