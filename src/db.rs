//! Database schema and operations

use rusqlite::Connection;

use crate::error::StoreError;
use crate::models::{ActivityCategory, ActivityDefinition};

type Result<T> = std::result::Result<T, StoreError>;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Custom activity definitions (the built-in table lives in code)
        CREATE TABLE IF NOT EXISTS activities (
            id TEXT PRIMARY KEY,
            category TEXT NOT NULL,
            name TEXT NOT NULL,
            emission_factor REAL NOT NULL,
            unit TEXT NOT NULL
        );

        -- Current logged quantity per activity
        CREATE TABLE IF NOT EXISTS logged_quantities (
            activity_id TEXT PRIMARY KEY,
            quantity REAL NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Insert or replace a custom activity definition
pub fn upsert_activity(conn: &Connection, activity: &ActivityDefinition) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO activities (id, category, name, emission_factor, unit)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            &activity.id,
            activity.category.as_str(),
            &activity.name,
            activity.emission_factor,
            &activity.unit,
        ),
    )?;
    Ok(())
}

/// List all custom activities, ordered by id
pub fn list_activities(conn: &Connection) -> Result<Vec<ActivityDefinition>> {
    let mut stmt = conn.prepare(
        "SELECT id, category, name, emission_factor, unit FROM activities ORDER BY id",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, f64>(3)?,
            row.get::<_, String>(4)?,
        ))
    })?;

    let mut results = Vec::new();
    for row in rows {
        let (id, category, name, emission_factor, unit) = row?;
        let category = category
            .parse::<ActivityCategory>()
            .map_err(|source| StoreError::InvalidDefinition { id: id.clone(), source })?;
        results.push(ActivityDefinition {
            id,
            category,
            name,
            emission_factor,
            unit,
        });
    }
    Ok(results)
}

/// Clear imported activity definitions (for re-import)
pub fn clear_activities(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM activities", [])?;
    Ok(())
}

/// Replace every stored quantity in a single transaction
pub fn replace_quantities(conn: &mut Connection, entries: &[(&str, f64)]) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM logged_quantities", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO logged_quantities (activity_id, quantity) VALUES (?1, ?2)",
        )?;
        for (id, quantity) in entries {
            stmt.execute((id, quantity))?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// All stored quantities, ordered by activity id
pub fn list_quantities(conn: &Connection) -> Result<Vec<(String, f64)>> {
    let mut stmt = conn.prepare(
        "SELECT activity_id, quantity FROM logged_quantities ORDER BY activity_id",
    )?;

    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}
