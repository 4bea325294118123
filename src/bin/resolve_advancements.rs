// Small maintenance utility: run the bulk advancement backfill for a
// schedule version (defaults to the latest ACTIVE one).
//
// Usage:
//   cargo run --bin resolve-advancements -- [db_path] [version_id]
//
// Intended for repair after manual data edits; the operation is
// idempotent, so re-running is safe.

use rusqlite::OptionalExtension;
use std::sync::{Arc, Mutex};
use tournament_aps::api::ScheduleApi;
use tournament_aps::config::SchedulePolicy;
use tournament_aps::db::open_sqlite_connection;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tournament_aps::logging::init();

    let mut args = std::env::args().skip(1);
    let db_path = args
        .next()
        .unwrap_or_else(|| "tournament_aps.db".to_string());

    let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path)?));

    let version_id = match args
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    {
        Some(v) => v,
        None => {
            let active_version_id: Option<String> = {
                let c = conn.lock().unwrap();
                c.query_row(
                    "SELECT version_id FROM schedule_version WHERE status = 'ACTIVE' ORDER BY created_at DESC LIMIT 1",
                    [],
                    |row| row.get(0),
                )
                .optional()?
            };

            active_version_id
                .ok_or("No ACTIVE schedule_version found (pass version_id explicitly)")?
        }
    };

    let api = ScheduleApi::new(conn, SchedulePolicy::default());
    let summary = api.resolve_all(&version_id)?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
