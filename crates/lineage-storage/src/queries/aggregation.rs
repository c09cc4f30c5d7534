//! Aggregate counts across the lineage tables.

use rusqlite::Connection;

use lineage_core::errors::LineageResult;
use lineage_core::models::LineageStats;

use crate::to_storage_err;

pub fn stats(conn: &Connection) -> LineageResult<LineageStats> {
    conn.query_row(
        "SELECT
            (SELECT COUNT(*) FROM entities),
            (SELECT COUNT(*) FROM activities),
            (SELECT COUNT(*) FROM agents),
            (SELECT COUNT(*) FROM relations),
            (SELECT COUNT(*) FROM activities WHERE status = 'running'),
            (SELECT COUNT(*) FROM activities WHERE status = 'completed'),
            (SELECT COUNT(*) FROM activities WHERE status = 'failed')",
        [],
        |row| {
            Ok(LineageStats {
                entities: row.get::<_, i64>(0)? as usize,
                activities: row.get::<_, i64>(1)? as usize,
                agents: row.get::<_, i64>(2)? as usize,
                relations: row.get::<_, i64>(3)? as usize,
                running_activities: row.get::<_, i64>(4)? as usize,
                completed_activities: row.get::<_, i64>(5)? as usize,
                failed_activities: row.get::<_, i64>(6)? as usize,
            })
        },
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
