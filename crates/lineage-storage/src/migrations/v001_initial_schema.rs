//! v001: agents, activities, entities, junction tables, relations.

use rusqlite::Connection;

use lineage_core::errors::LineageResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> LineageResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS agents (
            agent_id    TEXT PRIMARY KEY,
            agent_type  TEXT NOT NULL,
            name        TEXT NOT NULL,
            version     TEXT,
            provider    TEXT,
            metadata    TEXT NOT NULL DEFAULT '{}',
            created_at  TEXT NOT NULL
        );

        -- NULL version is one identity of its own, distinct from every
        -- concrete version including ''.
        CREATE UNIQUE INDEX IF NOT EXISTS idx_agents_identity
            ON agents(agent_type, name, version) WHERE version IS NOT NULL;
        CREATE UNIQUE INDEX IF NOT EXISTS idx_agents_identity_unversioned
            ON agents(agent_type, name) WHERE version IS NULL;
        CREATE INDEX IF NOT EXISTS idx_agents_type ON agents(agent_type);

        CREATE TABLE IF NOT EXISTS activities (
            activity_id    TEXT PRIMARY KEY,
            activity_type  TEXT NOT NULL,
            name           TEXT NOT NULL,
            agent_id       TEXT NOT NULL,
            run_id         TEXT,
            parameters     TEXT NOT NULL DEFAULT '{}',
            started_at     TEXT NOT NULL,
            ended_at       TEXT,
            status         TEXT NOT NULL DEFAULT 'running'
                           CHECK (status IN ('running', 'completed', 'failed')),
            FOREIGN KEY (agent_id) REFERENCES agents(agent_id) ON DELETE RESTRICT
        );

        CREATE INDEX IF NOT EXISTS idx_activities_type ON activities(activity_type);
        CREATE INDEX IF NOT EXISTS idx_activities_agent ON activities(agent_id);
        CREATE INDEX IF NOT EXISTS idx_activities_run ON activities(run_id);
        CREATE INDEX IF NOT EXISTS idx_activities_started ON activities(started_at);

        CREATE TABLE IF NOT EXISTS entities (
            entity_id     TEXT PRIMARY KEY,
            entity_type   TEXT NOT NULL,
            name          TEXT NOT NULL,
            hash          TEXT NOT NULL,
            path          TEXT,
            size_bytes    INTEGER,
            metadata      TEXT NOT NULL DEFAULT '{}',
            generated_by  TEXT,
            generated_at  TEXT NOT NULL,
            FOREIGN KEY (generated_by) REFERENCES activities(activity_id) ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_entities_type ON entities(entity_type);
        CREATE INDEX IF NOT EXISTS idx_entities_hash ON entities(hash);
        CREATE INDEX IF NOT EXISTS idx_entities_generated_by ON entities(generated_by);
        CREATE INDEX IF NOT EXISTS idx_entities_generated_at ON entities(generated_at);

        CREATE TABLE IF NOT EXISTS activity_used_entities (
            activity_id  TEXT NOT NULL,
            entity_id    TEXT NOT NULL,
            PRIMARY KEY (activity_id, entity_id),
            FOREIGN KEY (activity_id) REFERENCES activities(activity_id) ON DELETE CASCADE,
            FOREIGN KEY (entity_id) REFERENCES entities(entity_id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_used_entity ON activity_used_entities(entity_id);

        CREATE TABLE IF NOT EXISTS activity_generated_entities (
            activity_id  TEXT NOT NULL,
            entity_id    TEXT NOT NULL,
            PRIMARY KEY (activity_id, entity_id),
            FOREIGN KEY (activity_id) REFERENCES activities(activity_id) ON DELETE CASCADE,
            FOREIGN KEY (entity_id) REFERENCES entities(entity_id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_generated_entity ON activity_generated_entities(entity_id);

        CREATE TABLE IF NOT EXISTS relations (
            relation_id    INTEGER PRIMARY KEY AUTOINCREMENT,
            relation_type  TEXT NOT NULL,
            source_id      TEXT NOT NULL,
            target_id      TEXT NOT NULL,
            metadata       TEXT NOT NULL DEFAULT '{}',
            created_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            UNIQUE (relation_type, source_id, target_id)
        );

        CREATE INDEX IF NOT EXISTS idx_relations_type ON relations(relation_type);
        CREATE INDEX IF NOT EXISTS idx_relations_source ON relations(source_id);
        CREATE INDEX IF NOT EXISTS idx_relations_target ON relations(target_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
