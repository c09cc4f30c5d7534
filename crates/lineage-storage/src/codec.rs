//! Column encodings shared by the query modules.
//!
//! Timestamps are fixed-width RFC 3339 (microseconds, `Z`), so lexical order in
//! SQLite equals chronological order. Metadata maps are JSON text.

use chrono::{DateTime, SecondsFormat, Utc};

use lineage_core::errors::LineageResult;
use lineage_core::models::Metadata;

use crate::to_storage_err;

pub fn encode_time(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_time(raw: &str) -> LineageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("parse timestamp {raw:?}: {e}")))
}

pub fn encode_metadata(metadata: &Metadata) -> LineageResult<String> {
    Ok(serde_json::to_string(metadata)?)
}

pub fn decode_metadata(raw: &str) -> LineageResult<Metadata> {
    serde_json::from_str(raw).map_err(|e| to_storage_err(format!("parse metadata: {e}")))
}

/// Current time, truncated to the stored precision so values read back compare equal.
pub fn now() -> DateTime<Utc> {
    let now = Utc::now();
    decode_time(&encode_time(&now)).unwrap_or(now)
}
