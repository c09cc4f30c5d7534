// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "lineage.db";
pub const DEFAULT_WAL_MODE: bool = true;
pub const DEFAULT_CACHE_SIZE: i64 = -16_000; // 16 MB (negative = KB)
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

// --- Traversal ---
pub const DEFAULT_MAX_DEPTH: Option<usize> = None;

// --- Verification ---
pub const DEFAULT_READ_BUFFER_SIZE: usize = 64 * 1024;

// --- Export ---
pub const DEFAULT_EXPORT_NAMESPACE: &str = "lineage";
pub const DEFAULT_EXPORT_NAMESPACE_URI: &str = "urn:lineage:";

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
