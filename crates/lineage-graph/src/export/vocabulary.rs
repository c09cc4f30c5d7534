//! PROV-JSON vocabulary: bucket names and attribute keys.

pub mod buckets {
    pub const PREFIX: &str = "prefix";
    pub const ENTITY: &str = "entity";
    pub const ACTIVITY: &str = "activity";
    pub const AGENT: &str = "agent";
}

pub mod prov {
    pub const TYPE: &str = "prov:type";
    pub const LABEL: &str = "prov:label";
    pub const START_TIME: &str = "prov:startTime";
    pub const END_TIME: &str = "prov:endTime";
    pub const ENTITY: &str = "prov:entity";
    pub const ACTIVITY: &str = "prov:activity";
    pub const AGENT: &str = "prov:agent";
}

/// Extension attribute names, qualified with the configured namespace.
pub mod ext {
    pub const HASH: &str = "hash";
    pub const PATH: &str = "path";
    pub const SIZE_BYTES: &str = "size_bytes";
    pub const GENERATED_AT: &str = "generated_at";
    pub const METADATA: &str = "metadata";
    pub const STATUS: &str = "status";
    pub const RUN_ID: &str = "run_id";
    pub const PARAMETERS: &str = "parameters";
    pub const VERSION: &str = "version";
    pub const PROVIDER: &str = "provider";
    pub const CREATED_AT: &str = "created_at";
    pub const SOURCE: &str = "source";
    pub const TARGET: &str = "target";
}

pub fn qualified(namespace: &str, local: &str) -> String {
    format!("{namespace}:{local}")
}
