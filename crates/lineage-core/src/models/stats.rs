use serde::{Deserialize, Serialize};

/// Row counts across the lineage tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageStats {
    pub entities: usize,
    pub activities: usize,
    pub agents: usize,
    pub relations: usize,
    pub running_activities: usize,
    pub completed_activities: usize,
    pub failed_activities: usize,
}
