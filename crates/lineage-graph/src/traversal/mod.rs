//! Traversal engine: breadth-first walks over the provenance graph with an
//! optional depth bound.
//!
//! Depth counts entities: the root is at depth 0, entities reached through
//! one activity are at depth 1, and so on. Every reached entity is included;
//! only entities strictly below the bound are expanded, so a bound of 0
//! yields the root alone.

pub mod full_lineage;
pub mod trace_ancestors;
pub mod trace_descendants;

use std::collections::HashMap;

use lineage_core::config::TraversalConfig;
use lineage_core::errors::{LineageError, LineageResult, NodeKind};
use lineage_core::models::{Activity, Entity, LineageGraph, LineageGraphBuilder, Relation};
use lineage_core::traits::ILineageStorage;

/// The traversal engine wraps all traversal operations.
#[derive(Debug, Clone, Default)]
pub struct TraversalEngine {
    pub config: TraversalConfig,
}

impl TraversalEngine {
    pub fn new(config: TraversalConfig) -> Self {
        Self { config }
    }

    /// Ancestors: "what was this built from?"
    pub fn ancestors<S: ILineageStorage + ?Sized>(
        &self,
        storage: &S,
        entity_id: &str,
        max_depth: Option<usize>,
    ) -> LineageResult<LineageGraph> {
        trace_ancestors::trace(storage, entity_id, self.depth(max_depth))
    }

    /// Descendants: "what was built from this?"
    pub fn descendants<S: ILineageStorage + ?Sized>(
        &self,
        storage: &S,
        entity_id: &str,
        max_depth: Option<usize>,
    ) -> LineageResult<LineageGraph> {
        trace_descendants::trace(storage, entity_id, self.depth(max_depth))
    }

    /// Union of ancestors and descendants.
    pub fn full_lineage<S: ILineageStorage + ?Sized>(
        &self,
        storage: &S,
        entity_id: &str,
        max_depth: Option<usize>,
    ) -> LineageResult<LineageGraph> {
        full_lineage::trace(storage, entity_id, self.depth(max_depth))
    }

    fn depth(&self, max_depth: Option<usize>) -> Option<usize> {
        max_depth.or(self.config.default_max_depth)
    }
}

/// Whether an entity at `depth` may still be expanded.
pub(crate) fn expandable(depth: usize, max_depth: Option<usize>) -> bool {
    max_depth.map_or(true, |max| depth < max)
}

/// State shared by one walk: the graph under construction and the
/// activities already loaded.
pub(crate) struct Walk<'s, S: ?Sized> {
    storage: &'s S,
    builder: LineageGraphBuilder,
    activities: HashMap<String, Option<Activity>>,
}

impl<'s, S: ILineageStorage + ?Sized> Walk<'s, S> {
    pub(crate) fn new(storage: &'s S) -> Self {
        Self {
            storage,
            builder: LineageGraphBuilder::new(),
            activities: HashMap::new(),
        }
    }

    pub(crate) fn storage(&self) -> &'s S {
        self.storage
    }

    pub(crate) fn root(&self, entity_id: &str) -> LineageResult<Entity> {
        self.storage
            .get_entity(entity_id)?
            .ok_or_else(|| LineageError::not_found(NodeKind::Entity, entity_id))
    }

    pub(crate) fn add_entity(&mut self, entity: Entity) {
        self.builder.add_entity(entity);
    }

    pub(crate) fn add_relation(&mut self, relation: Relation) {
        self.builder.add_relation(relation);
    }

    /// Activity by id, loaded at most once per walk. A missing activity is
    /// remembered as such and yields `None`.
    pub(crate) fn activity(&mut self, activity_id: &str) -> LineageResult<Option<Activity>> {
        if let Some(cached) = self.activities.get(activity_id) {
            return Ok(cached.clone());
        }
        let loaded = self.storage.get_activity(activity_id)?;
        if let Some(activity) = &loaded {
            self.adopt(activity.clone())?;
        } else {
            self.activities.insert(activity_id.to_string(), None);
        }
        Ok(loaded)
    }

    /// Record an activity already loaded by the caller, together with its
    /// agent and the association edge.
    pub(crate) fn adopt(&mut self, activity: Activity) -> LineageResult<()> {
        if self.activities.contains_key(&activity.activity_id) {
            return Ok(());
        }
        let activity_id = activity.activity_id.clone();
        let agent_id = activity.agent_id.clone();
        self.activities
            .insert(activity_id.clone(), Some(activity.clone()));
        self.builder.add_activity(activity);

        if !self.builder.has_agent(&agent_id) {
            match self.storage.get_agent(&agent_id)? {
                Some(agent) => {
                    self.builder.add_agent(agent);
                }
                None => return Ok(()),
            }
        }
        self.builder
            .add_relation(Relation::was_associated_with(&activity_id, &agent_id));
        Ok(())
    }

    pub(crate) fn finish(self) -> LineageGraph {
        self.builder.build()
    }
}
