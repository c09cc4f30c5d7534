//! W3C PROV-JSON rendering of a [`LineageGraph`].
//!
//! Nodes live in the `entity`, `activity`, and `agent` buckets keyed by id.
//! Relations are grouped into one bucket per relation type and keyed by a
//! blank node `_:{type}{n}`, `n` counting from 1 within each type in graph
//! order. The three built-in relation buckets are always present.
//!
//! A relation type that would clash with a top-level key (`prefix`, `entity`,
//! `activity`, `agent`) or that already starts with `{ns}:` is stored under
//! `{ns}:{type}`; [`ProvDocument::relations`] strips that prefix again.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use lineage_core::config::ExportConfig;
use lineage_core::constants::PROV_BLANK_NODE_PREFIX;
use lineage_core::errors::{LineageError, LineageResult};
use lineage_core::models::{
    Activity, ActivityFilter, Agent, AgentFilter, Entity, EntityFilter, LineageGraph,
    LineageGraphBuilder, Metadata, Relation, RelationFilter,
};
use lineage_core::traits::ILineageStorage;
use lineage_core::RelationType;

use super::vocabulary::{buckets, ext, prov, qualified};

/// Attribute map of a single PROV record.
pub type Attributes = Map<String, Value>;

/// Records of one bucket, keyed by node id or blank-node id.
pub type Bucket = BTreeMap<String, Attributes>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvDocument {
    pub prefix: BTreeMap<String, String>,
    #[serde(default)]
    pub entity: Bucket,
    #[serde(default)]
    pub activity: Bucket,
    #[serde(default)]
    pub agent: Bucket,
    /// `used`, `wasGeneratedBy`, `wasAssociatedWith`, and any custom types.
    #[serde(flatten)]
    pub relation_buckets: BTreeMap<String, Bucket>,
}

impl ProvDocument {
    /// Empty document with the namespace prefix and built-in relation buckets.
    pub fn new(config: &ExportConfig) -> Self {
        let mut doc = Self::default();
        doc.prefix
            .insert(config.namespace.clone(), config.namespace_uri.clone());
        for relation_type in RelationType::BUILTIN {
            doc.relation_buckets
                .insert(relation_type.to_string(), Bucket::new());
        }
        doc
    }

    pub fn from_graph(graph: &LineageGraph, config: &ExportConfig) -> Self {
        let ns = config.namespace.as_str();
        let mut doc = Self::new(config);

        for entity in &graph.entities {
            doc.entity
                .insert(entity.entity_id.clone(), entity_attributes(entity, ns));
        }
        for activity in &graph.activities {
            doc.activity
                .insert(activity.activity_id.clone(), activity_attributes(activity, ns));
        }
        for agent in &graph.agents {
            doc.agent
                .insert(agent.agent_id.clone(), agent_attributes(agent, ns));
        }

        let mut counters: HashMap<&str, usize> = HashMap::new();
        for relation in &graph.relations {
            let relation_type = relation.relation_type.as_str();
            let n = counters.entry(relation_type).or_insert(0);
            *n += 1;
            doc.relation_buckets
                .entry(bucket_key(relation_type, ns))
                .or_default()
                .insert(
                    format!("{PROV_BLANK_NODE_PREFIX}{relation_type}{n}"),
                    relation_attributes(relation, ns),
                );
        }
        doc
    }

    /// Namespace used for extension attributes: the first declared prefix.
    pub fn namespace(&self) -> &str {
        self.prefix
            .keys()
            .next()
            .map(String::as_str)
            .unwrap_or(lineage_core::config::defaults::DEFAULT_EXPORT_NAMESPACE)
    }

    /// Rebuild the typed relation list, bucket by bucket, each bucket in
    /// blank-node order.
    pub fn relations(&self) -> LineageResult<Vec<Relation>> {
        let ns = self.namespace();
        let mut relations = Vec::new();

        for (key, bucket) in &self.relation_buckets {
            let relation_type = &relation_type_of(key, ns);
            let (source_key, target_key) = endpoint_keys(relation_type, ns);
            let metadata_key = qualified(ns, ext::METADATA);

            let mut records: Vec<(usize, &Attributes)> = bucket
                .iter()
                .map(|(key, attrs)| (ordinal(key, relation_type), attrs))
                .collect();
            records.sort_by_key(|(n, _)| *n);

            for (_, attrs) in records {
                let source_id = endpoint(attrs, &source_key, relation_type)?;
                let target_id = endpoint(attrs, &target_key, relation_type)?;
                let metadata = match attrs.get(&metadata_key) {
                    Some(value) => serde_json::from_value::<Metadata>(value.clone())?,
                    None => Metadata::new(),
                };
                relations.push(
                    Relation::new(relation_type.as_str(), source_id, target_id)
                        .with_metadata(metadata),
                );
            }
        }
        Ok(relations)
    }

    pub fn relation_count(&self) -> usize {
        self.relation_buckets.values().map(BTreeMap::len).sum()
    }

    pub fn to_value(&self) -> LineageResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_string_pretty(&self) -> LineageResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(source: &str) -> LineageResult<Self> {
        Ok(serde_json::from_str(source)?)
    }
}

/// Snapshot of the whole store, oldest records first.
pub fn export_store<S: ILineageStorage + ?Sized>(
    storage: &S,
    config: &ExportConfig,
) -> LineageResult<ProvDocument> {
    let mut builder = LineageGraphBuilder::new();
    for entity in storage
        .list_entities(&EntityFilter::default(), None)?
        .into_iter()
        .rev()
    {
        builder.add_entity(entity);
    }
    for activity in storage
        .list_activities(&ActivityFilter::default(), None)?
        .into_iter()
        .rev()
    {
        builder.add_activity(activity);
    }
    for agent in storage
        .list_agents(&AgentFilter::default(), None)?
        .into_iter()
        .rev()
    {
        builder.add_agent(agent);
    }
    for relation in storage.get_relations(&RelationFilter::default())? {
        builder.add_relation(relation);
    }

    let graph = builder.build();
    tracing::debug!(
        entities = graph.entities.len(),
        relations = graph.relations.len(),
        "exporting whole store"
    );
    Ok(ProvDocument::from_graph(&graph, config))
}

fn entity_attributes(entity: &Entity, ns: &str) -> Attributes {
    let mut attrs = Attributes::new();
    attrs.insert(prov::TYPE.into(), entity.entity_type.as_str().into());
    attrs.insert(prov::LABEL.into(), entity.name.clone().into());
    attrs.insert(qualified(ns, ext::HASH), entity.hash.clone().into());
    if let Some(path) = &entity.path {
        attrs.insert(qualified(ns, ext::PATH), path.clone().into());
    }
    if let Some(size) = entity.size_bytes {
        attrs.insert(qualified(ns, ext::SIZE_BYTES), size.into());
    }
    attrs.insert(
        qualified(ns, ext::GENERATED_AT),
        timestamp(&entity.generated_at).into(),
    );
    insert_metadata(&mut attrs, qualified(ns, ext::METADATA), &entity.metadata);
    attrs
}

fn activity_attributes(activity: &Activity, ns: &str) -> Attributes {
    let mut attrs = Attributes::new();
    attrs.insert(prov::TYPE.into(), activity.activity_type.as_str().into());
    attrs.insert(prov::LABEL.into(), activity.name.clone().into());
    attrs.insert(prov::START_TIME.into(), timestamp(&activity.started_at).into());
    if let Some(ended_at) = &activity.ended_at {
        attrs.insert(prov::END_TIME.into(), timestamp(ended_at).into());
    }
    attrs.insert(qualified(ns, ext::STATUS), activity.status.as_str().into());
    if let Some(run_id) = &activity.run_id {
        attrs.insert(qualified(ns, ext::RUN_ID), run_id.clone().into());
    }
    insert_metadata(&mut attrs, qualified(ns, ext::PARAMETERS), &activity.parameters);
    attrs
}

fn agent_attributes(agent: &Agent, ns: &str) -> Attributes {
    let mut attrs = Attributes::new();
    attrs.insert(prov::TYPE.into(), agent.agent_type.as_str().into());
    attrs.insert(prov::LABEL.into(), agent.name.clone().into());
    if let Some(version) = &agent.version {
        attrs.insert(qualified(ns, ext::VERSION), version.clone().into());
    }
    if let Some(provider) = &agent.provider {
        attrs.insert(qualified(ns, ext::PROVIDER), provider.clone().into());
    }
    attrs.insert(
        qualified(ns, ext::CREATED_AT),
        timestamp(&agent.created_at).into(),
    );
    insert_metadata(&mut attrs, qualified(ns, ext::METADATA), &agent.metadata);
    attrs
}

fn relation_attributes(relation: &Relation, ns: &str) -> Attributes {
    let (source_key, target_key) = endpoint_keys(relation.relation_type.as_str(), ns);
    let mut attrs = Attributes::new();
    attrs.insert(source_key, relation.source_id.clone().into());
    attrs.insert(target_key, relation.target_id.clone().into());
    insert_metadata(&mut attrs, qualified(ns, ext::METADATA), &relation.metadata);
    attrs
}

/// Top-level key of the bucket holding relations of `relation_type`.
fn bucket_key(relation_type: &str, ns: &str) -> String {
    let reserved = matches!(
        relation_type,
        buckets::PREFIX | buckets::ENTITY | buckets::ACTIVITY | buckets::AGENT
    );
    if reserved || relation_type.starts_with(&qualified(ns, "")) {
        qualified(ns, relation_type)
    } else {
        relation_type.to_string()
    }
}

/// Inverse of [`bucket_key`].
fn relation_type_of(key: &str, ns: &str) -> String {
    key.strip_prefix(&qualified(ns, ""))
        .unwrap_or(key)
        .to_string()
}

/// Attribute names holding the source and target ids of a relation type.
fn endpoint_keys(relation_type: &str, ns: &str) -> (String, String) {
    match relation_type {
        RelationType::USED => (prov::ACTIVITY.into(), prov::ENTITY.into()),
        RelationType::WAS_GENERATED_BY => (prov::ENTITY.into(), prov::ACTIVITY.into()),
        RelationType::WAS_ASSOCIATED_WITH => (prov::ACTIVITY.into(), prov::AGENT.into()),
        _ => (qualified(ns, ext::SOURCE), qualified(ns, ext::TARGET)),
    }
}

fn endpoint(attrs: &Attributes, key: &str, relation_type: &str) -> LineageResult<String> {
    attrs
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            LineageError::InvalidInput(format!("{relation_type} record is missing {key}"))
        })
}

/// Position encoded in a blank-node key; unparseable keys sort last.
fn ordinal(key: &str, relation_type: &str) -> usize {
    key.strip_prefix(PROV_BLANK_NODE_PREFIX)
        .and_then(|rest| rest.strip_prefix(relation_type))
        .and_then(|n| n.parse().ok())
        .unwrap_or(usize::MAX)
}

fn insert_metadata(attrs: &mut Attributes, key: String, metadata: &Metadata) {
    if metadata.is_empty() {
        return;
    }
    let map: Map<String, Value> = metadata
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    attrs.insert(key, Value::Object(map));
}

fn timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
