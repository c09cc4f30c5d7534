//! SQL for each store, one module per concern. Every function takes a plain
//! `&Connection` so it composes inside a caller's transaction.

pub mod activity_ops;
pub mod agent_ops;
pub mod aggregation;
pub mod entity_ops;
pub mod maintenance;
pub mod relation_ops;
