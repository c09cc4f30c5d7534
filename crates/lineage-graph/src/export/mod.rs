//! Export of lineage graphs to interchange formats.

pub mod prov_json;
pub mod vocabulary;

pub use prov_json::{export_store, ProvDocument};
