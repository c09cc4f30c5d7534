pub mod hasher;
pub mod storage;

pub use hasher::{Blake3Hasher, ContentHasher};
pub use storage::ILineageStorage;
