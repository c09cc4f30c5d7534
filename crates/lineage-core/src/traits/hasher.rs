//! Content digests for integrity verification.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Produces a stable digest of a file's contents.
///
/// The verifier only compares digests for equality, so any algorithm works as
/// long as it is the one that produced the stored hashes.
pub trait ContentHasher: Send + Sync {
    fn hash_file(&self, path: &Path) -> io::Result<String>;
}

/// BLAKE3, hex encoded, streamed through a fixed-size buffer.
#[derive(Debug, Clone)]
pub struct Blake3Hasher {
    buffer_size: usize,
}

impl Blake3Hasher {
    pub fn new() -> Self {
        Self::with_buffer_size(crate::config::defaults::DEFAULT_READ_BUFFER_SIZE)
    }

    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    /// Digest of an in-memory buffer, same encoding as [`ContentHasher::hash_file`].
    pub fn hash_bytes(bytes: &[u8]) -> String {
        blake3::hash(bytes).to_hex().to_string()
    }
}

impl Default for Blake3Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentHasher for Blake3Hasher {
    fn hash_file(&self, path: &Path) -> io::Result<String> {
        let mut file = File::open(path)?;
        let mut hasher = blake3::Hasher::new();
        let mut buf = vec![0u8; self.buffer_size];
        loop {
            let n = match file.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buf[..n]);
        }
        Ok(hasher.finalize().to_hex().to_string())
    }
}
