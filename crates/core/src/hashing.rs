//! Content hashes identifying uploaded tracks.

use sha2::{Digest, Sha256};

use crate::types::{DbId, Timestamp};

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Hash identifying one upload of `title` by `user_id` at `at`.
///
/// The timestamp makes re-uploads of the same title produce distinct hashes,
/// which in turn keeps their stored filenames apart.
pub fn track_hash(title: &str, user_id: DbId, at: Timestamp) -> String {
    sha256_hex(format!("{title} {} {user_id}", at.timestamp()).as_bytes())
}
