//! Content identity

use sha2::{Digest, Sha256};
use varinterop_value::ContentId;

/// SHA-256 of `data` as a [`ContentId`]
pub fn content_id(data: &[u8]) -> ContentId {
    ContentId::from_bytes(Sha256::digest(data).into())
}
