//! Errors raised while translating host documents.

use thiserror::Error;

use crate::world_state::RegionId;

/// Errors from the host adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The document is not valid JSON or misses a required top-level field.
    #[error("malformed host document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Conditions were listed for a region the document never declared.
    #[error("conditions reference unknown region {0}")]
    UnknownRegion(RegionId),
}
