//! Shared store error type.

use thiserror::Error;

/// Error from a backing store.
///
/// Unavailability is the only failure mode a store may surface; everything
/// else (missing records, ownership mismatches) is expressed through normal
/// return values so that callers cannot distinguish "foreign" from "absent".
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or the operation failed fatally.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
