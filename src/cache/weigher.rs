//! Payload Sizing
//!
//! Best-effort byte-size estimates for cached payloads. Sizes feed the
//! `totalSize` statistic only and never influence eviction.

use std::fmt::Debug;

use serde::Serialize;
use thiserror::Error;

// == Weigh Error ==
/// Failure to size a payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeighError {
    /// The payload cannot be measured; it is cached with size 0.
    #[error("payload is not sizeable: {0}")]
    Unsizeable(String),

    /// Sizing hit an unrecoverable failure; the write is abandoned.
    #[error("sizing failed: {0}")]
    Fatal(String),
}

// == Weigher Trait ==
/// Computes the approximate size of a payload in bytes.
pub trait Weigher<V>: Send + Sync + Debug {
    fn weigh(&self, value: &V) -> Result<usize, WeighError>;
}

// == JSON Weigher ==
/// Measures a payload by the length of its JSON serialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWeigher;

impl<V: Serialize> Weigher<V> for JsonWeigher {
    fn weigh(&self, value: &V) -> Result<usize, WeighError> {
        serde_json::to_vec(value)
            .map(|bytes| bytes.len())
            .map_err(|e| WeighError::Unsizeable(e.to_string()))
    }
}
