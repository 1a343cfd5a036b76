//! Tracker Error Types

use thiserror::Error;

/// Errors raised at the tracker API boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// Tracker constructed with a zero capacity
    #[error("Tracker capacity must be greater than zero, got {0}")]
    CapacityMisconfiguration(usize),

    /// Batch contained an absent element
    #[error("Batch element at index {index} is absent")]
    InvalidInput { index: usize },

    /// Threshold configuration is inconsistent
    #[error("Invalid tracker configuration: {0}")]
    InvalidConfig(String),
}
