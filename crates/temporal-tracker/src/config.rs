//! Tracker configuration

use serde::{Deserialize, Serialize};

use crate::TrackerError;

/// Default number of reported items
pub const DEFAULT_MAX_CAPACITY: usize = 5;

/// Cycles an item must be seen before it is reported
pub const DEFAULT_CONFIRMATION_THRESHOLD: u32 = 5;

/// Cycles of absence after which a reappearance counts as a new occurrence
pub const DEFAULT_OLD_PAYLOAD_BORDER: i32 = 90;

/// Cycles of absence after which an item is forgotten (30s at 10Hz)
pub const DEFAULT_EXPIRY_DEADLINE: i32 = 10 * 30;

/// Tracker configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Maximum number of items reported by `current()`
    pub max_capacity: usize,

    /// Minimum seen count before an item is reported
    pub confirmation_threshold: u32,

    /// Expiration count above which a reappearing item is archived
    pub old_payload_border: i32,

    /// Expiration count at which an item is evicted
    pub expiry_deadline: i32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_capacity: DEFAULT_MAX_CAPACITY,
            confirmation_threshold: DEFAULT_CONFIRMATION_THRESHOLD,
            old_payload_border: DEFAULT_OLD_PAYLOAD_BORDER,
            expiry_deadline: DEFAULT_EXPIRY_DEADLINE,
        }
    }
}

impl TrackerConfig {
    /// Default thresholds with a custom capacity
    pub fn with_capacity(max_capacity: usize) -> Self {
        Self {
            max_capacity,
            ..Default::default()
        }
    }

    /// Check the configuration before a tracker is built from it
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.max_capacity == 0 {
            return Err(TrackerError::CapacityMisconfiguration(self.max_capacity));
        }
        if self.confirmation_threshold == 0 {
            return Err(TrackerError::InvalidConfig(
                "confirmation_threshold must be at least 1".to_string(),
            ));
        }
        if self.old_payload_border < 0 || self.expiry_deadline <= 0 {
            return Err(TrackerError::InvalidConfig(format!(
                "old_payload_border ({}) and expiry_deadline ({}) must be positive",
                self.old_payload_border, self.expiry_deadline
            )));
        }
        if self.old_payload_border >= self.expiry_deadline {
            return Err(TrackerError::InvalidConfig(format!(
                "old_payload_border ({}) must be below expiry_deadline ({})",
                self.old_payload_border, self.expiry_deadline
            )));
        }
        Ok(())
    }
}
