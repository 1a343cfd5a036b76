//! Temporal Tracker
//!
//! Stabilizes per-frame detection lists across frames:
//! - Items must be seen in several update cycles before they are reported
//! - Items that stop appearing age out after a fixed number of cycles
//! - The reported view is bounded to a maximum capacity

mod config;
mod error;
mod item;
mod tracker;

pub use config::{
    TrackerConfig, DEFAULT_CONFIRMATION_THRESHOLD, DEFAULT_EXPIRY_DEADLINE, DEFAULT_MAX_CAPACITY,
    DEFAULT_OLD_PAYLOAD_BORDER,
};
pub use error::TrackerError;
pub use item::TrackedItem;
pub use tracker::{Slot, Tracker};
