//! Traffic Sign Classification
//!
//! Turns per-frame sign classifications into a stable row of signs:
//! - Sign model (type and speed-limit value)
//! - Conversion from raw frame classifications
//! - Frame-to-frame stabilization through a temporal tracker

pub mod sign;
pub mod tracker;

pub use sign::{FrameSignClassifications, SignClassification, SignNumber, SignType, UiSign};
pub use tracker::SignTracker;

use temporal_tracker::TrackerError;
use thiserror::Error;

/// Sign classification error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    #[error("Illegal sign: {0}")]
    IllegalSign(String),

    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),
}
