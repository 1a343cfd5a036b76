//! Frame-to-frame sign stabilization

use temporal_tracker::{Tracker, TrackerConfig};
use tracing::{debug, warn};

use crate::{FrameSignClassifications, SignError, UiSign};

/// Stabilizes the sign row across frames
#[derive(Debug)]
pub struct SignTracker {
    tracker: Tracker<UiSign, UiSign>,
}

impl SignTracker {
    /// Create a sign tracker from tracker thresholds
    pub fn new(config: TrackerConfig) -> Result<Self, SignError> {
        Ok(Self {
            tracker: Tracker::with_config(config, |sign: &UiSign| *sign)?,
        })
    }

    /// Feed one frame and get the signs to display
    pub fn on_frame(&mut self, frame: &FrameSignClassifications) -> Result<Vec<UiSign>, SignError> {
        let signs = UiSign::from_frame(frame).map_err(|e| {
            warn!("Dropping frame {}: {}", self.tracker.cycles(), e);
            e
        })?;

        debug!("Frame {}: {} signs classified", self.tracker.cycles(), signs.len());
        self.tracker.update(signs);

        Ok(self.tracker.current())
    }

    /// Signs currently displayed
    pub fn current(&self) -> Vec<UiSign> {
        self.tracker.current()
    }

    /// Number of signs being tracked, displayed or not
    pub fn tracked(&self) -> usize {
        self.tracker.len()
    }

    /// Frames consumed since creation or the last reset
    pub fn frames(&self) -> u64 {
        self.tracker.cycles()
    }

    /// Start over, e.g. when the sign screen is re-entered
    pub fn reset(&mut self) {
        self.tracker.clear();
    }
}
