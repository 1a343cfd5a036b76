//! Tracked item state

/// One observed payload and its counters
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedItem<T> {
    payload: T,
    seen_counter: u32,
    expiration_counter: i32,
}

impl<T> TrackedItem<T> {
    pub(crate) fn new(payload: T) -> Self {
        Self {
            payload,
            seen_counter: 0,
            expiration_counter: -1,
        }
    }

    /// Item was observed again in the current batch
    pub(crate) fn reset_timer(&mut self) {
        self.expiration_counter = -1;
        self.seen_counter = self.seen_counter.saturating_add(1);
    }

    /// One more update cycle elapsed
    pub(crate) fn update_timer(&mut self) {
        self.expiration_counter = self.expiration_counter.saturating_add(1);
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Number of update cycles in which the item was observed
    pub fn seen_counter(&self) -> u32 {
        self.seen_counter
    }

    /// Cycles since the item was last observed (-1 right after a refresh)
    pub fn expiration_counter(&self) -> i32 {
        self.expiration_counter
    }
}
