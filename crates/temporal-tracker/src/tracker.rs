//! Temporal Tracker Implementation

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::{debug, info, warn};

use crate::{TrackedItem, TrackerConfig, TrackerError};

/// Position of a tracked item in the tracker state
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slot<K> {
    /// Current occurrence of an identity
    Live(K),
    /// Stale occurrence demoted when the identity reappeared after a long gap
    Archived(K),
}

type KeyFn<T, K> = Box<dyn Fn(&T) -> K + Send + Sync>;

/// Bounded tracker that debounces per-frame detections
///
/// Feed one batch per frame with [`Tracker::update`], then read the stable
/// items with [`Tracker::current`]. Identity is decided by the key extractor
/// supplied at construction.
pub struct Tracker<T, K> {
    /// Thresholds and capacity
    config: TrackerConfig,
    /// Identity of a payload
    key_of: KeyFn<T, K>,
    /// Tracked items by slot
    items: HashMap<Slot<K>, TrackedItem<T>>,
    /// Slot insertion order
    order: Vec<Slot<K>>,
    /// Completed update cycles
    cycles: u64,
}

impl<T, K> Tracker<T, K>
where
    K: Eq + Hash + Clone,
{
    /// Create a tracker reporting at most `max_capacity` items
    pub fn new<F>(max_capacity: usize, key_of: F) -> Result<Self, TrackerError>
    where
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self::with_config(TrackerConfig::with_capacity(max_capacity), key_of)
    }

    /// Create a tracker with custom thresholds
    pub fn with_config<F>(config: TrackerConfig, key_of: F) -> Result<Self, TrackerError>
    where
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        config.validate()?;
        info!("Creating tracker with config: {:?}", config);

        Ok(Self {
            config,
            key_of: Box::new(key_of),
            items: HashMap::new(),
            order: Vec::new(),
            cycles: 0,
        })
    }

    /// Ingest one frame's worth of observations
    pub fn update<I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = T>,
    {
        // add new elements
        for payload in batch {
            self.admit(payload);
        }

        // update counters
        for item in self.items.values_mut() {
            item.update_timer();
        }

        self.evict_expired();
        self.cycles += 1;
    }

    /// Ingest a batch whose elements may be absent
    ///
    /// The whole batch is rejected if any element is `None`; state is left
    /// untouched in that case.
    pub fn try_update<I>(&mut self, batch: I) -> Result<(), TrackerError>
    where
        I: IntoIterator<Item = Option<T>>,
    {
        let batch = batch
            .into_iter()
            .enumerate()
            .map(|(index, payload)| payload.ok_or(TrackerError::InvalidInput { index }))
            .collect::<Result<Vec<_>, _>>();

        match batch {
            Ok(batch) => {
                self.update(batch);
                Ok(())
            }
            Err(e) => {
                warn!("Rejected batch at cycle {}: {}", self.cycles, e);
                Err(e)
            }
        }
    }

    /// Stable items, oldest first, bounded to the configured capacity
    pub fn current(&self) -> Vec<T>
    where
        T: Clone,
    {
        // filter out ones that aren't seen enough
        let confirmed: Vec<&TrackedItem<T>> = self
            .items()
            .map(|(_, item)| item)
            .filter(|item| item.seen_counter() >= self.config.confirmation_threshold)
            .collect();

        // trim out old items to fit max_capacity
        let excess = confirmed.len().saturating_sub(self.config.max_capacity);

        confirmed
            .into_iter()
            .skip(excess)
            .map(|item| item.payload().clone())
            .collect()
    }

    /// All tracked items in insertion order, confirmed or not
    pub fn items(&self) -> impl Iterator<Item = (&Slot<K>, &TrackedItem<T>)> + '_ {
        self.order
            .iter()
            .filter_map(move |slot| self.items.get(slot).map(|item| (slot, item)))
    }

    /// Live item for an identity key
    pub fn get(&self, key: &K) -> Option<&TrackedItem<T>> {
        self.items.get(&Slot::Live(key.clone()))
    }

    /// Number of tracked items, archived ones included
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max_capacity(&self) -> usize {
        self.config.max_capacity
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Number of completed `update` calls
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Forget all tracked items
    pub fn clear(&mut self) {
        self.items.clear();
        self.order.clear();
        self.cycles = 0;
    }

    fn admit(&mut self, payload: T) {
        let key = (self.key_of)(&payload);
        let live = Slot::Live(key.clone());

        let expiration = self.items.get(&live).map(TrackedItem::expiration_counter);
        match expiration {
            None => self.insert(live.clone(), TrackedItem::new(payload)),
            Some(expiration) if expiration > self.config.old_payload_border => {
                debug!(
                    "Archiving stale occurrence after {} cycles of absence",
                    expiration
                );
                // replacing keeps the live slot's position in the order
                if let Some(stale) = self.items.insert(live.clone(), TrackedItem::new(payload)) {
                    self.insert(Slot::Archived(key), stale);
                }
            }
            Some(_) => {}
        }

        if let Some(item) = self.items.get_mut(&live) {
            item.reset_timer();
        }
    }

    fn insert(&mut self, slot: Slot<K>, item: TrackedItem<T>) {
        if self.items.insert(slot.clone(), item).is_none() {
            self.order.push(slot);
        }
    }

    fn evict_expired(&mut self) {
        let deadline = self.config.expiry_deadline;
        let items = &mut self.items;
        let before = self.order.len();

        self.order.retain(|slot| {
            let expired = items
                .get(slot)
                .map_or(true, |item| item.expiration_counter() >= deadline);
            if expired {
                items.remove(slot);
            }
            !expired
        });

        let evicted = before - self.order.len();
        if evicted > 0 {
            debug!("Evicted {} expired items at cycle {}", evicted, self.cycles);
        }
    }
}

impl<T> Tracker<T, T>
where
    T: Eq + Hash + Clone + 'static,
{
    /// Tracker whose identity is the payload value itself
    pub fn by_value(max_capacity: usize) -> Result<Self, TrackerError> {
        Self::new(max_capacity, T::clone)
    }
}

impl<T, K> fmt::Debug for Tracker<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracker")
            .field("config", &self.config)
            .field("tracked", &self.items.len())
            .field("cycles", &self.cycles)
            .finish()
    }
}
