//! LRU-K page replacement algorithm.
//!
//! The algorithm implemented here is based on the [LRU-K paper](https://dl.acm.org/doi/10.1145/170036.170081).

use {
    crate::{AccessType, EvictionPolicy, FrameId, util::UniqueSequence},
    parking_lot::Mutex,
    priority_queue::PriorityQueue,
    std::{
        cmp::Ordering,
        collections::{HashMap, VecDeque},
        sync::Arc,
    },
};

/// Default look-back window for the LRU-K frame replacer.
pub const LRUK_REPLACER_K: usize = 2;

/// Configuration of the LRU-K replacer.
#[derive(Debug)]
pub struct LruKConfig {
    /// Maximum number of frames to keep track of.
    pub capacity: usize,

    /// Number of most recent page accesses to keep track of. Must be at
    /// least 1.
    pub k: usize,
}

impl Default for LruKConfig {
    fn default() -> Self {
        Self {
            capacity: 4096,
            k: LRUK_REPLACER_K,
        }
    }
}

/// Eviction priority of a frame.
///
/// A frame with fewer than `k` recorded references has an infinite backward
/// k-distance and always outranks a frame with a full history. Ordering is
/// arranged so that the greatest key is the next victim.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum KDistance {
    /// Full history of `k` references; carries the timestamp of the k-th
    /// most recent one. The smaller it is, the larger the distance.
    Finite { kth_ref: u64 },

    /// Fewer than `k` references; carries the oldest retained timestamp, so
    /// that the frame first seen furthest in the past goes first.
    Infinite { first_ref: u64 },
}

impl Ord for KDistance {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Infinite { first_ref: a }, Self::Infinite { first_ref: b }) => b.cmp(a),
            (Self::Infinite { .. }, Self::Finite { .. }) => Ordering::Greater,
            (Self::Finite { .. }, Self::Infinite { .. }) => Ordering::Less,
            (Self::Finite { kth_ref: a }, Self::Finite { kth_ref: b }) => b.cmp(a),
        }
    }
}

impl PartialOrd for KDistance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Page information.
#[derive(Debug)]
struct PageInfo {
    /// Page's access history. Timestamps of up to the `k` most recent page
    /// references.
    ///
    /// The most recent reference is at the back of the list, the oldest
    /// retained one at the front.
    refs: VecDeque<u64>,

    /// Whether the page may be handed out as an eviction victim.
    evictable: bool,
}

impl PageInfo {
    fn new(k: usize) -> Self {
        Self {
            refs: VecDeque::with_capacity(k),
            evictable: false,
        }
    }

    /// Updates the access history of the page using the given timestamp.
    ///
    /// If the history already holds `k` items, the oldest reference is
    /// dropped before the new timestamp is pushed.
    fn touch(&mut self, timestamp: u64, k: usize) {
        if self.refs.len() >= k {
            self.refs.pop_front();
        }
        self.refs.push_back(timestamp);
    }

    /// Eviction key of the page at this point of its history.
    fn k_distance(&self, k: usize) -> KDistance {
        let oldest = self.refs.front().copied().unwrap_or_default();
        if self.refs.len() < k {
            KDistance::Infinite { first_ref: oldest }
        } else {
            KDistance::Finite { kth_ref: oldest }
        }
    }
}

/// Implements the LRU-K page replacement algorithm.
///
/// The replacer evicts the frame whose backward k-distance -- the difference
/// between the current timestamp and the timestamp of its k-th most recent
/// reference -- is the largest among all evictable frames. Frames referenced
/// fewer than `k` times have infinite distance and are victimised first,
/// oldest first reference first.
///
/// The replacer is a handle over shared state: cloning it is cheap and every
/// clone observes the same frames, so buffer-pool workers on different
/// threads can use it directly. Internally the frame store and the victim
/// queue sit behind two separate mutexes, and access timestamps come from a
/// lock-free atomic sequence bumped before either lock is taken.
pub struct LruKReplacer<F: FrameId> {
    shared: Arc<Shared<F>>,
}

struct Shared<F: FrameId> {
    /// Configuration of the replacer.
    config: LruKConfig,

    /// Monotonically increasing sequence of timestamps.
    /// Used to determine the order and time of page accesses.
    clock: UniqueSequence,

    /// All tracked frames and their access histories.
    store: Mutex<HashMap<F, PageInfo>>,

    /// Evictable frames keyed by eviction priority.
    ///
    /// Locked after `store`, never before.
    evictable: Mutex<PriorityQueue<F, KDistance>>,
}

impl<F: FrameId> Clone for LruKReplacer<F> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<F: FrameId> Default for LruKReplacer<F> {
    fn default() -> Self {
        Self::with_config(LruKConfig::default())
    }
}

impl<F: FrameId> LruKReplacer<F> {
    /// Creates a new LRU-K replacer with the given capacity and `k` value.
    pub fn new(capacity: usize, k: usize) -> Self {
        Self::with_config(LruKConfig { capacity, k })
    }

    /// Creates a new LRU-K replacer with the given configuration.
    ///
    /// # Panics
    ///
    /// Panics when `config.k` is zero.
    pub fn with_config(config: LruKConfig) -> Self {
        assert!(config.k >= 1, "look-back window must be at least 1");
        let capacity = config.capacity;
        Self {
            shared: Arc::new(Shared {
                config,
                clock: UniqueSequence::new(),
                store: Mutex::new(HashMap::with_capacity(capacity)),
                evictable: Mutex::new(PriorityQueue::with_capacity(capacity)),
            }),
        }
    }
}

impl<F: FrameId> EvictionPolicy<F> for LruKReplacer<F> {
    fn record_access(&self, id: F, _access_type: AccessType) {
        // Draw the timestamp before taking any lock, so the time of the
        // access is fixed even when the store is contended.
        let timestamp = self.shared.clock.next();
        let k = self.shared.config.k;

        let mut store = self.shared.store.lock();
        if !store.contains_key(&id) {
            assert!(
                store.len() < self.shared.config.capacity,
                "asked to track frame {id} beyond the configured capacity"
            );
        }

        let page = store.entry(id).or_insert_with(|| PageInfo::new(k));
        page.touch(timestamp, k);

        // The reference may have shifted the frame's k-th access, or pushed
        // it from a partial to a full history; refresh its key so the next
        // eviction sees the change.
        if page.evictable {
            let key = page.k_distance(k);
            self.shared.evictable.lock().push(id, key);
        }
    }

    fn set_evictable(&self, id: F, evictable: bool) {
        let mut store = self.shared.store.lock();

        // Frames that were never accessed are silently ignored.
        let Some(page) = store.get_mut(&id) else {
            return;
        };

        // No-op if the frame is already in the desired state.
        if page.evictable == evictable {
            return;
        }
        page.evictable = evictable;

        if evictable {
            let key = page.k_distance(self.shared.config.k);
            self.shared.evictable.lock().push(id, key);
        } else {
            self.shared.evictable.lock().remove(&id);
        }
    }

    fn remove(&self, id: F) {
        let mut store = self.shared.store.lock();

        let Some(page) = store.get(&id) else {
            return;
        };
        assert!(page.evictable, "cannot remove non-evictable frame {id}");

        store.remove(&id);
        self.shared.evictable.lock().remove(&id);
    }

    fn evict(&self) -> Option<F> {
        let mut store = self.shared.store.lock();
        let mut evictable = self.shared.evictable.lock();

        let (id, _) = evictable.pop()?;
        store.remove(&id);
        Some(id)
    }

    fn size(&self) -> usize {
        self.shared.evictable.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use {super::*, proptest::prelude::*, std::collections::BTreeMap};

    #[test]
    fn k_distance_ordering() {
        // A partial history always outranks a full one.
        assert!(KDistance::Infinite { first_ref: 9 } > KDistance::Finite { kth_ref: 0 });
        // Among partial histories, the older first reference wins.
        assert!(KDistance::Infinite { first_ref: 1 } > KDistance::Infinite { first_ref: 2 });
        // Among full histories, the older k-th reference wins.
        assert!(KDistance::Finite { kth_ref: 3 } > KDistance::Finite { kth_ref: 7 });
    }

    #[test]
    fn history_is_bounded() {
        let mut page = PageInfo::new(2);
        for timestamp in 0..10 {
            page.touch(timestamp, 2);
        }
        assert_eq!(page.refs, [8, 9]);
        assert_eq!(page.k_distance(2), KDistance::Finite { kth_ref: 8 });
    }

    /// Reference model of the replacer: plain per-frame histories and a
    /// linear scan applying the eviction ordering directly.
    #[derive(Debug, Default)]
    struct Model {
        k: usize,
        clock: u64,
        frames: BTreeMap<u8, (Vec<u64>, bool)>,
    }

    impl Model {
        fn new(k: usize) -> Self {
            Self {
                k,
                ..Default::default()
            }
        }

        fn record(&mut self, id: u8) {
            let timestamp = self.clock;
            self.clock += 1;
            let (refs, _) = self.frames.entry(id).or_insert_with(|| (vec![], false));
            refs.push(timestamp);
        }

        fn set_evictable(&mut self, id: u8, evictable: bool) {
            if let Some((_, flag)) = self.frames.get_mut(&id) {
                *flag = evictable;
            }
        }

        fn evictable(&self, id: u8) -> bool {
            self.frames.get(&id).is_some_and(|(_, flag)| *flag)
        }

        fn size(&self) -> usize {
            self.frames.values().filter(|(_, flag)| *flag).count()
        }

        fn victim(&mut self) -> Option<u8> {
            let k = self.k;
            let best = self
                .frames
                .iter()
                .filter(|(_, (_, flag))| *flag)
                .max_by_key(|(_, (refs, _))| {
                    if refs.len() < k {
                        KDistance::Infinite { first_ref: refs[0] }
                    } else {
                        KDistance::Finite {
                            kth_ref: refs[refs.len() - k],
                        }
                    }
                })
                .map(|(id, _)| *id)?;
            self.frames.remove(&best);
            Some(best)
        }
    }

    #[derive(Clone, Debug)]
    enum Op {
        Record(u8),
        SetEvictable(u8, bool),
        Evict,
        Remove(u8),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..16).prop_map(Op::Record),
            ((0u8..16), any::<bool>()).prop_map(|(id, flag)| Op::SetEvictable(id, flag)),
            Just(Op::Evict),
            (0u8..16).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn matches_reference_model(
            k in 1usize..4,
            ops in prop::collection::vec(op_strategy(), 0..200),
        ) {
            let replacer = LruKReplacer::new(16, k);
            let mut model = Model::new(k);

            for op in ops {
                match op {
                    Op::Record(id) => {
                        replacer.record_access(id, AccessType::Unknown);
                        model.record(id);
                    }
                    Op::SetEvictable(id, flag) => {
                        replacer.set_evictable(id, flag);
                        model.set_evictable(id, flag);
                    }
                    Op::Evict => {
                        prop_assert_eq!(replacer.evict(), model.victim());
                    }
                    // Removing a non-evictable frame aborts by contract, so
                    // the model gates which removals get replayed.
                    Op::Remove(id) => {
                        if model.evictable(id) {
                            replacer.remove(id);
                            model.frames.remove(&id);
                        }
                    }
                }
                prop_assert_eq!(replacer.size(), model.size());
            }

            // Drain both; the full victim order must agree.
            loop {
                let (got, want) = (replacer.evict(), model.victim());
                prop_assert_eq!(got, want);
                if got.is_none() {
                    break;
                }
            }
        }
    }
}
