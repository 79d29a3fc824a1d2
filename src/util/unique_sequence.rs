use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe unique sequence number generator.
///
/// Whenever some replacer needs to log the time of an access, it draws the
/// next number from this sequence. Numbers are strictly monotonic, so no two
/// access events ever share a timestamp, and drawing one takes no lock.
#[derive(Debug, Default)]
pub struct UniqueSequence {
    val: AtomicU64,
}

impl UniqueSequence {
    /// Creates a new sequence starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            val: AtomicU64::new(0),
        }
    }

    /// Returns the next sequence number.
    pub fn next(&self) -> u64 {
        self.val.fetch_add(1, Ordering::SeqCst)
    }
}
