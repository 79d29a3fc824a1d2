#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(elided_lifetimes_in_paths)]

pub mod replacer;
pub mod sketch;
mod util;

use std::{fmt, hash::Hash};

pub use {
    replacer::{LRUK_REPLACER_K, LruKConfig, LruKReplacer},
    sketch::{HyperLogLog, HyperLogLogPresto, SketchKey},
};

/// Frame identifier type.
///
/// Conceptually, the replacement policy implementation is assumed to be a
/// fixed-size array of frames, where each frame represents a container that
/// holds some page of data. The frame identifier is an index into this array.
pub trait FrameId: Copy + Hash + Eq + fmt::Display + fmt::Debug {}

impl<T> FrameId for T where T: Copy + Hash + Eq + fmt::Display + fmt::Debug {}

/// Page access type.
///
/// When pages are accessed, the buffer pool may log the nature of the access
/// alongside it. The hint is advisory: policies accept it but are free to
/// rank frames without consulting it.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AccessType {
    /// An access of unspecified nature.
    #[default]
    Unknown,
    /// A point lookup of a single record within the page.
    Lookup,
    /// A sequential scan passing through the page.
    Scan,
    /// An access on behalf of an index traversal.
    Index,
}

/// Page eviction policy.
///
/// Defines an interface for interacting with different page replacement
/// strategies. At its core, it provides methods for logging data access,
/// managing eviction eligibility, and eventually locating the next frame to
/// evict.
///
/// Implementations own all per-frame metadata; callers pass frame ids by
/// value and never hold references into the policy's internals.
pub trait EvictionPolicy<F: FrameId> {
    /// Notifies the policy that the page held by the frame has been
    /// referenced/accessed, together with an advisory hint on the nature of
    /// the access.
    ///
    /// A frame seen for the first time starts with just this reference in
    /// its history and is not evictable until [`set_evictable`] says so.
    ///
    /// [`set_evictable`]: EvictionPolicy::set_evictable
    fn record_access(&self, id: F, access_type: AccessType);

    /// Marks a frame as evictable or pins it.
    ///
    /// Only evictable frames are candidates for [`evict`]. Calls naming an
    /// untracked frame, or asking for the state the frame is already in, do
    /// nothing.
    ///
    /// [`evict`]: EvictionPolicy::evict
    fn set_evictable(&self, id: F, evictable: bool);

    /// Removes an evictable frame together with its access history.
    ///
    /// In contrast to [`evict`](EvictionPolicy::evict), this removes the
    /// named frame regardless of its eviction priority. Removing an
    /// untracked frame does nothing.
    ///
    /// # Panics
    ///
    /// Panics when the frame is tracked but not evictable; the pool still
    /// holds on to it, so asking to drop it is a caller bug.
    fn remove(&self, id: F);

    /// Finds the frame with the highest eviction priority, drops it from
    /// the policy along with its access history, and returns its id.
    ///
    /// Returns `None` when no frame is evictable.
    fn evict(&self) -> Option<F>;

    /// The number of frames currently eligible for eviction.
    fn size(&self) -> usize;
}
