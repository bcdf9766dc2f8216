//! Live handle counters, one per wand kind
//!
//! Every native allocation increments the counter of its kind and every
//! release decrements it exactly once. [`is_clean`] reports whether all
//! counters are back at zero, which is how tests detect leaked handles.
//!
//! Counters are only mutated by the [`engine`](crate::engine) module while it
//! holds the engine lock, so the total seen there is consistent with the
//! teardown decision. Reads are lock-free.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

/// The kinds of native handle the bridge tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WandKind {
    Image,
    Drawing,
    Pixel,
    PixelIterator,
}

impl WandKind {
    pub const ALL: [WandKind; 4] = [
        WandKind::Image,
        WandKind::Drawing,
        WandKind::Pixel,
        WandKind::PixelIterator,
    ];

    fn index(self) -> usize {
        match self {
            WandKind::Image => 0,
            WandKind::Drawing => 1,
            WandKind::Pixel => 2,
            WandKind::PixelIterator => 3,
        }
    }

    /// Name of the native type
    pub fn name(self) -> &'static str {
        match self {
            WandKind::Image => "MagickWand",
            WandKind::Drawing => "DrawingWand",
            WandKind::Pixel => "PixelWand",
            WandKind::PixelIterator => "PixelIterator",
        }
    }
}

impl fmt::Display for WandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static COUNTERS: [AtomicI64; 4] = [
    AtomicI64::new(0),
    AtomicI64::new(0),
    AtomicI64::new(0),
    AtomicI64::new(0),
];

pub(crate) fn increment(kind: WandKind) {
    COUNTERS[kind.index()].fetch_add(1, Ordering::SeqCst);
}

pub(crate) fn decrement(kind: WandKind) {
    let previous = COUNTERS[kind.index()].fetch_sub(1, Ordering::SeqCst);
    if previous <= 0 {
        log::warn!("{} counter dropped below zero ({})", kind, previous - 1);
    }
}

/// Current number of live handles of one kind
pub fn count(kind: WandKind) -> i64 {
    COUNTERS[kind.index()].load(Ordering::SeqCst)
}

/// Sum of all live handles
pub fn total() -> i64 {
    WandKind::ALL.iter().map(|kind| count(*kind)).sum()
}

/// Whether every counter is zero
pub fn is_clean() -> bool {
    WandKind::ALL.iter().all(|kind| count(*kind) == 0)
}

/// Point-in-time copy of all counters
pub fn snapshot() -> Snapshot {
    Snapshot {
        image: count(WandKind::Image),
        drawing: count(WandKind::Drawing),
        pixel: count(WandKind::Pixel),
        pixel_iterator: count(WandKind::PixelIterator),
    }
}

/// Counter values captured by [`snapshot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub image: i64,
    pub drawing: i64,
    pub pixel: i64,
    pub pixel_iterator: i64,
}

impl Snapshot {
    pub fn get(&self, kind: WandKind) -> i64 {
        match kind {
            WandKind::Image => self.image,
            WandKind::Drawing => self.drawing,
            WandKind::Pixel => self.pixel,
            WandKind::PixelIterator => self.pixel_iterator,
        }
    }

    pub fn is_clean(&self) -> bool {
        WandKind::ALL.iter().all(|kind| self.get(*kind) == 0)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kind in WandKind::ALL {
            writeln!(f, "{} counter {}", kind, self.get(kind))?;
        }
        Ok(())
    }
}
