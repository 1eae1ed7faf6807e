//! Testing support.

use std::cell::Cell;

thread_local! {
    /// Whether the last query was a cache hit.
    static LAST_WAS_HIT: Cell<bool> = const { Cell::new(false) };
    /// How many queries hit on this thread.
    static HITS: Cell<usize> = const { Cell::new(0) };
    /// How many queries missed on this thread.
    static MISSES: Cell<usize> = const { Cell::new(0) };
}

/// Whether the last query on this thread was a hit.
pub fn last_was_hit() -> bool {
    LAST_WAS_HIT.with(|cell| cell.get())
}

/// How many queries on this thread were hits.
pub fn hits() -> usize {
    HITS.with(|cell| cell.get())
}

/// How many queries on this thread were misses.
pub fn misses() -> usize {
    MISSES.with(|cell| cell.get())
}

/// Reset this thread's counters.
pub fn reset() {
    LAST_WAS_HIT.with(|cell| cell.set(false));
    HITS.with(|cell| cell.set(0));
    MISSES.with(|cell| cell.set(0));
}

/// Marks the last query as a cache hit.
pub(crate) fn register_hit() {
    LAST_WAS_HIT.with(|cell| cell.set(true));
    HITS.with(|cell| cell.set(cell.get() + 1));
}

/// Marks the last query as a cache miss.
pub(crate) fn register_miss() {
    LAST_WAS_HIT.with(|cell| cell.set(false));
    MISSES.with(|cell| cell.set(cell.get() + 1));
}
