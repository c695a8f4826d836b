//! Process-wide identifier source for the session backend.
//!
//! # Invariants
//! - Every id returned during a process lifetime is distinct.
//! - Ids are positive; they are map keys, not ordering hints.

use std::sync::atomic::{AtomicI64, Ordering};

static NEXT_ID: AtomicI64 = AtomicI64::new(1);

/// Returns a fresh identifier. Safe to call from any thread.
pub fn next_id() -> i64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}
