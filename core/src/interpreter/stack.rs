//! Native stack growth for the recursive descent.
//!
//! Every script call re-enters the grammar through a dozen Rust frames, so
//! `max_depth` nested calls can need far more stack than a host thread has.
//! The recursive entry points run through [`ensure_sufficient_stack`], which
//! moves onto a fresh segment when the current one runs low. The depth and
//! iteration limits then fail as script errors instead of aborting the host.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
