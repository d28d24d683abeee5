//! Stack growth guard for recursive spec tree walks.
//!
//! Group definitions nest arbitrarily: an author can open a `describe` inside
//! a `describe` as deep as they like, and every analysis pass walks that tree
//! recursively. Wrapping the recursive step in [`ensure_sufficient_stack`]
//! keeps a pathological nesting depth from overflowing the thread stack,
//! which matters on runner worker threads that start with small stacks.
//!
//! # Usage
//!
//! ```text
//! fn walk(group: &GroupDef) {
//!     ensure_sufficient_stack(|| {
//!         for child in &group.children {
//!             walk(child);
//!         }
//!     })
//! }
//! ```
//!
//! On `wasm32` the guard is a plain call.

/// Remaining stack below which a new segment is allocated (64KB).
const RED_ZONE: usize = 64 * 1024;

/// Size of each newly allocated stack segment (1MB).
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, growing the stack first if fewer than [`RED_ZONE`] bytes remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
