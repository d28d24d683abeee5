//! Scope-local variables bound by initializers.
//!
//! A [`Var`] is a shared slot. Groups register initializers for it with
//! `let_var`; before each example runs, the innermost initializer visible to
//! that example assigns the slot. Each initializer computes its value once
//! and hands out clones afterwards.
//!
//! # Lanes
//!
//! Examples running concurrently must not see each other's bindings. A
//! runner enters a [`Lane`] on the thread running a group of examples; while
//! it is entered, `set` and `clear` write to the lane and `get` reads the
//! lane first, falling back to the shared slot. Dropping the last handle to
//! a lane drops its values.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::{Block, Failure};

static NEXT_VAR_ID: AtomicU32 = AtomicU32::new(0);

thread_local! {
    static CURRENT_LANE: RefCell<Option<Lane>> = const { RefCell::new(None) };
}

/// Variable bindings private to one sequence of examples.
#[derive(Clone, Default)]
pub struct Lane {
    /// Values are `Option<T>` of the variable's type; `None` marks a clear.
    bindings: Arc<Mutex<FxHashMap<VarId, Box<dyn Any + Send>>>>,
}

impl Lane {
    pub fn new() -> Self {
        Lane::default()
    }

    /// The lane entered on this thread, if any.
    pub fn current() -> Option<Lane> {
        CURRENT_LANE.with(|lane| lane.borrow().clone())
    }

    /// Make this lane current on this thread until the guard drops.
    pub fn enter(&self) -> LaneGuard {
        let previous = CURRENT_LANE.with(|lane| lane.replace(Some(self.clone())));
        LaneGuard { previous }
    }

    fn bind<T: Send + 'static>(&self, var: VarId, value: Option<T>) {
        self.bindings.lock().insert(var, Box::new(value));
    }

    /// `None` if the lane never bound `var`.
    fn lookup<T: Clone + 'static>(&self, var: VarId) -> Option<Option<T>> {
        self.bindings
            .lock()
            .get(&var)
            .and_then(|value| value.downcast_ref::<Option<T>>())
            .cloned()
    }
}

impl fmt::Debug for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lane")
            .field("bindings", &self.bindings.lock().len())
            .finish()
    }
}

/// Restores the previously entered lane when dropped.
#[must_use = "the lane is left as soon as the guard is dropped"]
pub struct LaneGuard {
    previous: Option<Lane>,
}

impl Drop for LaneGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_LANE.with(|lane| *lane.borrow_mut() = previous);
    }
}

/// Process-unique identity of a [`Var`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u32);

impl VarId {
    fn fresh() -> Self {
        VarId(NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A variable slot shared between initializers, hooks and example bodies.
pub struct Var<T> {
    id: VarId,
    slot: Arc<Mutex<Option<T>>>,
}

impl<T> Var<T> {
    pub fn new() -> Self {
        Var {
            id: VarId::fresh(),
            slot: Arc::new(Mutex::new(None)),
        }
    }

    pub fn id(&self) -> VarId {
        self.id
    }
}

impl<T: Send + 'static> Var<T> {
    pub fn set(&self, value: T) {
        self.assign(Some(value));
    }

    pub fn clear(&self) {
        self.assign(None);
    }

    fn assign(&self, value: Option<T>) {
        match Lane::current() {
            Some(lane) => lane.bind(self.id, value),
            None => *self.slot.lock() = value,
        }
    }
}

impl<T: Clone + 'static> Var<T> {
    /// Current value, if an initializer or body has assigned one.
    pub fn get(&self) -> Option<T> {
        Lane::current()
            .and_then(|lane| lane.lookup(self.id))
            .unwrap_or_else(|| self.slot.lock().clone())
    }
}

impl<T> Default for Var<T> {
    fn default() -> Self {
        Var::new()
    }
}

impl<T> Clone for Var<T> {
    fn clone(&self) -> Self {
        Var {
            id: self.id,
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> fmt::Debug for Var<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Var").field(&self.id).finish()
    }
}

/// Wrap `init` into a block that computes once and assigns `var` on every run.
///
/// A failed computation is not cached; the next run tries again.
pub(crate) fn memoized_initializer<T, F>(var: &Var<T>, init: F) -> Block
where
    T: Clone + Send + 'static,
    F: Fn() -> Result<T, Failure> + Send + Sync + 'static,
{
    let var = var.clone();
    let cache: Mutex<Option<T>> = Mutex::new(None);
    Block::new(move || {
        let value = {
            let mut cached = cache.lock();
            match cached.as_ref() {
                Some(value) => value.clone(),
                None => {
                    let value = init()?;
                    *cached = Some(value.clone());
                    value
                }
            }
        };
        var.set(value);
        Ok(())
    })
}
