//! Executable bodies and expected-failure markers.

use std::any::{Any, TypeId};
use std::error::Error;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Failure raised by a hook, variable initializer or example body.
pub type Failure = Box<dyn Error + Send + Sync + 'static>;

/// Outcome of running a [`Block`].
pub type BlockResult = Result<(), Failure>;

/// A shareable body of code.
///
/// Cloning is cheap and clones run the same closure. Examples and hooks are
/// executed through `&self`, so a block may be invoked from any runner thread.
/// A panic inside the closure is returned as a [`Panicked`] failure.
#[derive(Clone)]
pub struct Block(Arc<dyn Fn() -> BlockResult + Send + Sync>);

impl Block {
    pub fn new(body: impl Fn() -> BlockResult + Send + Sync + 'static) -> Self {
        Block(Arc::new(body))
    }

    /// A body that does nothing and always succeeds.
    pub fn noop() -> Self {
        Block::new(|| Ok(()))
    }

    pub fn run(&self) -> BlockResult {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.0)())) {
            Ok(result) => result,
            Err(payload) => Err(Box::new(Panicked::from_payload(&*payload))),
        }
    }
}

/// A block body panicked instead of returning.
#[derive(Debug, thiserror::Error)]
#[error("panicked: {message}")]
pub struct Panicked {
    message: String,
}

impl Panicked {
    fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else {
            "unknown panic".to_owned()
        };
        Panicked { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Block(..)")
    }
}

/// Marks an example as expected to fail with a specific error type.
///
/// The type is erased into a matcher so the marker stays `Copy` and can be
/// carried through the tree without generics. Two markers are equal when
/// they expect the same type.
#[derive(Copy, Clone)]
pub struct ExpectedFailure {
    type_id: TypeId,
    type_name: &'static str,
    matcher: fn(&(dyn Error + 'static)) -> bool,
}

impl ExpectedFailure {
    /// Expect a failure whose concrete type is `E`.
    pub fn of<E: Error + 'static>() -> Self {
        ExpectedFailure {
            type_id: TypeId::of::<E>(),
            type_name: std::any::type_name::<E>(),
            matcher: |error| error.is::<E>(),
        }
    }

    /// Name of the expected error type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether `failure` is of the expected type.
    pub fn matches(&self, failure: &Failure) -> bool {
        let error: &(dyn Error + 'static) = &**failure;
        (self.matcher)(error)
    }
}

impl fmt::Debug for ExpectedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExpectedFailure")
            .field(&self.type_name)
            .finish()
    }
}

impl PartialEq for ExpectedFailure {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ExpectedFailure {}
