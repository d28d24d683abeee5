//! Runnable examples.
//!
//! An [`Example`] carries everything its position in the plan requires: the
//! resolved variable initializers, the hook chains of every enclosing group,
//! and for each once-per-run hook whether this example is the one that fires
//! it. Those flags are computed by [`Plan`](crate::Plan) from the final
//! order, so running an example never needs to look at its neighbours.
//!
//! # Execution
//!
//! ```text
//! var initializers   abort on failure
//! before-all (owned) abort on failure, block every example sharing the hook
//! before-each        abort on failure
//! body               ┐ interrupted after the timeout, if one is set
//! after-each         ├ failures collected, every step attempted
//! after-all (owned)  ┘
//! ```

use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ordo_ir::{
    Block, BlockResult, ExpectedFailure, Failure, HookId, HookKind, Lane, Rank, VarInitDef,
};
use parking_lot::Mutex;
use rustc_hash::FxHashSet;

/// A hook body together with its identity.
#[derive(Clone, Debug)]
pub struct Hook {
    pub id: HookId,
    pub block: Block,
}

/// A before-all or after-all hook as seen by one example.
#[derive(Clone, Debug)]
pub(crate) struct OnceHook {
    pub(crate) hook: Hook,
    /// This example fires the hook for its run.
    pub(crate) fires_here: bool,
}

impl OnceHook {
    pub(crate) fn new(hook: Hook) -> Self {
        OnceHook {
            hook,
            fires_here: true,
        }
    }
}

/// Lifecycle of one example.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExampleState {
    NotStarted,
    Running,
    Passed,
    Failed,
}

/// Several failures from one example, in the order they occurred.
#[derive(Debug, thiserror::Error)]
#[error("multiple failures ({})", .failures.len())]
pub struct MultipleFailures {
    failures: Vec<Failure>,
}

impl MultipleFailures {
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }
}

/// An example body did not finish within its timeout.
///
/// The body is abandoned on its worker thread rather than joined.
#[derive(Debug, thiserror::Error)]
#[error("timed out after {timeout:?}")]
pub struct TimedOut {
    timeout: Duration,
}

impl TimedOut {
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Run `block` on a worker thread in the caller's lane, giving up on it
/// after `timeout`.
fn run_with_timeout(block: &Block, timeout: Duration) -> BlockResult {
    let (sender, receiver) = mpsc::channel();
    let worker = block.clone();
    let lane = Lane::current();
    let spawned = thread::Builder::new()
        .name("ordo-example".to_owned())
        .spawn(move || {
            let _entered = lane.as_ref().map(Lane::enter);
            let _ = sender.send(worker.run());
        });
    if let Err(error) = spawned {
        tracing::warn!("failed to spawn example thread ({error}), running without timeout");
        return block.run();
    }

    match receiver.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(Box::new(TimedOut { timeout })),
        Err(RecvTimeoutError::Disconnected) => {
            Err("example thread exited without a result".into())
        }
    }
}

/// Collects failures instead of stopping at the first one.
#[derive(Default)]
struct FailureCollector {
    failures: Vec<Failure>,
}

impl FailureCollector {
    fn execute(&mut self, block: &Block) {
        self.record(block.run());
    }

    fn record(&mut self, result: BlockResult) {
        if let Err(failure) = result {
            self.failures.push(failure);
        }
    }

    /// A single failure propagates as-is; several are wrapped.
    fn finish(mut self) -> BlockResult {
        match self.failures.len() {
            0 => Ok(()),
            1 => Err(self.failures.remove(0)),
            _ => Err(Box::new(MultipleFailures {
                failures: self.failures,
            })),
        }
    }
}

/// Before-all hooks that have failed, shared by every example of a plan.
#[derive(Debug, Default)]
pub(crate) struct HookFailures {
    failed: Mutex<FxHashSet<HookId>>,
}

impl HookFailures {
    fn mark(&self, id: HookId) {
        self.failed.lock().insert(id);
    }

    fn contains(&self, id: HookId) -> bool {
        self.failed.lock().contains(&id)
    }
}

/// Example ready to be run by a runner.
pub struct Example {
    pub(crate) container_descriptions: Vec<String>,
    pub(crate) description: String,
    pub(crate) rank: Rank,
    /// `None` for a skipped example.
    pub(crate) body: Option<Block>,
    pub(crate) var_initializers: Vec<VarInitDef>,
    pub(crate) before_all: Vec<OnceHook>,
    pub(crate) before_each: Vec<Hook>,
    pub(crate) after_each: Vec<Hook>,
    pub(crate) after_all: Vec<OnceHook>,
    pub(crate) expected: Option<ExpectedFailure>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) hook_failures: Arc<HookFailures>,
    state: Mutex<ExampleState>,
}

impl Example {
    /// An example that will run `body` under no hooks.
    pub(crate) fn new(
        container_descriptions: Vec<String>,
        description: String,
        rank: Rank,
        body: Option<Block>,
    ) -> Self {
        Example {
            container_descriptions,
            description,
            rank,
            body,
            var_initializers: Vec::new(),
            before_all: Vec::new(),
            before_each: Vec::new(),
            after_each: Vec::new(),
            after_all: Vec::new(),
            expected: None,
            timeout: None,
            hook_failures: Arc::default(),
            state: Mutex::new(ExampleState::NotStarted),
        }
    }

    /// The same example with its body and hooks dropped.
    pub(crate) fn into_placeholder(self) -> Self {
        Example::new(
            self.container_descriptions,
            self.description,
            self.rank,
            None,
        )
    }

    /// Run this example and its hooks.
    ///
    /// Does nothing for an example that [should be ignored](Self::should_be_ignored).
    pub fn try_to_execute(&self) -> BlockResult {
        let Some(body) = &self.body else {
            return Ok(());
        };
        if self.blocked_by_before_all() {
            tracing::debug!(
                example = %self.description,
                "skipped after shared before-all failure"
            );
            return Ok(());
        }

        *self.state.lock() = ExampleState::Running;
        let outcome = self.execute(body);
        *self.state.lock() = if outcome.is_ok() {
            ExampleState::Passed
        } else {
            ExampleState::Failed
        };
        outcome
    }

    fn execute(&self, body: &Block) -> BlockResult {
        for binding in &self.var_initializers {
            binding.init.run()?;
        }

        for once in self.before_all.iter().filter(|once| once.fires_here) {
            tracing::trace!(
                example = %self.description,
                hook = once.hook.id.index(),
                "before-all"
            );
            if let Err(failure) = once.hook.block.run() {
                self.hook_failures.mark(once.hook.id);
                tracing::warn!(
                    example = %self.description,
                    hook = once.hook.id.index(),
                    "before-all hook failed, examples sharing it will be ignored"
                );
                return Err(failure);
            }
        }

        for hook in &self.before_each {
            hook.block.run()?;
        }

        let mut collector = FailureCollector::default();
        match self.timeout.filter(|_| self.should_fail_on_timeout()) {
            Some(timeout) => collector.record(run_with_timeout(body, timeout)),
            None => collector.execute(body),
        }
        for hook in &self.after_each {
            collector.execute(&hook.block);
        }
        for once in self.after_all.iter().filter(|once| once.fires_here) {
            tracing::trace!(
                example = %self.description,
                hook = once.hook.id.index(),
                "after-all"
            );
            collector.execute(&once.hook.block);
        }
        collector.finish()
    }

    fn blocked_by_before_all(&self) -> bool {
        self.before_all
            .iter()
            .any(|once| self.hook_failures.contains(once.hook.id))
    }

    /// Skipped by inclusion policy, or blocked by a failed shared before-all hook.
    pub fn should_be_ignored(&self) -> bool {
        self.body.is_none() || self.blocked_by_before_all()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Descriptions of the enclosing groups, root first.
    pub fn container_descriptions(&self) -> &[String] {
        &self.container_descriptions
    }

    /// Container descriptions and the example's own, space separated.
    pub fn full_description(&self) -> String {
        let mut parts: Vec<&str> = self
            .container_descriptions
            .iter()
            .map(String::as_str)
            .collect();
        parts.push(&self.description);
        parts.join(" ")
    }

    pub fn rank(&self) -> &Rank {
        &self.rank
    }

    pub fn expected(&self) -> Option<ExpectedFailure> {
        self.expected
    }

    pub fn is_expected_to_fail(&self) -> bool {
        self.expected.is_some()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn should_fail_on_timeout(&self) -> bool {
        self.timeout.is_some_and(|timeout| !timeout.is_zero())
    }

    pub fn state(&self) -> ExampleState {
        *self.state.lock()
    }

    /// Identities of the hooks of `kind` attached to this example, in the
    /// order they run (whether or not this example fires them).
    pub fn hook_ids(&self, kind: HookKind) -> Vec<HookId> {
        match kind {
            HookKind::BeforeAll => self.before_all.iter().map(|once| once.hook.id).collect(),
            HookKind::BeforeEach => self.before_each.iter().map(|hook| hook.id).collect(),
            HookKind::AfterEach => self.after_each.iter().map(|hook| hook.id).collect(),
            HookKind::AfterAll => self.after_all.iter().map(|once| once.hook.id).collect(),
        }
    }

    pub(crate) fn shares_before_all(&self, id: HookId) -> bool {
        self.before_all.iter().any(|once| once.hook.id == id)
    }

    pub(crate) fn shares_after_all(&self, id: HookId) -> bool {
        self.after_all.iter().any(|once| once.hook.id == id)
    }
}

impl fmt::Debug for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Example")
            .field("description", &self.full_description())
            .field("rank", &self.rank)
            .field("ignored", &self.should_be_ignored())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
