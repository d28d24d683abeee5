//! Example result types.

use std::time::Duration;

/// Outcome of a single example.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExampleOutcome {
    /// Body and hooks succeeded, or it failed as expected.
    Passed,
    /// Failed with a message.
    Failed(String),
    /// Skipped by inclusion policy, filter or a failed shared before-all hook.
    Ignored,
}

impl ExampleOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, ExampleOutcome::Passed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ExampleOutcome::Failed(_))
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, ExampleOutcome::Ignored)
    }
}

/// Result of running a single example.
#[derive(Clone, Debug)]
pub struct ExampleResult {
    /// Container descriptions, root first, then the example's own.
    pub path: Vec<String>,
    pub outcome: ExampleOutcome,
    /// Time taken to run the example and its hooks.
    pub duration: Duration,
}

impl ExampleResult {
    pub fn passed(path: Vec<String>, duration: Duration) -> Self {
        ExampleResult {
            path,
            outcome: ExampleOutcome::Passed,
            duration,
        }
    }

    #[cold]
    pub fn failed(path: Vec<String>, message: String, duration: Duration) -> Self {
        ExampleResult {
            path,
            outcome: ExampleOutcome::Failed(message),
            duration,
        }
    }

    #[cold]
    pub fn ignored(path: Vec<String>) -> Self {
        ExampleResult {
            path,
            outcome: ExampleOutcome::Ignored,
            duration: Duration::ZERO,
        }
    }

    /// Path joined with spaces.
    pub fn name(&self) -> String {
        self.path.join(" ")
    }
}

/// Summary of one plan run, results in rank order.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    pub results: Vec<ExampleResult>,
    pub passed: usize,
    pub failed: usize,
    pub ignored: usize,
    /// Wall-clock time for the whole run.
    pub duration: Duration,
}

impl RunSummary {
    pub fn new() -> Self {
        RunSummary::default()
    }

    pub fn add_result(&mut self, result: ExampleResult) {
        match &result.outcome {
            ExampleOutcome::Passed => self.passed += 1,
            ExampleOutcome::Failed(_) => self.failed += 1,
            ExampleOutcome::Ignored => self.ignored += 1,
        }
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.ignored
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Results that failed, in run order.
    pub fn failures(&self) -> impl Iterator<Item = &ExampleResult> + '_ {
        self.results.iter().filter(|result| result.outcome.is_failed())
    }
}
