//! Reference runner.
//!
//! Runs a [`Plan`] and collects results. Examples linked by a shared
//! before-all or after-all hook form one segment and always run in rank
//! order on one thread; separate segments may run concurrently, each in its
//! own variable [`Lane`]. Timeouts and panics are turned into failures by
//! the examples themselves.

mod result;

use std::time::Instant;

use ordo_ir::Lane;
use ordo_plan::{Example, Plan};
use rayon::prelude::*;

pub use result::{ExampleOutcome, ExampleResult, RunSummary};

/// Configuration for the runner.
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// Run only examples whose full description contains this substring.
    pub filter: Option<String>,
    /// Run independent segments in parallel.
    pub parallel: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            filter: None,
            parallel: true,
        }
    }
}

/// Executes plans.
#[derive(Clone, Debug, Default)]
pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    pub fn new() -> Self {
        Runner::default()
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        Runner { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run every example of `plan`; results come back in rank order.
    pub fn run(&self, plan: Plan) -> RunSummary {
        let plan = match &self.config.filter {
            Some(filter) => {
                plan.filter(|example| example.full_description().contains(filter.as_str()))
            }
            None => plan,
        };

        let start = Instant::now();
        let results = if self.config.parallel {
            run_parallel(&plan)
        } else {
            run_sequential(&plan)
        };

        let mut summary = RunSummary::new();
        for result in results {
            summary.add_result(result);
        }
        summary.duration = start.elapsed();
        tracing::debug!(
            passed = summary.passed,
            failed = summary.failed,
            ignored = summary.ignored,
            "plan finished"
        );
        summary
    }
}

fn run_sequential(plan: &Plan) -> Vec<ExampleResult> {
    plan.iter().map(run_example).collect()
}

/// Run segments on a scoped rayon pool, cleaned up before returning.
fn run_parallel(plan: &Plan) -> Vec<ExampleResult> {
    let segments = plan.segments();
    let examples = plan.examples();

    rayon::ThreadPoolBuilder::new()
        .build_scoped(rayon::ThreadBuilder::run, |pool| {
            pool.install(|| {
                segments
                    .par_iter()
                    .map(|range| {
                        let lane = Lane::new();
                        let _entered = lane.enter();
                        examples[range.clone()]
                            .iter()
                            .map(run_example)
                            .collect::<Vec<_>>()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .map(|segments| segments.into_iter().flatten().collect())
        .unwrap_or_else(|e| {
            tracing::warn!("failed to create thread pool ({e}), running sequentially");
            run_sequential(plan)
        })
}

fn run_example(example: &Example) -> ExampleResult {
    let mut path = example.container_descriptions().to_vec();
    path.push(example.description().to_owned());

    if example.should_be_ignored() {
        return ExampleResult::ignored(path);
    }

    let start = Instant::now();
    let outcome = example.try_to_execute();
    let duration = start.elapsed();

    let message = match (outcome, example.expected()) {
        (Ok(()), None) => None,
        (Ok(()), Some(expected)) => Some(format!(
            "expected failure of type {}",
            expected.type_name()
        )),
        (Err(failure), Some(expected)) if expected.matches(&failure) => None,
        (Err(failure), _) => Some(failure.to_string()),
    };

    match message {
        None => ExampleResult::passed(path, duration),
        Some(message) => {
            tracing::debug!(example = %example.full_description(), %message, "example failed");
            ExampleResult::failed(path, message, duration)
        }
    }
}
