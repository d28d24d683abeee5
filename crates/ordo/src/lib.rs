//! Ordo - spec assembly and execution ordering.
//!
//! A spec is authored against a [`SpecBuilder`], validated, resolved against
//! its focus/skip markers, ranked and flattened into a [`Plan`] of
//! [`Example`]s. A runner then executes the plan in rank order; examples that
//! share no once-per-run hook may run concurrently.
//!
//! ```text
//! let plan = ordo::read(GroupConfig::new("stack").defined_order(), |spec| {
//!     spec.it("starts empty", || Ok(()))?;
//!     Ok(())
//! })?;
//! let summary = Runner::new().run(plan);
//! ```
//!
//! # Environment
//!
//! - `ORDO_CI_MODE`: `true` or `1` rejects focus/skip markers and hard-coded seeds.
//! - `ORDO_SEED`: default seed for unseeded random-order groups.
//! - `RUST_LOG`: enables tracing output after [`init_tracing`].

mod read;
mod runner;
mod settings;

use std::sync::Once;

pub use ordo_ir::{
    AuthoringRules, Block, BlockResult, ExampleConfig, ExpectedFailure, Failure, GroupConfig,
    HookKind, Inclusion, Lane, OrderPolicy, Panicked, Rank, SpecBuilder, SpecError, Var,
};
pub use ordo_plan::{
    process_seed, DefaultSeed, Example, ExampleState, ExecutionStrategy, FixedSeed,
    MultipleFailures, Plan, SeedSource, SharedSeed, TimedOut,
};
pub use read::{read, read_with};
pub use runner::{ExampleOutcome, ExampleResult, RunSummary, Runner, RunnerConfig};
pub use settings::{Settings, CI_MODE_VAR, SEED_VAR};

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber, once per process, when `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
