//! Ordo Plan - from a definition tree to a runnable, ordered plan.
//!
//! Three passes run over a finished [`GroupDef`]:
//!
//! 1. [`validate`] rejects duplicate sibling names and repeated variable
//!    initializers.
//! 2. [`select_strategy`] decides between black-list and white-list
//!    inclusion by looking for focus markers anywhere in the tree.
//! 3. [`assemble`] flattens the tree into [`Example`]s, ranks them and
//!    sorts them into a [`Plan`].
//!
//! [`build_plan`] chains the three.

mod assemble;
mod example;
mod plan;
mod rank_gen;
mod seed;
mod strategy;
mod validate;

pub use assemble::{assemble, ExampleAssembler};
pub use example::{Example, ExampleState, Hook, MultipleFailures, TimedOut};
pub use plan::Plan;
pub use rank_gen::RankGenerator;
pub use seed::{process_seed, DefaultSeed, FixedSeed, SeedSource, SharedSeed};
pub use strategy::{select_strategy, ExecutionStrategy, ScopeInclusion, StrategySelector};
pub use validate::{validate, DuplicateValidator};

use ordo_ir::{GroupDef, SpecError};

/// Validate `root`, choose its inclusion strategy and assemble its plan.
///
/// Nothing is assembled when validation fails.
pub fn build_plan(root: &GroupDef, seeds: &dyn SeedSource) -> Result<Plan, SpecError> {
    validate(root)?;
    let strategy = select_strategy(root)?;
    tracing::debug!(spec = root.description(), ?strategy, "inclusion strategy selected");
    assemble(root, strategy, seeds)
}
