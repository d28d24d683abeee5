//! Ordo IR - the captured shape of a spec.
//!
//! This crate holds everything produced by a single authoring pass:
//! - [`GroupDef`] trees of hooks, variable initializers, sub-groups and examples
//! - [`Block`] bodies and [`ExpectedFailure`] markers
//! - [`Var`] slots bound by scope-local initializers
//! - [`Rank`] position keys
//! - the [`Visitor`] protocol the analysis passes are written against
//! - [`SpecBuilder`], which records authoring calls against a [`ScopeStack`]
//!
//! Nothing here decides order or inclusion; that is `ordo_plan`'s job.

mod block;
mod builder;
mod definition;
mod error;
mod flags;
mod rank;
mod scope;
mod var;
pub mod visitor;

pub use block::{Block, BlockResult, ExpectedFailure, Failure, Panicked};
pub use builder::{AuthoringRules, SpecBuilder};
pub use definition::{
    ExampleConfig, ExampleDef, GroupConfig, GroupDef, HookDef, HookId, HookKind, Node, VarInitDef,
};
pub use error::SpecError;
pub use flags::{Inclusion, OrderPolicy};
pub use rank::Rank;
pub use scope::ScopeStack;
pub use var::{Lane, LaneGuard, Var, VarId};
pub use visitor::{walk_group, Visitor};
