//! Whole-spec inclusion policy.
//!
//! A single pre-pass looks for any focused node. If there is one, the spec
//! runs white-listed: only focused nodes and their descendants execute.
//! Otherwise it runs black-listed: everything executes except skipped nodes
//! and their descendants. Where the focus marker sits does not matter, only
//! that it exists.

use ordo_ir::{ExampleDef, GroupDef, Inclusion, SpecError, Visitor};

/// Which nodes an assembled spec skips.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Skip a node iff it or an ancestor is excluded.
    #[default]
    BlackList,
    /// Skip a node iff neither it nor an ancestor is included.
    WhiteList,
}

impl ExecutionStrategy {
    pub fn should_be_ignored(self, inclusion: ScopeInclusion) -> bool {
        match self {
            ExecutionStrategy::BlackList => inclusion.excluded,
            ExecutionStrategy::WhiteList => !inclusion.included,
        }
    }
}

/// Markers seen on a node and all of its ancestors.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ScopeInclusion {
    pub included: bool,
    pub excluded: bool,
}

impl ScopeInclusion {
    /// Resolution for a child carrying `inclusion` under this scope.
    #[must_use]
    pub fn nest(self, inclusion: Inclusion) -> Self {
        ScopeInclusion {
            included: self.included || inclusion == Inclusion::Included,
            excluded: self.excluded || inclusion == Inclusion::Excluded,
        }
    }
}

/// Pre-pass visitor choosing the [`ExecutionStrategy`].
#[derive(Default)]
pub struct StrategySelector {
    strategy: ExecutionStrategy,
}

impl StrategySelector {
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    fn observe(&mut self, inclusion: Inclusion) {
        if inclusion == Inclusion::Included {
            self.strategy = ExecutionStrategy::WhiteList;
        }
    }
}

impl<'def> Visitor<'def> for StrategySelector {
    fn enter_group(&mut self, group: &'def GroupDef) -> Result<(), SpecError> {
        self.observe(group.config.inclusion);
        Ok(())
    }

    fn visit_example(&mut self, example: &'def ExampleDef) -> Result<(), SpecError> {
        self.observe(example.config.inclusion);
        Ok(())
    }
}

pub fn select_strategy(root: &GroupDef) -> Result<ExecutionStrategy, SpecError> {
    let mut selector = StrategySelector::default();
    root.accept(&mut selector)?;
    Ok(selector.strategy())
}
