//! The authoring pass.
//!
//! A [`SpecBuilder`] captures a spec definition into a [`GroupDef`] tree.
//! Groups nest through closures, so the "current scope" is simply the top of
//! the builder's [`ScopeStack`]; there is no ambient global state. Once the
//! root scope is closed, every further authoring call fails with
//! [`SpecError::IllegalContext`].
//!
//! ```text
//! let mut spec = SpecBuilder::new(GroupConfig::new("stack").defined_order(), rules)?;
//! spec.before_each(|| { .. })?;
//! spec.it("starts empty", || { .. })?;
//! spec.describe("when pushed", |spec| {
//!     spec.it("is not empty", || { .. })
//! })?;
//! let root = spec.finish()?;
//! ```

use crate::var::memoized_initializer;
use crate::{
    Block, BlockResult, ExampleConfig, ExampleDef, Failure, GroupConfig, GroupDef, HookDef,
    HookId, HookKind, Inclusion, Node, ScopeStack, SpecError, Var, VarInitDef,
};

/// Restrictions applied while authoring.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthoringRules {
    /// Reject focus/skip markers and hard-coded seeds.
    pub ci_mode: bool,
}

/// Names reported for an authoring call and its focus/skip variants.
#[derive(Copy, Clone)]
struct Operation {
    plain: &'static str,
    focused: &'static str,
    ignored: &'static str,
}

const DESCRIBE: Operation = Operation {
    plain: "describe",
    focused: "fdescribe",
    ignored: "xdescribe",
};

const CONTEXT: Operation = Operation {
    plain: "context",
    focused: "fcontext",
    ignored: "xcontext",
};

const IT: Operation = Operation {
    plain: "it",
    focused: "fit",
    ignored: "xit",
};

/// Builds a block definition tree from imperative authoring calls.
#[derive(Debug)]
pub struct SpecBuilder {
    rules: AuthoringRules,
    scopes: ScopeStack<GroupDef>,
    finished: Option<GroupDef>,
    next_hook: u32,
}

impl SpecBuilder {
    /// Start a pass with `root` as the current scope.
    pub fn new(root: GroupConfig, rules: AuthoringRules) -> Result<Self, SpecError> {
        let mut builder = SpecBuilder {
            rules,
            scopes: ScopeStack::new(),
            finished: None,
            next_hook: 0,
        };
        builder.check_group(&root, DESCRIBE)?;
        tracing::trace!(description = %root.description, "spec definition started");
        builder.scopes.switch_to(GroupDef::new(root));
        Ok(builder)
    }

    /// Number of currently open groups, root included.
    pub fn depth(&self) -> usize {
        self.scopes.depth()
    }

    /// Open a group under the current scope and make it current.
    pub fn open_group(&mut self, config: GroupConfig) -> Result<(), SpecError> {
        self.scopes.current(DESCRIBE.plain)?;
        self.check_group(&config, DESCRIBE)?;
        self.scopes.switch_to(GroupDef::new(config));
        Ok(())
    }

    /// Close the current group and attach it to its parent.
    ///
    /// Closing the root ends the pass; it is handed out by [`finish`](Self::finish).
    pub fn close_group(&mut self) -> Result<(), SpecError> {
        let group = self
            .scopes
            .restore()
            .ok_or(SpecError::IllegalContext {
                operation: "close_group",
            })?;
        match self.scopes.current_mut("close_group") {
            Ok(parent) => parent.children.push(Node::Group(group)),
            Err(_) => self.finished = Some(group),
        }
        Ok(())
    }

    pub fn describe<F>(
        &mut self,
        description: impl Into<String>,
        body: F,
    ) -> Result<(), SpecError>
    where
        F: FnOnce(&mut Self) -> Result<(), SpecError>,
    {
        self.nest(GroupConfig::new(description), DESCRIBE, body)
    }

    pub fn fdescribe<F>(
        &mut self,
        description: impl Into<String>,
        body: F,
    ) -> Result<(), SpecError>
    where
        F: FnOnce(&mut Self) -> Result<(), SpecError>,
    {
        self.nest(GroupConfig::new(description).focused(), DESCRIBE, body)
    }

    pub fn xdescribe<F>(
        &mut self,
        description: impl Into<String>,
        body: F,
    ) -> Result<(), SpecError>
    where
        F: FnOnce(&mut Self) -> Result<(), SpecError>,
    {
        self.nest(GroupConfig::new(description).ignored(), DESCRIBE, body)
    }

    pub fn context<F>(
        &mut self,
        description: impl Into<String>,
        body: F,
    ) -> Result<(), SpecError>
    where
        F: FnOnce(&mut Self) -> Result<(), SpecError>,
    {
        self.nest(GroupConfig::new(description), CONTEXT, body)
    }

    pub fn fcontext<F>(
        &mut self,
        description: impl Into<String>,
        body: F,
    ) -> Result<(), SpecError>
    where
        F: FnOnce(&mut Self) -> Result<(), SpecError>,
    {
        self.nest(GroupConfig::new(description).focused(), CONTEXT, body)
    }

    pub fn xcontext<F>(
        &mut self,
        description: impl Into<String>,
        body: F,
    ) -> Result<(), SpecError>
    where
        F: FnOnce(&mut Self) -> Result<(), SpecError>,
    {
        self.nest(GroupConfig::new(description).ignored(), CONTEXT, body)
    }

    /// Open a fully configured group, run `body` inside it, then close it.
    pub fn group<F>(&mut self, config: GroupConfig, body: F) -> Result<(), SpecError>
    where
        F: FnOnce(&mut Self) -> Result<(), SpecError>,
    {
        self.nest(config, DESCRIBE, body)
    }

    pub fn before_all(
        &mut self,
        body: impl Fn() -> BlockResult + Send + Sync + 'static,
    ) -> Result<(), SpecError> {
        self.hook(HookKind::BeforeAll, "before_all", Block::new(body))
    }

    pub fn before_each(
        &mut self,
        body: impl Fn() -> BlockResult + Send + Sync + 'static,
    ) -> Result<(), SpecError> {
        self.hook(HookKind::BeforeEach, "before_each", Block::new(body))
    }

    pub fn after_each(
        &mut self,
        body: impl Fn() -> BlockResult + Send + Sync + 'static,
    ) -> Result<(), SpecError> {
        self.hook(HookKind::AfterEach, "after_each", Block::new(body))
    }

    pub fn after_all(
        &mut self,
        body: impl Fn() -> BlockResult + Send + Sync + 'static,
    ) -> Result<(), SpecError> {
        self.hook(HookKind::AfterAll, "after_all", Block::new(body))
    }

    pub fn it(
        &mut self,
        description: impl Into<String>,
        body: impl Fn() -> BlockResult + Send + Sync + 'static,
    ) -> Result<(), SpecError> {
        self.example(ExampleConfig::new(description), body)
    }

    pub fn fit(
        &mut self,
        description: impl Into<String>,
        body: impl Fn() -> BlockResult + Send + Sync + 'static,
    ) -> Result<(), SpecError> {
        self.example(ExampleConfig::new(description).focused(), body)
    }

    pub fn xit(
        &mut self,
        description: impl Into<String>,
        body: impl Fn() -> BlockResult + Send + Sync + 'static,
    ) -> Result<(), SpecError> {
        self.example(ExampleConfig::new(description).ignored(), body)
    }

    /// Register an example with explicit configuration.
    pub fn example(
        &mut self,
        config: ExampleConfig,
        body: impl Fn() -> BlockResult + Send + Sync + 'static,
    ) -> Result<(), SpecError> {
        self.scopes.current(IT.plain)?;
        self.check_inclusion(config.inclusion, IT)?;
        let scope = self.scopes.current_mut(IT.plain)?;
        scope.children.push(Node::Example(ExampleDef {
            config,
            block: Block::new(body),
        }));
        Ok(())
    }

    /// Bind `var` for every example under the current scope.
    pub fn let_var<T, F>(&mut self, var: &Var<T>, init: F) -> Result<(), SpecError>
    where
        T: Clone + Send + 'static,
        F: Fn() -> Result<T, Failure> + Send + Sync + 'static,
    {
        let scope = self.scopes.current_mut("let_var")?;
        scope.var_initializers.push(VarInitDef {
            var: var.id(),
            init: memoized_initializer(var, init),
        });
        Ok(())
    }

    /// End the pass and hand out the root group.
    pub fn finish(mut self) -> Result<GroupDef, SpecError> {
        if let Some(root) = self.finished.take() {
            return Ok(root);
        }
        match self.scopes.depth() {
            0 => Err(SpecError::IllegalContext { operation: "finish" }),
            1 => self.scopes.restore().ok_or(SpecError::IllegalContext {
                operation: "finish",
            }),
            open => Err(SpecError::UnbalancedGroups { open: open - 1 }),
        }
    }

    fn nest<F>(
        &mut self,
        config: GroupConfig,
        operation: Operation,
        body: F,
    ) -> Result<(), SpecError>
    where
        F: FnOnce(&mut Self) -> Result<(), SpecError>,
    {
        self.scopes.current(operation.plain)?;
        self.check_group(&config, operation)?;
        self.scopes.switch_to(GroupDef::new(config));
        let outcome = body(self);
        self.close_group()?;
        outcome
    }

    fn hook(
        &mut self,
        kind: HookKind,
        operation: &'static str,
        block: Block,
    ) -> Result<(), SpecError> {
        let id = HookId::new(self.next_hook);
        let scope = self.scopes.current_mut(operation)?;
        scope.hooks.push(HookDef { id, kind, block });
        self.next_hook += 1;
        Ok(())
    }

    fn check_group(&self, config: &GroupConfig, operation: Operation) -> Result<(), SpecError> {
        self.check_inclusion(config.inclusion, operation)?;
        if self.rules.ci_mode && config.order.has_hard_coded_seed() {
            return Err(SpecError::HardCodedSeedInCiMode);
        }
        Ok(())
    }

    fn check_inclusion(&self, inclusion: Inclusion, operation: Operation) -> Result<(), SpecError> {
        if !self.rules.ci_mode || !inclusion.is_marked() {
            return Ok(());
        }
        let operation = match inclusion {
            Inclusion::Included => operation.focused,
            Inclusion::Excluded | Inclusion::Default => operation.ignored,
        };
        Err(SpecError::NotAllowedInCiMode { operation })
    }
}
