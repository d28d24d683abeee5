//! Flattening the definition tree into ranked examples.

use ordo_ir::{ExampleDef, GroupDef, HookDef, HookKind, SpecError, VarInitDef, Visitor};
use rustc_hash::FxHashSet;

use crate::example::{Hook, OnceHook};
use crate::{Example, ExecutionStrategy, Plan, RankGenerator, ScopeInclusion, SeedSource};

/// State of one open group.
struct Frame<'def> {
    description: &'def str,
    inclusion: ScopeInclusion,
    var_initializers: Vec<&'def VarInitDef>,
    before_all: Vec<Hook>,
    before_each: Vec<Hook>,
    after_each: Vec<Hook>,
    after_all: Vec<Hook>,
}

impl<'def> Frame<'def> {
    fn new(description: &'def str, inclusion: ScopeInclusion) -> Self {
        Frame {
            description,
            inclusion,
            var_initializers: Vec::new(),
            before_all: Vec::new(),
            before_each: Vec::new(),
            after_each: Vec::new(),
            after_all: Vec::new(),
        }
    }
}

/// Visitor producing one [`Example`] per example definition.
///
/// Setup chains are collected root to leaf and teardown chains leaf to root,
/// so teardown unwinds inside-out.
pub struct ExampleAssembler<'def, 's> {
    strategy: ExecutionStrategy,
    ranks: RankGenerator<'s>,
    frames: Vec<Frame<'def>>,
    examples: Vec<Example>,
}

impl<'def, 's> ExampleAssembler<'def, 's> {
    pub fn new(strategy: ExecutionStrategy, seeds: &'s dyn SeedSource) -> Self {
        ExampleAssembler {
            strategy,
            ranks: RankGenerator::new(seeds),
            frames: Vec::new(),
            examples: Vec::new(),
        }
    }

    /// Sort the collected examples into a [`Plan`].
    pub fn finish(self) -> Plan {
        Plan::new(self.examples)
    }

    fn current(&mut self, operation: &'static str) -> Result<&mut Frame<'def>, SpecError> {
        self.frames
            .last_mut()
            .ok_or(SpecError::IllegalContext { operation })
    }

    /// Innermost initializer per variable, outermost scope first.
    fn resolve_var_initializers(&self) -> Vec<VarInitDef> {
        let mut seen = FxHashSet::default();
        let mut resolved: Vec<VarInitDef> = self
            .frames
            .iter()
            .rev()
            .flat_map(|frame| frame.var_initializers.iter().rev())
            .filter(|init| seen.insert(init.var))
            .map(|init| (*init).clone())
            .collect();
        resolved.reverse();
        resolved
    }

    /// Hooks of `kind` from every open frame, deduplicated by identity.
    /// Teardown kinds come leaf first.
    fn collect_hooks(&self, kind: HookKind) -> Vec<Hook> {
        let mut seen = FxHashSet::default();
        let mut collect = |frame: &Frame<'def>| -> Vec<Hook> {
            let hooks = match kind {
                HookKind::BeforeAll => &frame.before_all,
                HookKind::BeforeEach => &frame.before_each,
                HookKind::AfterEach => &frame.after_each,
                HookKind::AfterAll => &frame.after_all,
            };
            hooks
                .iter()
                .filter(|hook| seen.insert(hook.id))
                .cloned()
                .collect()
        };
        match kind {
            HookKind::BeforeAll | HookKind::BeforeEach => {
                self.frames.iter().flat_map(&mut collect).collect()
            }
            HookKind::AfterEach | HookKind::AfterAll => {
                self.frames.iter().rev().flat_map(&mut collect).collect()
            }
        }
    }
}

impl<'def> Visitor<'def> for ExampleAssembler<'def, '_> {
    fn enter_group(&mut self, group: &'def GroupDef) -> Result<(), SpecError> {
        let parent = self
            .frames
            .last()
            .map_or_else(ScopeInclusion::default, |frame| frame.inclusion);
        self.ranks.push_level(group.config.order)?;
        self.frames.push(Frame::new(
            group.description(),
            parent.nest(group.config.inclusion),
        ));
        Ok(())
    }

    fn exit_group(&mut self, _group: &'def GroupDef) -> Result<(), SpecError> {
        self.frames.pop();
        self.ranks.pop_level();
        Ok(())
    }

    fn visit_var_initializer(&mut self, init: &'def VarInitDef) -> Result<(), SpecError> {
        self.current("let_var")?.var_initializers.push(init);
        Ok(())
    }

    fn visit_hook(&mut self, hook: &'def HookDef) -> Result<(), SpecError> {
        let frame = self.current("hook")?;
        let entry = Hook {
            id: hook.id,
            block: hook.block.clone(),
        };
        match hook.kind {
            HookKind::BeforeAll => frame.before_all.push(entry),
            HookKind::BeforeEach => frame.before_each.push(entry),
            HookKind::AfterEach => frame.after_each.push(entry),
            HookKind::AfterAll => frame.after_all.push(entry),
        }
        Ok(())
    }

    fn visit_example(&mut self, definition: &'def ExampleDef) -> Result<(), SpecError> {
        let scope = self.current("it")?.inclusion;
        let rank = self.ranks.generate();
        let containers = self
            .frames
            .iter()
            .map(|frame| frame.description.to_owned())
            .collect();
        let description = definition.config.description.clone();

        let inclusion = scope.nest(definition.config.inclusion);
        if self.strategy.should_be_ignored(inclusion) {
            self.examples
                .push(Example::new(containers, description, rank, None));
            return Ok(());
        }

        let mut example = Example::new(
            containers,
            description,
            rank,
            Some(definition.block.clone()),
        );
        example.var_initializers = self.resolve_var_initializers();
        example.before_all = self
            .collect_hooks(HookKind::BeforeAll)
            .into_iter()
            .map(OnceHook::new)
            .collect();
        example.before_each = self.collect_hooks(HookKind::BeforeEach);
        example.after_each = self.collect_hooks(HookKind::AfterEach);
        example.after_all = self
            .collect_hooks(HookKind::AfterAll)
            .into_iter()
            .map(OnceHook::new)
            .collect();
        example.expected = definition.config.expected;
        example.timeout = definition.config.timeout;
        self.examples.push(example);
        Ok(())
    }
}

/// Assemble the examples under `root` with an already chosen strategy.
pub fn assemble(
    root: &GroupDef,
    strategy: ExecutionStrategy,
    seeds: &dyn SeedSource,
) -> Result<Plan, SpecError> {
    let mut assembler = ExampleAssembler::new(strategy, seeds);
    root.accept(&mut assembler)?;
    let plan = assembler.finish();
    tracing::debug!(
        spec = root.description(),
        examples = plan.len(),
        ?strategy,
        "examples assembled"
    );
    Ok(plan)
}
