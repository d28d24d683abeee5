//! Sibling-scoped uniqueness checks.

use ordo_ir::{ExampleDef, GroupDef, SpecError, VarId, VarInitDef, Visitor};
use rustc_hash::FxHashSet;

/// Names and variables already claimed inside one open group.
#[derive(Default)]
struct ScopeNames<'def> {
    groups: FxHashSet<&'def str>,
    examples: FxHashSet<&'def str>,
    vars: FxHashSet<VarId>,
}

/// Rejects sibling groups or examples sharing a description, and repeated
/// initializers for one variable within a scope.
///
/// Groups and examples have separate namespaces; uniqueness is never global.
#[derive(Default)]
pub struct DuplicateValidator<'def> {
    scopes: Vec<ScopeNames<'def>>,
}

impl<'def> DuplicateValidator<'def> {
    pub fn new() -> Self {
        DuplicateValidator::default()
    }

    fn current(&mut self, operation: &'static str) -> Result<&mut ScopeNames<'def>, SpecError> {
        self.scopes
            .last_mut()
            .ok_or(SpecError::IllegalContext { operation })
    }
}

impl<'def> Visitor<'def> for DuplicateValidator<'def> {
    fn enter_group(&mut self, group: &'def GroupDef) -> Result<(), SpecError> {
        if let Some(parent) = self.scopes.last_mut() {
            if !parent.groups.insert(group.description()) {
                return Err(SpecError::BlockAlreadyDefined(
                    group.description().to_owned(),
                ));
            }
        }
        self.scopes.push(ScopeNames::default());
        Ok(())
    }

    fn exit_group(&mut self, _group: &'def GroupDef) -> Result<(), SpecError> {
        self.scopes.pop();
        Ok(())
    }

    fn visit_var_initializer(&mut self, init: &'def VarInitDef) -> Result<(), SpecError> {
        if !self.current("let_var")?.vars.insert(init.var) {
            return Err(SpecError::VarInitializerAlreadyDefined);
        }
        Ok(())
    }

    fn visit_example(&mut self, example: &'def ExampleDef) -> Result<(), SpecError> {
        let description = example.config.description.as_str();
        if !self.current("it")?.examples.insert(description) {
            return Err(SpecError::BlockAlreadyDefined(description.to_owned()));
        }
        Ok(())
    }
}

/// Validate the whole tree under `root` in one pass.
pub fn validate(root: &GroupDef) -> Result<(), SpecError> {
    root.accept(&mut DuplicateValidator::new())
}
