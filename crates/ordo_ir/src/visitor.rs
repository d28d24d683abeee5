//! Visitor protocol over the block definition tree.
//!
//! Each analysis pass (duplicate validation, strategy selection, example
//! assembly) is a [`Visitor`] that overrides only the callbacks it needs.
//! The tree itself knows nothing about the passes.
//!
//! # Traversal order
//!
//! [`walk_group`] mirrors authored order exactly:
//!
//! ```text
//! enter_group(G)
//!   visit_var_initializer(..)   declaration order
//!   visit_hook(..)              declaration order
//!   children                    declaration order, groups recursed in place
//! exit_group(G)
//! ```
//!
//! `enter_group`/`exit_group` always come in pairs unless a callback fails, so
//! visitors can push and pop per-scope state symmetrically. The first error
//! returned by any callback stops the walk.

use ordo_stack::ensure_sufficient_stack;

use crate::{ExampleDef, GroupDef, HookDef, Node, SpecError, VarInitDef};

/// Callbacks for one pass over the tree. All default to no-ops.
pub trait Visitor<'def> {
    fn enter_group(&mut self, group: &'def GroupDef) -> Result<(), SpecError> {
        let _ = group;
        Ok(())
    }

    fn exit_group(&mut self, group: &'def GroupDef) -> Result<(), SpecError> {
        let _ = group;
        Ok(())
    }

    fn visit_var_initializer(&mut self, init: &'def VarInitDef) -> Result<(), SpecError> {
        let _ = init;
        Ok(())
    }

    fn visit_hook(&mut self, hook: &'def HookDef) -> Result<(), SpecError> {
        let _ = hook;
        Ok(())
    }

    fn visit_example(&mut self, example: &'def ExampleDef) -> Result<(), SpecError> {
        let _ = example;
        Ok(())
    }
}

/// Walk `group` and everything under it.
pub fn walk_group<'def, V: Visitor<'def> + ?Sized>(
    visitor: &mut V,
    group: &'def GroupDef,
) -> Result<(), SpecError> {
    ensure_sufficient_stack(|| {
        visitor.enter_group(group)?;
        for init in &group.var_initializers {
            visitor.visit_var_initializer(init)?;
        }
        for hook in &group.hooks {
            visitor.visit_hook(hook)?;
        }
        for child in &group.children {
            match child {
                Node::Group(inner) => walk_group(visitor, inner)?,
                Node::Example(example) => visitor.visit_example(example)?,
            }
        }
        visitor.exit_group(group)
    })
}

impl GroupDef {
    /// Run `visitor` over this group. Shorthand for [`walk_group`].
    pub fn accept<'def, V: Visitor<'def> + ?Sized>(
        &'def self,
        visitor: &mut V,
    ) -> Result<(), SpecError> {
        walk_group(visitor, self)
    }
}
