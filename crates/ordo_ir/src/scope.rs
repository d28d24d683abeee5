//! The "current scope" of an authoring pass.

use crate::SpecError;

/// Push/pop stack of open scopes.
///
/// `current` fails with [`SpecError::IllegalContext`] when nothing is open,
/// naming the authoring operation that was attempted.
#[derive(Debug)]
pub struct ScopeStack<T> {
    scopes: Vec<T>,
}

impl<T> ScopeStack<T> {
    pub fn new() -> Self {
        ScopeStack { scopes: Vec::new() }
    }

    pub fn switch_to(&mut self, scope: T) {
        self.scopes.push(scope);
    }

    pub fn restore(&mut self) -> Option<T> {
        self.scopes.pop()
    }

    pub fn current(&self, operation: &'static str) -> Result<&T, SpecError> {
        self.scopes
            .last()
            .ok_or(SpecError::IllegalContext { operation })
    }

    pub fn current_mut(&mut self, operation: &'static str) -> Result<&mut T, SpecError> {
        self.scopes
            .last_mut()
            .ok_or(SpecError::IllegalContext { operation })
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Drop every open scope.
    pub fn clear(&mut self) {
        self.scopes.clear();
    }

    /// Open scopes, outermost first.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.scopes.iter()
    }
}

impl<T> Default for ScopeStack<T> {
    fn default() -> Self {
        ScopeStack::new()
    }
}
