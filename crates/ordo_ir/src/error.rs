//! Structural and configuration errors.
//!
//! These abort a whole spec read. Failures raised by hooks and example bodies
//! are not `SpecError`s; they are [`Failure`]s scoped to one example.

use std::num::ParseIntError;

use crate::Failure;

/// Error raised while authoring, validating or assembling a spec.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// A group or example reuses a description already taken by a sibling.
    #[error("'{0}' block already defined")]
    BlockAlreadyDefined(String),

    /// A scope declares two initializers for the same variable.
    #[error("variable initializer already defined")]
    VarInitializerAlreadyDefined,

    /// An authoring call was made while no scope is open.
    #[error("'{operation}' should not be invoked from outside a spec definition")]
    IllegalContext { operation: &'static str },

    /// A focus or skip marker was used while CI mode is enabled.
    #[error("'{operation}' not allowed when CI mode is enabled")]
    NotAllowedInCiMode { operation: &'static str },

    /// A random-order seed was hard-coded while CI mode is enabled.
    #[error("hard-coded seed not allowed when CI mode is enabled")]
    HardCodedSeedInCiMode,

    /// The default seed override could not be parsed.
    #[error("illegal seed value '{value}'")]
    IllegalSeed {
        value: String,
        #[source]
        source: ParseIntError,
    },

    /// The root group asked to inherit an ordering policy it has no parent for.
    #[error("root group must declare an ordering policy")]
    InheritedOrderAtRoot,

    /// The authoring pass finished with groups still open.
    #[error("spec definition finished with {open} group(s) still open")]
    UnbalancedGroups { open: usize },

    /// The spec body failed with a non-structural error.
    #[error("failed to initialize spec '{spec}'")]
    InitializationFailed {
        spec: String,
        #[source]
        source: Failure,
    },
}

impl SpecError {
    /// Classify an error returned by a spec body.
    ///
    /// A `SpecError` comes back unchanged; anything else is wrapped in
    /// [`SpecError::InitializationFailed`].
    pub fn from_definition(spec: &str, failure: Failure) -> Self {
        match failure.downcast::<SpecError>() {
            Ok(error) => *error,
            Err(source) => SpecError::InitializationFailed {
                spec: spec.to_owned(),
                source,
            },
        }
    }
}
