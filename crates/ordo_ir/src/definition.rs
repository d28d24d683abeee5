//! The block definition tree captured by one authoring pass.
//!
//! A [`GroupDef`] owns its variable initializers, hooks and children in the
//! order they were declared. The tree is immutable once
//! [`SpecBuilder::finish`](crate::SpecBuilder::finish) returns it; every
//! analysis pass reads it through the [`Visitor`](crate::Visitor) protocol.

use std::time::Duration;

use crate::{Block, ExpectedFailure, Inclusion, OrderPolicy, VarId};

/// Configuration of a group (`describe` / `context`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupConfig {
    pub description: String,
    pub inclusion: Inclusion,
    pub order: OrderPolicy,
}

impl GroupConfig {
    /// A group that inherits its parent's ordering policy.
    pub fn new(description: impl Into<String>) -> Self {
        GroupConfig {
            description: description.into(),
            inclusion: Inclusion::Default,
            order: OrderPolicy::Inherit,
        }
    }

    #[must_use]
    pub fn inclusion(mut self, inclusion: Inclusion) -> Self {
        self.inclusion = inclusion;
        self
    }

    #[must_use]
    pub fn focused(self) -> Self {
        self.inclusion(Inclusion::Included)
    }

    #[must_use]
    pub fn ignored(self) -> Self {
        self.inclusion(Inclusion::Excluded)
    }

    #[must_use]
    pub fn order(mut self, order: OrderPolicy) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn defined_order(self) -> Self {
        self.order(OrderPolicy::Defined)
    }

    #[must_use]
    pub fn random_order(self) -> Self {
        self.order(OrderPolicy::random())
    }

    #[must_use]
    pub fn seed(self, seed: u64) -> Self {
        self.order(OrderPolicy::seeded(seed))
    }
}

/// Configuration of an example (`it`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExampleConfig {
    pub description: String,
    pub inclusion: Inclusion,
    pub expected: Option<ExpectedFailure>,
    pub timeout: Option<Duration>,
}

impl ExampleConfig {
    pub fn new(description: impl Into<String>) -> Self {
        ExampleConfig {
            description: description.into(),
            inclusion: Inclusion::Default,
            expected: None,
            timeout: None,
        }
    }

    #[must_use]
    pub fn inclusion(mut self, inclusion: Inclusion) -> Self {
        self.inclusion = inclusion;
        self
    }

    #[must_use]
    pub fn focused(self) -> Self {
        self.inclusion(Inclusion::Included)
    }

    #[must_use]
    pub fn ignored(self) -> Self {
        self.inclusion(Inclusion::Excluded)
    }

    /// Expect the body to fail with an error of type `E`.
    #[must_use]
    pub fn expected<E: std::error::Error + 'static>(mut self) -> Self {
        self.expected = Some(ExpectedFailure::of::<E>());
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Cardinality and placement of a hook.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HookKind {
    BeforeAll,
    BeforeEach,
    AfterEach,
    AfterAll,
}


/// Identity of one registered hook, unique within a spec.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HookId(u32);

impl HookId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        HookId(index)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

#[derive(Clone, Debug)]
pub struct HookDef {
    pub id: HookId,
    pub kind: HookKind,
    pub block: Block,
}

/// Binds a variable for every example under the declaring scope.
#[derive(Clone, Debug)]
pub struct VarInitDef {
    pub var: VarId,
    pub init: Block,
}

#[derive(Clone, Debug)]
pub struct ExampleDef {
    pub config: ExampleConfig,
    pub block: Block,
}

/// A child of a group.
#[derive(Clone, Debug)]
pub enum Node {
    Group(GroupDef),
    Example(ExampleDef),
}

impl Node {
    pub fn description(&self) -> &str {
        match self {
            Node::Group(group) => &group.config.description,
            Node::Example(example) => &example.config.description,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GroupDef {
    pub config: GroupConfig,
    pub var_initializers: Vec<VarInitDef>,
    pub hooks: Vec<HookDef>,
    pub children: Vec<Node>,
}

impl GroupDef {
    pub fn new(config: GroupConfig) -> Self {
        GroupDef {
            config,
            var_initializers: Vec::new(),
            hooks: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn description(&self) -> &str {
        &self.config.description
    }

    /// Hooks of one kind, in declaration order.
    pub fn hooks_of(&self, kind: HookKind) -> impl Iterator<Item = &HookDef> + '_ {
        self.hooks.iter().filter(move |hook| hook.kind == kind)
    }

    /// Direct sub-groups, in declaration order.
    pub fn groups(&self) -> impl Iterator<Item = &GroupDef> + '_ {
        self.children.iter().filter_map(|child| match child {
            Node::Group(group) => Some(group),
            Node::Example(_) => None,
        })
    }

    /// Direct examples, in declaration order.
    pub fn examples(&self) -> impl Iterator<Item = &ExampleDef> + '_ {
        self.children.iter().filter_map(|child| match child {
            Node::Example(example) => Some(example),
            Node::Group(_) => None,
        })
    }
}
