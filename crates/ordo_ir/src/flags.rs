//! Per-node authoring markers.

/// Inclusion marker on a group or example.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Inclusion {
    /// No marker.
    #[default]
    Default,
    /// Focused (`fdescribe`, `fit`).
    Included,
    /// Skipped (`xdescribe`, `xit`).
    Excluded,
}

impl Inclusion {
    /// Whether this marker would be rejected in CI mode.
    pub fn is_marked(self) -> bool {
        self != Inclusion::Default
    }
}

/// Ordering policy for the direct children of a group.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum OrderPolicy {
    /// Continue the enclosing group's strategy.
    #[default]
    Inherit,
    /// Declaration order.
    Defined,
    /// Seeded pseudo-random order. Without an explicit seed the process-wide
    /// default seed is used.
    Random { seed: Option<u64> },
}

impl OrderPolicy {
    /// Random order with a hard-coded seed.
    pub fn seeded(seed: u64) -> Self {
        OrderPolicy::Random { seed: Some(seed) }
    }

    /// Random order driven by the default seed.
    pub fn random() -> Self {
        OrderPolicy::Random { seed: None }
    }

    pub fn has_hard_coded_seed(self) -> bool {
        matches!(self, OrderPolicy::Random { seed: Some(_) })
    }
}
