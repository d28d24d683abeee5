//! Process-level configuration.

use ordo_ir::AuthoringRules;

/// Environment variable enabling CI mode.
pub const CI_MODE_VAR: &str = "ORDO_CI_MODE";

/// Environment variable overriding the default random-order seed.
pub const SEED_VAR: &str = "ORDO_SEED";

/// Settings applied to every spec read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    /// Reject focus/skip markers and hard-coded seeds.
    pub ci_mode: bool,
    /// Default seed for unseeded random-order groups, parsed on first use.
    pub seed_override: Option<String>,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Settings::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Settings {
            ci_mode: lookup(CI_MODE_VAR).is_some_and(|value| is_enabled(&value)),
            seed_override: lookup(SEED_VAR),
        }
    }

    #[must_use]
    pub fn with_ci_mode(mut self, ci_mode: bool) -> Self {
        self.ci_mode = ci_mode;
        self
    }

    #[must_use]
    pub fn with_seed_override(mut self, seed: impl Into<String>) -> Self {
        self.seed_override = Some(seed.into());
        self
    }

    pub fn authoring_rules(&self) -> AuthoringRules {
        AuthoringRules {
            ci_mode: self.ci_mode,
        }
    }
}

fn is_enabled(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}
