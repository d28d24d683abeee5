//! The read pipeline: authoring pass, then planning.

use ordo_ir::{Failure, GroupConfig, SpecBuilder, SpecError};
use ordo_plan::{build_plan, DefaultSeed, Plan, SeedSource};

use crate::Settings;

/// Read a spec using settings from the environment and the process-wide
/// default seed.
///
/// `define` receives the builder with `root` as the current scope. A
/// [`SpecError`] it returns propagates as-is; any other failure is reported
/// as [`SpecError::InitializationFailed`].
pub fn read<F>(root: GroupConfig, define: F) -> Result<Plan, SpecError>
where
    F: FnOnce(&mut SpecBuilder) -> Result<(), Failure>,
{
    let settings = Settings::from_env();
    let seeds = DefaultSeed::process(settings.seed_override.clone());
    read_with(&settings, &seeds, root, define)
}

/// Read a spec with explicit settings and seed source.
pub fn read_with<F>(
    settings: &Settings,
    seeds: &dyn SeedSource,
    root: GroupConfig,
    define: F,
) -> Result<Plan, SpecError>
where
    F: FnOnce(&mut SpecBuilder) -> Result<(), Failure>,
{
    let spec = root.description.clone();
    let mut builder = SpecBuilder::new(root, settings.authoring_rules())?;
    define(&mut builder).map_err(|failure| SpecError::from_definition(&spec, failure))?;
    let tree = builder.finish()?;

    let plan = build_plan(&tree, seeds)?;
    tracing::debug!(spec = %spec, examples = plan.len(), "spec read");
    Ok(plan)
}
