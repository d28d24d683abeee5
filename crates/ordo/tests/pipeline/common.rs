//! Shared helpers for pipeline tests.

use std::sync::Arc;

use ordo::{
    read_with, BlockResult, Failure, FixedSeed, GroupConfig, Plan, Settings, SpecBuilder,
};
use parking_lot::Mutex;

/// Records what ran, in order.
#[derive(Clone, Default)]
pub struct Log(Arc<Mutex<Vec<String>>>);

impl Log {
    pub fn push(&self, entry: String) {
        self.0.lock().push(entry);
    }

    /// A body that appends `entry` and succeeds.
    pub fn record(&self, entry: &str) -> impl Fn() -> BlockResult + Send + Sync + 'static {
        let log = self.clone();
        let entry = entry.to_owned();
        move || {
            log.push(entry.clone());
            Ok(())
        }
    }

    /// A body that appends `entry` and fails with it as the message.
    pub fn fail(&self, entry: &str) -> impl Fn() -> BlockResult + Send + Sync + 'static {
        let log = self.clone();
        let entry = entry.to_owned();
        move || {
            log.push(entry.clone());
            Err(entry.clone().into())
        }
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

/// Read a defined-order spec named "spec" with default settings.
pub fn plan<F>(define: F) -> Plan
where
    F: FnOnce(&mut SpecBuilder) -> Result<(), Failure>,
{
    read_with(
        &Settings::default(),
        &FixedSeed(7),
        GroupConfig::new("spec").defined_order(),
        define,
    )
    .unwrap()
}

/// Execute every example in order; `Some(message)` for each failure.
pub fn execute(plan: &Plan) -> Vec<Option<String>> {
    plan.iter()
        .map(|example| {
            example
                .try_to_execute()
                .err()
                .map(|failure| failure.to_string())
        })
        .collect()
}

pub fn descriptions(plan: &Plan) -> Vec<String> {
    plan.iter()
        .map(|example| example.description().to_owned())
        .collect()
}
