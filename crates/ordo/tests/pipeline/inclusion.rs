//! Focus and skip markers.

use ordo::{read_with, FixedSeed, GroupConfig, Plan, Settings, SpecError};
use pretty_assertions::assert_eq;

use crate::common::{execute, plan, Log};

fn ignored(plan: &Plan) -> Vec<(String, bool)> {
    plan.iter()
        .map(|example| (example.description().to_owned(), example.should_be_ignored()))
        .collect()
}

fn pairs(expected: &[(&str, bool)]) -> Vec<(String, bool)> {
    expected
        .iter()
        .map(|(name, skipped)| ((*name).to_owned(), *skipped))
        .collect()
}

#[test]
fn skipped_examples_never_run() {
    let log = Log::default();
    let plan = plan(|spec| {
        spec.before_each(log.record("setup"))?;
        spec.it("runs", log.record("runs"))?;
        spec.xit("skipped", log.record("skipped"))?;
        spec.xcontext("off", |spec| spec.it("nested", log.record("nested")))?;
        Ok(())
    });

    assert_eq!(
        ignored(&plan),
        pairs(&[("runs", false), ("skipped", true), ("nested", true)])
    );
    execute(&plan);
    assert_eq!(log.entries(), vec!["setup", "runs"]);
}

#[test]
fn one_focus_anywhere_switches_to_white_list() {
    let plan = plan(|spec| {
        spec.it("first", || Ok(()))?;
        spec.describe("deep", |spec| {
            spec.describe("deeper", |spec| spec.fit("focused", || Ok(())))
        })?;
        spec.it("last", || Ok(()))?;
        Ok(())
    });

    assert_eq!(
        ignored(&plan),
        pairs(&[("first", true), ("focused", false), ("last", true)])
    );
}

#[test]
fn focused_group_includes_descendants() {
    let plan = plan(|spec| {
        spec.fdescribe("focus", |spec| {
            spec.it("a", || Ok(()))?;
            spec.context("inner", |spec| spec.it("b", || Ok(())))
        })?;
        spec.it("outside", || Ok(()))?;
        Ok(())
    });

    assert_eq!(
        ignored(&plan),
        pairs(&[("a", false), ("b", false), ("outside", true)])
    );
}

#[test]
fn focused_hooks_skip_unfocused_neighbours() {
    let log = Log::default();
    let plan = plan(|spec| {
        spec.before_all(log.record("before all"))?;
        spec.after_all(log.record("after all"))?;
        spec.it("plain", log.record("plain"))?;
        spec.fit("focused", log.record("focused"))?;
        Ok(())
    });

    execute(&plan);
    assert_eq!(log.entries(), vec!["before all", "focused", "after all"]);
}

#[test]
fn ci_mode_rejects_markers() {
    let settings = Settings::default().with_ci_mode(true);
    let read = |define: fn(&mut ordo::SpecBuilder) -> Result<(), ordo::Failure>| {
        read_with(
            &settings,
            &FixedSeed(0),
            GroupConfig::new("spec").defined_order(),
            define,
        )
        .unwrap_err()
    };

    let cases: [(&str, fn(&mut ordo::SpecBuilder) -> Result<(), ordo::Failure>); 4] = [
        ("fit", |spec: &mut ordo::SpecBuilder| Ok(spec.fit("a", || Ok(()))?)),
        ("xit", |spec: &mut ordo::SpecBuilder| Ok(spec.xit("a", || Ok(()))?)),
        ("fdescribe", |spec: &mut ordo::SpecBuilder| Ok(spec.fdescribe("g", |_| Ok(()))?)),
        ("xcontext", |spec: &mut ordo::SpecBuilder| Ok(spec.xcontext("g", |_| Ok(()))?)),
    ];
    for (operation, define) in cases {
        let error = read(define);
        assert!(
            matches!(error, SpecError::NotAllowedInCiMode { operation: op } if op == operation),
            "{operation}: {error}"
        );
    }

    let error = read(|spec: &mut ordo::SpecBuilder| {
        Ok(spec.group(GroupConfig::new("g").seed(1), |_| Ok(()))?)
    });
    assert!(matches!(error, SpecError::HardCodedSeedInCiMode));
}

#[test]
fn ci_mode_allows_plain_specs() {
    let settings = Settings::default().with_ci_mode(true);
    let plan = read_with(
        &settings,
        &FixedSeed(0),
        GroupConfig::new("spec").random_order(),
        |spec| {
            spec.it("a", || Ok(()))?;
            spec.describe("g", |spec| spec.it("b", || Ok(())))?;
            Ok(())
        },
    )
    .unwrap();
    assert_eq!(plan.len(), 2);
}
