//! Hook sharing, ordering and failure handling.

use ordo::MultipleFailures;
use pretty_assertions::assert_eq;

use crate::common::{execute, plan, Log};

#[test]
fn before_all_runs_once_before_both_examples() {
    let log = Log::default();
    let plan = plan(|spec| {
        spec.before_all(log.record("before all"))?;
        spec.it("e1", log.record("e1"))?;
        spec.it("e2", log.record("e2"))?;
        Ok(())
    });

    execute(&plan);
    assert_eq!(log.entries(), vec!["before all", "e1", "e2"]);
}

#[test]
fn after_all_runs_once_after_last_teardown() {
    let log = Log::default();
    let plan = plan(|spec| {
        spec.after_all(log.record("after all"))?;
        spec.after_each(log.record("after each"))?;
        spec.it("e1", log.record("e1"))?;
        spec.it("e2", log.record("e2"))?;
        Ok(())
    });

    execute(&plan);
    assert_eq!(
        log.entries(),
        vec!["e1", "after each", "e2", "after each", "after all"]
    );
}

#[test]
fn nested_scenario_runs_hooks_root_to_leaf() {
    let log = Log::default();
    let plan = plan(|spec| {
        spec.before_each(log.record("H1"))?;
        spec.it("E1", log.record("E1"))?;
        spec.it("E2", log.record("E2"))?;
        spec.group(ordo::GroupConfig::new("G").defined_order(), |spec| {
            spec.before_each(log.record("H2"))?;
            spec.it("E3", log.record("E3"))
        })?;
        Ok(())
    });

    execute(&plan);
    assert_eq!(
        log.entries(),
        vec!["H1", "E1", "H1", "E2", "H1", "H2", "E3"]
    );
}

#[test]
fn group_before_all_reruns_after_leaving_scope() {
    let log = Log::default();
    let plan = plan(|spec| {
        spec.describe("first", |spec| {
            spec.before_all(log.record("setup first"))?;
            spec.after_all(log.record("teardown first"))?;
            spec.it("a", log.record("a"))?;
            spec.it("b", log.record("b"))
        })?;
        spec.describe("second", |spec| {
            spec.before_all(log.record("setup second"))?;
            spec.it("c", log.record("c"))
        })?;
        Ok(())
    });

    execute(&plan);
    assert_eq!(
        log.entries(),
        vec![
            "setup first",
            "a",
            "b",
            "teardown first",
            "setup second",
            "c"
        ]
    );
}

#[test]
fn outer_before_all_spans_nested_groups() {
    let log = Log::default();
    let plan = plan(|spec| {
        spec.before_all(log.record("outer"))?;
        spec.it("a", log.record("a"))?;
        spec.describe("inner", |spec| {
            spec.before_all(log.record("inner"))?;
            spec.it("b", log.record("b"))?;
            spec.it("c", log.record("c"))
        })?;
        spec.it("d", log.record("d"))?;
        Ok(())
    });

    execute(&plan);
    assert_eq!(
        log.entries(),
        vec!["outer", "a", "inner", "b", "c", "d"]
    );
}

#[test]
fn before_all_failure_ignores_sharing_examples() {
    let log = Log::default();
    let plan = plan(|spec| {
        spec.describe("broken", |spec| {
            spec.before_all(log.fail("setup"))?;
            spec.it("a", log.record("a"))?;
            spec.it("b", log.record("b"))
        })?;
        spec.it("unrelated", log.record("unrelated"))?;
        Ok(())
    });

    let outcomes = execute(&plan);
    assert_eq!(outcomes, vec![Some("setup".to_owned()), None, None]);

    let ignored: Vec<bool> = plan.iter().map(ordo::Example::should_be_ignored).collect();
    assert_eq!(ignored, vec![true, true, false]);
    assert_eq!(log.entries(), vec!["setup", "unrelated"]);
}

#[test]
fn before_each_failure_skips_body_and_teardown() {
    let log = Log::default();
    let plan = plan(|spec| {
        spec.before_each(log.fail("setup"))?;
        spec.after_each(log.record("teardown"))?;
        spec.it("a", log.record("a"))?;
        Ok(())
    });

    assert_eq!(execute(&plan), vec![Some("setup".to_owned())]);
    assert_eq!(log.entries(), vec!["setup"]);
}

#[test]
fn every_teardown_runs_and_failures_aggregate() {
    let log = Log::default();
    let plan = plan(|spec| {
        spec.after_all(log.fail("after all"))?;
        spec.after_each(log.fail("outer after each"))?;
        spec.describe("inner", |spec| {
            spec.after_each(log.fail("inner after each"))?;
            spec.it("a", log.fail("body"))
        })?;
        Ok(())
    });

    let failure = plan.examples()[0].try_to_execute().unwrap_err();
    let multiple = failure.downcast::<MultipleFailures>().unwrap();
    let messages: Vec<String> = multiple
        .failures()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        messages,
        vec!["body", "inner after each", "outer after each", "after all"]
    );
    assert_eq!(log.entries(), messages);
}

#[test]
fn single_failure_is_not_wrapped() {
    let log = Log::default();
    let plan = plan(|spec| {
        spec.after_each(log.record("teardown"))?;
        spec.it("a", log.fail("body"))?;
        Ok(())
    });

    let failure = plan.examples()[0].try_to_execute().unwrap_err();
    assert!(!failure.is::<MultipleFailures>());
    assert_eq!(failure.to_string(), "body");
    assert_eq!(log.entries(), vec!["body", "teardown"]);
}
