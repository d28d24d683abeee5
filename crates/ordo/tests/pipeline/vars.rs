//! Variable initializers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ordo::Var;
use pretty_assertions::assert_eq;

use crate::common::{execute, plan, Log};

/// A body logging `label=<current value>`.
fn observe(
    var: &Var<String>,
    log: &Log,
    label: &'static str,
) -> impl Fn() -> ordo::BlockResult + Send + Sync + 'static {
    let var = var.clone();
    let log = log.clone();
    move || {
        log.push(format!("{label}={}", var.get().unwrap_or_default()));
        Ok(())
    }
}

#[test]
fn inner_initializer_shadows_outer_for_its_subtree() {
    let log = Log::default();
    let name: Var<String> = Var::new();
    let plan = plan(|spec| {
        spec.let_var(&name, || Ok("outer".to_owned()))?;
        spec.describe("shadowing", |spec| {
            spec.let_var(&name, || Ok("inner".to_owned()))?;
            spec.it("a", observe(&name, &log, "a"))
        })?;
        spec.describe("sibling", |spec| spec.it("b", observe(&name, &log, "b")))?;
        spec.it("c", observe(&name, &log, "c"))?;
        Ok(())
    });

    execute(&plan);
    assert_eq!(log.entries(), vec!["a=inner", "b=outer", "c=outer"]);
}

#[test]
fn initializer_value_is_visible_to_hooks() {
    let log = Log::default();
    let name: Var<String> = Var::new();
    let plan = plan(|spec| {
        spec.let_var(&name, || Ok("ready".to_owned()))?;
        spec.before_each(observe(&name, &log, "before each"))?;
        spec.it("a", || Ok(()))?;
        Ok(())
    });

    execute(&plan);
    assert_eq!(log.entries(), vec!["before each=ready"]);
}

#[test]
fn initializer_runs_once_per_declaration() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter: Var<usize> = Var::new();
    let plan = plan(|spec| {
        let calls = Arc::clone(&calls);
        spec.let_var(&counter, move || Ok(calls.fetch_add(1, Ordering::SeqCst)))?;
        spec.it("a", || Ok(()))?;
        spec.it("b", || Ok(()))?;
        spec.it("c", || Ok(()))?;
        Ok(())
    });

    execute(&plan);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(counter.get(), Some(0));
}

#[test]
fn initializer_failure_aborts_before_hooks() {
    let log = Log::default();
    let name: Var<String> = Var::new();
    let plan = plan(|spec| {
        spec.let_var(&name, || Err("no value".into()))?;
        spec.before_all(log.record("before all"))?;
        spec.it("a", log.record("a"))?;
        Ok(())
    });

    assert_eq!(execute(&plan), vec![Some("no value".to_owned())]);
    assert!(log.entries().is_empty());
}
