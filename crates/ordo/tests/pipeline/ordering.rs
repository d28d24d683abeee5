//! Ranks, ordering policies and seeds.

use ordo::{
    read_with, DefaultSeed, GroupConfig, Plan, Rank, SeedSource, Settings, SharedSeed, SpecError,
};
use pretty_assertions::assert_eq;

use crate::common::{descriptions, plan};

fn ranks(plan: &Plan) -> Vec<Rank> {
    plan.iter().map(|example| example.rank().clone()).collect()
}

/// Twenty examples under a random-order root.
fn shuffled(seeds: &dyn SeedSource, root: GroupConfig) -> Plan {
    read_with(&Settings::default(), seeds, root, |spec| {
        for index in 0..20 {
            spec.it(format!("example {index:02}"), || Ok(()))?;
        }
        Ok(())
    })
    .unwrap()
}

#[test]
fn scenario_ranks() {
    let plan = plan(|spec| {
        spec.before_each(|| Ok(()))?;
        spec.it("E1", || Ok(()))?;
        spec.it("E2", || Ok(()))?;
        spec.group(GroupConfig::new("G").defined_order(), |spec| {
            spec.before_each(|| Ok(()))?;
            spec.it("E3", || Ok(()))
        })?;
        Ok(())
    });

    assert_eq!(descriptions(&plan), vec!["E1", "E2", "E3"]);
    assert_eq!(
        ranks(&plan),
        vec![
            Rank::from(&[0][..]),
            Rank::from(&[1][..]),
            Rank::from(&[2, 0][..]),
        ]
    );
}

#[test]
fn ranks_are_strictly_increasing() {
    let plan = plan(|spec| {
        spec.it("a", || Ok(()))?;
        spec.group(GroupConfig::new("random").seed(3), |spec| {
            for index in 0..5 {
                spec.it(format!("r{index}"), || Ok(()))?;
            }
            spec.describe("nested", |spec| spec.it("n", || Ok(())))
        })?;
        spec.it("z", || Ok(()))?;
        Ok(())
    });

    let ranks = ranks(&plan);
    assert!(ranks.windows(2).all(|pair| pair[0] < pair[1]));

    let names = descriptions(&plan);
    assert_eq!(names.first().map(String::as_str), Some("a"));
    assert_eq!(names.last().map(String::as_str), Some("z"));
}

#[test]
fn explicit_seed_reproduces_order() {
    let root = || GroupConfig::new("spec").seed(1234);
    let first = shuffled(&ordo::FixedSeed(1), root());
    let second = shuffled(&ordo::FixedSeed(2), root());

    assert_eq!(descriptions(&first), descriptions(&second));
    assert_eq!(ranks(&first), ranks(&second));

    let mut sorted = descriptions(&first);
    sorted.sort();
    assert_ne!(descriptions(&first), sorted);
}

#[test]
fn default_seed_is_shared_until_reset() {
    let shared = SharedSeed::new();
    let seeds = DefaultSeed::new(&shared, None);
    let root = || GroupConfig::new("spec").random_order();

    let first = descriptions(&shuffled(&seeds, root()));
    assert_eq!(first, descriptions(&shuffled(&seeds, root())));

    shared.reset();
    assert_ne!(first, descriptions(&shuffled(&seeds, root())));
}

#[test]
fn seed_override_drives_default_seed() {
    let root = || GroupConfig::new("spec").random_order();

    let shared = SharedSeed::new();
    let first = descriptions(&shuffled(&DefaultSeed::new(&shared, Some("99".to_owned())), root()));
    let other = SharedSeed::new();
    let second = descriptions(&shuffled(&DefaultSeed::new(&other, Some("99".to_owned())), root()));

    assert_eq!(first, second);
    assert_eq!(shared.peek(), Some(99));
}

#[test]
fn illegal_seed_override_fails_read() {
    let shared = SharedSeed::new();
    let seeds = DefaultSeed::new(&shared, Some("abc".to_owned()));
    let error = read_with(
        &Settings::default(),
        &seeds,
        GroupConfig::new("spec").random_order(),
        |spec| {
            spec.it("a", || Ok(()))?;
            Ok(())
        },
    )
    .unwrap_err();

    assert!(matches!(error, SpecError::IllegalSeed { .. }));
}

#[test]
fn root_must_declare_order() {
    let error = read_with(
        &Settings::default(),
        &ordo::FixedSeed(0),
        GroupConfig::new("spec"),
        |spec| {
            spec.it("a", || Ok(()))?;
            Ok(())
        },
    )
    .unwrap_err();

    assert!(matches!(error, SpecError::InheritedOrderAtRoot));
}
