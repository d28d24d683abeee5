//! The rank-ordered sequence handed to a runner.

use std::ops::Range;
use std::sync::Arc;

use crate::example::HookFailures;
use crate::Example;

/// Examples of one spec in execution order.
///
/// Building a plan decides, once, which example fires each before-all and
/// after-all hook: the first and last example of every contiguous run that
/// shares the hook. Skipped examples run nothing and do not break a run.
#[derive(Debug)]
pub struct Plan {
    examples: Vec<Example>,
}

impl Plan {
    pub(crate) fn new(mut examples: Vec<Example>) -> Self {
        examples.sort_by(|a, b| a.rank.cmp(&b.rank));
        debug_assert!(
            examples.windows(2).all(|pair| pair[0].rank < pair[1].rank),
            "ranks must be unique"
        );

        let failures = Arc::new(HookFailures::default());
        for example in &mut examples {
            example.hook_failures = Arc::clone(&failures);
        }

        let runnable: Vec<usize> = examples
            .iter()
            .enumerate()
            .filter(|(_, example)| example.body.is_some())
            .map(|(index, _)| index)
            .collect();

        for (position, &index) in runnable.iter().enumerate() {
            let previous = position.checked_sub(1).map(|p| runnable[p]);
            let next = runnable.get(position + 1).copied();

            let fires_before: Vec<bool> = examples[index]
                .before_all
                .iter()
                .map(|once| {
                    previous.map_or(true, |p| !examples[p].shares_before_all(once.hook.id))
                })
                .collect();
            let fires_after: Vec<bool> = examples[index]
                .after_all
                .iter()
                .map(|once| {
                    next.map_or(true, |n| !examples[n].shares_after_all(once.hook.id))
                })
                .collect();

            let example = &mut examples[index];
            for (once, fires) in example.before_all.iter_mut().zip(fires_before) {
                once.fires_here = fires;
            }
            for (once, fires) in example.after_all.iter_mut().zip(fires_after) {
                once.fires_here = fires;
            }
        }

        Plan { examples }
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Example> {
        self.examples.iter()
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn into_examples(self) -> Vec<Example> {
        self.examples
    }

    /// Keep the examples matching `keep` runnable; the others become skipped
    /// placeholders and hook runs are recomputed around them.
    #[must_use]
    pub fn filter(self, keep: impl Fn(&Example) -> bool) -> Plan {
        let examples = self
            .examples
            .into_iter()
            .map(|example| {
                if example.body.is_none() || keep(&example) {
                    example
                } else {
                    example.into_placeholder()
                }
            })
            .collect();
        Plan::new(examples)
    }

    /// Split the plan into index ranges that may run concurrently.
    ///
    /// Consecutive runnable examples sharing a before-all or after-all hook
    /// stay in one segment and must run in order; skipped examples are kept
    /// with the segment before them.
    pub fn segments(&self) -> Vec<Range<usize>> {
        let mut segments = Vec::new();
        let mut start = 0;
        let mut last_runnable: Option<&Example> = None;

        for (index, example) in self.examples.iter().enumerate() {
            if example.body.is_none() {
                continue;
            }
            if let Some(previous) = last_runnable {
                if !linked(previous, example) {
                    segments.push(start..index);
                    start = index;
                }
            }
            last_runnable = Some(example);
        }

        if start < self.examples.len() {
            segments.push(start..self.examples.len());
        }
        segments
    }
}

fn linked(previous: &Example, next: &Example) -> bool {
    next.before_all
        .iter()
        .any(|once| previous.shares_before_all(once.hook.id))
        || previous
            .after_all
            .iter()
            .any(|once| next.shares_after_all(once.hook.id))
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a Example;
    type IntoIter = std::slice::Iter<'a, Example>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.iter()
    }
}
