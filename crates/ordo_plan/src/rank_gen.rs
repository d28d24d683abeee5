//! Rank generation.
//!
//! The generator keeps one `(strategy, value)` level per open group. Each
//! node takes the current root-to-leaf values as its [`Rank`]; the innermost
//! value then advances. Closing a group advances its parent once, so a whole
//! group occupies a single slot among its siblings and any per-group
//! ordering policy composes without a second sort.

use ordo_ir::{OrderPolicy, Rank, SpecError};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::SeedSource;

enum Strategy {
    /// 0, 1, 2, ...
    Incremental,
    /// Random high word over a sequence number, so values never collide
    /// within one strategy.
    Random { rng: StdRng, sequence: u32 },
}

impl Strategy {
    fn initial_value(&mut self) -> u64 {
        match self {
            Strategy::Incremental => 0,
            Strategy::Random { rng, sequence } => draw(rng, sequence),
        }
    }

    fn next_value(&mut self, current: u64) -> u64 {
        match self {
            Strategy::Incremental => current + 1,
            Strategy::Random { rng, sequence } => draw(rng, sequence),
        }
    }
}

fn draw(rng: &mut StdRng, sequence: &mut u32) -> u64 {
    let value = (u64::from(rng.next_u32()) << 32) | u64::from(*sequence);
    *sequence = sequence.wrapping_add(1);
    value
}

struct Level {
    /// Index into `RankGenerator::strategies`.
    strategy: usize,
    value: u64,
}

/// Produces comparable position keys for nodes of one spec.
pub struct RankGenerator<'s> {
    seeds: &'s dyn SeedSource,
    strategies: Vec<Strategy>,
    levels: Vec<Level>,
}

impl<'s> RankGenerator<'s> {
    pub fn new(seeds: &'s dyn SeedSource) -> Self {
        RankGenerator {
            seeds,
            strategies: Vec::new(),
            levels: Vec::new(),
        }
    }

    /// Open a level for the children of a group with `policy`.
    ///
    /// `Inherit` shares the enclosing level's strategy instance, continuing
    /// its random stream; at the root it fails.
    pub fn push_level(&mut self, policy: OrderPolicy) -> Result<(), SpecError> {
        let strategy = match policy {
            OrderPolicy::Inherit => self
                .levels
                .last()
                .map(|level| level.strategy)
                .ok_or(SpecError::InheritedOrderAtRoot)?,
            OrderPolicy::Defined => self.add_strategy(Strategy::Incremental),
            OrderPolicy::Random { seed } => {
                let seed = match seed {
                    Some(seed) => seed,
                    None => self.seeds.seed()?,
                };
                self.add_strategy(Strategy::Random {
                    rng: StdRng::seed_from_u64(seed),
                    sequence: 0,
                })
            }
        };
        let value = self.strategies[strategy].initial_value();
        self.levels.push(Level { strategy, value });
        Ok(())
    }

    /// Rank for the next node at the current level.
    pub fn generate(&mut self) -> Rank {
        let rank = Rank::new(self.levels.iter().map(|level| level.value));
        self.advance();
        rank
    }

    /// Close the current level and advance its parent.
    pub fn pop_level(&mut self) {
        let Some(level) = self.levels.pop() else {
            return;
        };
        // Strategies are created in stack order, so one no longer referenced
        // by the remaining levels is the newest in the arena.
        if self
            .levels
            .last()
            .map_or(true, |parent| parent.strategy != level.strategy)
        {
            self.strategies.truncate(level.strategy);
        }
        self.advance();
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    fn add_strategy(&mut self, strategy: Strategy) -> usize {
        self.strategies.push(strategy);
        self.strategies.len() - 1
    }

    fn advance(&mut self) {
        if let Some(level) = self.levels.last_mut() {
            level.value = self.strategies[level.strategy].next_value(level.value);
        }
    }
}
