//! Seeds for random-order groups.
//!
//! A random group with a hard-coded seed uses it directly. Every other random
//! group draws from one process-wide default seed, generated lazily (or read
//! from an override) the first time it is needed and kept until
//! [`SharedSeed::reset`]. Reusing the seed reproduces the same order.

use ordo_ir::SpecError;
use parking_lot::Mutex;

/// Supplies the default seed to an assembly run.
pub trait SeedSource {
    fn seed(&self) -> Result<u64, SpecError>;
}

/// Always the same seed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FixedSeed(pub u64);

impl SeedSource for FixedSeed {
    fn seed(&self) -> Result<u64, SpecError> {
        Ok(self.0)
    }
}

/// Lazily initialised seed behind a mutex.
///
/// This is the only synchronisation point of the pipeline: concurrent reads
/// sharing the default seed all observe the value set by the first of them.
#[derive(Debug)]
pub struct SharedSeed {
    slot: Mutex<Option<u64>>,
}

impl SharedSeed {
    pub const fn new() -> Self {
        SharedSeed {
            slot: Mutex::new(None),
        }
    }

    /// The cached seed, initialising it on first use.
    ///
    /// A non-blank `override_value` is parsed as the seed; otherwise one is
    /// generated. An unparsable override fails and leaves the slot empty.
    pub fn get_or_init(&self, override_value: Option<&str>) -> Result<u64, SpecError> {
        let mut slot = self.slot.lock();
        if let Some(seed) = *slot {
            return Ok(seed);
        }

        let seed = match override_value.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => {
                let seed = value.parse::<u64>().map_err(|source| SpecError::IllegalSeed {
                    value: value.to_owned(),
                    source,
                })?;
                tracing::info!(seed, "random order seed (from override)");
                seed
            }
            None => {
                let seed = rand::random::<u64>();
                tracing::info!(seed, "random order seed (generated)");
                seed
            }
        };

        *slot = Some(seed);
        Ok(seed)
    }

    /// The cached seed, without initialising it.
    pub fn peek(&self) -> Option<u64> {
        *self.slot.lock()
    }

    /// Forget the cached seed; the next read draws a new one.
    pub fn reset(&self) {
        *self.slot.lock() = None;
    }
}

impl Default for SharedSeed {
    fn default() -> Self {
        SharedSeed::new()
    }
}

static PROCESS_SEED: SharedSeed = SharedSeed::new();

/// The process-wide default seed.
pub fn process_seed() -> &'static SharedSeed {
    &PROCESS_SEED
}

/// [`SeedSource`] backed by a [`SharedSeed`] and an optional override.
#[derive(Debug)]
pub struct DefaultSeed<'a> {
    shared: &'a SharedSeed,
    override_value: Option<String>,
}

impl DefaultSeed<'static> {
    /// The process-wide seed.
    pub fn process(override_value: Option<String>) -> Self {
        DefaultSeed::new(process_seed(), override_value)
    }
}

impl<'a> DefaultSeed<'a> {
    pub fn new(shared: &'a SharedSeed, override_value: Option<String>) -> Self {
        DefaultSeed {
            shared,
            override_value,
        }
    }
}

impl SeedSource for DefaultSeed<'_> {
    fn seed(&self) -> Result<u64, SpecError> {
        self.shared.get_or_init(self.override_value.as_deref())
    }
}
