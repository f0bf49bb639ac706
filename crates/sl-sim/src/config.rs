//! Study-wide configuration.

use std::collections::HashMap;

use crate::{SimError, SimResult};

/// Configuration scalars for one study (a batch of events over a network).
///
/// The seed table is keyed by `(event name, line name)` so each pair owns an
/// independent deterministic stream; in a reproducible study a missing entry
/// is a hard error, never a fallback to entropy.
#[derive(Clone, Debug)]
pub struct StudyConfig {
    /// Monte Carlo simulations per (event, line).
    pub nsims: usize,
    /// When set, every (event, line) must resolve a seed from the table.
    pub reproducible: bool,
    /// When set, the aggregator skips the wind-only (non-cascading) tables.
    pub skip_non_cascading: bool,
    /// Rayon pool size for the per-tower fan-out; 0 keeps the default.
    /// Ignored without the `parallel` feature.
    pub num_threads: usize,

    seeds: HashMap<(String, String), u64>,
}

impl StudyConfig {
    pub fn new(nsims: usize) -> Self {
        Self {
            nsims,
            reproducible: false,
            skip_non_cascading: false,
            num_threads: 0,
            seeds: HashMap::new(),
        }
    }

    /// Register a seed for one (event, line) pair and flag the study
    /// reproducible.
    pub fn with_seed(
        mut self,
        event: impl Into<String>,
        line: impl Into<String>,
        seed: u64,
    ) -> Self {
        self.reproducible = true;
        self.seeds.insert((event.into(), line.into()), seed);
        self
    }

    /// Resolve the seed for an (event, line) pair.
    ///
    /// `Ok(None)` means the study opted out of reproducibility and callers
    /// should use entropy-seeded generators.
    pub fn seed_for(&self, event: &str, line: &str) -> SimResult<Option<u64>> {
        if !self.reproducible {
            return Ok(None);
        }
        match self.seeds.get(&(event.to_string(), line.to_string())) {
            Some(&seed) => Ok(Some(seed)),
            None => Err(SimError::MissingSeed {
                event: event.to_string(),
                line:  line.to_string(),
            }),
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.nsims == 0 {
            return Err(SimError::Config("nsims must be at least 1".into()));
        }
        Ok(())
    }

    /// Apply the `num_threads` hint to Rayon's global pool.
    ///
    /// Call once before the first run; fails if a global pool already
    /// exists.  A zero hint keeps Rayon's default sizing.
    #[cfg(feature = "parallel")]
    pub fn install_thread_pool(&self) -> SimResult<()> {
        if self.num_threads == 0 {
            return Ok(());
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .build_global()
            .map_err(|e| SimError::Config(format!("thread pool: {e}")))
    }
}
