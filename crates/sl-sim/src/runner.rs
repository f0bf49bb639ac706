//! Per-(event, line) pipeline driver.
//!
//! ```text
//! ① Check    — every tower has a wind series, all series time-aligned.
//! ② Seed     — (event, line) → LineRng → shared DrawMatrix (perfect
//!              correlation of wind-damage draws within the line).
//! ③ Fan-out  — per tower (parallel with the `parallel` feature):
//!              terrain correction → directional resolve → pc_wind →
//!              Monte Carlo simulation + analytical pull
//!              (each tower owns a TowerRng derived from the line seed).
//! ④ Fan-in   — aggregate into per-tower tables and line statistics.
//! ```
//!
//! Any tower failure aborts the whole line — partial line results are never
//! produced.  [`run_event`] keeps per-line failures visible in its report
//! instead of dropping them.

use std::collections::BTreeMap;

use sl_cascade::{CondAdjacency, Line, Tower, TowerOutcome, pull_probability, simulate_tower};
use sl_core::{DamageScale, DrawMatrix, LineRng, ProbTable, TowerId, TowerRng};
use sl_fragility::{FragilityTable, pc_wind};
use sl_wind::{TerrainTable, WindSeries, resolve};

use crate::aggregate::{self, InteractionOverlay, LineDamage};
use crate::observer::RunObserver;
use crate::{SimError, SimResult, StudyConfig};

// ── Study ─────────────────────────────────────────────────────────────────────

/// Read-only static tables shared by every line and event of a study.
#[derive(Copy, Clone)]
pub struct Study<'a> {
    pub config:    &'a StudyConfig,
    pub terrain:   &'a TerrainTable,
    pub fragility: &'a FragilityTable,
    pub scale:     &'a DamageScale,
}

// ── LineRunner ────────────────────────────────────────────────────────────────

/// Per-tower products of the fan-out phase, consumed by the aggregator.
pub(crate) struct TowerRun {
    pub pc_wind: ProbTable,
    pub outcome: TowerOutcome,
    pub pull:    BTreeMap<TowerId, Vec<f64>>,
}

/// Drives the pipeline for one line.  Construction builds the per-tower
/// adjacency models, which are topology-only — one runner serves every event
/// that hits the line.
pub struct LineRunner<'a> {
    study:  Study<'a>,
    line:   &'a Line,
    models: Vec<CondAdjacency>,
}

impl<'a> LineRunner<'a> {
    pub fn new(study: Study<'a>, line: &'a Line) -> SimResult<Self> {
        study.config.validate()?;
        line.validate()?;
        let models = line
            .towers
            .iter()
            .map(CondAdjacency::build)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { study, line, models })
    }

    pub fn line(&self) -> &Line {
        self.line
    }

    pub fn models(&self) -> &[CondAdjacency] {
        &self.models
    }

    /// Run one event against this line.
    ///
    /// `wind` maps each tower to its series for the event; `overlay` carries
    /// externally computed line-interaction damage (empty when none).
    pub fn run<O: RunObserver>(
        &self,
        event: &str,
        wind: &BTreeMap<TowerId, WindSeries>,
        overlay: &[InteractionOverlay],
        observer: &mut O,
    ) -> SimResult<LineDamage> {
        observer.on_line_start(event, &self.line.name, self.line.len());

        let ntime = self.check_wind(wind)?;
        let nsims = self.study.config.nsims;
        self.check_overlay(overlay, nsims, ntime)?;

        let seed = self.study.config.seed_for(event, &self.line.name)?;
        let mut line_rng = match seed {
            Some(s) => LineRng::new(s),
            None    => LineRng::unseeded(),
        };
        let draws = DrawMatrix::uniform(&mut line_rng, nsims, ntime);

        let runs = self.compute_towers(wind, seed, &draws)?;
        for run in &runs {
            observer.on_tower_done(run.outcome.tower);
        }

        let damage = aggregate::aggregate_line(
            self.line,
            runs,
            overlay,
            self.study.config,
            self.study.scale,
        );
        observer.on_line_end(event, &self.line.name);
        Ok(damage)
    }

    /// Presence and time alignment of every tower's wind series; returns the
    /// shared series length.
    fn check_wind(&self, wind: &BTreeMap<TowerId, WindSeries>) -> SimResult<usize> {
        let mut reference: Option<&WindSeries> = None;
        for tower in &self.line.towers {
            let series = wind.get(&tower.id).ok_or_else(|| SimError::MissingWindSeries {
                tower: tower.name.clone(),
            })?;
            match reference {
                None => reference = Some(series),
                Some(first) if !first.index().aligned_with(series.index()) => {
                    return Err(SimError::TimeMisaligned {
                        line:  self.line.name.clone(),
                        tower: tower.name.clone(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(reference.map_or(0, WindSeries::len))
    }

    /// Interaction-overlay entries must reference this line's towers and
    /// in-range (sim, time, rank) coordinates.
    fn check_overlay(
        &self,
        overlay: &[InteractionOverlay],
        nsims: usize,
        ntime: usize,
    ) -> SimResult<()> {
        let collapse = self.study.scale.collapse_rank();
        for o in overlay {
            let known = self.line.towers.iter().any(|t| t.id == o.tower);
            if !known
                || o.sim as usize >= nsims
                || o.time >= ntime
                || o.rank == 0
                || o.rank > collapse
            {
                return Err(SimError::Config(format!(
                    "interaction overlay entry out of range for line '{}': \
                     tower {}, sim {}, time {}, rank {}",
                    self.line.name, o.tower, o.sim, o.time, o.rank
                )));
            }
        }
        Ok(())
    }

    /// Fan-out: per-tower compute over the shared draw matrix.  With the
    /// `parallel` Cargo feature the towers run on Rayon's thread pool; the
    /// per-tower RNG derivation makes scheduling order irrelevant.
    fn compute_towers(
        &self,
        wind: &BTreeMap<TowerId, WindSeries>,
        seed: Option<u64>,
        draws: &DrawMatrix,
    ) -> SimResult<Vec<TowerRun>> {
        let study = self.study;

        #[cfg(not(feature = "parallel"))]
        {
            self.line
                .towers
                .iter()
                .zip(&self.models)
                .map(|(tower, model)| run_tower(study, tower, model, &wind[&tower.id], seed, draws))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.line
                .towers
                .par_iter()
                .zip(self.models.par_iter())
                .map(|(tower, model)| run_tower(study, tower, model, &wind[&tower.id], seed, draws))
                .collect()
        }
    }
}

/// The full per-tower pipeline: terrain → resolve → fragility → simulate.
fn run_tower(
    study: Study<'_>,
    tower: &Tower,
    model: &CondAdjacency,
    series: &WindSeries,
    seed: Option<u64>,
    draws: &DrawMatrix,
) -> SimResult<TowerRun> {
    let correction = study
        .terrain
        .height_correction(&tower.terrain_category, tower.drag_height_m)?;
    let resolved = resolve(series, tower.strong_axis_deg, correction);
    let pc = pc_wind(
        study.fragility,
        &tower.ttype,
        &tower.funct,
        tower.dev_angle_deg,
        tower.collapse_capacity,
        &resolved,
        study.scale,
    )?;

    let mut rng = match seed {
        Some(s) => TowerRng::new(s, tower.id),
        None    => TowerRng::unseeded(),
    };
    let outcome = simulate_tower(tower, model, &pc, draws, study.scale, &mut rng);
    let pull = pull_probability(tower, model, &pc, study.scale.collapse_rank());

    Ok(TowerRun { pc_wind: pc, outcome, pull })
}

// ── Event-level driver ────────────────────────────────────────────────────────

/// One line's inputs for an event.
pub struct LineJob<'a> {
    pub line:    &'a Line,
    pub wind:    &'a BTreeMap<TowerId, WindSeries>,
    pub overlay: &'a [InteractionOverlay],
}

/// Per-line outcomes for one event.  Failed lines stay in the report — they
/// are never silently omitted from the aggregate.
pub struct EventReport {
    pub event: String,
    pub lines: Vec<(String, SimResult<LineDamage>)>,
}

impl EventReport {
    /// Lines that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &SimError)> {
        self.lines
            .iter()
            .filter_map(|(name, r)| r.as_ref().err().map(|e| (name.as_str(), e)))
    }

    /// Lines that completed.
    pub fn succeeded(&self) -> impl Iterator<Item = &LineDamage> {
        self.lines.iter().filter_map(|(_, r)| r.as_ref().ok())
    }
}

/// Process every line of one event sequentially; parallelism lives inside
/// each line's per-tower fan-out (size the Rayon pool with
/// `StudyConfig::install_thread_pool` under the `parallel` feature).
pub fn run_event<O: RunObserver>(
    study: Study<'_>,
    event: &str,
    jobs: &[LineJob<'_>],
    observer: &mut O,
) -> EventReport {
    let mut lines = Vec::with_capacity(jobs.len());
    for job in jobs {
        let result = LineRunner::new(study, job.line)
            .and_then(|runner| runner.run(event, job.wind, job.overlay, observer));
        lines.push((job.line.name.clone(), result));
    }
    EventReport { event: event.to_string(), lines }
}
