//! Repeated Moran runs described by a TOML file.
//!
//! ```toml
//! seed = 5
//! runs = 100
//!
//! [process]
//! turns = 50
//! max_generations = 1000
//!
//! [[population]]
//! strategy = "Cooperator"
//! count = 2
//!
//! [[population]]
//! strategy = "Defector"
//! ```
//!
//! Run `i` is seeded with `seed + i` (wrapping at `u64::MAX`), so a batch replays
//! exactly regardless of how rayon schedules it.

use crate::config::MoranConfig;
use crate::error::{MoranError, Result};
use crate::exit::Termination;
use crate::player::Player;
use crate::process::MoranProcess;
use crate::strategies;
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::info;

fn one() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct PopulationEntry {
    pub strategy: String,
    #[serde(default = "one")]
    pub count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExperimentConfig {
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "one")]
    pub runs: usize,
    #[serde(default)]
    pub process: MoranConfig,
    pub population: Vec<PopulationEntry>,
}

impl ExperimentConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: ExperimentConfig = toml::from_str(source)?;
        config.process.validate()?;
        Ok(config)
    }

    /// Fresh players for one run, in the order listed.
    pub fn players(&self) -> Result<Vec<Player>> {
        let mut players = Vec::new();
        for entry in &self.population {
            let prototype = Player::new(strategies::from_name(&entry.strategy)?);
            players.extend((0..entry.count).map(|_| prototype.clone()));
        }
        Ok(players)
    }
}

/// Result of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub seed: u64,
    pub termination: Termination,
    pub generations: usize,
}

/// Aggregate over all runs of an experiment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperimentSummary {
    pub runs: Vec<RunOutcome>,
    /// How many runs each strategy won.
    pub fixations: BTreeMap<String, usize>,
    /// Runs that hit the generation ceiling.
    pub unresolved: usize,
}

impl ExperimentSummary {
    pub fn fixation_probability(&self, strategy: &str) -> f64 {
        if self.runs.is_empty() {
            return 0.0;
        }
        self.fixations.get(strategy).copied().unwrap_or(0) as f64 / self.runs.len() as f64
    }

    pub fn mean_generations(&self) -> f64 {
        if self.runs.is_empty() {
            return 0.0;
        }
        let total: usize = self.runs.iter().map(|r| r.generations).sum();
        total as f64 / self.runs.len() as f64
    }
}

pub fn run_experiment(config: &ExperimentConfig) -> Result<ExperimentSummary> {
    let population_size = config.players()?.len();
    if population_size < 2 {
        return Err(MoranError::TooFewPlayers(population_size));
    }

    let runs = (0..config.runs)
        .into_par_iter()
        .map(|run| -> Result<RunOutcome> {
            let seed = config.seed.wrapping_add(run as u64);
            let mut process =
                MoranProcess::with_seed(config.players()?, config.process.clone(), seed)?;
            let termination = process.play()?;
            Ok(RunOutcome {
                seed,
                termination,
                generations: process.generation(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut summary = ExperimentSummary::default();
    for run in &runs {
        match run.termination.winner() {
            Some(winner) => *summary.fixations.entry(winner.to_string()).or_insert(0) += 1,
            None => summary.unresolved += 1,
        }
    }
    summary.runs = runs;
    info!(
        runs = summary.runs.len(),
        unresolved = summary.unresolved,
        "experiment complete"
    );
    Ok(summary)
}
