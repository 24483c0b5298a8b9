use crate::config::MoranConfig;
use crate::error::{MoranError, Result};
use crate::exit::{ExitCondition, Termination};
use crate::game::{IteratedMatch, MatchEngine, MatchOutcome};
use crate::history::{GenerationRecord, History};
use crate::player::Player;
use crate::selection::{fitness_proportionate_selection, removal_weights, reproduction_weights};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

// ============================================================================
// Process State
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessState {
    /// No generation played yet.
    Initialized,
    /// At least one generation played, not finished.
    Running,
    Terminal(Termination),
}

// ============================================================================
// Moran Process
// ============================================================================

/// A population of players evolving under the Moran process.
///
/// Every generation:
/// 1. each pair of slots plays a match and slots accumulate their mean per-turn score
/// 2. a slot is drawn to reproduce, weighted by fitness
/// 3. a slot is drawn for removal, weighted by `max(fitness) - fitness`
/// 4. the removed slot receives a fresh clone of the reproducing player,
///    or with probability `mutation_rate` a clone of another starting strategy
///
/// All randomness comes from the injected `rng`. Each match gets its own
/// `StdRng` seeded from it, so a match replays identically whatever the
/// engine does with its own stream.
pub struct MoranProcess<R: RngCore = StdRng> {
    initial_players: Vec<Player>,
    players: Vec<Player>,
    mutation_targets: Vec<Player>,
    config: MoranConfig,
    engine: Box<dyn MatchEngine>,
    exit: ExitCondition,
    history: History,
    state: ProcessState,
    stochastic: bool,
    rng: R,
}

impl MoranProcess<StdRng> {
    pub fn with_seed(players: Vec<Player>, config: MoranConfig, seed: u64) -> Result<Self> {
        MoranProcess::new(players, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> MoranProcess<R> {
    pub fn new(players: Vec<Player>, config: MoranConfig, rng: R) -> Result<Self> {
        if players.len() < 2 {
            return Err(MoranError::TooFewPlayers(players.len()));
        }
        config.validate()?;
        config.topology.validate(players.len())?;

        let stochastic = config.noise > 0.0 || players.iter().any(Player::is_stochastic);

        // One prototype per strategy, in first-seen order
        let mut mutation_targets: Vec<Player> = Vec::new();
        for player in &players {
            let name = player.name();
            if !mutation_targets.iter().any(|p| p.name() == name) {
                mutation_targets.push(player.clone());
            }
        }

        let mut process = MoranProcess {
            history: History::default(),
            players: Vec::new(),
            initial_players: players,
            mutation_targets,
            exit: ExitCondition::new(config.max_generations),
            engine: Box::new(IteratedMatch::new(config.game)),
            config,
            state: ProcessState::Initialized,
            stochastic,
            rng,
        };
        process.restart();
        Ok(process)
    }

    /// Replace the bundled iterated prisoner's dilemma with another engine.
    pub fn with_match_engine<M: MatchEngine + 'static>(mut self, engine: M) -> Self {
        self.engine = Box::new(engine);
        self
    }

    fn restart(&mut self) {
        self.players = self.initial_players.iter().map(Player::clone).collect();
        self.history = History::new(self.players.iter().map(Player::name).collect());
        self.state = match self.exit.evaluate(&self.players, 0) {
            Some(termination) => {
                info!(?termination, "population terminal at generation 0");
                ProcessState::Terminal(termination)
            }
            None => ProcessState::Initialized,
        };
    }

    /// Back to generation 0 with fresh copies of the starting players.
    ///
    /// The random source is not rewound.
    pub fn reset(&mut self) {
        self.restart();
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn state(&self) -> &ProcessState {
        &self.state
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, ProcessState::Terminal(_))
    }

    pub fn termination(&self) -> Option<&Termination> {
        match &self.state {
            ProcessState::Terminal(termination) => Some(termination),
            _ => None,
        }
    }

    /// The fixated strategy, once there is one.
    pub fn winner(&self) -> Option<&str> {
        self.termination().and_then(Termination::winner)
    }

    /// Whether noise or any starting player makes the outcome random.
    pub fn is_stochastic(&self) -> bool {
        self.stochastic
    }

    /// Number of populations seen: generation 0 plus one per played generation.
    pub fn len(&self) -> usize {
        self.history.len() + 1
    }

    /// Generations played so far.
    pub fn generation(&self) -> usize {
        self.history.len()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn config(&self) -> &MoranConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn score_history(&self) -> Vec<&[f64]> {
        self.history.score_history().collect()
    }

    pub fn populations(&self) -> Vec<BTreeMap<String, usize>> {
        self.history.populations()
    }

    // ------------------------------------------------------------------------
    // Driving
    // ------------------------------------------------------------------------

    /// Play one generation. Returns whether the process is now terminal.
    ///
    /// A no-op once terminal.
    pub fn step(&mut self) -> Result<bool> {
        if self.is_terminal() {
            return Ok(true);
        }

        let record = self.play_generation()?;
        debug!(
            generation = record.generation,
            reproduced = record.reproduced,
            removed = record.removed,
            mutated = record.mutated,
            "generation complete"
        );
        self.history.push(record);

        self.state = match self.exit.evaluate(&self.players, self.history.len()) {
            Some(termination) => {
                info!(?termination, generations = self.history.len(), "process terminal");
                ProcessState::Terminal(termination)
            }
            None => ProcessState::Running,
        };
        Ok(self.is_terminal())
    }

    /// Step until terminal. Calling again afterwards changes nothing.
    #[instrument(level = "debug", skip_all, fields(players = self.players.len()))]
    pub fn play(&mut self) -> Result<Termination> {
        loop {
            self.step()?;
            if let ProcessState::Terminal(termination) = &self.state {
                return Ok(termination.clone());
            }
        }
    }

    fn play_generation(&mut self) -> Result<GenerationRecord> {
        let fitness = self.fitness()?;

        let reproduced =
            fitness_proportionate_selection(&reproduction_weights(&fitness), &mut self.rng)?;
        let removed = fitness_proportionate_selection(&removal_weights(&fitness), &mut self.rng)?;

        let (offspring, mutated) = self.offspring(reproduced)?;
        self.players[removed] = offspring;

        Ok(GenerationRecord {
            generation: self.history.len() + 1,
            scores: fitness,
            population: self.players.iter().map(Player::name).collect(),
            reproduced,
            removed,
            mutated,
        })
    }

    /// Mean per-turn score of each slot summed over all of its matches.
    fn fitness(&mut self) -> Result<Vec<f64>> {
        let pairs = self.config.topology.pairs(self.players.len());
        let seeds: Vec<u64> = pairs.iter().map(|_| self.rng.next_u64()).collect();
        let turns = self.config.turns;
        let noise = self.config.noise;

        let mut outcomes: Vec<MatchOutcome> = Vec::with_capacity(pairs.len());
        for (&(i, j), &seed) in pairs.iter().zip(&seeds) {
            let (a, b) = pair_mut(&mut self.players, i, j);
            let mut rng = StdRng::seed_from_u64(seed);
            outcomes.push(self.engine.play(a, b, turns, noise, &mut rng)?);
        }

        let mut fitness = vec![0.0; self.players.len()];
        for (&(i, j), outcome) in pairs.iter().zip(&outcomes) {
            let (score_i, score_j) = outcome.mean_scores();
            fitness[i] += score_i;
            fitness[j] += score_j;
        }
        Ok(fitness)
    }

    fn offspring(&mut self, parent: usize) -> Result<(Player, bool)> {
        let rate = self.config.mutation_rate;
        if rate > 0.0 && self.rng.random::<f64>() < rate {
            let parent_name = self.players[parent].name();
            let candidates: Vec<&Player> = self
                .mutation_targets
                .iter()
                .filter(|p| p.name() != parent_name)
                .collect();
            if !candidates.is_empty() {
                let uniform = vec![1.0; candidates.len()];
                let pick = fitness_proportionate_selection(&uniform, &mut self.rng)?;
                return Ok((candidates[pick].clone(), true));
            }
        }
        Ok((self.players[parent].clone(), false))
    }
}

impl<R: RngCore> Iterator for MoranProcess<R> {
    type Item = Result<GenerationRecord>;

    /// One generation per item; `None` once terminal.
    fn next(&mut self) -> Option<Self::Item> {
        if self.is_terminal() {
            return None;
        }
        match self.step() {
            Ok(_) => self.history.last().cloned().map(Ok),
            Err(e) => Some(Err(e)),
        }
    }
}

/// Mutable references to two distinct slots, `i < j`.
fn pair_mut(players: &mut [Player], i: usize, j: usize) -> (&mut Player, &mut Player) {
    let (left, right) = players.split_at_mut(j);
    (&mut left[i], &mut right[0])
}
