use crate::error::{MoranError, Result};
use crate::topology::Topology;
use crate::Game;
use serde::{Deserialize, Serialize};

/// Parameters of a Moran process run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoranConfig {
    /// Rounds per match
    pub turns: usize,
    /// Probability that any single move is flipped
    pub noise: f64,
    /// Probability that an offspring switches to another strategy type
    pub mutation_rate: f64,
    /// Stop after this many generations even without fixation
    pub max_generations: Option<usize>,
    /// Match pairings within a generation
    pub topology: Topology,
    /// Payoffs used by the bundled match engine
    pub game: Game,
}

impl MoranConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: MoranConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.turns == 0 {
            return Err(MoranError::InvalidTurns);
        }
        check_probability("noise", self.noise)?;
        check_probability("mutation_rate", self.mutation_rate)?;
        self.game.validate()
    }

    pub fn with_turns(mut self, turns: usize) -> Self {
        self.turns = turns;
        self
    }

    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn with_mutation_rate(mut self, mutation_rate: f64) -> Self {
        self.mutation_rate = mutation_rate;
        self
    }

    pub fn with_max_generations(mut self, max_generations: usize) -> Self {
        self.max_generations = Some(max_generations);
        self
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_game(mut self, game: Game) -> Self {
        self.game = game;
        self
    }
}

impl Default for MoranConfig {
    fn default() -> Self {
        MoranConfig {
            turns: 100,
            noise: 0.0,
            mutation_rate: 0.0,
            max_generations: None,
            topology: Topology::Complete,
            game: Game::default(),
        }
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MoranError::InvalidProbability { name, value })
    }
}
