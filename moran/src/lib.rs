//! Moran process over iterated prisoner's dilemma players.
//!
//! A fixed-size population repeatedly plays a round-robin of matches. Each
//! generation one member reproduces with probability proportional to its
//! score and one member is removed with probability weighted towards low
//! scores. The process runs until a single strategy has taken over the whole
//! population, or a generation ceiling is hit.
//!
//! Key pieces:
//! - `Player` / `Strategy`: the agents and their behaviour
//! - `MatchEngine`: plays two players against each other
//! - `MoranProcess`: the generation-stepping state machine

pub mod config;
pub mod error;
pub mod exit;
pub mod experiment;
pub mod game;
pub mod history;
pub mod player;
pub mod process;
pub mod selection;
pub mod strategies;
pub mod topology;

#[cfg(test)]
mod testing;

pub use config::MoranConfig;
pub use error::{MoranError, Result};
pub use exit::Termination;
pub use experiment::{run_experiment, ExperimentConfig, ExperimentSummary};
pub use game::{IteratedMatch, MatchEngine, MatchOutcome};
pub use history::{GenerationRecord, History};
pub use player::{Classifier, Player, Strategy};
pub use process::{MoranProcess, ProcessState};
pub use selection::fitness_proportionate_selection;
pub use topology::Topology;

use serde::{Deserialize, Serialize};

// ============================================================================
// Core Domain Types
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Cooperate,
    Defect,
}

impl Action {
    /// The opposite move, used when noise corrupts an intended action.
    pub fn flip(self) -> Action {
        match self {
            Action::Cooperate => Action::Defect,
            Action::Defect => Action::Cooperate,
        }
    }
}

// ============================================================================
// Payoff Calculation
// ============================================================================

/// Prisoner's dilemma payoff matrix.
///
/// Payoffs are from the point of view of the row player:
/// - `reward`: both cooperate
/// - `sucker`: I cooperate, opponent defects
/// - `temptation`: I defect, opponent cooperates
/// - `punishment`: both defect
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub reward: f64,
    pub sucker: f64,
    pub temptation: f64,
    pub punishment: f64,
}

impl Game {
    pub fn new(reward: f64, sucker: f64, temptation: f64, punishment: f64) -> Self {
        Game {
            reward,
            sucker,
            temptation,
            punishment,
        }
    }

    pub fn payoff(&self, mine: Action, theirs: Action) -> f64 {
        match (mine, theirs) {
            (Action::Cooperate, Action::Cooperate) => self.reward,
            (Action::Defect, Action::Cooperate) => self.temptation,
            (Action::Cooperate, Action::Defect) => self.sucker,
            (Action::Defect, Action::Defect) => self.punishment,
        }
    }

    /// Reject NaN or infinite payoffs.
    pub fn validate(&self) -> Result<()> {
        let payoffs = [
            ("reward", self.reward),
            ("sucker", self.sucker),
            ("temptation", self.temptation),
            ("punishment", self.punishment),
        ];
        for (name, value) in payoffs {
            if !value.is_finite() {
                return Err(MoranError::InvalidPayoff { name, value });
            }
        }
        Ok(())
    }

    /// Payoffs for both sides of a single round.
    pub fn scores(&self, a: Action, b: Action) -> (f64, f64) {
        (self.payoff(a, b), self.payoff(b, a))
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new(3.0, 0.0, 5.0, 1.0)
    }
}
