use crate::Action;
use rand::RngCore;
use std::fmt;

// ============================================================================
// Classification
// ============================================================================

/// Fixed description of how a strategy behaves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classifier {
    /// Whether the strategy draws on randomness when choosing a move.
    pub stochastic: bool,
    /// How many past rounds the strategy looks at. `None` means unbounded.
    pub memory_depth: Option<usize>,
}

impl Classifier {
    pub fn deterministic(memory_depth: Option<usize>) -> Self {
        Classifier {
            stochastic: false,
            memory_depth,
        }
    }

    pub fn stochastic(memory_depth: Option<usize>) -> Self {
        Classifier {
            stochastic: true,
            memory_depth,
        }
    }
}

// ============================================================================
// Strategy Trait
// ============================================================================

/// Decision rule of a player.
///
/// `own` and `opponent` are the moves played so far in the current match,
/// oldest first. Randomness must come from `rng` so that seeded runs replay
/// exactly.
pub trait Strategy: Send + Sync {
    fn decide(&mut self, own: &[Action], opponent: &[Action], rng: &mut dyn RngCore) -> Action;

    /// Identity of the strategy. Two players are the same strategy iff their names match.
    fn name(&self) -> String;

    fn classifier(&self) -> Classifier;

    /// Forget any state built up during a match.
    fn reset(&mut self) {}

    /// A fresh copy with the same parameters and no match state.
    fn boxed_clone(&self) -> Box<dyn Strategy>;
}

// ============================================================================
// Player
// ============================================================================

/// A strategy together with the moves it has made in the current match.
pub struct Player {
    strategy: Box<dyn Strategy>,
    history: Vec<Action>,
}

impl Player {
    pub fn new(strategy: Box<dyn Strategy>) -> Self {
        Player {
            strategy,
            history: Vec::new(),
        }
    }

    pub fn name(&self) -> String {
        self.strategy.name()
    }

    pub fn classifier(&self) -> Classifier {
        self.strategy.classifier()
    }

    pub fn is_stochastic(&self) -> bool {
        self.classifier().stochastic
    }

    /// Moves actually played this match (after any noise).
    pub fn history(&self) -> &[Action] {
        &self.history
    }

    /// Choose the next move against an opponent whose moves so far are `opponent_history`.
    ///
    /// The chosen move is not recorded; the match engine records the move that
    /// was actually played via [`Player::record`].
    pub fn act(&mut self, opponent_history: &[Action], rng: &mut dyn RngCore) -> Action {
        self.strategy.decide(&self.history, opponent_history, rng)
    }

    pub fn record(&mut self, action: Action) {
        self.history.push(action);
    }

    /// Restore the pre-match state.
    pub fn reset(&mut self) {
        self.history.clear();
        self.strategy.reset();
    }
}

impl Clone for Player {
    /// Clones are fresh: same strategy parameters, empty history.
    fn clone(&self) -> Self {
        Player::new(self.strategy.boxed_clone())
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("name", &self.name())
            .field("history_len", &self.history.len())
            .finish()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::{Cooperator, TitForTat};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn act_does_not_record() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut player = Player::new(Box::new(Cooperator));
        assert_eq!(player.act(&[], &mut rng), Action::Cooperate);
        assert!(player.history().is_empty());

        player.record(Action::Cooperate);
        assert_eq!(player.history(), &[Action::Cooperate]);
    }

    #[test]
    fn clone_is_history_free() {
        let mut player = Player::new(Box::new(TitForTat));
        player.record(Action::Defect);
        player.record(Action::Cooperate);

        let copy = player.clone();
        assert_eq!(copy.name(), player.name());
        assert!(copy.history().is_empty());
        assert_eq!(player.history().len(), 2);
    }

    #[test]
    fn reset_clears_history() {
        let mut player = Player::new(Box::new(TitForTat));
        player.record(Action::Defect);
        player.reset();
        assert!(player.history().is_empty());
    }

    #[test]
    fn display_uses_strategy_name() {
        let player = Player::new(Box::new(TitForTat));
        assert_eq!(player.to_string(), "Tit For Tat");
        assert!(!player.is_stochastic());
    }
}
