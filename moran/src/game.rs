use crate::error::Result;
use crate::player::Player;
use crate::{Action, Game};
use rand::{Rng, RngCore};

// ============================================================================
// Match Outcome
// ============================================================================

/// Per-round payoffs of a finished match, `(player_a, player_b)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchOutcome {
    pub rounds: Vec<(f64, f64)>,
}

impl MatchOutcome {
    pub fn turns(&self) -> usize {
        self.rounds.len()
    }

    pub fn totals(&self) -> (f64, f64) {
        self.rounds
            .iter()
            .fold((0.0, 0.0), |(a, b), (ra, rb)| (a + ra, b + rb))
    }

    /// Total payoff divided by the number of turns. This is the fitness a
    /// match contributes to each player.
    pub fn mean_scores(&self) -> (f64, f64) {
        if self.rounds.is_empty() {
            return (0.0, 0.0);
        }
        let (a, b) = self.totals();
        let turns = self.rounds.len() as f64;
        (a / turns, b / turns)
    }
}

// ============================================================================
// Match Engine
// ============================================================================

/// Plays an iterated game between two players.
///
/// Errors from players or the engine itself are returned as-is; the Moran
/// process does not try to recover from them.
pub trait MatchEngine: Send + Sync {
    fn play(
        &self,
        player_a: &mut Player,
        player_b: &mut Player,
        turns: usize,
        noise: f64,
        rng: &mut dyn RngCore,
    ) -> Result<MatchOutcome>;
}

/// Standard iterated prisoner's dilemma.
///
/// Both players are reset before the first round. With `noise > 0` each
/// intended move is flipped independently with probability `noise`.
#[derive(Clone, Copy, Debug, Default)]
pub struct IteratedMatch {
    pub game: Game,
}

impl IteratedMatch {
    pub fn new(game: Game) -> Self {
        IteratedMatch { game }
    }

    fn apply_noise(action: Action, noise: f64, rng: &mut dyn RngCore) -> Action {
        if noise > 0.0 && rng.random_bool(noise) {
            action.flip()
        } else {
            action
        }
    }
}

impl MatchEngine for IteratedMatch {
    fn play(
        &self,
        player_a: &mut Player,
        player_b: &mut Player,
        turns: usize,
        noise: f64,
        rng: &mut dyn RngCore,
    ) -> Result<MatchOutcome> {
        player_a.reset();
        player_b.reset();

        let mut rounds = Vec::with_capacity(turns);
        for _ in 0..turns {
            // Both decide before either move is recorded
            let intended_a = player_a.act(player_b.history(), rng);
            let intended_b = player_b.act(player_a.history(), rng);

            let played_a = Self::apply_noise(intended_a, noise, rng);
            let played_b = Self::apply_noise(intended_b, noise, rng);

            player_a.record(played_a);
            player_b.record(played_b);
            rounds.push(self.game.scores(played_a, played_b));
        }

        Ok(MatchOutcome { rounds })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::{Alternator, Cooperator, Defector, Handshake, TitForTat};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn play(a: &mut Player, b: &mut Player, turns: usize, noise: f64, seed: u64) -> MatchOutcome {
        let mut rng = StdRng::seed_from_u64(seed);
        IteratedMatch::default()
            .play(a, b, turns, noise, &mut rng)
            .unwrap()
    }

    #[test]
    fn cooperator_against_defector() {
        let mut a = Player::new(Box::new(Cooperator));
        let mut b = Player::new(Box::new(Defector));
        let outcome = play(&mut a, &mut b, 5, 0.0, 1);

        assert_eq!(outcome.turns(), 5);
        assert_eq!(outcome.totals(), (0.0, 25.0));
        assert_eq!(outcome.mean_scores(), (0.0, 5.0));
        assert_eq!(a.history(), &[Action::Cooperate; 5]);
        assert_eq!(b.history(), &[Action::Defect; 5]);
    }

    #[test]
    fn tit_for_tat_against_alternator() {
        let mut a = Player::new(Box::new(TitForTat));
        let mut b = Player::new(Box::new(Alternator));
        let outcome = play(&mut a, &mut b, 4, 0.0, 1);

        // TFT: C C D C, Alternator: C D C D
        assert_eq!(
            outcome.rounds,
            vec![(3.0, 3.0), (0.0, 5.0), (5.0, 0.0), (0.0, 5.0)]
        );
    }

    #[test]
    fn handshakes_recognise_each_other() {
        let mut a = Player::new(Box::new(Handshake::default()));
        let mut b = Player::new(Box::new(Handshake::default()));
        let outcome = play(&mut a, &mut b, 10, 0.0, 1);

        // C/C, D/D, then mutual cooperation
        let (total_a, total_b) = outcome.totals();
        assert_relative_eq!(total_a, 3.0 + 1.0 + 8.0 * 3.0);
        assert_relative_eq!(total_b, total_a);
    }

    #[test]
    fn players_are_reset_between_matches() {
        let mut a = Player::new(Box::new(TitForTat));
        let mut b = Player::new(Box::new(Defector));
        play(&mut a, &mut b, 3, 0.0, 1);
        play(&mut a, &mut b, 3, 0.0, 1);
        assert_eq!(a.history().len(), 3);
        assert_eq!(a.history()[0], Action::Cooperate);
    }

    #[test]
    fn full_noise_flips_every_move() {
        let mut a = Player::new(Box::new(Cooperator));
        let mut b = Player::new(Box::new(Cooperator));
        let outcome = play(&mut a, &mut b, 10, 1.0, 3);
        assert_eq!(outcome.totals(), (10.0, 10.0));
        assert!(a.history().iter().all(|&m| m == Action::Defect));
    }

    #[test]
    fn noisy_matches_replay_under_the_same_seed() {
        let run = |seed| {
            let mut a = Player::new(Box::new(TitForTat));
            let mut b = Player::new(Box::new(Cooperator));
            play(&mut a, &mut b, 50, 0.1, seed)
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn empty_match_has_zero_means() {
        assert_eq!(MatchOutcome::default().mean_scores(), (0.0, 0.0));
    }
}
