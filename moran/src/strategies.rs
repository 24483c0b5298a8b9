use crate::error::{MoranError, Result};
use crate::player::{Classifier, Strategy};
use crate::Action;
use rand::{Rng, RngCore};

// ============================================================================
// Strategy Implementations
// ============================================================================

/// ALWAYS COOPERATE
#[derive(Clone, Copy, Debug, Default)]
pub struct Cooperator;

impl Strategy for Cooperator {
    fn decide(&mut self, _own: &[Action], _opponent: &[Action], _rng: &mut dyn RngCore) -> Action {
        Action::Cooperate
    }

    fn name(&self) -> String {
        "Cooperator".to_string()
    }

    fn classifier(&self) -> Classifier {
        Classifier::deterministic(Some(0))
    }

    fn boxed_clone(&self) -> Box<dyn Strategy> {
        Box::new(*self)
    }
}

/// ALWAYS DEFECT
#[derive(Clone, Copy, Debug, Default)]
pub struct Defector;

impl Strategy for Defector {
    fn decide(&mut self, _own: &[Action], _opponent: &[Action], _rng: &mut dyn RngCore) -> Action {
        Action::Defect
    }

    fn name(&self) -> String {
        "Defector".to_string()
    }

    fn classifier(&self) -> Classifier {
        Classifier::deterministic(Some(0))
    }

    fn boxed_clone(&self) -> Box<dyn Strategy> {
        Box::new(*self)
    }
}

/// TIT FOR TAT: cooperate on the first move, then copy the opponent's last move
#[derive(Clone, Copy, Debug, Default)]
pub struct TitForTat;

impl Strategy for TitForTat {
    fn decide(&mut self, _own: &[Action], opponent: &[Action], _rng: &mut dyn RngCore) -> Action {
        opponent.last().copied().unwrap_or(Action::Cooperate)
    }

    fn name(&self) -> String {
        "Tit For Tat".to_string()
    }

    fn classifier(&self) -> Classifier {
        Classifier::deterministic(Some(1))
    }

    fn boxed_clone(&self) -> Box<dyn Strategy> {
        Box::new(*self)
    }
}

/// GRUDGER: cooperate until the opponent defects once, then always defect
#[derive(Clone, Copy, Debug, Default)]
pub struct Grudger;

impl Strategy for Grudger {
    fn decide(&mut self, _own: &[Action], opponent: &[Action], _rng: &mut dyn RngCore) -> Action {
        if opponent.contains(&Action::Defect) {
            Action::Defect
        } else {
            Action::Cooperate
        }
    }

    fn name(&self) -> String {
        "Grudger".to_string()
    }

    fn classifier(&self) -> Classifier {
        Classifier::deterministic(None)
    }

    fn boxed_clone(&self) -> Box<dyn Strategy> {
        Box::new(*self)
    }
}

/// ALTERNATOR: C, D, C, D, ...
#[derive(Clone, Copy, Debug, Default)]
pub struct Alternator;

impl Strategy for Alternator {
    fn decide(&mut self, own: &[Action], _opponent: &[Action], _rng: &mut dyn RngCore) -> Action {
        match own.last() {
            Some(Action::Cooperate) => Action::Defect,
            _ => Action::Cooperate,
        }
    }

    fn name(&self) -> String {
        "Alternator".to_string()
    }

    fn classifier(&self) -> Classifier {
        Classifier::deterministic(Some(1))
    }

    fn boxed_clone(&self) -> Box<dyn Strategy> {
        Box::new(*self)
    }
}

/// RANDOM: cooperate with a fixed probability
#[derive(Clone, Copy, Debug)]
pub struct Random {
    cooperation_probability: f64,
}

impl Random {
    pub fn new(cooperation_probability: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&cooperation_probability) {
            return Err(MoranError::InvalidProbability {
                name: "cooperation_probability",
                value: cooperation_probability,
            });
        }
        Ok(Random {
            cooperation_probability,
        })
    }

    pub fn cooperation_probability(&self) -> f64 {
        self.cooperation_probability
    }
}

impl Default for Random {
    fn default() -> Self {
        Random {
            cooperation_probability: 0.5,
        }
    }
}

impl Strategy for Random {
    fn decide(&mut self, _own: &[Action], _opponent: &[Action], rng: &mut dyn RngCore) -> Action {
        if rng.random_bool(self.cooperation_probability) {
            Action::Cooperate
        } else {
            Action::Defect
        }
    }

    fn name(&self) -> String {
        format!("Random: {}", self.cooperation_probability)
    }

    fn classifier(&self) -> Classifier {
        // Degenerate probabilities never actually draw a different move.
        let p = self.cooperation_probability;
        Classifier {
            stochastic: p > 0.0 && p < 1.0,
            memory_depth: Some(0),
        }
    }

    fn boxed_clone(&self) -> Box<dyn Strategy> {
        Box::new(*self)
    }
}

/// HANDSHAKE: open with a fixed sequence (C, D by default). If the opponent
/// opened with the same sequence cooperate forever, otherwise defect forever.
///
/// A non-default opening is part of the name (`"Handshake: DDC"`), so players
/// with different openings count as different strategies.
#[derive(Clone, Debug)]
pub struct Handshake {
    initial_plays: Vec<Action>,
}

impl Handshake {
    /// An empty opening falls back to the default C, D.
    pub fn new(initial_plays: Vec<Action>) -> Self {
        if initial_plays.is_empty() {
            return Handshake::default();
        }
        Handshake { initial_plays }
    }

    pub fn initial_plays(&self) -> &[Action] {
        &self.initial_plays
    }
}

impl Default for Handshake {
    fn default() -> Self {
        Handshake {
            initial_plays: vec![Action::Cooperate, Action::Defect],
        }
    }
}

impl Strategy for Handshake {
    fn decide(&mut self, own: &[Action], opponent: &[Action], _rng: &mut dyn RngCore) -> Action {
        if let Some(&action) = self.initial_plays.get(own.len()) {
            return action;
        }
        if opponent.get(..self.initial_plays.len()) == Some(self.initial_plays.as_slice()) {
            Action::Cooperate
        } else {
            Action::Defect
        }
    }

    fn name(&self) -> String {
        if self.initial_plays == Handshake::default().initial_plays {
            return "Handshake".to_string();
        }
        let opening: String = self
            .initial_plays
            .iter()
            .map(|action| match action {
                Action::Cooperate => 'C',
                Action::Defect => 'D',
            })
            .collect();
        format!("Handshake: {opening}")
    }

    fn classifier(&self) -> Classifier {
        Classifier::deterministic(None)
    }

    fn boxed_clone(&self) -> Box<dyn Strategy> {
        Box::new(self.clone())
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Build a strategy from its display name.
///
/// `"Random"` means a fair coin; `"Random: 0.2"` sets the cooperation probability.
/// `"Handshake: DDC"` sets the handshake opening.
pub fn from_name(name: &str) -> Result<Box<dyn Strategy>> {
    let trimmed = name.trim();
    match trimmed {
        "Cooperator" => Ok(Box::new(Cooperator)),
        "Defector" => Ok(Box::new(Defector)),
        "Tit For Tat" => Ok(Box::new(TitForTat)),
        "Grudger" => Ok(Box::new(Grudger)),
        "Alternator" => Ok(Box::new(Alternator)),
        "Handshake" => Ok(Box::new(Handshake::default())),
        "Random" => Ok(Box::new(Random::default())),
        _ => {
            let unknown = || MoranError::UnknownStrategy(trimmed.to_string());
            if let Some(opening) = trimmed.strip_prefix("Handshake:") {
                return handshake_opening(opening.trim())
                    .map(|plays| Box::new(Handshake::new(plays)) as Box<dyn Strategy>)
                    .ok_or_else(unknown);
            }
            let p = trimmed
                .strip_prefix("Random:")
                .and_then(|rest| rest.trim().parse::<f64>().ok())
                .ok_or_else(unknown)?;
            Ok(Box::new(Random::new(p)?))
        }
    }
}

/// Parse an opening such as `"DDC"`. Empty or unrecognised openings give `None`.
fn handshake_opening(opening: &str) -> Option<Vec<Action>> {
    if opening.is_empty() {
        return None;
    }
    opening
        .chars()
        .map(|c| match c {
            'C' => Some(Action::Cooperate),
            'D' => Some(Action::Defect),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Action::{Cooperate as C, Defect as D};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn tit_for_tat_copies_last_move() {
        let mut s = TitForTat;
        assert_eq!(s.decide(&[], &[], &mut rng()), C);
        assert_eq!(s.decide(&[C], &[D], &mut rng()), D);
        assert_eq!(s.decide(&[C, D], &[D, C], &mut rng()), C);
    }

    #[test]
    fn grudger_never_forgives() {
        let mut s = Grudger;
        assert_eq!(s.decide(&[], &[], &mut rng()), C);
        assert_eq!(s.decide(&[C, C], &[D, C], &mut rng()), D);
    }

    #[test]
    fn alternator_alternates() {
        let mut s = Alternator;
        assert_eq!(s.decide(&[], &[], &mut rng()), C);
        assert_eq!(s.decide(&[C], &[], &mut rng()), D);
        assert_eq!(s.decide(&[C, D], &[], &mut rng()), C);
    }

    #[test]
    fn handshake_opens_then_commits() {
        let mut s = Handshake::default();
        assert_eq!(s.decide(&[], &[], &mut rng()), C);
        assert_eq!(s.decide(&[C], &[C], &mut rng()), D);
        // Opponent mirrored the handshake
        assert_eq!(s.decide(&[C, D], &[C, D], &mut rng()), C);
        assert_eq!(s.decide(&[C, D, C], &[C, D, C], &mut rng()), C);
        // Opponent did not
        assert_eq!(s.decide(&[C, D], &[C, C], &mut rng()), D);
        assert_eq!(s.decide(&[C, D, D], &[D, D, C], &mut rng()), D);
    }

    #[test]
    fn handshake_custom_opening() {
        let mut s = Handshake::new(vec![D, D, C]);
        assert_eq!(s.decide(&[], &[], &mut rng()), D);
        assert_eq!(s.decide(&[D, D], &[D, D], &mut rng()), C);
        assert_eq!(s.decide(&[D, D, C], &[D, D, C], &mut rng()), C);
        assert_eq!(s.decide(&[D, D, C], &[D, D, D], &mut rng()), D);
        assert_eq!(Handshake::new(vec![]).initial_plays(), &[C, D]);
    }

    #[test]
    fn handshake_opening_is_part_of_the_name() {
        assert_eq!(Handshake::default().name(), "Handshake");
        assert_eq!(Handshake::new(vec![C, D]).name(), "Handshake");
        assert_eq!(Handshake::new(vec![D, D, C]).name(), "Handshake: DDC");
        assert_ne!(Handshake::new(vec![D]).name(), Handshake::default().name());
    }

    #[test]
    fn random_extremes_are_deterministic() {
        let mut always = Random::new(1.0).unwrap();
        let mut never = Random::new(0.0).unwrap();
        let mut rng = rng();
        for _ in 0..20 {
            assert_eq!(always.decide(&[], &[], &mut rng), C);
            assert_eq!(never.decide(&[], &[], &mut rng), D);
        }
        assert!(!always.classifier().stochastic);
        assert!(Random::default().classifier().stochastic);
    }

    #[test]
    fn random_rejects_bad_probability() {
        assert!(Random::new(1.5).is_err());
        assert!(Random::new(-0.1).is_err());
    }

    #[test]
    fn registry_round_trips_names() {
        for name in [
            "Cooperator",
            "Defector",
            "Tit For Tat",
            "Grudger",
            "Alternator",
            "Handshake",
            "Random: 0.5",
            "Handshake: DDC",
        ] {
            assert_eq!(from_name(name).unwrap().name(), name);
        }
        assert_eq!(from_name("Random").unwrap().name(), "Random: 0.5");
        assert_eq!(from_name("Random: 0.25").unwrap().name(), "Random: 0.25");
    }

    #[test]
    fn registry_rejects_unknown() {
        assert!(matches!(
            from_name("Mind Reader"),
            Err(MoranError::UnknownStrategy(_))
        ));
        assert!(matches!(
            from_name("Handshake: CX"),
            Err(MoranError::UnknownStrategy(_))
        ));
        assert!(from_name("Handshake:").is_err());
        assert!(matches!(
            from_name("Random: 2"),
            Err(MoranError::InvalidProbability { .. })
        ));
    }
}
