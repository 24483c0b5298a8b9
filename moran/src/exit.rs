use crate::player::Player;

/// Why a process stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Every slot holds the same strategy.
    Fixation { winner: String },
    /// The generation ceiling was reached first. There is no winner.
    GenerationLimit { generations: usize },
}

impl Termination {
    pub fn winner(&self) -> Option<&str> {
        match self {
            Termination::Fixation { winner } => Some(winner),
            Termination::GenerationLimit { .. } => None,
        }
    }
}

/// Decides whether a population has finished evolving. Never mutates it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExitCondition {
    max_generations: Option<usize>,
}

impl ExitCondition {
    pub fn new(max_generations: Option<usize>) -> Self {
        ExitCondition { max_generations }
    }

    /// Fixation wins over the ceiling when both hold at the same generation.
    pub fn evaluate(&self, players: &[Player], generation: usize) -> Option<Termination> {
        if let Some(winner) = homogeneous_strategy(players) {
            return Some(Termination::Fixation { winner });
        }
        match self.max_generations {
            Some(limit) if generation >= limit => Some(Termination::GenerationLimit {
                generations: generation,
            }),
            _ => None,
        }
    }
}

/// The shared strategy name if every player has the same one.
pub fn homogeneous_strategy(players: &[Player]) -> Option<String> {
    let (first, rest) = players.split_first()?;
    let name = first.name();
    rest.iter().all(|p| p.name() == name).then_some(name)
}
