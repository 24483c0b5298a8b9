/// Errors raised while building or driving a Moran process.
#[derive(Debug, thiserror::Error)]
pub enum MoranError {
    #[error("a Moran process needs at least 2 players, got {0}")]
    TooFewPlayers(usize),
    #[error("cannot select from an empty weight sequence")]
    EmptyWeights,
    #[error("weight at index {index} is not a finite non-negative number: {value}")]
    InvalidWeight { index: usize, value: f64 },
    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("payoff {name} must be finite, got {value}")]
    InvalidPayoff { name: &'static str, value: f64 },
    #[error("matches need at least one turn")]
    InvalidTurns,
    #[error("invalid interaction graph: {0}")]
    InvalidTopology(String),
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
    /// A failure raised by a match engine or one of its players, passed through untouched.
    #[error(transparent)]
    Match(Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, MoranError>;
