use crate::error::{MoranError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Who plays whom in a generation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Topology {
    /// Every unordered pair of slots plays once.
    #[default]
    Complete,
    /// Only the listed slot pairs play. Edges are undirected.
    Graph { edges: Vec<(usize, usize)> },
}

impl Topology {
    /// Check the graph against a population of `num_players` slots.
    pub fn validate(&self, num_players: usize) -> Result<()> {
        if let Topology::Graph { edges } = self {
            for &(a, b) in edges {
                if a >= num_players || b >= num_players {
                    return Err(MoranError::InvalidTopology(format!(
                        "edge ({a}, {b}) out of range for {num_players} players"
                    )));
                }
                if a == b {
                    return Err(MoranError::InvalidTopology(format!("self loop on {a}")));
                }
            }
        }
        Ok(())
    }

    /// Match pairings `(i, j)` with `i < j`, in a stable order.
    ///
    /// Duplicate and reversed edges collapse into a single match.
    pub fn pairs(&self, num_players: usize) -> Vec<(usize, usize)> {
        match self {
            Topology::Complete => {
                let mut pairs = Vec::new();
                for i in 0..num_players {
                    for j in (i + 1)..num_players {
                        pairs.push((i, j));
                    }
                }
                pairs
            }
            Topology::Graph { edges } => edges
                .iter()
                .map(|&(a, b)| (a.min(b), a.max(b)))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_is_round_robin() {
        assert_eq!(
            Topology::Complete.pairs(4),
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
        assert!(Topology::Complete.pairs(1).is_empty());
    }

    #[test]
    fn graph_pairs_are_normalised() {
        let topology = Topology::Graph {
            edges: vec![(2, 1), (0, 1), (1, 2), (1, 0)],
        };
        assert_eq!(topology.pairs(3), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn graph_validation() {
        let ring = Topology::Graph {
            edges: vec![(0, 1), (1, 2), (2, 0)],
        };
        assert!(ring.validate(3).is_ok());
        assert!(ring.validate(2).is_err());

        let looped = Topology::Graph {
            edges: vec![(1, 1)],
        };
        assert!(matches!(
            looped.validate(3),
            Err(MoranError::InvalidTopology(_))
        ));
    }
}
