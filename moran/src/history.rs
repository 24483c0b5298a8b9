use serde::Serialize;
use std::collections::BTreeMap;

/// Snapshot of one played generation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerationRecord {
    /// 1 for the first played generation; generation 0 is the starting population.
    pub generation: usize,
    /// Fitness of every slot, as computed before replacement.
    pub scores: Vec<f64>,
    /// Strategy name in every slot after replacement.
    pub population: Vec<String>,
    pub reproduced: usize,
    pub removed: usize,
    pub mutated: bool,
}

impl GenerationRecord {
    pub fn distribution(&self) -> BTreeMap<String, usize> {
        distribution(&self.population)
    }
}

/// Append-only log of generations, plus the starting composition.
#[derive(Clone, Debug, Default)]
pub struct History {
    initial: Vec<String>,
    records: Vec<GenerationRecord>,
}

impl History {
    pub fn new(initial: Vec<String>) -> Self {
        History {
            initial,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, record: GenerationRecord) {
        self.records.push(record);
    }

    /// Drop every played generation, keeping the starting composition.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[GenerationRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&GenerationRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn initial(&self) -> &[String] {
        &self.initial
    }

    pub fn score_history(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.records.iter().map(|r| r.scores.as_slice())
    }

    /// Strategy counts per generation, starting with generation 0.
    pub fn populations(&self) -> Vec<BTreeMap<String, usize>> {
        std::iter::once(distribution(&self.initial))
            .chain(self.records.iter().map(GenerationRecord::distribution))
            .collect()
    }
}

pub fn distribution(names: &[String]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for name in names {
        *counts.entry(name.clone()).or_insert(0) += 1;
    }
    counts
}
