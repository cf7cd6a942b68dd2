use super::variant::VariantKey;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Scores observed for every accepted design variant.
///
/// Lists are append-only and keep arrival order. Keys remember the order in which they
/// were first recorded, which is the order used for serialization and for breaking ties
/// when ranking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreTable {
    entries: Vec<(VariantKey, Vec<f64>)>,
    index: HashMap<VariantKey, usize>,
}

/// One row of the score table after ranking by best (lowest) observed score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedVariant<'a> {
    pub rank: usize,
    pub key: &'a VariantKey,
    pub min_score: f64,
    pub observations: usize,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `score` to the list for `key`, creating the list if the key is new.
    pub fn record(&mut self, key: VariantKey, score: f64) {
        if let Some(&slot) = self.index.get(&key) {
            self.entries[slot].1.push(score);
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, vec![score]));
        }
    }

    pub fn get(&self, key: &VariantKey) -> Option<&[f64]> {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].1.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_observations(&self) -> usize {
        self.entries.iter().map(|(_, scores)| scores.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&VariantKey, &[f64])> {
        self.entries
            .iter()
            .map(|(key, scores)| (key, scores.as_slice()))
    }

    /// Orders every variant by the minimum of its score list, ascending.
    ///
    /// The sort is stable: variants with equal minima keep their first-insertion order.
    pub fn ranked(&self) -> Vec<RankedVariant<'_>> {
        let mut ranked: Vec<RankedVariant<'_>> = self
            .entries
            .iter()
            .map(|(key, scores)| RankedVariant {
                rank: 0,
                key,
                min_score: min_score(scores),
                observations: scores.len(),
            })
            .collect();
        ranked.sort_by(|a, b| a.min_score.total_cmp(&b.min_score));
        for (rank, entry) in ranked.iter_mut().enumerate() {
            entry.rank = rank;
        }
        ranked
    }
}

fn min_score(scores: &[f64]) -> f64 {
    scores.iter().copied().fold(f64::INFINITY, f64::min)
}

impl Serialize for ScoreTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, scores) in &self.entries {
            map.serialize_entry(&key.to_string(), scores)?;
        }
        map.end()
    }
}
