//! Counting symbol occurrences.

use derivative::Derivative;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{HuffmanError, Result};

/// Number of occurrences of each distinct symbol of an input sequence.
///
/// Symbols are kept in the order of their first occurrence. Tree construction
/// relies on this order to break ties between equal weights, so two models
/// built from the same input always produce the same tree.
#[derive(Debug, Clone, Derivative)]
#[derivative(PartialEq, Eq)]
pub struct FrequencyModel<Symbol> {
    counts: Vec<(Symbol, usize)>,

    #[derivative(PartialEq = "ignore")]
    index: HashMap<Symbol, usize>,

    #[derivative(PartialEq = "ignore")]
    total: usize,
}

impl<Symbol> FrequencyModel<Symbol>
where
    Symbol: Hash + Eq + Clone + Debug,
{
    /// Counts every symbol exposed by `symbols`.
    pub fn build(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        let mut model = Self::default();
        for s in symbols {
            model.count_one(s);
        }

        model
    }

    /// Builds a model from explicit `(symbol, count)` pairs, in the given order.
    ///
    /// Fails if a count is zero, a symbol is listed twice or the counts add up
    /// past `usize::MAX`.
    pub fn from_counts(counts: impl IntoIterator<Item = (Symbol, usize)>) -> Result<Self> {
        let mut model = Self::default();
        for (s, count) in counts {
            if count == 0 {
                return HuffmanError::raise_construction(format!("symbol {:?} has zero count", s));
            }

            if model.index.contains_key(&s) {
                return HuffmanError::raise_construction(format!("symbol {:?} listed twice", s));
            }

            model.total = match model.total.checked_add(count) {
                Some(total) => total,
                None => return HuffmanError::raise_construction("total count overflows"),
            };
            model.index.insert(s.clone(), model.counts.len());
            model.counts.push((s, count));
        }

        Ok(model)
    }

    fn count_one(&mut self, s: Symbol) {
        self.total += 1;
        match self.index.get(&s) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(s.clone(), self.counts.len());
                self.counts.push((s, 1));
            }
        }
    }

    /// Number of occurrences of `symbol`, zero if it never occurred.
    pub fn count(&self, symbol: &Symbol) -> usize {
        self.index.get(symbol).map_or(0, |&i| self.counts[i].1)
    }

    /// Fraction of the input made up by `symbol`.
    pub fn probability(&self, symbol: &Symbol) -> f64 {
        if self.total == 0 {
            return 0.0;
        }

        self.count(symbol) as f64 / self.total as f64
    }

    /// Shannon entropy of the counted symbols, in bits per symbol.
    pub fn entropy(&self) -> f64 {
        let total = self.total as f64;
        -self
            .counts
            .iter()
            .map(|(_, c)| {
                let p = *c as f64 / total;
                p * p.log2()
            })
            .sum::<f64>()
    }
}

impl<Symbol> FrequencyModel<Symbol> {
    /// Length of the counted input.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(symbol, count)` pairs in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, usize)> {
        self.counts.iter().map(|(s, c)| (s, *c))
    }
}

impl<Symbol> Default for FrequencyModel<Symbol> {
    fn default() -> Self {
        Self {
            counts: Vec::new(),
            index: HashMap::new(),
            total: 0,
        }
    }
}

// serialized as the ordered list of (symbol, count) pairs
impl<Symbol> Serialize for FrequencyModel<Symbol>
where
    Symbol: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.counts.serialize(serializer)
    }
}

impl<'de, Symbol> Deserialize<'de> for FrequencyModel<Symbol>
where
    Symbol: Deserialize<'de> + Hash + Eq + Clone + Debug,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let counts = Vec::<(Symbol, usize)>::deserialize(deserializer)?;
        Self::from_counts(counts).map_err(serde::de::Error::custom)
    }
}
