use bitvec::prelude::*;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::bitstream::Code;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyModel;
use crate::tree::{HuffmanTree, TreeNode};

/// Symbol to code mapping derived from a [`HuffmanTree`].
#[derive(Debug, Clone)]
pub struct CodeTable<Symbol> {
    encode_table: HashMap<Symbol, Code>,
}

impl<Symbol> CodeTable<Symbol>
where
    Symbol: Hash + Eq + Clone + Debug,
{
    /// Collects the path to every leaf, `0` for a left edge and `1` for a
    /// right edge. A lone root leaf gets the code `0`.
    pub fn derive(tree: &HuffmanTree<Symbol>) -> Self {
        fn traverse<Symbol: Hash + Eq + Clone>(
            node: &TreeNode<Symbol>,
            v: &mut BitVec<u8, Msb0>,
            enc: &mut HashMap<Symbol, Code>,
        ) {
            match node {
                TreeNode::Leaf { symbol, .. } => {
                    enc.insert(symbol.clone(), v.clone().into_boxed_bitslice());
                }
                TreeNode::Internal { left, right, .. } => {
                    v.push(false);
                    traverse(left, v, enc);
                    v.pop();

                    v.push(true);
                    traverse(right, v, enc);
                    v.pop();
                }
            }
        }

        let mut encode_table = HashMap::new();
        match tree.root() {
            None => {}
            Some(TreeNode::Leaf { symbol, .. }) => {
                encode_table.insert(symbol.clone(), bitbox![u8, Msb0; 0]);
            }
            Some(root) => traverse(root, &mut BitVec::new(), &mut encode_table),
        }

        Self { encode_table }
    }

    pub fn code(&self, symbol: &Symbol) -> Option<&BitSlice<u8, Msb0>> {
        self.encode_table.get(symbol).map(|c| c.as_bitslice())
    }

    /// Like [`code`](Self::code), failing for symbols the table was not built with.
    pub fn encode(&self, symbol: &Symbol) -> Result<&BitSlice<u8, Msb0>> {
        match self.code(symbol) {
            Some(code) => Ok(code),
            None => HuffmanError::raise_unknown_symbol(symbol),
        }
    }

    /// Mean code length in bits, weighted by the counts of `model`.
    pub fn average_code_length(&self, model: &FrequencyModel<Symbol>) -> f64 {
        if model.total() == 0 {
            return 0.0;
        }

        let bits: usize = model
            .iter()
            .map(|(s, count)| count * self.code(s).map_or(0, |c| c.len()))
            .sum();

        bits as f64 / model.total() as f64
    }
}

impl<Symbol> CodeTable<Symbol> {
    pub fn len(&self) -> usize {
        self.encode_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encode_table.is_empty()
    }

    /// All `(symbol, code)` pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &BitSlice<u8, Msb0>)> {
        self.encode_table.iter().map(|(s, c)| (s, c.as_bitslice()))
    }
}

impl<Symbol> PartialEq for CodeTable<Symbol>
where
    Symbol: Hash + Eq,
{
    fn eq(&self, other: &Self) -> bool {
        self.encode_table == other.encode_table
    }
}

impl<Symbol> Eq for CodeTable<Symbol> where Symbol: Hash + Eq {}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_of(s: &str) -> (FrequencyModel<char>, CodeTable<char>) {
        let model = FrequencyModel::build(s.chars());
        let table = CodeTable::derive(&HuffmanTree::build(&model));
        (model, table)
    }

    fn render(bits: &BitSlice<u8, Msb0>) -> String {
        bits.iter().by_vals().map(|b| if b { '1' } else { '0' }).collect()
    }

    #[test]
    fn derive_empty() {
        let (_, table) = table_of("");

        assert!(table.is_empty());
        assert!(table.code(&'a').is_none());
    }

    #[test]
    fn derive_single_symbol() {
        let (_, table) = table_of("aaaa");

        assert_eq!(table.len(), 1);
        assert_eq!(render(table.encode(&'a').unwrap()), "0");
    }

    #[test]
    fn derive_follows_tree_paths() {
        let (_, table) = table_of("abc");

        assert_eq!(render(table.encode(&'c').unwrap()), "0");
        assert_eq!(render(table.encode(&'a').unwrap()), "10");
        assert_eq!(render(table.encode(&'b').unwrap()), "11");
    }

    #[test]
    fn encode_unknown_symbol() {
        let (_, table) = table_of("abc");

        assert_eq!(
            table.encode(&'z').unwrap_err(),
            HuffmanError::UnknownSymbol {
                symbol: String::from("'z'")
            }
        );
    }

    #[test]
    fn codes_are_prefix_free() {
        let (_, table) = table_of("This is a test, only a test. Please continue about your DAY!");

        for (a, code_a) in table.iter() {
            for (b, code_b) in table.iter() {
                if a != b {
                    assert!(!code_b.starts_with(code_a), "{:?} is a prefix of {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn every_symbol_gets_a_code() {
        let s = "the quick brown fox jumps over the lazy dog";
        let (model, table) = table_of(s);

        assert_eq!(table.len(), model.len());
        assert!(model.iter().all(|(sym, _)| table.code(sym).is_some()));
    }

    #[test]
    fn derive_is_deterministic() {
        let s = "aabbccddeeff";

        assert_eq!(table_of(s).1, table_of(s).1);
    }

    #[test]
    fn average_code_length_bounds() {
        let (model, table) = table_of("This is a test, only a test. Please continue about your DAY!");
        let avg = table.average_code_length(&model);

        assert!(avg >= model.entropy());
        assert!(avg < model.entropy() + 1.0);
    }
}
