use log::debug;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;

use crate::bitstream::{BitStream, BitWriter};
use crate::code_table::CodeTable;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyModel;
use crate::tree::{HuffmanTree, TreeNode};

pub fn build_frequency_model<Symbol>(symbols: impl IntoIterator<Item = Symbol>) -> FrequencyModel<Symbol>
where
    Symbol: Hash + Eq + Clone + Debug,
{
    FrequencyModel::build(symbols)
}

pub fn build_huffman_tree<Symbol>(model: &FrequencyModel<Symbol>) -> HuffmanTree<Symbol>
where
    Symbol: Hash + Eq + Clone + Debug,
{
    HuffmanTree::build(model)
}

pub fn derive_code_table<Symbol>(tree: &HuffmanTree<Symbol>) -> CodeTable<Symbol>
where
    Symbol: Hash + Eq + Clone + Debug,
{
    CodeTable::derive(tree)
}

/// Concatenates the codes of `symbols`.
///
/// Fails on the first symbol `table` has no code for.
pub fn encode<Symbol, I>(symbols: I, table: &CodeTable<Symbol>) -> Result<BitStream>
where
    Symbol: Hash + Eq + Clone + Debug,
    I: IntoIterator,
    I::Item: Borrow<Symbol>,
{
    let mut writer = BitWriter::new();
    let mut count = 0;
    for s in symbols {
        writer.append_bits(table.encode(s.borrow())?);
        count += 1;
    }

    debug!("Encoded {} symbols into {} bits", count, writer.len());
    Ok(writer.finish())
}

/// Walks `tree` from the root, one bit at a time, emitting a symbol at every
/// leaf.
///
/// A stream that ends between the root and a leaf is corrupt. With a
/// single-leaf tree every bit must be the code `0`.
pub fn decode<Symbol>(stream: &BitStream, tree: &HuffmanTree<Symbol>) -> Result<Vec<Symbol>>
where
    Symbol: Clone,
{
    let mut reader = stream.reader();
    let mut out = Vec::new();

    let root = match tree.root() {
        Some(root) => root,
        None if stream.is_empty() => return Ok(out),
        None => {
            return HuffmanError::raise_corrupt_stream(format!(
                "{} bits given for an empty tree",
                stream.len()
            ))
        }
    };

    if let TreeNode::Leaf { symbol, .. } = root {
        while reader.remaining() > 0 {
            if reader.next_bit()? {
                return HuffmanError::raise_corrupt_stream(format!(
                    "bit {} is not the single-symbol code",
                    reader.position() - 1
                ));
            }
            out.push(symbol.clone());
        }

        debug!("Decoded {} bits into {} symbols", stream.len(), out.len());
        return Ok(out);
    }

    let mut node = root;
    let mut pending = 0;
    while reader.remaining() > 0 {
        let bit = reader.next_bit()?;
        pending += 1;

        node = match node.child(bit) {
            Some(next) => next,
            None => return HuffmanError::raise_corrupt_stream("descended past a leaf"),
        };

        if let TreeNode::Leaf { symbol, .. } = node {
            out.push(symbol.clone());
            node = root;
            pending = 0;
        }
    }

    if pending > 0 {
        return HuffmanError::raise_corrupt_stream(format!(
            "stream ends {} bits into a code",
            pending
        ));
    }

    debug!("Decoded {} bits into {} symbols", stream.len(), out.len());
    Ok(out)
}

/// A tree and the code table derived from it.
#[derive(Debug, Clone)]
pub struct HuffmanCodec<Symbol> {
    tree: HuffmanTree<Symbol>,
    table: CodeTable<Symbol>,
}

impl<Symbol> HuffmanCodec<Symbol>
where
    Symbol: Hash + Eq + Clone + Debug,
{
    pub fn new(model: &FrequencyModel<Symbol>) -> Self {
        Self::from_tree(HuffmanTree::build(model))
    }

    pub fn from_tree(tree: HuffmanTree<Symbol>) -> Self {
        let table = CodeTable::derive(&tree);
        Self { tree, table }
    }

    pub fn from_symbols(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Self::new(&FrequencyModel::build(symbols))
    }

    pub fn encode<I>(&self, symbols: I) -> Result<BitStream>
    where
        I: IntoIterator,
        I::Item: Borrow<Symbol>,
    {
        encode(symbols, &self.table)
    }

    pub fn decode(&self, stream: &BitStream) -> Result<Vec<Symbol>> {
        decode(stream, &self.tree)
    }

    /// Decodes the `'0'`/`'1'` rendering of a stream.
    pub fn decode_str(&self, bits: &str) -> Result<Vec<Symbol>> {
        self.decode(&bits.parse()?)
    }
}

impl<Symbol> HuffmanCodec<Symbol> {
    pub fn tree(&self) -> &HuffmanTree<Symbol> {
        &self.tree
    }

    pub fn table(&self) -> &CodeTable<Symbol> {
        &self.table
    }
}

// only the tree is stored, the table is derived again on load
impl<Symbol> Serialize for HuffmanCodec<Symbol>
where
    Symbol: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.tree.serialize(serializer)
    }
}

impl<'de, Symbol> Deserialize<'de> for HuffmanCodec<Symbol>
where
    Symbol: Deserialize<'de> + Hash + Eq + Clone + Debug,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        HuffmanTree::deserialize(deserializer).map(Self::from_tree)
    }
}

/// Builds a codec for the alphabet and frequencies of `symbols`.
pub fn huffman<Symbol>(symbols: impl IntoIterator<Item = Symbol>) -> HuffmanCodec<Symbol>
where
    Symbol: Hash + Eq + Clone + Debug,
{
    HuffmanCodec::from_symbols(symbols)
}
