use derivative::Derivative;
use log::{debug, trace};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyModel;

/// Deepest tree [`HuffmanTree::from_root`] accepts. Tree walks recurse once per
/// level. A tree built from counts that fit in a `u64` is at most 92 levels
/// deep, since its weights grow at least as fast as the Fibonacci numbers.
pub const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeNode<Symbol> {
    Leaf {
        symbol: Symbol,
        weight: usize,
    },
    Internal {
        weight: usize,
        left: Box<TreeNode<Symbol>>,
        right: Box<TreeNode<Symbol>>,
    },
}

impl<Symbol> TreeNode<Symbol> {
    fn leaf(symbol: Symbol, weight: usize) -> Self {
        TreeNode::Leaf { symbol, weight }
    }

    fn from_children(left: TreeNode<Symbol>, right: TreeNode<Symbol>) -> Self {
        TreeNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> usize {
        match self {
            TreeNode::Leaf { weight, .. } => *weight,
            TreeNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    /// Follows one edge: `false` goes left, `true` goes right.
    /// Leaves have no children.
    pub fn child(&self, bit: bool) -> Option<&TreeNode<Symbol>> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Internal { left, right, .. } => Some(if bit { right } else { left }),
        }
    }

    fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

/// Entry of the merge queue, ordered by weight and then by creation order.
#[derive(Debug, Derivative)]
#[derivative(PartialEq, Eq, PartialOrd, Ord)]
struct Pending<Symbol> {
    weight: usize,
    order: usize,

    #[derivative(PartialEq = "ignore")]
    #[derivative(PartialOrd = "ignore")]
    #[derivative(Ord = "ignore")]
    node: TreeNode<Symbol>,
}

impl<Symbol> Pending<Symbol> {
    fn new(node: TreeNode<Symbol>, order: usize) -> Self {
        Self {
            weight: node.weight(),
            order,
            node,
        }
    }
}

/// Binary prefix-code tree.
///
/// Built once and never modified. An empty tree only codes the empty sequence,
/// a tree whose root is a leaf codes its single symbol as `0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree<Symbol> {
    root: Option<TreeNode<Symbol>>,
}

impl<Symbol> HuffmanTree<Symbol>
where
    Symbol: Hash + Eq + Clone + Debug,
{
    /// Greedy minimum-weight merge over the symbols of `model`.
    ///
    /// Ties between equal weights go to the node created first: leaves in the
    /// model's first-occurrence order, then internal nodes in merge order. The
    /// first node taken becomes the left child.
    pub fn build(model: &FrequencyModel<Symbol>) -> Self {
        debug!(
            "Building tree from {} distinct symbols, total weight {}",
            model.len(),
            model.total()
        );

        let mut pq: BinaryHeap<_> = model
            .iter()
            .enumerate()
            .map(|(order, (s, count))| Reverse(Pending::new(TreeNode::leaf(s.clone(), count), order)))
            .collect();

        let mut next_order = pq.len();
        let root = loop {
            match (pq.pop(), pq.pop()) {
                (Some(Reverse(left)), Some(Reverse(right))) => {
                    trace!(
                        "Merging #{} ({}) with #{} ({}) into #{}",
                        left.order,
                        left.weight,
                        right.order,
                        right.weight,
                        next_order
                    );
                    let merged = TreeNode::from_children(left.node, right.node);
                    pq.push(Reverse(Pending::new(merged, next_order)));
                    next_order += 1;
                }
                (Some(Reverse(last)), None) => break Some(last.node),
                _ => break None,
            }
        };

        Self { root }
    }

    /// Wraps an existing node structure, checking that weights add up, every
    /// leaf carries a distinct symbol with a positive weight and no leaf sits
    /// deeper than [`MAX_DEPTH`].
    pub fn from_root(root: Option<TreeNode<Symbol>>) -> Result<Self> {
        fn check<Symbol: Hash + Eq + Clone + Debug>(
            node: &TreeNode<Symbol>,
            depth: usize,
            seen: &mut HashSet<Symbol>,
        ) -> Result<()> {
            if depth > MAX_DEPTH {
                return HuffmanError::raise_construction(format!(
                    "tree is deeper than {} levels",
                    MAX_DEPTH
                ));
            }

            match node {
                TreeNode::Leaf { symbol, weight } => {
                    if *weight == 0 {
                        return HuffmanError::raise_construction(format!(
                            "leaf {:?} has zero weight",
                            symbol
                        ));
                    }

                    if !seen.insert(symbol.clone()) {
                        return HuffmanError::raise_construction(format!(
                            "symbol {:?} appears in more than one leaf",
                            symbol
                        ));
                    }

                    Ok(())
                }
                TreeNode::Internal { weight, left, right } => {
                    if left.weight().checked_add(right.weight()) != Some(*weight) {
                        return HuffmanError::raise_construction(format!(
                            "internal node weight {} is not {} + {}",
                            weight,
                            left.weight(),
                            right.weight()
                        ));
                    }

                    check(left, depth + 1, seen)?;
                    check(right, depth + 1, seen)
                }
            }
        }

        if let Some(node) = &root {
            check(node, 0, &mut HashSet::new())?;
        }

        Ok(Self { root })
    }
}

impl<Symbol> HuffmanTree<Symbol> {
    pub fn root(&self) -> Option<&TreeNode<Symbol>> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Total weight, equal to the length of the input the tree was built from.
    pub fn weight(&self) -> usize {
        self.root.as_ref().map_or(0, TreeNode::weight)
    }

    pub fn leaf_count(&self) -> usize {
        self.root.as_ref().map_or(0, TreeNode::leaf_count)
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, TreeNode::depth)
    }
}

impl<Symbol> Serialize for HuffmanTree<Symbol>
where
    Symbol: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}

impl<'de, Symbol> Deserialize<'de> for HuffmanTree<Symbol>
where
    Symbol: Deserialize<'de> + Hash + Eq + Clone + Debug,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let root = Option::<TreeNode<Symbol>>::deserialize(deserializer)?;
        Self::from_root(root).map_err(serde::de::Error::custom)
    }
}
