//! Huffman coding over any hashable symbol type.
//!
//! ```
//! use huffman_codec::huffman;
//!
//! let s = "This is a test, only a test. Please continue about your DAY!";
//! let codec = huffman(s.chars());
//!
//! let encoded = codec.encode(s.chars())?;
//! let decoded: String = codec.decode_str(&encoded.to_string())?.into_iter().collect();
//!
//! assert_eq!(decoded, s);
//! # Ok::<(), huffman_codec::HuffmanError>(())
//! ```

pub mod bitstream;
pub mod code_table;
pub mod codec;
pub mod error;
pub mod frequency;
pub mod tree;

pub use bitstream::{BitReader, BitStream, BitWriter, Code};
pub use code_table::CodeTable;
pub use codec::{
    build_frequency_model, build_huffman_tree, decode, derive_code_table, encode, huffman,
    HuffmanCodec,
};
pub use error::{HuffmanError, Result};
pub use frequency::FrequencyModel;
pub use tree::{HuffmanTree, TreeNode};
