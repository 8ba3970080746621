//! Bit packing for encoded messages.
//!
//! Bits are stored most significant bit first in each byte. The bit count is
//! kept alongside the bytes; padding in the last byte is always zero and is
//! never read back.

use bitvec::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{HuffmanError, Result};

/// A single symbol's code.
pub type Code = BitBox<u8, Msb0>;

/// Byte-aligned bit sequence with an explicit length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    bits: BitVec<u8, Msb0>,
}

impl BitStream {
    /// Reassembles a stream from packed bytes and the number of bits in use.
    pub fn from_raw(data: Vec<u8>, bit_count: usize) -> Result<Self> {
        if bit_count > data.len() * 8 {
            return HuffmanError::raise_corrupt_stream(format!(
                "{} bits declared but only {} bytes stored",
                bit_count,
                data.len()
            ));
        }

        let mut bits = BitVec::from_vec(data);
        bits.truncate(bit_count);
        bits.set_uninitialized(false);

        Ok(Self { bits })
    }

    /// Packed storage, including the zero padding of the last byte.
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }

    pub fn as_bitslice(&self) -> &BitSlice<u8, Msb0> {
        &self.bits
    }

    /// Number of bits in the message.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Copy keeping only the first `bit_count` bits.
    pub fn truncated(&self, bit_count: usize) -> Self {
        let mut bits = self.bits.clone();
        bits.truncate(bit_count);
        bits.set_uninitialized(false);

        Self { bits }
    }

    pub fn reader(&self) -> BitReader<'_> {
        BitReader {
            bits: &self.bits,
            position: 0,
        }
    }
}

impl fmt::Display for BitStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.bits.iter().by_vals() {
            f.write_str(if b { "1" } else { "0" })?;
        }

        Ok(())
    }
}

impl FromStr for BitStream {
    type Err = HuffmanError;

    fn from_str(s: &str) -> Result<Self> {
        let mut writer = BitWriter::new();
        for (position, character) in s.chars().enumerate() {
            match character {
                '0' => writer.append_bit(false),
                '1' => writer.append_bit(true),
                _ => return Err(HuffmanError::InvalidBitString { character, position }),
            }
        }

        Ok(writer.finish())
    }
}

// serialized as (bit count, packed bytes)
impl Serialize for BitStream {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (self.bits.len(), self.bits.as_raw_slice()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BitStream {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (bit_count, data) = <(usize, Vec<u8>)>::deserialize(deserializer)?;
        Self::from_raw(data, bit_count).map_err(serde::de::Error::custom)
    }
}

/// Appends bits to a growing [`BitStream`].
#[derive(Debug, Default)]
pub struct BitWriter {
    bits: BitVec<u8, Msb0>,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    pub fn append_bits(&mut self, bits: &BitSlice<u8, Msb0>) {
        self.bits.extend_from_bitslice(bits);
    }

    pub fn append_bits_iter(&mut self, bits: impl IntoIterator<Item = bool>) {
        self.bits.extend(bits);
    }

    /// Bits written so far.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn finish(self) -> BitStream {
        BitStream { bits: self.bits }
    }
}

/// Reads bits one at a time, stopping at the declared bit count.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    bits: &'a BitSlice<u8, Msb0>,
    position: usize,
}

impl<'a> BitReader<'a> {
    /// Reader over the first `bit_count` bits of `data`.
    pub fn new(data: &'a [u8], bit_count: usize) -> Result<Self> {
        let bits = data.view_bits::<Msb0>();
        match bits.get(..bit_count) {
            Some(bits) => Ok(Self { bits, position: 0 }),
            None => HuffmanError::raise_corrupt_stream(format!(
                "{} bits declared but only {} bytes stored",
                bit_count,
                data.len()
            )),
        }
    }

    pub fn next_bit(&mut self) -> Result<bool> {
        match self.bits.get(self.position) {
            Some(bit) => {
                self.position += 1;
                Ok(*bit)
            }
            None => HuffmanError::raise_end_of_stream(self.bits.len()),
        }
    }

    /// Bits consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.bits.len() - self.position
    }
}
