use anyhow::{ensure, Context};
use huffman_codec::{huffman, BitStream, HuffmanCodec};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

#[derive(Serialize, Deserialize)]
struct HuffmanSerialized {
    codec: HuffmanCodec<u8>,
    data: BitStream,
}

fn main() -> anyhow::Result<()> {
    let fp = env::args()
        .nth(1)
        .context("Please provide path to input file as first argument.")?;

    let input_bytes = fs::read(&fp).with_context(|| format!("Could not read {}", fp))?;

    // encode scope - save to file
    {
        let codec = huffman(input_bytes.iter().copied());
        let data = codec.encode(&input_bytes)?;

        let packed = rmp_serde::to_vec(&HuffmanSerialized { codec, data })?;
        fs::write("encoded.mp", packed)?;
    }

    // decode scope - read from file
    {
        let file_data = fs::read("encoded.mp")?;

        let packed: HuffmanSerialized = rmp_serde::from_slice(&file_data)?;
        let decoded = packed.codec.decode(&packed.data)?;
        ensure!(decoded == input_bytes, "decoded output differs from input");

        fs::write("decoded.txt", decoded)?;
    }

    Ok(())
}
