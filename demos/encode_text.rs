use huffman_codec::huffman;
use std::env;

fn main() -> anyhow::Result<()> {
    let s = env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("This is a test, only a test. Please continue about your DAY!"));

    let codec = huffman(s.chars());

    let encoded = codec.encode(s.chars())?.to_string();
    println!("Encoded: {}", encoded);

    let decoded: String = codec.decode_str(&encoded)?.into_iter().collect();
    println!("Decoded: {}", decoded);

    Ok(())
}
