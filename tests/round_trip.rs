use huffman_codec::*;

const CORPORA: &[&str] = &[
    "",
    "a",
    "aaaa",
    "ab",
    "abcdefgh",
    "aabbccddeeffgghh",
    "mississippi",
    "This is a test, only a test. Please continue about your DAY!",
    "Zażółć gęślą jaźń, 日本語のテキスト",
];

fn pipeline(s: &str) -> (HuffmanTree<char>, CodeTable<char>, BitStream) {
    let model = build_frequency_model(s.chars());
    let tree = build_huffman_tree(&model);
    let table = derive_code_table(&tree);
    let stream = encode(s.chars(), &table).unwrap();

    (tree, table, stream)
}

#[test]
fn round_trip_all_corpora() {
    for s in CORPORA {
        let (tree, _, stream) = pipeline(s);
        let decoded: String = decode(&stream, &tree).unwrap().into_iter().collect();

        assert_eq!(&decoded, s);
    }
}

#[test]
fn round_trip_all_bytes() {
    let input: Vec<u8> = (0..=255u8).chain((0..64).map(|i| i * 3)).collect();
    let codec = huffman(input.iter().copied());

    let stream = codec.encode(&input).unwrap();

    assert_eq!(codec.decode(&stream).unwrap(), input);
}

#[test]
fn round_trip_through_bit_string() {
    for s in CORPORA {
        let (tree, _, stream) = pipeline(s);
        let parsed: BitStream = stream.to_string().parse().unwrap();

        assert_eq!(parsed, stream);
        assert_eq!(decode(&parsed, &tree).unwrap(), s.chars().collect::<Vec<_>>());
    }
}

#[test]
fn round_trip_through_raw_bytes() {
    for s in CORPORA {
        let (tree, _, stream) = pipeline(s);
        let mut reader = BitReader::new(stream.as_bytes(), stream.len()).unwrap();
        let mut bits = Vec::new();
        while reader.remaining() > 0 {
            bits.push(reader.next_bit().unwrap());
        }

        let restored = BitStream::from_raw(stream.as_bytes().to_vec(), stream.len()).unwrap();

        assert_eq!(bits.len(), stream.len());
        assert_eq!(restored, stream);
        assert_eq!(decode(&restored, &tree).unwrap(), s.chars().collect::<Vec<_>>());
    }
}

#[test]
fn builds_are_deterministic() {
    for s in CORPORA {
        let (tree_a, table_a, stream_a) = pipeline(s);
        let (tree_b, table_b, stream_b) = pipeline(s);

        assert_eq!(tree_a, tree_b);
        assert_eq!(table_a, table_b);
        assert_eq!(stream_a, stream_b);
    }
}

#[test]
fn codes_are_prefix_free() {
    for s in CORPORA {
        let (_, table, _) = pipeline(s);

        for (a, code_a) in table.iter() {
            for (b, code_b) in table.iter() {
                if a != b {
                    assert!(!code_b.starts_with(code_a));
                }
            }
        }
    }
}

#[test]
fn sentence_compresses() {
    let s = "This is a test, only a test. Please continue about your DAY!";
    let (_, _, stream) = pipeline(s);
    let rendered = stream.to_string();

    assert!(!rendered.is_empty());
    assert!(rendered.len() < 8 * s.chars().count());
}

#[test]
fn single_symbol_uses_one_bit_per_occurrence() {
    let (tree, table, stream) = pipeline("aaaa");

    assert_eq!(table.code(&'a').map(|c| c.len()), Some(1));
    assert_eq!(stream.to_string(), "0000");
    assert_eq!(decode(&stream, &tree).unwrap(), vec!['a'; 4]);
}

#[test]
fn truncation_never_yields_wrong_symbols() {
    let s = "This is a test, only a test. Please continue about your DAY!";
    let (tree, _, stream) = pipeline(s);
    let expected: Vec<char> = s.chars().collect();

    for len in 0..stream.len() {
        match decode(&stream.truncated(len), &tree) {
            Ok(prefix) => assert_eq!(prefix[..], expected[..prefix.len()]),
            Err(e) => assert!(matches!(e, HuffmanError::CorruptStream { .. })),
        }
    }

    assert!(matches!(
        decode(&stream.truncated(stream.len() - 1), &tree),
        Err(HuffmanError::CorruptStream { .. })
    ));
}

#[test]
fn foreign_symbols_are_rejected() {
    let (_, table, _) = pipeline("abc");

    assert!(matches!(
        encode("cab!".chars(), &table),
        Err(HuffmanError::UnknownSymbol { .. })
    ));
}

#[test]
fn persisted_message_round_trip() {
    let s = "This is a test, only a test. Please continue about your DAY!";
    let codec = huffman(s.chars());
    let stream = codec.encode(s.chars()).unwrap();

    let data = rmp_serde::to_vec(&(&codec, &stream)).unwrap();
    let (codec, stream): (HuffmanCodec<char>, BitStream) = rmp_serde::from_slice(&data).unwrap();

    assert_eq!(codec.decode(&stream).unwrap(), s.chars().collect::<Vec<_>>());
}
