//! Property tests for the public compress / decompress API.
//!
//! 1. **Round trip**: every input decodes back to itself
//! 2. **Prefix-free**: no code in a generated table starts another
//! 3. **Determinism**: the same input always gives the same artifact bytes
//! 4. **Corruption**: a cut payload is reported, never decoded into wrong data

use huffzip::huffman_coding::code_table::CodeTable;
use huffzip::huffman_coding::huffman_tree::build_tree;
use huffzip::tools::freq_count::{freqs, FreqTable};
use huffzip::{compress, compress_bytes, decompress, decompress_bytes, HuffError};
use proptest::prelude::*;

// ─────────────────────────────────────────────────────────────────────────────
// Strategies
// ─────────────────────────────────────────────────────────────────────────────

/// Arbitrary bytes.
fn any_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..2048)
}

/// Bytes drawn from a small alphabet, so codes differ a lot in length.
fn skewed_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        prop_oneof![
            8 => Just(b'e'),
            4 => Just(b't'),
            2 => Just(b'a'),
            1 => any::<u8>(),
        ],
        1..4096,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_roundtrip(data in any_bytes()) {
        let packed = compress_bytes(&data).unwrap();
        prop_assert_eq!(decompress_bytes(&packed).unwrap(), data);
    }

    #[test]
    fn prop_roundtrip_skewed(data in skewed_bytes()) {
        let artifact = compress(&data).unwrap();
        // An optimal code never does worse than the plain 8-bit encoding.
        prop_assert!(artifact.valid_bits <= 8 * data.len() as u64);
        prop_assert_eq!(decompress(&artifact).unwrap(), data);
    }

    #[test]
    fn prop_prefix_free(data in skewed_bytes()) {
        let table = CodeTable::from_tree(&build_tree(&freqs(&data)).unwrap());
        prop_assert!(table.is_prefix_free());
        prop_assert_eq!(table.len(), freqs(&data).len());
    }

    #[test]
    fn prop_deterministic(data in any_bytes()) {
        prop_assert_eq!(compress_bytes(&data).unwrap(), compress_bytes(&data).unwrap());
    }

    #[test]
    fn prop_cut_payload_is_reported(data in prop::collection::vec(any::<u8>(), 1..512)) {
        let mut packed = compress_bytes(&data).unwrap();
        packed.pop();
        let is_truncated = matches!(
            decompress_bytes(&packed),
            Err(HuffError::TruncatedInput { .. })
        );
        prop_assert!(is_truncated);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fixed cases
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn roundtrip_edge_inputs() {
    let all_values: Vec<u8> = (0..=255).collect();
    let identical = vec![0x42_u8; 10_000];
    let big: Vec<u8> = (0..300_000_u32)
        .map(|i| (i.wrapping_mul(2_654_435_761) >> 24) as u8)
        .collect();
    for input in [&[][..], &[7][..], &identical[..], &all_values[..], &big[..]] {
        let artifact = compress(input).unwrap();
        assert_eq!(decompress(&artifact).unwrap(), input);
    }
}

#[test]
fn worked_example() {
    let artifact = compress(&[97, 97, 98, 99]).unwrap();
    assert_eq!(artifact.table.get(b'a').unwrap().to_string(), "0");
    assert_eq!(artifact.table.get(b'b').unwrap().to_string(), "10");
    assert_eq!(artifact.table.get(b'c').unwrap().to_string(), "11");
    assert_eq!(artifact.valid_bits, 6);
    assert_eq!(artifact.payload, vec![0b0010_1100]);
    assert_eq!(decompress(&artifact).unwrap(), vec![97, 97, 98, 99]);
}

#[test]
fn degenerate_alphabet() {
    let artifact = compress(b"aaaa").unwrap();
    assert_eq!(artifact.table.len(), 1);
    assert_eq!(artifact.table.get(b'a').unwrap().len(), 1);
    assert_eq!(decompress(&artifact).unwrap(), b"aaaa");
}

#[test]
fn same_frequencies_same_codes() {
    // Same counts in the same first-occurrence order, different byte layout.
    let a = FreqTable::from_pairs(freqs(b"xxyyyz").entries().iter().copied());
    let b = freqs(b"xyyzxy");
    assert_eq!(a, b);
    let table_a = CodeTable::from_tree(&build_tree(&a).unwrap());
    let table_b = CodeTable::from_tree(&build_tree(&b).unwrap());
    assert_eq!(table_a, table_b);
}

#[test]
fn compression_benefit() {
    let input = b"aaaaaaaab";
    let artifact = compress(input).unwrap();
    assert!(artifact.valid_bits < 8 * input.len() as u64);
}
