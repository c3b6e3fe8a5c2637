use std::io::{Read, Write};

use log::{debug, info};

use super::artifact::{ArtifactStats, CompressedArtifact};
use crate::bitstream::bitpacker::BitPacker;
use crate::error::{HuffError, Result};
use crate::huffman_coding::code_table::{Code, CodeTable};
use crate::huffman_coding::huffman_tree::build_tree;
use crate::tools::freq_count::freqs;

/// Compress a whole input into an artifact. Empty input gives an empty artifact.
pub fn compress(data: &[u8]) -> Result<CompressedArtifact> {
    let freq = freqs(data);
    debug!("Counted {} distinct symbols in {} bytes", freq.len(), freq.total());

    // Nothing to build a tree from.
    let root = match build_tree(&freq) {
        Some(root) => root,
        None => {
            info!("Empty input, writing an empty artifact.");
            return Ok(CompressedArtifact::default());
        }
    };
    let table = CodeTable::from_tree(&root);
    drop(root);

    // Size the output from the code lengths so the packer never reallocates.
    let lengths = table.lengths();
    let payload_bits: u64 = freq
        .entries()
        .iter()
        .map(|&(sym, count)| count * lengths[sym as usize] as u64)
        .sum();

    // Index codes by byte value for the hot loop.
    let mut lookup: Vec<Option<&Code>> = vec![None; 256];
    for (sym, code) in table.entries() {
        lookup[sym as usize] = Some(code);
    }

    let mut bp = BitPacker::new((payload_bits / 8 + 1) as usize);
    for &byte in data {
        match lookup[byte as usize] {
            Some(code) => bp.push_code(code),
            None => return Err(HuffError::UnknownSymbol(byte)),
        }
    }
    let valid_bits = bp.bit_count();
    bp.flush();

    info!(
        "Packed {} bytes into {} bits ({} bytes, {} pad bits)",
        data.len(),
        valid_bits,
        bp.output.len(),
        (8 - bp.last_bits) % 8
    );

    Ok(CompressedArtifact {
        table,
        valid_bits,
        payload: bp.output,
    })
}

/// Compress straight to the serialized artifact bytes.
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    Ok(compress(data)?.to_bytes())
}

/// Read all of `input`, compress it, and write the artifact to `output`.
pub fn compress_stream<R: Read, W: Write>(mut input: R, mut output: W) -> Result<ArtifactStats> {
    let mut data = Vec::new();
    input.read_to_end(&mut data)?;
    let artifact = compress(&data)?;
    artifact.write_to(&mut output)?;
    Ok(artifact.stats())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn worked_example_test() {
        let artifact = compress(&[97, 97, 98, 99]).unwrap();
        assert_eq!(artifact.valid_bits, 6);
        assert_eq!(artifact.payload, vec![0b0010_1100]);
        assert_eq!(artifact.table.to_string(), "97:0, 98:10, 99:11");
    }

    #[test]
    fn empty_input_test() {
        let artifact = compress(&[]).unwrap();
        assert!(artifact.table.is_empty());
        assert_eq!(artifact.valid_bits, 0);
        assert!(artifact.payload.is_empty());
    }

    #[test]
    fn single_symbol_test() {
        let artifact = compress("aaaa".as_bytes()).unwrap();
        assert_eq!(artifact.table.get(b'a').unwrap().len(), 1);
        assert_eq!(artifact.valid_bits, 4);
        assert_eq!(artifact.payload, vec![0]);
    }

    #[test]
    fn skewed_input_benefit_test() {
        let input = "aaaaaaaab".as_bytes();
        let artifact = compress(input).unwrap();
        assert!(artifact.valid_bits < 8 * input.len() as u64);
        assert_eq!(artifact.valid_bits, 9);
    }

    #[test]
    fn stream_test() {
        let mut out = Vec::new();
        let stats = compress_stream("abracadabra".as_bytes(), &mut out).unwrap();
        assert_eq!(stats.total_bytes(), out.len());
        assert_eq!(stats.entries, 5);
        assert_eq!(out, compress_bytes("abracadabra".as_bytes()).unwrap());
    }
}
