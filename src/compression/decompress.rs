use std::io::{Read, Write};

use log::{debug, info, warn};

use super::artifact::{payload_len, CompressedArtifact};
use crate::bitstream::bitreader::BitReader;
use crate::error::{HuffError, Result};
use crate::huffman_coding::decode_trie::{DecodeTrie, Step};

/// Decode an artifact back into the original bytes. Stops after exactly `valid_bits` bits.
pub fn decompress(artifact: &CompressedArtifact) -> Result<Vec<u8>> {
    let valid_bits = artifact.valid_bits;

    if artifact.table.is_empty() {
        if valid_bits != 0 {
            return Err(HuffError::CorruptHeader(format!(
                "{} payload bits but no code table",
                valid_bits
            )));
        }
        info!("Empty artifact, nothing to decode.");
        return Ok(Vec::new());
    }

    // Check the payload length before doing any work.
    let needed = payload_len(valid_bits);
    let found = artifact.payload.len() as u64;
    if found < needed {
        warn!("Payload has {} bytes, header promises {}", found, needed);
        return Err(HuffError::TruncatedInput {
            expected_bits: valid_bits,
            available_bits: found * 8,
        });
    }
    if found > needed {
        return Err(HuffError::CorruptPayload(format!(
            "{} bytes follow the last valid payload byte",
            found - needed
        )));
    }

    let trie = DecodeTrie::from_table(&artifact.table)?;

    // Every symbol costs at least one bit, and usually the shortest code.
    let shortest = artifact
        .table
        .entries()
        .iter()
        .map(|(_, code)| code.len())
        .min()
        .unwrap_or(1) as u64;
    let mut output = Vec::with_capacity((valid_bits / shortest) as usize);

    let mut br = BitReader::new(&artifact.payload);
    let mut at = DecodeTrie::ROOT;
    for consumed in 0..valid_bits {
        let bit = br.bool_bit().ok_or(HuffError::TruncatedInput {
            expected_bits: valid_bits,
            available_bits: consumed,
        })?;
        match trie.step(at, bit) {
            Some(Step::Leaf(sym)) => {
                output.push(sym);
                at = DecodeTrie::ROOT;
            }
            Some(Step::Branch(next)) => at = next,
            None => {
                return Err(HuffError::CorruptPayload(format!(
                    "no code continues with bit {} at payload bit {}",
                    bit as u8, consumed
                )))
            }
        }
    }

    if at != DecodeTrie::ROOT {
        return Err(HuffError::CorruptPayload(
            "payload ends in the middle of a code".to_string(),
        ));
    }
    // Whatever is left is padding in the last byte, and padding is always zero.
    while let Some(bit) = br.bit() {
        if bit != 0 {
            return Err(HuffError::CorruptPayload(
                "non-zero padding after the last code".to_string(),
            ));
        }
    }

    debug!("Decoded {} bits into {} bytes", valid_bits, output.len());
    Ok(output)
}

/// Parse serialized artifact bytes and decode them.
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    decompress(&CompressedArtifact::from_bytes(data)?)
}

/// Read a whole artifact from `input`, decode it, and write the result to `output`.
/// Nothing is written unless decoding succeeds. Returns the number of bytes written.
pub fn decompress_stream<R: Read, W: Write>(mut input: R, mut output: W) -> Result<u64> {
    let artifact = CompressedArtifact::read_from(&mut input)?;
    let data = decompress(&artifact)?;
    output.write_all(&data)?;
    output.flush()?;
    Ok(data.len() as u64)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compression::compress::{compress, compress_bytes};
    use crate::huffman_coding::code_table::CodeTable;

    fn abc_table() -> CodeTable {
        let mut table = CodeTable::new();
        table.insert(b'a', "0".parse().unwrap());
        table.insert(b'b', "10".parse().unwrap());
        table.insert(b'c', "11".parse().unwrap());
        table
    }

    #[test]
    fn worked_example_test() {
        let artifact = CompressedArtifact {
            table: abc_table(),
            valid_bits: 6,
            payload: vec![0b0010_1100],
        };
        assert_eq!(decompress(&artifact).unwrap(), vec![97, 97, 98, 99]);
    }

    #[test]
    fn padding_is_not_decoded_test() {
        // Two pad zeros would decode as "aa" without the valid bit count.
        let artifact = compress("abc".as_bytes()).unwrap();
        assert!(artifact.valid_bits % 8 != 0);
        assert_eq!(decompress(&artifact).unwrap(), "abc".as_bytes());
    }

    #[test]
    fn roundtrip_test() {
        for input in [
            &b""[..],
            &b"x"[..],
            &b"aaaa"[..],
            &b"aaaaaaaab"[..],
            &b"Hello, world! Hello, Huffman!"[..],
        ] {
            assert_eq!(decompress_bytes(&compress_bytes(input).unwrap()).unwrap(), input);
        }
        let all: Vec<u8> = (0..=255).cycle().take(5000).collect();
        assert_eq!(decompress(&compress(&all).unwrap()).unwrap(), all);
    }

    #[test]
    fn truncated_payload_test() {
        let mut artifact = compress("mississippi river".as_bytes()).unwrap();
        artifact.payload.pop();
        assert!(matches!(
            decompress(&artifact),
            Err(HuffError::TruncatedInput { .. })
        ));

        let mut bytes = compress_bytes("mississippi river".as_bytes()).unwrap();
        bytes.pop();
        assert!(matches!(
            decompress_bytes(&bytes),
            Err(HuffError::TruncatedInput { .. })
        ));
    }

    #[test]
    fn missing_branch_test() {
        let mut table = CodeTable::new();
        table.insert(b'a', "0".parse().unwrap());
        let artifact = CompressedArtifact {
            table,
            valid_bits: 2,
            payload: vec![0b0100_0000],
        };
        assert!(matches!(
            decompress(&artifact),
            Err(HuffError::CorruptPayload(_))
        ));
    }

    #[test]
    fn ends_mid_code_test() {
        let artifact = CompressedArtifact {
            table: abc_table(),
            valid_bits: 2,
            payload: vec![0b0100_0000],
        };
        assert!(matches!(
            decompress(&artifact),
            Err(HuffError::CorruptPayload(_))
        ));
    }

    #[test]
    fn dirty_padding_test() {
        let artifact = CompressedArtifact {
            table: abc_table(),
            valid_bits: 6,
            payload: vec![0b0010_1101],
        };
        assert!(matches!(
            decompress(&artifact),
            Err(HuffError::CorruptPayload(_))
        ));
    }

    #[test]
    fn stream_test() {
        let packed = compress_bytes("stream me".as_bytes()).unwrap();
        let mut out = Vec::new();
        let written = decompress_stream(packed.as_slice(), &mut out).unwrap();
        assert_eq!(written, 9);
        assert_eq!(out, "stream me".as_bytes());
    }

    #[test]
    fn corrupt_stream_writes_nothing_test() {
        let mut packed = compress_bytes("stream me".as_bytes()).unwrap();
        packed.pop();
        let mut out = Vec::new();
        assert!(decompress_stream(packed.as_slice(), &mut out).is_err());
        assert!(out.is_empty());
    }
}
