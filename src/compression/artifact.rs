//! The compressed artifact and its binary layout.
//!
//! Format version 1, all integers big-endian:
//!
//! | field          | size                     |
//! |----------------|--------------------------|
//! | magic `HUF`    | 3 bytes                  |
//! | version        | 1 byte                   |
//! | entry count    | u16, 0..=256             |
//! | per entry      | symbol u8, bit length u8 (1..=255), code bits ceil(len/8) bytes |
//! | valid bits     | u64                      |
//! | payload        | ceil(valid bits/8) bytes |
//!
//! Code bits and payload are packed MSB-first and zero padded.

use log::{debug, trace};
use std::io::{Read, Write};

use crate::bitstream::bitpacker::BitPacker;
use crate::bitstream::bitreader::BitReader;
use crate::error::{HuffError, Result};
use crate::huffman_coding::code_table::{packed_len, Code, CodeTable};

pub const MAGIC: [u8; 3] = *b"HUF";
pub const VERSION: u8 = 1;
/// magic + version + entry count + valid bits
const FIXED_HEADER: usize = 3 + 1 + 2 + 8;

/// A compressed input: the code table, the count of meaningful payload bits, and the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressedArtifact {
    pub table: CodeTable,
    pub valid_bits: u64,
    pub payload: Vec<u8>,
}

/// Sizes of an artifact, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactStats {
    pub entries: usize,
    pub valid_bits: u64,
    pub header_bytes: usize,
    pub payload_bytes: usize,
}

impl ArtifactStats {
    pub fn total_bytes(&self) -> usize {
        self.header_bytes + self.payload_bytes
    }
}

/// Payload bytes needed for `bits` bits, without overflowing on hostile counts.
pub(crate) fn payload_len(bits: u64) -> u64 {
    bits / 8 + u64::from(bits % 8 != 0)
}

impl CompressedArtifact {
    /// Serialized size of everything before the payload.
    pub fn header_len(&self) -> usize {
        FIXED_HEADER
            + self
                .table
                .entries()
                .iter()
                .map(|(_, code)| 2 + code.packed().len())
                .sum::<usize>()
    }

    pub fn stats(&self) -> ArtifactStats {
        ArtifactStats {
            entries: self.table.len(),
            valid_bits: self.valid_bits,
            header_bytes: self.header_len(),
            payload_bytes: self.payload.len(),
        }
    }

    /// Serialize the artifact. Entries are written in ascending symbol order, so a given
    /// table always produces the same bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bp = BitPacker::new(self.header_len() + self.payload.len());
        bp.out_bytes(&MAGIC);
        bp.out8(VERSION);
        bp.out16(self.table.len() as u16);
        for (sym, code) in self.table.entries() {
            bp.out8(sym);
            bp.out8(code.len() as u8);
            bp.out_bytes(code.packed());
            trace!("Header entry {} at {}: {}", sym, bp.loc(), code);
        }
        bp.out64(self.valid_bits);
        bp.out_bytes(&self.payload);
        bp.flush();
        bp.output
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Parse a serialized artifact. The whole buffer must be exactly one artifact.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut br = BitReader::new(data);

        let magic = br.bytes(3).ok_or_else(|| short_header("magic"))?;
        if magic != MAGIC {
            return Err(HuffError::CorruptHeader(
                "not a huffzip artifact (bad magic)".to_string(),
            ));
        }
        let version = br.byte().ok_or_else(|| short_header("version"))?;
        if version != VERSION {
            return Err(HuffError::CorruptHeader(format!(
                "unsupported format version {}",
                version
            )));
        }

        let entries = br.bint(16).ok_or_else(|| short_header("entry count"))? as usize;
        if entries > 256 {
            return Err(HuffError::CorruptHeader(format!(
                "entry count {} exceeds 256",
                entries
            )));
        }

        let mut table = CodeTable::new();
        for i in 0..entries {
            let sym = br.byte().ok_or_else(|| short_header("entry symbol"))?;
            let len = br.byte().ok_or_else(|| short_header("entry length"))?;
            if len == 0 {
                return Err(HuffError::CorruptHeader(format!(
                    "entry {} (symbol {}) has a zero length code",
                    i, sym
                )));
            }
            let bits = br
                .bytes(packed_len(len as usize))
                .ok_or_else(|| short_header("entry code"))?;
            let code = Code::from_packed(len, bits).ok_or_else(|| {
                HuffError::CorruptHeader(format!(
                    "entry {} (symbol {}) has non-zero code padding",
                    i, sym
                ))
            })?;
            if table.insert(sym, code).is_some() {
                return Err(HuffError::CorruptHeader(format!(
                    "symbol {} appears twice",
                    sym
                )));
            }
        }

        let valid_bits = br.bint(64).ok_or_else(|| short_header("valid bit count"))?;
        if table.is_empty() != (valid_bits == 0) {
            return Err(HuffError::CorruptHeader(format!(
                "{} code table entries with {} payload bits",
                table.len(),
                valid_bits
            )));
        }

        // The header is all whole bytes, so the reader is aligned here.
        let payload = br.rest().unwrap_or_default();
        let needed = payload_len(valid_bits);
        let found = payload.len() as u64;
        if found < needed {
            return Err(HuffError::TruncatedInput {
                expected_bits: valid_bits,
                available_bits: found * 8,
            });
        }
        if found > needed {
            return Err(HuffError::CorruptHeader(format!(
                "{} bytes follow a {} byte payload",
                found - needed,
                needed
            )));
        }

        debug!(
            "Parsed artifact: {} entries, {} payload bits",
            table.len(),
            valid_bits
        );
        Ok(CompressedArtifact {
            table,
            valid_bits,
            payload: payload.to_vec(),
        })
    }

    /// Read a whole artifact from `reader`.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }
}

fn short_header(field: &str) -> HuffError {
    HuffError::CorruptHeader(format!("header ends before the {}", field))
}
