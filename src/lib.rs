//! Static Huffman compression of whole inputs.
//!
//! Version 0.1.0
//!
//! huffzip counts every byte of the input, builds a single Huffman code table for all of it,
//! and packs the input with that table. The compressed artifact carries the code table and
//! the exact number of meaningful payload bits, so it decodes with nothing else.
//!
//! Basic usage from code:
//!
//! ```
//! use huffzip::{compress, decompress};
//!
//! let artifact = compress(b"aaaaaaaab")?;
//! assert!(artifact.valid_bits < 8 * 9);
//! assert_eq!(decompress(&artifact)?, b"aaaaaaaab");
//! # Ok::<(), huffzip::HuffError>(())
//! ```
//!
//! Basic usage to compress a file:
//!
//! `$> huffzip -z test.txt`
//!
//! This will compress the file and create the file test.txt.huf.
//! The original file will be deleted unless `-k` is given.
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::artifact::{ArtifactStats, CompressedArtifact};
pub use compression::compress::{compress, compress_bytes, compress_stream};
pub use compression::decompress::{decompress, decompress_bytes, decompress_stream};
pub use error::{HuffError, Result};
