//! The compression module holds the two entry points of huffzip and the artifact format.
//!
//! Compression happens in the following steps:
//! - Frequency count: count every byte value, remembering where each first appeared.
//! - Tree build: merge the two lightest nodes until one root remains.
//! - Code table: walk the tree to get a prefix-free bit code per byte value.
//! - Packing: replace every input byte with its code and pack the bits into bytes.
//!
//! The artifact carries the code table and the exact count of payload bits, so padding in
//! the last byte is never decoded as data.
//!
//! Decompression follows the inverse of the compression process.
//! - Header parse: read back the code table and the valid bit count.
//! - Trie rebuild: insert every code into a fresh trie.
//! - Unpacking: walk the trie one payload bit at a time, emitting a byte at each leaf.
//!

pub mod artifact;
pub mod compress;
pub mod decompress;
