//! The huffman module builds the codes used by huffzip.
//!
//! A single table of codes covers the whole input. Encoding follows these steps:
//! - huffman_tree: repeatedly merge the two lightest nodes until one root remains. Ties are
//!   broken by first occurrence of the symbol in the input, so the result is reproducible.
//! - code_table: walk the tree (left = 0, right = 1) to get a prefix-free code per symbol.
//!
//! Decoding never sees the encoder's tree. decode_trie rebuilds an equivalent trie from the
//! code table carried in the artifact header.
//!

pub mod code_table;
pub mod decode_trie;
pub mod huffman_tree;
