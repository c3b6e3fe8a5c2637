//! Huffman codes and the symbol to code table.
//!
//! A code is held packed MSB-first, exactly as it is written into the artifact header, so
//! the table can be serialized without any conversion. Code length is stored in one byte.
//! A tree with at most 256 leaves is never deeper than 255, so that is always enough.

use log::trace;
use rustc_hash::FxHashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use super::huffman_tree::Node;

/// An ordered run of 1..=255 bits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Code {
    len: u8,
    bits: Vec<u8>,
}

/// Bytes needed to hold `bits` bits.
pub fn packed_len(bits: usize) -> usize {
    (bits + 7) / 8
}

impl Code {
    pub const MAX_LEN: usize = 255;

    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a code from its packed form. Returns None if the length is zero, the byte
    /// count does not match the length, or the padding bits of the last byte are not zero.
    pub fn from_packed(len: u8, bits: Vec<u8>) -> Option<Self> {
        if len == 0 || bits.len() != packed_len(len as usize) {
            return None;
        }
        let spare = bits.len() * 8 - len as usize;
        if spare > 0 && bits[bits.len() - 1] & (0xff >> (8 - spare)) != 0 {
            return None;
        }
        Some(Self { len, bits })
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The packed bytes, MSB-first, zero padded.
    pub fn packed(&self) -> &[u8] {
        &self.bits
    }

    /// Bit `i`, counting from the first bit of the code.
    pub fn bit(&self, i: usize) -> bool {
        self.bits[i / 8] & (0x80 >> (i % 8)) != 0
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(move |i| self.bit(i))
    }

    pub fn push(&mut self, bit: bool) {
        debug_assert!(self.len() < Self::MAX_LEN, "code longer than 255 bits");
        let i = self.len();
        if i % 8 == 0 {
            self.bits.push(0);
        }
        if bit {
            self.bits[i / 8] |= 0x80 >> (i % 8);
        }
        self.len += 1;
    }

    pub fn pop(&mut self) -> Option<bool> {
        if self.len == 0 {
            return None;
        }
        let i = self.len() - 1;
        let bit = self.bit(i);
        self.bits[i / 8] &= !(0x80 >> (i % 8));
        if i % 8 == 0 {
            self.bits.pop();
        }
        self.len -= 1;
        Some(bit)
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && (0..self.len()).all(|i| self.bit(i) == other.bit(i))
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for bit in self.bits() {
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}

impl FromStr for Code {
    type Err = String;

    /// Parse a string of '0' and '1' characters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > Self::MAX_LEN {
            return Err(format!("code must be 1-255 bits, got {}", s.len()));
        }
        let mut code = Code::new();
        for c in s.chars() {
            match c {
                '0' => code.push(false),
                '1' => code.push(true),
                other => return Err(format!("invalid bit character {:?}", other)),
            }
        }
        Ok(code)
    }
}

/// Maps each symbol to its code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: FxHashMap<u8, Code>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk the tree, 0 to the left and 1 to the right, and record the path to each leaf.
    /// A lone leaf at the root has no path, so it is given the one-bit code `0`.
    pub fn from_tree(root: &Node) -> Self {
        let mut table = CodeTable::new();
        match root {
            Node::Leaf { sym, .. } => {
                let mut code = Code::new();
                code.push(false);
                table.insert(*sym, code);
            }
            Node::Internal { .. } => {
                let mut path = Code::new();
                walk(root, &mut path, &mut table);
            }
        }
        trace!("Code table: {}", table);
        table
    }

    /// Returns the code previously held by `sym`, if any.
    pub fn insert(&mut self, sym: u8, code: Code) -> Option<Code> {
        self.codes.insert(sym, code)
    }

    pub fn get(&self, sym: u8) -> Option<&Code> {
        self.codes.get(&sym)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// All (symbol, code) pairs in ascending symbol order.
    pub fn entries(&self) -> Vec<(u8, &Code)> {
        let mut entries: Vec<(u8, &Code)> =
            self.codes.iter().map(|(&sym, code)| (sym, code)).collect();
        entries.sort_unstable_by_key(|&(sym, _)| sym);
        entries
    }

    /// Code lengths indexed by symbol, zero for symbols with no code.
    pub fn lengths(&self) -> [u8; 256] {
        let mut lengths = [0; 256];
        for (&sym, code) in &self.codes {
            lengths[sym as usize] = code.len;
        }
        lengths
    }

    /// True when no code is a prefix of another code.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&Code> = self.codes.values().collect();
        // A prefix sorts directly before the codes it starts.
        codes.sort_unstable_by(|a, b| a.bits().cmp(b.bits()));
        codes.windows(2).all(|pair| !pair[0].is_prefix_of(pair[1]))
    }
}

impl Display for CodeTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries();
        for (i, (sym, code)) in entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}:{}", sym, code)?;
        }
        Ok(())
    }
}

/// Recursively walk the tree, extending `path` on the way down and trimming it on the way up.
fn walk(node: &Node, path: &mut Code, table: &mut CodeTable) {
    match node {
        Node::Internal { left, right, .. } => {
            path.push(false);
            walk(left, path, table);
            path.pop();
            path.push(true);
            walk(right, path, table);
            path.pop();
        }
        Node::Leaf { sym, .. } => {
            table.insert(*sym, path.clone());
        }
    }
}
