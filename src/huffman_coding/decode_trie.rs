//! Decoder side trie, rebuilt from a code table alone.
//!
//! Nodes live in a vec and refer to their children by index. The root is always index 0.

use log::debug;

use super::code_table::CodeTable;
use crate::error::{HuffError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Branch([Option<usize>; 2]),
    Leaf(u8),
}

/// Where one step through the trie lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Reached a symbol. Decoding restarts at the root.
    Leaf(u8),
    /// Still inside a code, at this node.
    Branch(usize),
}

#[derive(Debug, Clone)]
pub struct DecodeTrie {
    slots: Vec<Slot>,
}

impl DecodeTrie {
    pub const ROOT: usize = 0;

    /// Insert every code of the table. Fails if the table is not prefix-free or holds an
    /// empty code.
    pub fn from_table(table: &CodeTable) -> Result<Self> {
        let mut trie = DecodeTrie {
            slots: Vec::with_capacity(table.len() * 2),
        };
        trie.slots.push(Slot::Branch([None, None]));

        for (sym, code) in table.entries() {
            if code.is_empty() {
                return Err(HuffError::CorruptHeader(format!(
                    "symbol {} has an empty code",
                    sym
                )));
            }
            let mut at = Self::ROOT;
            let last = code.len() - 1;
            for (i, bit) in code.bits().enumerate() {
                let kids = match trie.slots[at] {
                    Slot::Branch(kids) => kids,
                    Slot::Leaf(other) => {
                        return Err(HuffError::CorruptHeader(format!(
                            "code {} of symbol {} starts with the code of symbol {}",
                            code, sym, other
                        )))
                    }
                };
                at = match kids[bit as usize] {
                    Some(_) if i == last => {
                        return Err(HuffError::CorruptHeader(format!(
                            "code {} of symbol {} is already in use or is a prefix of another code",
                            code, sym
                        )))
                    }
                    Some(next) => next,
                    None if i == last => trie.attach(at, bit, Slot::Leaf(sym)),
                    None => trie.attach(at, bit, Slot::Branch([None, None])),
                };
            }
        }
        debug!("Rebuilt decode trie with {} nodes", trie.slots.len());
        Ok(trie)
    }

    /// Add a child under `parent` and return its index.
    fn attach(&mut self, parent: usize, bit: bool, slot: Slot) -> usize {
        let idx = self.slots.len();
        self.slots.push(slot);
        if let Slot::Branch(kids) = &mut self.slots[parent] {
            kids[bit as usize] = Some(idx);
        }
        idx
    }

    /// Follow one bit from the branch at `at`. None means no code continues this way.
    pub fn step(&self, at: usize, bit: bool) -> Option<Step> {
        let next = match self.slots.get(at)? {
            Slot::Branch(kids) => kids[bit as usize]?,
            Slot::Leaf(_) => return None,
        };
        match self.slots[next] {
            Slot::Leaf(sym) => Some(Step::Leaf(sym)),
            Slot::Branch(_) => Some(Step::Branch(next)),
        }
    }

    pub fn node_count(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn table(codes: &[(u8, &str)]) -> CodeTable {
        let mut table = CodeTable::new();
        for &(sym, code) in codes {
            table.insert(sym, code.parse().unwrap());
        }
        table
    }

    #[test]
    fn walk_test() {
        let trie = DecodeTrie::from_table(&table(&[(b'a', "0"), (b'b', "10"), (b'c', "11")]))
            .unwrap();
        assert_eq!(trie.node_count(), 5);
        assert_eq!(trie.step(DecodeTrie::ROOT, false), Some(Step::Leaf(b'a')));
        let at = match trie.step(DecodeTrie::ROOT, true) {
            Some(Step::Branch(at)) => at,
            other => panic!("expected a branch, got {:?}", other),
        };
        assert_eq!(trie.step(at, false), Some(Step::Leaf(b'b')));
        assert_eq!(trie.step(at, true), Some(Step::Leaf(b'c')));
    }

    #[test]
    fn incomplete_trie_test() {
        let trie = DecodeTrie::from_table(&table(&[(b'a', "0")])).unwrap();
        assert_eq!(trie.step(DecodeTrie::ROOT, false), Some(Step::Leaf(b'a')));
        assert_eq!(trie.step(DecodeTrie::ROOT, true), None);
    }

    #[test]
    fn prefix_violation_test() {
        // Shorter code inserted first (symbols are inserted in ascending order).
        let err = DecodeTrie::from_table(&table(&[(1, "1"), (2, "10")])).unwrap_err();
        assert!(matches!(err, HuffError::CorruptHeader(_)));
        // Longer code inserted first.
        let err = DecodeTrie::from_table(&table(&[(1, "10"), (2, "1")])).unwrap_err();
        assert!(matches!(err, HuffError::CorruptHeader(_)));
    }

    #[test]
    fn duplicate_code_test() {
        let err = DecodeTrie::from_table(&table(&[(1, "01"), (2, "01")])).unwrap_err();
        assert!(matches!(err, HuffError::CorruptHeader(_)));
    }
}
