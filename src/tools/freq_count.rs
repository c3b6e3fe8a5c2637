use rayon::prelude::*;

/// Inputs larger than this are counted in parallel.
const PAR_THRESHOLD: usize = 64_000;
/// 16k is pretty much the sweet spot for chunk size.
const CHUNK_SIZE: usize = 16_000;

/// Symbol counts for an input. Only symbols that occur are listed, in the order in which
/// each one first appears. That order is the tie-break key used when building the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreqTable {
    entries: Vec<(u8, u64)>,
}

impl FreqTable {
    /// Build a table from (symbol, count) pairs, keeping the order given. Zero counts are
    /// dropped and repeated symbols are added into their first position.
    pub fn from_pairs<I: IntoIterator<Item = (u8, u64)>>(pairs: I) -> Self {
        let mut index = [usize::MAX; 256];
        let mut entries: Vec<(u8, u64)> = Vec::new();
        for (sym, count) in pairs {
            if count == 0 {
                continue;
            }
            match index[sym as usize] {
                usize::MAX => {
                    index[sym as usize] = entries.len();
                    entries.push((sym, count));
                }
                pos => entries[pos].1 += count,
            }
        }
        Self { entries }
    }

    /// (symbol, count) pairs in first-occurrence order.
    pub fn entries(&self) -> &[(u8, u64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts, which is the length of the counted input.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|&(_, count)| count).sum()
    }

    #[cfg(test)]
    pub fn get(&self, sym: u8) -> Option<u64> {
        self.entries
            .iter()
            .find(|&&(s, _)| s == sym)
            .map(|&(_, count)| count)
    }
}

/// Running counts plus the position where each symbol was first seen.
struct Tally {
    counts: [u64; 256],
    first: [usize; 256],
}

impl Tally {
    fn new() -> Self {
        Self {
            counts: [0; 256],
            first: [usize::MAX; 256],
        }
    }

    fn merge(mut self, other: Tally) -> Tally {
        for sym in 0..256 {
            self.counts[sym] += other.counts[sym];
            self.first[sym] = self.first[sym].min(other.first[sym]);
        }
        self
    }
}

/// Count one slice. `base` is the offset of the slice within the whole input.
fn scan(chunk: &[u8], base: usize) -> Tally {
    let mut tally = Tally::new();
    chunk.iter().enumerate().for_each(|(i, &byte)| {
        let sym = byte as usize;
        if tally.counts[sym] == 0 {
            tally.first[sym] = base + i;
        }
        tally.counts[sym] += 1;
    });
    tally
}

/// Returns a frequency count of the input data. Uses parallelism when data set is over 64k.
pub fn freqs(data: &[u8]) -> FreqTable {
    let tally = if data.len() > PAR_THRESHOLD {
        data.par_chunks(CHUNK_SIZE)
            .enumerate()
            .map(|(i, chunk)| scan(chunk, i * CHUNK_SIZE))
            .reduce(Tally::new, Tally::merge)
    } else {
        scan(data, 0)
    };

    let mut seen: Vec<u8> = (0..=255_u8)
        .filter(|&sym| tally.counts[sym as usize] > 0)
        .collect();
    seen.sort_unstable_by_key(|&sym| tally.first[sym as usize]);

    FreqTable {
        entries: seen
            .into_iter()
            .map(|sym| (sym, tally.counts[sym as usize]))
            .collect(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_input_test() {
        let table = freqs(&[]);
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
    }

    #[test]
    fn first_occurrence_order_test() {
        let table = freqs("abracadabra".as_bytes());
        assert_eq!(
            table.entries(),
            &[(b'a', 5), (b'b', 2), (b'r', 2), (b'c', 1), (b'd', 1)]
        );
        assert_eq!(table.total(), 11);
        assert_eq!(table.get(b'r'), Some(2));
        assert_eq!(table.get(b'z'), None);
    }

    #[test]
    fn parallel_matches_sequential_test() {
        // Late first appearances land in chunks other than the first.
        let mut data: Vec<u8> = (0..200_000_u32).map(|i| (i % 7) as u8).collect();
        data[150_000] = 200;
        data[40_000] = 99;
        data.push(250);

        let par = freqs(&data);
        let seq = scan(&data, 0);
        assert_eq!(par.total(), data.len() as u64);
        for &(sym, count) in par.entries() {
            assert_eq!(seq.counts[sym as usize], count);
        }
        let order: Vec<u8> = par.entries().iter().map(|&(s, _)| s).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5, 6, 99, 200, 250]);
    }

    #[test]
    fn from_pairs_test() {
        let table = FreqTable::from_pairs([(b'x', 3), (b'y', 0), (b'z', 1), (b'x', 2)]);
        assert_eq!(table.entries(), &[(b'x', 5), (b'z', 1)]);
    }
}
