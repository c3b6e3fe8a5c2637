//! BitReader: reads a packed MSB-first bitstream out of an in-memory buffer.
//!
//! Artifacts are always read whole before decoding, so the reader borrows the buffer
//! instead of pulling from an I/O source.

const BIT_MASK: u8 = 0xff;

#[derive(Debug)]
pub struct BitReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
    bit_index: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            cursor: 0,
            bit_index: 0,
        }
    }

    /// Returns true while there is at least one unread bit.
    fn have_data(&self) -> bool {
        self.cursor < self.buffer.len()
    }

    /// Return bit as Option<usize> (1 or 0), or None if there is no more data to read
    pub fn bit(&mut self) -> Option<usize> {
        if !self.have_data() {
            return None;
        }
        let bit =
            (self.buffer[self.cursor] & BIT_MASK >> self.bit_index) >> (7 - self.bit_index);
        self.bit_index += 1;
        self.bit_index %= 8;
        if self.bit_index == 0 {
            self.cursor += 1;
        }
        Some(bit as usize)
    }

    /// Return Option<Bool> *true* if the next bit is 1, *false* if 0, consuming the bit,
    /// or None if there is no more data to read
    pub fn bool_bit(&mut self) -> Option<bool> {
        self.bit().map(|bit| bit == 1)
    }

    /// Return Option<u64> of the next n bits (n <= 64), or None if there are fewer than n
    /// bits left. Nothing is consumed when None is returned.
    pub fn bint(&mut self, n: usize) -> Option<u64> {
        debug_assert!(n <= 64);
        if (self.remaining_bits() as usize) < n {
            return None;
        }
        let mut result = 0_u64;
        let mut n = n;
        // Take whole bytes while we are on a byte boundary, single bits otherwise.
        while n > 0 {
            if self.bit_index == 0 && n >= 8 {
                result = result << 8 | self.buffer[self.cursor] as u64;
                self.cursor += 1;
                n -= 8;
            } else {
                result = result << 1 | self.bit()? as u64;
                n -= 1;
            }
        }
        Some(result)
    }

    /// Returns a byte as an Option<u8>, or None if there is no more data to read. This is
    /// a convenience function, and calls bint(8).
    pub fn byte(&mut self) -> Option<u8> {
        self.bint(8).map(|byte| byte as u8)
    }

    /// Returns an Option<Vec<u8>> of n bytes, or None if fewer than n bytes are left.
    pub fn bytes(&mut self, n: usize) -> Option<Vec<u8>> {
        if self.remaining_bits() < n as u64 * 8 {
            return None;
        }
        if self.bit_index == 0 {
            let out = self.buffer[self.cursor..self.cursor + n].to_vec();
            self.cursor += n;
            return Some(out);
        }
        (0..n).map(|_| self.byte()).collect()
    }

    /// Everything not yet read, when the reader sits on a byte boundary.
    pub fn rest(&mut self) -> Option<&'a [u8]> {
        if self.bit_index != 0 {
            return None;
        }
        let rest = &self.buffer[self.cursor..];
        self.cursor = self.buffer.len();
        Some(rest)
    }

    /// Count of unread bits.
    pub fn remaining_bits(&self) -> u64 {
        (self.buffer.len() - self.cursor) as u64 * 8 - self.bit_index as u64
    }

    /// Debugging function. Report current position in the buffer.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor, self.bit_index)
    }
}
