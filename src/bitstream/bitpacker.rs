use log::error;

use crate::huffman_coding::code_table::Code;

/// Packs bits MSB-first into a byte buffer.
pub struct BitPacker {
    pub output: Vec<u8>,
    /// Valid bits in the final byte after flush(), 0 when it was full.
    pub last_bits: u8,
    queue: u64,
    q_bits: u8,
    /// Every bit pushed so far, padding excluded.
    bit_count: u64,
}

impl BitPacker {
    /// Create a new BitPacker with an output buffer of size specified. Call flush() to
    /// flush the bit queue to the buffer before using the output.
    pub fn new(size: usize) -> Self {
        Self {
            output: Vec::with_capacity(size),
            last_bits: 0,
            queue: 0,
            q_bits: 0,
            bit_count: 0,
        }
    }

    /// Internal bitstream write function common to all out.XX functions.
    fn write_stream(&mut self) {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
    }

    /*
    NOTE: out24 takes a u32.  The 8 most significant bits of the word indicate how
    many of the least significant bits will be written. Those bits must be aligned to
    the least signficant bit. (The middle bits are masked out.)

    It is primarily used to write odd size data.
    Eg 0000100_00000000_00000000_00000010 writes out 0010.
    */
    /// Writes 0-24 bits encoded with the number of bits to write in the most
    /// significant byte of a 32 bit word.
    pub fn out24(&mut self, data: u32) {
        let depth = (data >> 24) as u8; //get bit length by shifting out the 24 data bits
        if depth == 0 {
            return;
        }
        self.queue <<= depth; //shift queue by bit length
        self.queue |= (data & (0xffffffff >> (32 - depth))) as u64; //add data portion to queue
        self.q_bits += depth; //update depth of queue bits
        self.bit_count += depth as u64;
        self.write_stream();
    }

    /// Puts a 64 bit word of pre-packed binary encoded data on the stream.
    pub fn out64(&mut self, data: u64) {
        self.out32((data >> 32) as u32);
        self.out32(data as u32);
    }

    /// Puts a 32 bit word of pre-packed binary encoded data on the stream.
    pub fn out32(&mut self, data: u32) {
        self.queue <<= 32; //shift queue by bit length
        self.queue |= data as u64; //add data portion to queue
        self.q_bits += 32; //update depth of queue bits
        self.bit_count += 32;
        self.write_stream();
    }

    /// Puts a 16 bit word  of pre-packed binary encoded data on the stream.
    pub fn out16(&mut self, data: u16) {
        self.queue <<= 16; //shift queue by bit length
        self.queue |= data as u64; //add data portion to queue
        self.q_bits += 16; //update depth of queue bits
        self.bit_count += 16;
        self.write_stream();
    }

    /// Puts an 8 bit word  of pre-packed binary encoded data on the stream.
    pub fn out8(&mut self, data: u8) {
        self.queue <<= 8; //shift queue by bit length
        self.queue |= data as u64; //add data portion to queue
        self.q_bits += 8; //update depth of queue bits
        self.bit_count += 8;
        self.write_stream();
    }

    /// Puts a run of bytes on the stream. Copies straight into the output when the stream
    /// is byte aligned.
    pub fn out_bytes(&mut self, data: &[u8]) {
        if self.q_bits == 0 {
            self.output.extend_from_slice(data);
            self.bit_count += data.len() as u64 * 8;
        } else {
            data.iter().for_each(|&byte| self.out8(byte));
        }
    }

    /// Puts the bits of a Huffman code on the stream, first bit first.
    pub fn push_code(&mut self, code: &Code) {
        let packed = code.packed();
        let full = code.len() / 8;
        packed[..full].iter().for_each(|&byte| self.out8(byte));
        let rest = code.len() % 8;
        if rest > 0 {
            // The tail bits sit at the top of the last byte; shift them down to the lsb.
            let tail = (packed[full] >> (8 - rest)) as u32;
            self.out24(((rest as u32) << 24) | tail);
        }
    }

    /// Number of bits put on the stream so far, not counting flush padding.
    pub fn bit_count(&self) -> u64 {
        self.bit_count
    }

    /// Flushes the remaining bits (1-7) from the buffer, padding with 0s in the least
    /// signficant bits
    pub fn flush(&mut self) {
        self.last_bits = self.q_bits % 8;
        if self.q_bits > 0 {
            self.queue <<= 8 - self.q_bits; //pad the queue with zeros
            self.q_bits += 8 - self.q_bits;
            self.write_stream(); // write out all that is left
            if self.q_bits > 0 {
                error!("Stuff left in the BitPacker queue.");
            }
        }
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format! {"[{}.{}]",((self.output.len() * 8) + self.q_bits as usize)/8, ((self.output.len() * 8) + self.q_bits as usize)%8}
    }
}
