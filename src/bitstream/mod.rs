//! The bitstream module forms the bit-level I/O subsystem for huffzip.
//!
//! Huffman codes rarely line up with byte boundaries. BitPacker takes codes (and the
//! fixed-width header fields) and packs them MSB-first into bytes, zero padding the final
//! byte. BitReader walks a packed buffer back one bit, or one field, at a time.
//!
//! Both sides work on true bits. The count of meaningful bits travels in the artifact
//! header, so the reader never mistakes padding for data.
//!
pub mod bitpacker;
pub mod bitreader;
