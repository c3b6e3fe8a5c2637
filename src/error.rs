use thiserror::Error;

/// Everything that can go wrong while compressing or decompressing.
#[derive(Error, Debug)]
pub enum HuffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt header: {0}")]
    CorruptHeader(String),

    #[error("Corrupt payload: {0}")]
    CorruptPayload(String),

    #[error("Truncated input: expected {expected_bits} payload bits, found {available_bits}")]
    TruncatedInput {
        expected_bits: u64,
        available_bits: u64,
    },

    #[error("Byte {0} has no entry in the code table")]
    UnknownSymbol(u8),
}

pub type Result<T> = std::result::Result<T, HuffError>;
