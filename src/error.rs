#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A 6-bit group is not one of the 16 valid 3-of-6 codewords.
    #[error("Invalid 3-of-6 codeword: {codeword:#08b}")]
    InvalidLineCode { codeword: u8 },
    /// Not enough bytes to decode the fixed telegram header.
    #[error("Truncated frame")]
    TruncatedFrame { actual: usize, minimum: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
