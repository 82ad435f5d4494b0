use thiserror::Error;

/// Errors raised by the cracking operations.
///
/// Structural errors (mismatched operand lengths, bad inputs) are caller
/// bugs and propagate unrecovered. `Inconclusive` is the normal outcome of
/// an attack that failed to converge; batch scanners should skip and
/// continue rather than abort on it.
#[derive(Debug, Error)]
pub enum CrackError {
    #[error("length mismatch: left operand is {left} bytes, right is {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("oracle does not encrypt in ECB mode")]
    ModeMismatch,

    #[error("{count} candidate bytes match at secret position {position}")]
    AmbiguousByte { position: usize, count: usize },

    #[error("inconclusive: {0}")]
    Inconclusive(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid hex input: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}
