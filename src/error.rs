use thiserror::Error;

/// Domain errors raised by the matching engine. The CLI boundary wraps
/// these in `anyhow::Error` and attaches file/line context before they
/// reach the user.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    InvalidFormat(String),

    #[error("unrecognized nucleotide {byte:?} at index {index} in sequence {sequence:?}")]
    InvalidSequence {
        byte: u8,
        index: usize,
        sequence: String,
    },

    #[error("unsupported base {byte:?} in primer sequence {sequence:?}")]
    InvalidPrimerBase { byte: u8, sequence: String },

    #[error("failed reading FASTA input: {0}")]
    Io(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
