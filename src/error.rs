use thiserror::Error;

/// Failures surfaced by the codec.
///
/// Encoding over an in-memory buffer cannot fail structurally, so every
/// variant except [`HuffmanError::MissingCode`] belongs to the decode path.
/// The library never terminates the process; the CLI maps these to a
/// message on stderr and a non-zero exit.
#[derive(Error, Debug)]
pub enum HuffmanError {
    /// The tree header is not well formed: it does not start with `(`
    /// (and is not the bare `\e` header of an empty stream), a bracket
    /// never finds its match, or the `0x00` boundary byte is missing.
    /// Carries the byte offset where the scan gave up.
    #[error("invalid input: malformed tree header at byte {0}")]
    MalformedTree(usize),

    /// The packed payload ran out before the terminator code was reached.
    /// Carries the number of payload bits consumed.
    #[error("invalid input: payload exhausted after {0} bits without a terminator")]
    TruncatedPayload(usize),

    /// A byte was submitted for encoding that the code table was not built
    /// from. Cannot happen when the codec is built from the same buffer it
    /// encodes.
    #[error("byte {0:#04x} has no assigned code")]
    MissingCode(u8),

    /// Wraps read/write failures from the CLI layer.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HuffmanError>;
