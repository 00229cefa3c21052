//! Error types for huffpack.
//!
//! Every operation returns a structured error instead of panicking. Nothing
//! is retried internally; a failed read or write leaves no partial result.

use thiserror::Error;

/// Top-level error type for all operations in the crate.
///
/// Each variant corresponds to a failure domain:
/// - Bit: constructing a `Bit` from an illegal integer
/// - Bit I/O: the bit reader ran out of bytes
/// - Container: the in-memory container breaks its structural invariants
/// - Format: the byte stream is not a valid huffpack file
/// - I/O: the underlying sink or source failed
#[derive(Debug, Error)]
pub enum Error {
    /// Illegal value passed to `Bit::new`
    #[error("bit error: {0}")]
    Bit(#[from] BitError),

    /// Bit I/O operation failed (e.g., reading past end of stream)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Container failed validation before a write
    #[error("container error: {0}")]
    Container(#[from] ContainerError),

    /// Input is not a huffpack file or is cut short
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Sink or source I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the input ended before a required field or bit.
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            Error::BitIo(BitIoError::UnexpectedEof)
                | Error::Format(
                    FormatError::TruncatedHeader { .. }
                        | FormatError::TruncatedLeafTable { .. }
                        | FormatError::TruncatedBitstream { .. }
                        | FormatError::NonZeroPadding { .. }
                )
        )
    }

    /// True when the input is not recognised as a huffpack file at all.
    pub fn is_format(&self) -> bool {
        matches!(self, Error::Format(FormatError::NotThisFormat))
    }
}

/// Bit construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitError {
    /// Value other than 0 or 1
    #[error("illegal value for a bit: {0}")]
    InvalidValue(i32),

    /// The character codes for '0' or '1' were passed instead of the numbers
    #[error(
        "attempted to create a bit from the character {0:?}; the characters '0' and '1' \
         are not the numbers 0 and 1, pass the numeric values 0 and 1 instead"
    )]
    CharacterConfusion(char),
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// A new byte was needed but the source is exhausted
    #[error("unexpected end of input while reading bits")]
    UnexpectedEof,
}

/// Structural invariant violations, detected before any byte is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// A prefix code needs at least two distinct symbols
    #[error("container must hold at least two distinct leaves, got {count}")]
    TooFewLeaves { count: usize },

    /// Leaf count must fit in one byte after biasing by one
    #[error("container can hold at most 256 distinct leaves, got {count}")]
    TooManyLeaves { count: usize },

    /// Tree shape must carry one bit per node of a full binary tree
    #[error("wrong number of tree bits for {leaves} leaves: expected {expected}, got {actual}")]
    TreeShapeMismatch {
        leaves: usize,
        expected: usize,
        actual: usize,
    },
}

/// Errors raised while parsing a serialized container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Magic header missing or wrong
    #[error("input is not a huffpack file")]
    NotThisFormat,

    /// A single-byte header field is absent
    #[error("truncated header: missing {field}")]
    TruncatedHeader { field: &'static str },

    /// Decoded leaf count is below two
    #[error("leaf count {0} is too low for a valid file")]
    InvalidLeafCount(usize),

    /// Leaf table shorter than the header announces
    #[error("truncated leaf table: expected {expected} leaves, got {actual}")]
    TruncatedLeafTable { expected: usize, actual: usize },

    /// Trailing bit count outside 1..=8
    #[error("trailing bit count {0} is outside 1..=8")]
    InvalidTrailingBitCount(u8),

    /// Bitstream region holds fewer bits than the tree shape requires
    #[error("truncated bitstream: need at least {required} bits, file holds {available}")]
    TruncatedBitstream { required: u64, available: u64 },

    /// Bits past the trailing bit count in the final byte are not zero,
    /// which is what a bitstream cut at a byte boundary usually looks like
    #[error(
        "truncated bitstream: final byte has non-zero padding {padding:#04x} \
         after {trailing_bits} meaningful bits"
    )]
    NonZeroPadding { trailing_bits: u8, padding: u8 },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
