//! Error types for control sequence templates

use thiserror::Error;

use crate::seq::SeqKind;

/// Term info error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TermInfoError {
    /// A placeholder refers to an argument the sequence doesn't take, or there
    /// are more placeholders than slots
    #[error("Control sequence had too many arguments")]
    BadArguments,

    /// The worst-case expansion would not fit in `SEQ_LENGTH_MAX` bytes
    #[error("Control sequence too long")]
    SeqTooLong,

    /// `%` followed by something other than `%` or `1`-`8`
    #[error("Malformed escape at byte {offset}")]
    BadEscape { offset: usize },

    /// No sequence name matched
    #[error("Unknown control sequence: {0}")]
    UnknownSeq(String),

    /// The sequence isn't configured
    #[error("Control sequence {0} is not set")]
    MissingSeq(SeqKind),

    /// Wrong number of arguments passed to a checked emit
    #[error("Control sequence {kind} takes {expected} arguments, got {got}")]
    ArgCount {
        kind: SeqKind,
        expected: usize,
        got: usize,
    },

    /// Argument doesn't fit the sequence's argument width
    #[error("Argument {index} of {kind} out of range: {value}")]
    ArgOutOfRange {
        kind: SeqKind,
        index: usize,
        value: u32,
    },
}

/// Result type for term info operations
pub type Result<T> = std::result::Result<T, TermInfoError>;
