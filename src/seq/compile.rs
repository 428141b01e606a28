//! Template compilation
//!
//! A template is a byte string with numbered argument placeholders:
//!
//! - `%%` is a literal `%`
//! - `%1` through `%8` is argument 0 through 7; `%0` and `%9` are rejected
//! - anything else is copied verbatim
//!
//! Compiling splits the template into literal runs, each followed by one
//! argument, plus a trailing run. The runs are stored back to back without
//! the placeholders so the emitter only ever copies and formats.

use super::{ARG_INDEX_SENTINEL, SEQ_ARGS_MAX, SEQ_LENGTH_MAX};
use crate::error::{Result, TermInfoError};

/// One compiled argument slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeqArgInfo {
    /// Length of the literal run preceding the argument
    pub pre_len: u8,
    /// Argument consumed by this slot, or `ARG_INDEX_SENTINEL`
    pub arg_index: u8,
}

impl SeqArgInfo {
    /// Terminating slot carrying the trailing literal run
    pub const fn sentinel(pre_len: u8) -> Self {
        Self {
            pre_len,
            arg_index: ARG_INDEX_SENTINEL,
        }
    }

    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.arg_index == ARG_INDEX_SENTINEL
    }
}

/// A compiled template: literal bytes plus slot list
///
/// The slot list always ends in a sentinel. An empty `CompiledSeq` has the
/// sentinel in the first slot with no trailing literal, and emits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompiledSeq {
    pub(crate) bytes: [u8; SEQ_LENGTH_MAX],
    pub(crate) args: [SeqArgInfo; SEQ_ARGS_MAX],
}

impl CompiledSeq {
    /// Create an empty compiled sequence
    pub const fn new() -> Self {
        Self {
            bytes: [0; SEQ_LENGTH_MAX],
            args: [SeqArgInfo::sentinel(0); SEQ_ARGS_MAX],
        }
    }

    /// Slots up to and including the sentinel
    pub fn slots(&self) -> &[SeqArgInfo] {
        let end = self
            .args
            .iter()
            .position(SeqArgInfo::is_sentinel)
            .unwrap_or(SEQ_ARGS_MAX - 1);
        &self.args[..=end]
    }

    /// Number of argument slots, not counting the sentinel
    pub fn n_slots(&self) -> usize {
        self.slots().len() - 1
    }

    /// Literal bytes with the placeholders removed
    pub fn literal(&self) -> &[u8] {
        let len = self.slots().iter().map(|s| s.pre_len as usize).sum();
        &self.bytes[..len]
    }

    /// Whether nothing has been compiled into this sequence
    pub fn is_empty(&self) -> bool {
        self.args[0] == SeqArgInfo::sentinel(0)
    }

    /// Longest possible expansion given a per-argument digit bound
    pub fn max_expanded_len(&self, arg_len_max: usize) -> usize {
        self.literal().len() + self.n_slots() * arg_len_max
    }
}

impl Default for CompiledSeq {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile `template` for a sequence taking `n_args` arguments, each
/// expanding to at most `arg_len_max` digits
pub fn parse_seq(template: &str, n_args: usize, arg_len_max: usize) -> Result<CompiledSeq> {
    debug_assert!(n_args < SEQ_ARGS_MAX);

    let input = template.as_bytes();
    let mut out = CompiledSeq::new();
    let mut len = 0usize;
    let mut slot = 0usize;
    let mut pre_len = 0u8;
    let mut i = 0usize;

    while i < input.len() {
        let literal = match input[i] {
            b'%' => {
                i += 1;
                match input.get(i) {
                    Some(b'%') => Some(b'%'),
                    Some(&digit) if digit.is_ascii_digit() => {
                        // %0 wraps to 255 and %9 to 8, both past any n_args
                        let arg_index = digit.wrapping_sub(b'1');
                        if arg_index as usize >= n_args || slot == SEQ_ARGS_MAX - 1 {
                            return Err(TermInfoError::BadArguments);
                        }
                        out.args[slot] = SeqArgInfo { pre_len, arg_index };
                        pre_len = 0;
                        slot += 1;
                        None
                    },
                    _ => return Err(TermInfoError::BadEscape { offset: i - 1 }),
                }
            },
            c => Some(c),
        };

        if let Some(c) = literal {
            if len == SEQ_LENGTH_MAX {
                return Err(TermInfoError::SeqTooLong);
            }
            out.bytes[len] = c;
            len += 1;
            pre_len += 1;
        }
        i += 1;
    }

    // One byte of slack on top of the worst case; existing profiles are
    // sized against this bound.
    if len + slot * arg_len_max + 1 > SEQ_LENGTH_MAX {
        return Err(TermInfoError::SeqTooLong);
    }

    out.args[slot] = SeqArgInfo::sentinel(pre_len);
    Ok(out)
}
