//! Sequence emission
//!
//! Expands a compiled sequence into a caller-owned buffer. The buffer must
//! have room for `SEQ_LENGTH_MAX` bytes; compilation guarantees no sequence
//! expands past that, so nothing here can fail and nothing allocates.

use super::{ArgWidth, CompiledSeq, SEQ_LENGTH_MAX};

/// An argument type sequences can be formatted with
pub trait SeqArg: Copy {
    /// Width class this type formats in
    const WIDTH: ArgWidth;

    /// Write the value in decimal, returning the number of bytes written
    fn write_dec(self, out: &mut [u8]) -> usize;
}

impl SeqArg for u8 {
    const WIDTH: ArgWidth = ArgWidth::Byte;

    #[inline]
    fn write_dec(self, out: &mut [u8]) -> usize {
        format_dec_u8(out, self)
    }
}

impl SeqArg for u32 {
    const WIDTH: ArgWidth = ArgWidth::Wide;

    #[inline]
    fn write_dec(self, out: &mut [u8]) -> usize {
        format_dec_u32_0_to_9999(out, self)
    }
}

/// Write `n` in decimal without leading zeros. Writes 1-3 bytes.
#[inline]
pub fn format_dec_u8(out: &mut [u8], n: u8) -> usize {
    if n >= 100 {
        out[0] = b'0' + n / 100;
        out[1] = b'0' + (n / 10) % 10;
        out[2] = b'0' + n % 10;
        3
    } else if n >= 10 {
        out[0] = b'0' + n / 10;
        out[1] = b'0' + n % 10;
        2
    } else {
        out[0] = b'0' + n;
        1
    }
}

/// Write `n` in decimal without leading zeros. Values above 9999 are
/// clamped to 9999. Writes 1-4 bytes.
#[inline]
pub fn format_dec_u32_0_to_9999(out: &mut [u8], n: u32) -> usize {
    let n = n.min(9999) as u16;
    let len = match n {
        0..=9 => 1,
        10..=99 => 2,
        100..=999 => 3,
        _ => 4,
    };

    let mut rest = n;
    for byte in out[..len].iter_mut().rev() {
        *byte = b'0' + (rest % 10) as u8;
        rest /= 10;
    }
    len
}

/// Expand a sequence taking arguments. Returns the number of bytes written.
///
/// A sequence whose first slot is the sentinel writes nothing; that is the
/// state of every unset sequence.
#[inline]
pub(crate) fn emit_seq<A: SeqArg>(seq: &CompiledSeq, out: &mut [u8], args: &[A]) -> usize {
    if seq.args[0].is_sentinel() {
        return 0;
    }

    let out = &mut out[..SEQ_LENGTH_MAX];
    let mut src = 0usize;
    let mut pos = 0usize;

    for slot in &seq.args {
        let pre_len = slot.pre_len as usize;
        out[pos..pos + pre_len].copy_from_slice(&seq.bytes[src..src + pre_len]);
        pos += pre_len;
        src += pre_len;

        if slot.is_sentinel() {
            break;
        }
        pos += args[slot.arg_index as usize].write_dec(&mut out[pos..]);
    }

    pos
}

/// Expand a sequence that takes no arguments
#[inline]
pub(crate) fn emit_seq_void(seq: &CompiledSeq, out: &mut [u8]) -> usize {
    let out = &mut out[..SEQ_LENGTH_MAX];
    let len = seq.args[0].pre_len as usize;
    out[..len].copy_from_slice(&seq.bytes[..len]);
    len
}
