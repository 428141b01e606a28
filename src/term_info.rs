//! Terminal description
//!
//! A [`TermInfo`] holds, for every [`SeqKind`], the template string it was
//! configured with and the compiled form of that template. The two are
//! always installed and cleared together.
//!
//! The `emit_*` methods expand one sequence into `dest` and return the
//! number of bytes written. `dest` must have room for at least
//! [`SEQ_LENGTH_MAX`] bytes; a shorter slice panics. An unset sequence
//! writes nothing and returns 0.
//!
//! ```
//! use mochi_term_info::{SeqKind, TermInfo, SEQ_LENGTH_MAX};
//!
//! let mut ti = TermInfo::new();
//! ti.set_seq(SeqKind::CursorToPos, Some("\x1b[%2;%1H")).unwrap();
//!
//! let mut buf = [0u8; SEQ_LENGTH_MAX];
//! let len = ti.emit_cursor_to_pos(&mut buf, 10, 5);
//! assert_eq!(&buf[..len], b"\x1b[5;10H");
//! ```

use std::sync::Arc;

use crate::error::{Result, TermInfoError};
use crate::seq::{
    aix16_bg, aix16_fg, emit_seq, emit_seq_void, parse_seq, ArgWidth, CompiledSeq, SeqArg,
    SeqKind, SEQ_ARGS_MAX, SEQ_LENGTH_MAX,
};

/// Control sequences for one kind of terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermInfo {
    /// Terminal name, e.g. "xterm-256color"
    name: Option<String>,
    /// Compiled sequences, indexed by `SeqKind::index()`
    seqs: [CompiledSeq; SeqKind::COUNT],
    /// Template strings as configured; `None` means unsupported
    unparsed: [Option<String>; SeqKind::COUNT],
}

impl TermInfo {
    /// Create a blank term info with no sequences set
    pub fn new() -> Self {
        Self {
            name: None,
            seqs: [CompiledSeq::new(); SeqKind::COUNT],
            unparsed: std::array::from_fn(|_| None),
        }
    }

    /// Wrap in a shared handle. Cloning the handle adds a reference and
    /// dropping it removes one; the last drop frees the templates.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Terminal name, if set
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set or clear the terminal name
    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name.map(str::to_string);
    }

    /// Check if `kind` can be emitted
    pub fn have_seq(&self, kind: SeqKind) -> bool {
        self.unparsed[kind.index()].is_some()
    }

    /// Template string for `kind`, or `None` if not set
    pub fn get_seq(&self, kind: SeqKind) -> Option<&str> {
        self.unparsed[kind.index()].as_deref()
    }

    /// Compiled form of `kind`
    pub fn compiled_seq(&self, kind: SeqKind) -> &CompiledSeq {
        &self.seqs[kind.index()]
    }

    /// Iterate over the sequences that are set, in kind order
    pub fn iter(&self) -> impl Iterator<Item = (SeqKind, &str)> + '_ {
        SeqKind::ALL
            .iter()
            .filter_map(move |&kind| self.get_seq(kind).map(|s| (kind, s)))
    }

    /// Set the template for `kind`, or clear it with `None`
    ///
    /// Arguments are written `%1`, `%2`, ... up to the number of arguments
    /// `kind` takes, and `%%` is a literal `%`. Each argument can expand to
    /// four digits, or three for 8-bit arguments, and the worst-case
    /// expansion must stay under [`SEQ_LENGTH_MAX`].
    ///
    /// On error the previous template for `kind` is left untouched.
    pub fn set_seq(&mut self, kind: SeqKind, template: Option<&str>) -> Result<()> {
        let i = kind.index();

        let Some(template) = template else {
            self.seqs[i] = CompiledSeq::new();
            self.unparsed[i] = None;
            tracing::trace!(seq = %kind, "Cleared sequence");
            return Ok(());
        };

        let meta = kind.meta();
        let compiled = match parse_seq(template, meta.n_args, meta.width.max_digits()) {
            Ok(compiled) => compiled,
            Err(e) => {
                tracing::debug!(seq = %kind, template = ?template, "Rejected sequence: {}", e);
                return Err(e);
            },
        };

        self.seqs[i] = compiled;
        self.unparsed[i] = Some(template.to_string());
        tracing::trace!(seq = %kind, template = ?template, "Set sequence");
        Ok(())
    }

    /// Clear the template for `kind`
    pub fn clear_seq(&mut self, kind: SeqKind) {
        self.seqs[kind.index()] = CompiledSeq::new();
        self.unparsed[kind.index()] = None;
    }

    /// Copy every sequence `source` has and `self` lacks
    pub fn supplement(&mut self, source: &TermInfo) {
        for &kind in SeqKind::ALL {
            let i = kind.index();
            if self.unparsed[i].is_none() {
                if let Some(template) = &source.unparsed[i] {
                    self.seqs[i] = source.seqs[i];
                    self.unparsed[i] = Some(template.clone());
                }
            }
        }
    }

    /// Format `kind` with `args` into a new buffer
    ///
    /// Unlike the `emit_*` methods this checks its input: the sequence must
    /// be set, the argument count must match, and 8-bit sequences reject
    /// values above 255. The 16-color sequences take color indices and
    /// remap them like [`TermInfo::emit_set_color_fg_16`] does.
    pub fn emit_seq(&self, kind: SeqKind, args: &[u32]) -> Result<Vec<u8>> {
        if !self.have_seq(kind) {
            return Err(TermInfoError::MissingSeq(kind));
        }

        let meta = kind.meta();
        if args.len() != meta.n_args {
            return Err(TermInfoError::ArgCount {
                kind,
                expected: meta.n_args,
                got: args.len(),
            });
        }

        let seq = self.compiled_seq(kind);
        let mut buf = [0u8; SEQ_LENGTH_MAX];
        let len = match meta.width {
            ArgWidth::None => emit_seq_void(seq, &mut buf),
            ArgWidth::Wide => emit_seq(seq, &mut buf, args),
            ArgWidth::Byte => {
                let mut bytes = [0u8; SEQ_ARGS_MAX];
                for (index, &value) in args.iter().enumerate() {
                    let value = u8::try_from(value).map_err(|_| TermInfoError::ArgOutOfRange {
                        kind,
                        index,
                        value,
                    })?;
                    bytes[index] = meta.transform.apply(index, value);
                }
                emit_seq(seq, &mut buf, &bytes[..args.len()])
            },
        };

        Ok(buf[..len].to_vec())
    }

    #[inline]
    fn emit_void(&self, kind: SeqKind, dest: &mut [u8]) -> usize {
        debug_assert_eq!(kind.n_args(), 0);
        emit_seq_void(&self.seqs[kind.index()], dest)
    }

    #[inline]
    fn emit_args<A: SeqArg>(&self, kind: SeqKind, dest: &mut [u8], args: &[A]) -> usize {
        debug_assert_eq!(kind.n_args(), args.len());
        debug_assert_eq!(kind.meta().width, A::WIDTH);
        emit_seq(&self.seqs[kind.index()], dest, args)
    }
}

impl Default for TermInfo {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! void_emitters {
    ($( $func:ident => $kind:ident; )*) => {
        impl TermInfo {
            $(
                #[inline]
                pub fn $func(&self, dest: &mut [u8]) -> usize {
                    self.emit_void(SeqKind::$kind, dest)
                }
            )*
        }
    };
}

macro_rules! arg_emitters {
    ($( $func:ident => $kind:ident($($arg:ident),+): $ty:ty; )*) => {
        impl TermInfo {
            $(
                #[inline]
                pub fn $func(&self, dest: &mut [u8], $($arg: $ty),+) -> usize {
                    self.emit_args::<$ty>(SeqKind::$kind, dest, &[$($arg),+])
                }
            )*
        }
    };
}

void_emitters! {
    emit_reset_terminal_soft => ResetTerminalSoft;
    emit_reset_terminal_hard => ResetTerminalHard;
    emit_reset_attributes => ResetAttributes;
    emit_clear => Clear;
    emit_invert_colors => InvertColors;
    emit_cursor_to_top_left => CursorToTopLeft;
    emit_cursor_to_bottom_left => CursorToBottomLeft;
    emit_cursor_up_1 => CursorUp1;
    emit_cursor_down_1 => CursorDown1;
    emit_cursor_left_1 => CursorLeft1;
    emit_cursor_right_1 => CursorRight1;
    emit_cursor_up_scroll => CursorUpScroll;
    emit_cursor_down_scroll => CursorDownScroll;
    emit_enable_insert => EnableInsert;
    emit_disable_insert => DisableInsert;
    emit_enable_cursor => EnableCursor;
    emit_disable_cursor => DisableCursor;
    emit_enable_echo => EnableEcho;
    emit_disable_echo => DisableEcho;
    emit_enable_wrap => EnableWrap;
    emit_disable_wrap => DisableWrap;
    emit_end_sixels => EndSixels;
    emit_enable_sixel_scrolling => EnableSixelScrolling;
    emit_disable_sixel_scrolling => DisableSixelScrolling;
    emit_end_kitty_image => EndKittyImage;
    emit_begin_kitty_image_chunk => BeginKittyImageChunk;
    emit_end_kitty_image_chunk => EndKittyImageChunk;
    emit_end_iterm2_image => EndIterm2Image;
    emit_enable_bold => EnableBold;
    emit_reset_default_fg => ResetDefaultFg;
    emit_query_default_fg => QueryDefaultFg;
    emit_reset_default_bg => ResetDefaultBg;
    emit_query_default_bg => QueryDefaultBg;
    emit_enable_alt_screen => EnableAltScreen;
    emit_disable_alt_screen => DisableAltScreen;
    emit_begin_screen_passthrough => BeginScreenPassthrough;
    emit_end_screen_passthrough => EndScreenPassthrough;
    emit_begin_tmux_passthrough => BeginTmuxPassthrough;
    emit_end_tmux_passthrough => EndTmuxPassthrough;
}

arg_emitters! {
    emit_cursor_to_pos => CursorToPos(x, y): u32;
    emit_cursor_up => CursorUp(n): u32;
    emit_cursor_down => CursorDown(n): u32;
    emit_cursor_left => CursorLeft(n): u32;
    emit_cursor_right => CursorRight(n): u32;
    emit_insert_cells => InsertCells(n): u32;
    emit_delete_cells => DeleteCells(n): u32;
    emit_insert_rows => InsertRows(n): u32;
    emit_delete_rows => DeleteRows(n): u32;
    emit_set_scrolling_rows => SetScrollingRows(top, bottom): u32;
    emit_repeat_char => RepeatChar(n): u32;
    emit_begin_kitty_immediate_image_v1 => BeginKittyImmediateImageV1(bpp, width, height): u32;
    emit_begin_iterm2_image => BeginIterm2Image(width, height): u32;
    emit_set_default_fg => SetDefaultFg(r, g, b): u32;
    emit_set_default_bg => SetDefaultBg(r, g, b): u32;
    emit_set_color_fg_direct => SetColorFgDirect(r, g, b): u8;
    emit_set_color_bg_direct => SetColorBgDirect(r, g, b): u8;
    emit_set_color_fgbg_direct => SetColorFgbgDirect(fg_r, fg_g, fg_b, bg_r, bg_g, bg_b): u8;
    emit_set_color_fg_256 => SetColorFg256(index): u8;
    emit_set_color_bg_256 => SetColorBg256(index): u8;
    emit_set_color_fgbg_256 => SetColorFgbg256(fg, bg): u8;
    emit_begin_sixels => BeginSixels(p1, p2, p3): u8;
}

// 16-color sequences take a palette index (0-15) and format it as the
// matching aixterm SGR parameter.
impl TermInfo {
    #[inline]
    pub fn emit_set_color_fg_16(&self, dest: &mut [u8], index: u8) -> usize {
        self.emit_args::<u8>(SeqKind::SetColorFg16, dest, &[aix16_fg(index)])
    }

    #[inline]
    pub fn emit_set_color_bg_16(&self, dest: &mut [u8], index: u8) -> usize {
        self.emit_args::<u8>(SeqKind::SetColorBg16, dest, &[aix16_bg(index)])
    }

    #[inline]
    pub fn emit_set_color_fgbg_16(&self, dest: &mut [u8], fg: u8, bg: u8) -> usize {
        self.emit_args::<u8>(SeqKind::SetColorFgbg16, dest, &[aix16_fg(fg), aix16_bg(bg)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitted(f: impl FnOnce(&mut [u8]) -> usize) -> Vec<u8> {
        let mut buf = [0u8; SEQ_LENGTH_MAX];
        let len = f(&mut buf);
        buf[..len].to_vec()
    }

    #[test]
    fn test_new_is_blank() {
        let ti = TermInfo::new();
        assert_eq!(ti.name(), None);
        for &kind in SeqKind::ALL {
            assert!(!ti.have_seq(kind));
            assert_eq!(ti.get_seq(kind), None);
            assert!(ti.compiled_seq(kind).is_empty());
        }
        assert_eq!(ti.iter().count(), 0);
    }

    #[test]
    fn test_set_and_get_seq() {
        let mut ti = TermInfo::new();
        ti.set_seq(SeqKind::ResetAttributes, Some("\x1b[0m")).unwrap();
        assert!(ti.have_seq(SeqKind::ResetAttributes));
        assert_eq!(ti.get_seq(SeqKind::ResetAttributes), Some("\x1b[0m"));
        assert!(!ti.have_seq(SeqKind::Clear));
    }

    #[test]
    fn test_failed_set_keeps_previous() {
        let mut ti = TermInfo::new();
        ti.set_seq(SeqKind::CursorUp, Some("\x1b[%1A")).unwrap();
        let before = ti.clone();

        assert_eq!(
            ti.set_seq(SeqKind::CursorUp, Some("\x1b[%2A")),
            Err(TermInfoError::BadArguments)
        );
        assert_eq!(
            ti.set_seq(SeqKind::CursorUp, Some(&"x".repeat(SEQ_LENGTH_MAX))),
            Err(TermInfoError::SeqTooLong)
        );
        assert_eq!(
            ti.set_seq(SeqKind::CursorUp, Some("\x1b[%zA")),
            Err(TermInfoError::BadEscape { offset: 2 })
        );

        assert_eq!(ti, before);
        assert_eq!(ti.get_seq(SeqKind::CursorUp), Some("\x1b[%1A"));
    }

    #[test]
    fn test_failed_set_on_unset_stays_unset() {
        let mut ti = TermInfo::new();
        assert!(ti.set_seq(SeqKind::Clear, Some("%1")).is_err());
        assert!(!ti.have_seq(SeqKind::Clear));
        assert!(ti.compiled_seq(SeqKind::Clear).is_empty());
    }

    #[test]
    fn test_clear_seq() {
        let mut ti = TermInfo::new();
        ti.set_seq(SeqKind::CursorUp, Some("\x1b[%1A")).unwrap();
        ti.set_seq(SeqKind::CursorUp, None).unwrap();
        assert!(!ti.have_seq(SeqKind::CursorUp));
        assert_eq!(emitted(|b| ti.emit_cursor_up(b, 3)), b"");

        ti.set_seq(SeqKind::Clear, Some("\x1b[2J")).unwrap();
        ti.clear_seq(SeqKind::Clear);
        assert_eq!(ti, TermInfo::new());
    }

    #[test]
    fn test_clear_unset_succeeds() {
        let mut ti = TermInfo::new();
        assert!(ti.set_seq(SeqKind::EndSixels, None).is_ok());
        assert!(!ti.have_seq(SeqKind::EndSixels));
    }

    #[test]
    fn test_emit_unset_writes_nothing() {
        let ti = TermInfo::new();
        assert_eq!(emitted(|b| ti.emit_reset_attributes(b)), b"");
        assert_eq!(emitted(|b| ti.emit_cursor_to_pos(b, 1, 1)), b"");
        assert_eq!(emitted(|b| ti.emit_set_color_fgbg_direct(b, 1, 2, 3, 4, 5, 6)), b"");
    }

    #[test]
    fn test_emit_void_seq() {
        let mut ti = TermInfo::new();
        ti.set_seq(SeqKind::DisableCursor, Some("\x1b[?25l")).unwrap();
        assert_eq!(emitted(|b| ti.emit_disable_cursor(b)), b"\x1b[?25l");
    }

    #[test]
    fn test_emit_cursor_to_pos() {
        let mut ti = TermInfo::new();
        ti.set_seq(SeqKind::CursorToPos, Some("\x1b[%2;%1H")).unwrap();
        assert_eq!(emitted(|b| ti.emit_cursor_to_pos(b, 80, 24)), b"\x1b[24;80H");
    }

    #[test]
    fn test_emit_direct_color() {
        let mut ti = TermInfo::new();
        ti.set_seq(
            SeqKind::SetColorFgbgDirect,
            Some("\x1b[38;2;%1;%2;%3;48;2;%4;%5;%6m"),
        )
        .unwrap();
        assert_eq!(
            emitted(|b| ti.emit_set_color_fgbg_direct(b, 255, 128, 0, 0, 0, 255)),
            b"\x1b[38;2;255;128;0;48;2;0;0;255m"
        );
    }

    #[test]
    fn test_emit_16_color_transform() {
        let mut ti = TermInfo::new();
        ti.set_seq(SeqKind::SetColorFg16, Some("\x1b[%1m")).unwrap();
        ti.set_seq(SeqKind::SetColorBg16, Some("\x1b[%1m")).unwrap();
        ti.set_seq(SeqKind::SetColorFgbg16, Some("\x1b[%1;%2m")).unwrap();

        assert_eq!(emitted(|b| ti.emit_set_color_fg_16(b, 3)), b"\x1b[33m");
        assert_eq!(emitted(|b| ti.emit_set_color_fg_16(b, 10)), b"\x1b[92m");
        assert_eq!(emitted(|b| ti.emit_set_color_bg_16(b, 0)), b"\x1b[40m");
        assert_eq!(emitted(|b| ti.emit_set_color_bg_16(b, 15)), b"\x1b[107m");
        assert_eq!(emitted(|b| ti.emit_set_color_fgbg_16(b, 1, 9)), b"\x1b[31;101m");
    }

    #[test]
    fn test_emit_zero_placeholders_in_arg_seq() {
        // A sequence taking arguments but configured without any emits nothing
        let mut ti = TermInfo::new();
        ti.set_seq(SeqKind::CursorUp, Some("\x1b[A")).unwrap();
        assert!(ti.have_seq(SeqKind::CursorUp));
        assert_eq!(emitted(|b| ti.emit_cursor_up(b, 1)), b"");
    }

    #[test]
    fn test_copy_is_independent() {
        let mut original = TermInfo::new();
        original.set_name(Some("xterm"));
        original.set_seq(SeqKind::CursorUp, Some("\x1b[%1A")).unwrap();

        let mut copy = original.clone();
        copy.set_seq(SeqKind::CursorUp, Some("\x1bM%1")).unwrap();
        copy.set_name(Some("other"));

        assert_eq!(original.name(), Some("xterm"));
        assert_eq!(original.get_seq(SeqKind::CursorUp), Some("\x1b[%1A"));
        assert_eq!(emitted(|b| original.emit_cursor_up(b, 2)), b"\x1b[2A");
        assert_eq!(emitted(|b| copy.emit_cursor_up(b, 2)), b"\x1bM2");
    }

    #[test]
    fn test_supplement() {
        let mut ti = TermInfo::new();
        ti.set_seq(SeqKind::Clear, Some("CLEAR")).unwrap();

        let mut fallback = TermInfo::new();
        fallback.set_seq(SeqKind::Clear, Some("\x1b[2J")).unwrap();
        fallback.set_seq(SeqKind::CursorUp, Some("\x1b[%1A")).unwrap();

        ti.supplement(&fallback);
        assert_eq!(ti.get_seq(SeqKind::Clear), Some("CLEAR"));
        assert_eq!(ti.get_seq(SeqKind::CursorUp), Some("\x1b[%1A"));
        assert_eq!(emitted(|b| ti.emit_cursor_up(b, 7)), b"\x1b[7A");
        assert_eq!(emitted(|b| ti.emit_clear(b)), b"CLEAR");
    }

    #[test]
    fn test_emit_seq_checked() {
        let mut ti = TermInfo::new();
        ti.set_seq(SeqKind::SetColorFg256, Some("\x1b[38;5;%1m")).unwrap();
        ti.set_seq(SeqKind::SetColorFgbg16, Some("\x1b[%1;%2m")).unwrap();
        ti.set_seq(SeqKind::Clear, Some("\x1b[2J")).unwrap();

        assert_eq!(
            ti.emit_seq(SeqKind::SetColorFg256, &[196]).unwrap(),
            b"\x1b[38;5;196m"
        );
        assert_eq!(
            ti.emit_seq(SeqKind::SetColorFgbg16, &[2, 12]).unwrap(),
            b"\x1b[32;104m"
        );
        assert_eq!(ti.emit_seq(SeqKind::Clear, &[]).unwrap(), b"\x1b[2J");
    }

    #[test]
    fn test_emit_seq_errors() {
        let mut ti = TermInfo::new();
        ti.set_seq(SeqKind::SetColorFg256, Some("\x1b[38;5;%1m")).unwrap();

        assert_eq!(
            ti.emit_seq(SeqKind::CursorUp, &[1]),
            Err(TermInfoError::MissingSeq(SeqKind::CursorUp))
        );
        assert_eq!(
            ti.emit_seq(SeqKind::SetColorFg256, &[1, 2]),
            Err(TermInfoError::ArgCount {
                kind: SeqKind::SetColorFg256,
                expected: 1,
                got: 2
            })
        );
        assert_eq!(
            ti.emit_seq(SeqKind::SetColorFg256, &[256]),
            Err(TermInfoError::ArgOutOfRange {
                kind: SeqKind::SetColorFg256,
                index: 0,
                value: 256
            })
        );
    }

    #[test]
    fn test_iter_in_kind_order() {
        let mut ti = TermInfo::new();
        ti.set_seq(SeqKind::EndSixels, Some("\x1b\\")).unwrap();
        ti.set_seq(SeqKind::Clear, Some("\x1b[2J")).unwrap();
        let kinds: Vec<_> = ti.iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![SeqKind::Clear, SeqKind::EndSixels]);
    }

    #[test]
    fn test_shared_handle_refcount() {
        let mut ti = TermInfo::new();
        ti.set_seq(SeqKind::Clear, Some("\x1b[2J")).unwrap();
        let shared = ti.into_shared();
        let second = Arc::clone(&shared);
        assert_eq!(Arc::strong_count(&shared), 2);
        drop(second);
        assert_eq!(Arc::strong_count(&shared), 1);
    }

    #[test]
    fn test_shared_mutation_detaches() {
        let mut ti = TermInfo::new();
        ti.set_seq(SeqKind::Clear, Some("A")).unwrap();
        let reader = ti.into_shared();
        let mut writer = Arc::clone(&reader);

        Arc::make_mut(&mut writer)
            .set_seq(SeqKind::Clear, Some("B"))
            .unwrap();
        assert_eq!(reader.get_seq(SeqKind::Clear), Some("A"));
        assert_eq!(writer.get_seq(SeqKind::Clear), Some("B"));
    }

    #[test]
    #[should_panic]
    fn test_emit_short_buffer_panics() {
        let mut ti = TermInfo::new();
        ti.set_seq(SeqKind::Clear, Some("\x1b[2J")).unwrap();
        let mut buf = [0u8; 8];
        ti.emit_clear(&mut buf);
    }
}
