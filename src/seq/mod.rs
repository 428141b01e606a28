//! Control sequence kinds and their static metadata
//!
//! Every sequence a terminal description can carry is listed once in the
//! table below. The table fixes the number of arguments each sequence takes,
//! how wide those arguments are when formatted, and whether the argument
//! values are remapped before formatting.

mod compile;
mod emit;

use std::fmt;
use std::str::FromStr;

use crate::error::TermInfoError;

pub use compile::{parse_seq, CompiledSeq, SeqArgInfo};
pub use emit::{format_dec_u32_0_to_9999, format_dec_u8, SeqArg};
pub(crate) use emit::{emit_seq, emit_seq_void};

/// Maximum length of a formatted control sequence, in bytes
pub const SEQ_LENGTH_MAX: usize = 96;

/// Maximum number of argument slots, plus one for the sentinel
pub const SEQ_ARGS_MAX: usize = 8;

/// Slot argument index marking the end of the slot list
pub const ARG_INDEX_SENTINEL: u8 = 255;

/// Integer width of a sequence's arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgWidth {
    /// Sequence takes no arguments
    None,
    /// 8-bit arguments, 0-255
    Byte,
    /// Wide arguments, formatted in the 0-9999 range
    Wide,
}

impl ArgWidth {
    /// Worst-case number of decimal digits one argument expands to
    pub const fn max_digits(self) -> usize {
        match self {
            ArgWidth::None => 0,
            ArgWidth::Byte => 3,
            ArgWidth::Wide => 4,
        }
    }
}

/// Numeric remapping applied to argument values before formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgTransform {
    /// Values are formatted as given
    None,
    /// aixterm 16-color foreground: 0-7 -> 30-37, 8-15 -> 90-97
    Aix16Fg,
    /// aixterm 16-color background: 0-7 -> 40-47, 8-15 -> 100-107
    Aix16Bg,
    /// First argument is a foreground index, second a background index
    Aix16FgBg,
}

impl ArgTransform {
    /// Remap the argument at `index`
    #[inline]
    pub fn apply(self, index: usize, value: u8) -> u8 {
        match (self, index) {
            (ArgTransform::Aix16Fg, _) | (ArgTransform::Aix16FgBg, 0) => aix16_fg(value),
            (ArgTransform::Aix16Bg, _) | (ArgTransform::Aix16FgBg, _) => aix16_bg(value),
            (ArgTransform::None, _) => value,
        }
    }
}

/// Map a 16-color index to its aixterm foreground SGR parameter
#[inline]
pub fn aix16_fg(index: u8) -> u8 {
    index.wrapping_add(if index < 8 { 30 } else { 90 - 8 })
}

/// Map a 16-color index to its aixterm background SGR parameter
#[inline]
pub fn aix16_bg(index: u8) -> u8 {
    index.wrapping_add(if index < 8 { 40 } else { 100 - 8 })
}

/// Static per-kind metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeqMeta {
    /// Number of arguments the sequence takes (0-6)
    pub n_args: usize,
    /// Width of each argument
    pub width: ArgWidth,
    /// Remapping applied before formatting
    pub transform: ArgTransform,
}

macro_rules! seq_defs {
    ($(
        $(#[$doc:meta])*
        $variant:ident = $name:literal, $n_args:literal, $width:ident, $transform:ident;
    )*) => {
        /// A control sequence a terminal description can carry
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum SeqKind {
            $(
                $(#[$doc])*
                $variant,
            )*
        }

        impl SeqKind {
            /// Every sequence kind, in declaration order
            pub const ALL: &'static [SeqKind] = &[$(SeqKind::$variant,)*];

            /// Number of sequence kinds
            pub const COUNT: usize = Self::ALL.len();

            /// Canonical snake_case name
            pub fn name(self) -> &'static str {
                match self {
                    $(SeqKind::$variant => $name,)*
                }
            }

            /// Static argument metadata
            pub fn meta(self) -> SeqMeta {
                match self {
                    $(SeqKind::$variant => SeqMeta {
                        n_args: $n_args,
                        width: ArgWidth::$width,
                        transform: ArgTransform::$transform,
                    },)*
                }
            }
        }
    };
}

seq_defs! {
    /// Soft reset (DECSTR)
    ResetTerminalSoft = "reset_terminal_soft", 0, None, None;
    /// Full reset (RIS)
    ResetTerminalHard = "reset_terminal_hard", 0, None, None;
    /// Reset all SGR attributes
    ResetAttributes = "reset_attributes", 0, None, None;
    /// Clear the screen
    Clear = "clear", 0, None, None;
    /// Reverse video
    InvertColors = "invert_colors", 0, None, None;
    CursorToTopLeft = "cursor_to_top_left", 0, None, None;
    CursorToBottomLeft = "cursor_to_bottom_left", 0, None, None;
    /// Absolute cursor position (x, y)
    CursorToPos = "cursor_to_pos", 2, Wide, None;
    CursorUp1 = "cursor_up_1", 0, None, None;
    CursorUp = "cursor_up", 1, Wide, None;
    CursorDown1 = "cursor_down_1", 0, None, None;
    CursorDown = "cursor_down", 1, Wide, None;
    CursorLeft1 = "cursor_left_1", 0, None, None;
    CursorLeft = "cursor_left", 1, Wide, None;
    CursorRight1 = "cursor_right_1", 0, None, None;
    CursorRight = "cursor_right", 1, Wide, None;
    /// Cursor up, scrolling at the top margin
    CursorUpScroll = "cursor_up_scroll", 0, None, None;
    /// Cursor down, scrolling at the bottom margin
    CursorDownScroll = "cursor_down_scroll", 0, None, None;
    InsertCells = "insert_cells", 1, Wide, None;
    DeleteCells = "delete_cells", 1, Wide, None;
    InsertRows = "insert_rows", 1, Wide, None;
    DeleteRows = "delete_rows", 1, Wide, None;
    /// Scrolling region (top, bottom)
    SetScrollingRows = "set_scrolling_rows", 2, Wide, None;
    EnableInsert = "enable_insert", 0, None, None;
    DisableInsert = "disable_insert", 0, None, None;
    EnableCursor = "enable_cursor", 0, None, None;
    DisableCursor = "disable_cursor", 0, None, None;
    EnableEcho = "enable_echo", 0, None, None;
    DisableEcho = "disable_echo", 0, None, None;
    EnableWrap = "enable_wrap", 0, None, None;
    DisableWrap = "disable_wrap", 0, None, None;
    /// 24-bit foreground (r, g, b)
    SetColorFgDirect = "set_color_fg_direct", 3, Byte, None;
    /// 24-bit background (r, g, b)
    SetColorBgDirect = "set_color_bg_direct", 3, Byte, None;
    /// 24-bit foreground and background
    SetColorFgbgDirect = "set_color_fgbg_direct", 6, Byte, None;
    SetColorFg256 = "set_color_fg_256", 1, Byte, None;
    SetColorBg256 = "set_color_bg_256", 1, Byte, None;
    SetColorFgbg256 = "set_color_fgbg_256", 2, Byte, None;
    /// 16-color foreground, index remapped to aixterm SGR
    SetColorFg16 = "set_color_fg_16", 1, Byte, Aix16Fg;
    /// 16-color background, index remapped to aixterm SGR
    SetColorBg16 = "set_color_bg_16", 1, Byte, Aix16Bg;
    SetColorFgbg16 = "set_color_fgbg_16", 2, Byte, Aix16FgBg;
    /// Start of sixel data (p1, p2, p3)
    BeginSixels = "begin_sixels", 3, Byte, None;
    EndSixels = "end_sixels", 0, None, None;
    EnableSixelScrolling = "enable_sixel_scrolling", 0, None, None;
    DisableSixelScrolling = "disable_sixel_scrolling", 0, None, None;
    /// Repeat the preceding character n times (REP)
    RepeatChar = "repeat_char", 1, Wide, None;
    /// Kitty graphics: immediate image (bpp, width, height)
    BeginKittyImmediateImageV1 = "begin_kitty_immediate_image_v1", 3, Wide, None;
    EndKittyImage = "end_kitty_image", 0, None, None;
    BeginKittyImageChunk = "begin_kitty_image_chunk", 0, None, None;
    EndKittyImageChunk = "end_kitty_image_chunk", 0, None, None;
    /// iTerm2 inline image (width, height)
    BeginIterm2Image = "begin_iterm2_image", 2, Wide, None;
    EndIterm2Image = "end_iterm2_image", 0, None, None;
    EnableBold = "enable_bold", 0, None, None;
    /// Default foreground via OSC 10 (r, g, b)
    SetDefaultFg = "set_default_fg", 3, Wide, None;
    ResetDefaultFg = "reset_default_fg", 0, None, None;
    QueryDefaultFg = "query_default_fg", 0, None, None;
    /// Default background via OSC 11 (r, g, b)
    SetDefaultBg = "set_default_bg", 3, Wide, None;
    ResetDefaultBg = "reset_default_bg", 0, None, None;
    QueryDefaultBg = "query_default_bg", 0, None, None;
    EnableAltScreen = "enable_alt_screen", 0, None, None;
    DisableAltScreen = "disable_alt_screen", 0, None, None;
    BeginScreenPassthrough = "begin_screen_passthrough", 0, None, None;
    EndScreenPassthrough = "end_screen_passthrough", 0, None, None;
    BeginTmuxPassthrough = "begin_tmux_passthrough", 0, None, None;
    EndTmuxPassthrough = "end_tmux_passthrough", 0, None, None;
}

impl SeqKind {
    /// Position in `SeqKind::ALL`
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Number of arguments the sequence takes
    pub fn n_args(self) -> usize {
        self.meta().n_args
    }
}

impl fmt::Display for SeqKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SeqKind {
    type Err = TermInfoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeqKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| TermInfoError::UnknownSeq(s.to_string()))
    }
}
