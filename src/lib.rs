//! Mochi Term Info - terminal control sequence templates
//!
//! Describes the control sequences one kind of terminal understands and
//! formats them with arguments at high call rates:
//!
//! - `seq`: sequence kinds, template compilation and emission
//! - `term_info`: the per-terminal container and its `emit_*` entry points
//! - `config`: JSON terminal profiles
//!
//! Templates are checked when they are set, so a formatted sequence never
//! exceeds `SEQ_LENGTH_MAX` bytes and emitting never fails or allocates.

pub mod config;
mod error;
pub mod seq;
mod term_info;

pub use config::{ConfigError, TermInfoConfig};
pub use error::{Result, TermInfoError};
pub use seq::{ArgTransform, ArgWidth, CompiledSeq, SeqKind, SeqMeta, SEQ_ARGS_MAX, SEQ_LENGTH_MAX};
pub use term_info::TermInfo;
