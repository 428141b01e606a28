//! Terminal profiles on disk
//!
//! A profile is a JSON object naming the terminal and mapping sequence names
//! to templates:
//!
//! ```json
//! {
//!   "name": "xterm-256color",
//!   "sequences": {
//!     "reset_attributes": "\u001b[0m",
//!     "cursor_to_pos": "\u001b[%2;%1H",
//!     "set_color_fg_256": "\u001b[38;5;%1m"
//!   }
//! }
//! ```
//!
//! A `null` template leaves that sequence unset.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TermInfoError;
use crate::seq::SeqKind;
use crate::term_info::TermInfo;

/// Serialized terminal profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermInfoConfig {
    /// Terminal name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Templates keyed by sequence name
    #[serde(default)]
    pub sequences: BTreeMap<String, Option<String>>,
}

impl TermInfoConfig {
    /// Load a profile from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save the profile to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Parse a profile from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Capture every sequence set in `term_info`
    pub fn from_term_info(term_info: &TermInfo) -> Self {
        Self {
            name: term_info.name().map(str::to_string),
            sequences: term_info
                .iter()
                .map(|(kind, template)| (kind.name().to_string(), Some(template.to_string())))
                .collect(),
        }
    }

    /// Build a term info from the profile
    ///
    /// Sequences are applied in kind order. The first unknown name or bad
    /// template aborts the build.
    pub fn build(&self) -> Result<TermInfo, ConfigError> {
        let mut entries = Vec::with_capacity(self.sequences.len());
        for (name, template) in &self.sequences {
            let kind: SeqKind = name
                .parse()
                .map_err(|_| ConfigError::UnknownSeq(name.clone()))?;
            entries.push((kind, template.as_deref()));
        }
        entries.sort_by_key(|&(kind, _)| kind);

        let mut term_info = TermInfo::new();
        term_info.set_name(self.name.as_deref());
        for (kind, template) in entries {
            term_info
                .set_seq(kind, template)
                .map_err(|source| ConfigError::Seq { kind, source })?;
        }

        tracing::debug!(
            name = ?self.name,
            sequences = term_info.iter().count(),
            "Built terminal profile"
        );
        Ok(term_info)
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown sequence name: {0}")]
    UnknownSeq(String),
    #[error("Sequence {kind}: {source}")]
    Seq {
        kind: SeqKind,
        #[source]
        source: TermInfoError,
    },
}
