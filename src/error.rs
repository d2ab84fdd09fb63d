//! Error taxonomy: fatal document and configuration failures.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Structural problems in the source document. These abort the run.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The element holding every catalog entry could not be found.
    #[error("missing container element #{id}")]
    MissingContainer {
        /// Identifier that was looked up.
        id: String,
    },
    /// An entry lacks an expected child, attribute or textual pattern.
    #[error("malformed entry #{index}: {reason}")]
    MalformedEntry {
        /// Zero-based position of the entry in document order.
        index: usize,
        /// What was missing or did not match.
        reason: String,
    },
    /// The document could not be read by the HTML parser.
    #[error("failed to parse document")]
    Parse(#[source] io::Error),
}

impl ExtractError {
    pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> Self {
        ExtractError::MalformedEntry {
            index,
            reason: reason.into(),
        }
    }
}

/// Failures while loading the runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The override table file exists but could not be read.
    #[error("failed to read override table {}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The override table file is not a JSON object of strings.
    #[error("failed to parse override table {}", path.display())]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}
