//! Library crate for cht-colors: extracts the traditional color catalog from
//! `index.html` and generates the keyed JSON tables and stylesheet variables.

#![forbid(unsafe_code)]

pub mod color;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod output;
pub mod romanize;

use std::{fs, path::PathBuf};

use anyhow::Context;
use tracing::{info, warn};

use config::ToolConfig;
use document::Document;
use extract::extract;
use output::write_outputs;

/// Run one extraction pass: read the catalog, validate it, write the artifacts.
///
/// Validation warnings are logged and never fail the run.
pub fn run(config: &ToolConfig) -> anyhow::Result<Vec<PathBuf>> {
    let html = fs::read_to_string(&config.input)
        .with_context(|| format!("reading {}", config.input.display()))?;
    let document = Document::parse(&html).context("parsing catalog document")?;

    let extraction = extract(&document, &config.overrides)
        .with_context(|| format!("extracting colors from {}", config.input.display()))?;
    for warning in &extraction.warnings {
        warn!("{warning}");
    }
    info!(
        path = %config.input.display(),
        count = extraction.entries.len(),
        warnings = extraction.warnings.len(),
        "extracted color catalog"
    );

    write_outputs(&extraction.entries, &config.out_dir)
}
