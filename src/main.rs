//! cht-colors-extract entrypoint: regenerates the color tables next to the catalog.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cht_colors::config::ToolConfig;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ToolConfig::load().context("loading configuration")?;
    info!(
        input = %config.input.display(),
        out_dir = %config.out_dir.display(),
        overrides = config.overrides.len(),
        "extracting color catalog"
    );

    let written = cht_colors::run(&config)?;
    info!(count = written.len(), "generated color artifacts");
    Ok(())
}

/// Configure tracing subscribers; `RUST_LOG` overrides the default `info` level.
fn init_tracing() {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
