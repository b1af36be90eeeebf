//! Config check command

use anyhow::{Context, Result};
use console::style;
use pipeline_upload::config::{AppConfig, ConfigLoader};
use pipeline_upload::PipelineError;
use serde_json::json;

/// Load and validate config without touching storage
pub struct CheckCommand {
    loader: ConfigLoader,
}

impl CheckCommand {
    /// Create a new command instance
    pub const fn new(loader: ConfigLoader) -> Self {
        Self { loader }
    }

    /// Execute the command
    pub fn execute(&self) -> Result<()> {
        let (config, source) = self.loader.load_with_source().map_err(PipelineError::from)?;

        eprintln!(
            "{} {} ({})",
            style("Config OK").green().bold(),
            style(source.path().display()).cyan(),
            source.format()
        );
        println!("{}", summary(&config)?);
        Ok(())
    }
}

/// Pretty JSON summary with secrets reduced to `set`/`unset`
fn summary(config: &AppConfig) -> Result<String> {
    serde_json::to_string_pretty(&json!({ "s3_config": config.s3_config.redacted() }))
        .context("Failed to render config summary")
}
