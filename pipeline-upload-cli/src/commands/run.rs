//! Write-and-upload command

use std::path::PathBuf;

use anyhow::Result;
use console::style;
use pipeline_upload::config::ConfigLoader;
use pipeline_upload::pipeline::{self, RunOptions};
use pipeline_upload::storage::S3ObjectStore;
use pipeline_upload::PipelineError;

/// Load config, write the payload and upload it
pub struct RunCommand {
    loader: ConfigLoader,
    options: RunOptions,
}

impl RunCommand {
    /// Create a new command instance
    pub fn new(loader: ConfigLoader, local_dir: PathBuf, file_name: String) -> Self {
        Self {
            loader,
            options: RunOptions::default()
                .with_local_dir(local_dir)
                .with_file_name(file_name),
        }
    }

    /// Execute the command
    pub async fn execute(self) -> Result<()> {
        let config = self.loader.load().map_err(PipelineError::from)?;
        let store = S3ObjectStore::from_config(&config.s3_config).await;

        let report = pipeline::run(&config, &store, &self.options).await?;

        println!(
            "{} {}",
            style("Uploaded").green().bold(),
            style(&report.location).cyan()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_flags() {
        let cmd = RunCommand::new(ConfigLoader::new(), PathBuf::from("/var/spool"), "a.txt".to_string());
        assert_eq!(cmd.options.local_path(), PathBuf::from("/var/spool/a.txt"));
        assert_eq!(cmd.options.payload, pipeline::DEFAULT_PAYLOAD);
    }

    #[tokio::test]
    async fn test_missing_config_fails_before_upload() {
        let dir = std::env::temp_dir().join("pipeline-upload-cli-no-config");
        let loader = ConfigLoader::new().with_search_paths([dir.join("absent")]);
        let cmd = RunCommand::new(loader, dir.clone(), "out.txt".to_string());

        let err = cmd.execute().await.unwrap_err();

        assert!(err.to_string().starts_with("error reading app config"));
        assert!(!dir.join("out.txt").exists());
    }
}
