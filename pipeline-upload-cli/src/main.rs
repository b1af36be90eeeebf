//! pipeline-upload CLI tool

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use commands::{CheckCommand, RunCommand};
use pipeline_upload::build_info;
use pipeline_upload::config::ConfigLoader;
use pipeline_upload::observability::{self, LogFormat, ObservabilityConfig};
use pipeline_upload::pipeline::{DEFAULT_FILE_NAME, DEFAULT_LOCAL_DIR};

#[derive(Parser)]
#[command(name = "pipeline-upload")]
#[command(version)]
#[command(about = "Write a file locally and upload it to an S3 bucket", long_about = None)]
struct Cli {
    /// Read config from this file instead of searching for `app.{env,toml,json}`
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory to search for the config file (repeatable, replaces the defaults)
    #[arg(long = "config-dir", global = true, value_name = "DIR")]
    config_dirs: Vec<PathBuf>,

    /// Log output format (`pretty` or `json`)
    #[arg(long, global = true, value_name = "FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the payload and upload it (default)
    Run {
        /// Directory the local file is written to
        #[arg(long, default_value = DEFAULT_LOCAL_DIR)]
        local_dir: PathBuf,
        /// Local file name, also used as the last segment of the remote key
        #[arg(long, default_value = DEFAULT_FILE_NAME)]
        file_name: String,
    },
    /// Load and validate config, then print a redacted summary
    Check,
}

impl Cli {
    fn loader(&self) -> ConfigLoader {
        let mut loader = ConfigLoader::new();
        if !self.config_dirs.is_empty() {
            loader = loader.with_search_paths(self.config_dirs.iter().cloned());
        }
        if let Some(file) = &self.config {
            loader = loader.with_file(file.clone());
        }
        loader
    }

    fn observability(&self) -> ObservabilityConfig {
        let config = ObservabilityConfig::new("pipeline-upload");
        match self.log_format {
            Some(format) => config.with_format(format),
            None => config,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = observability::init(&cli.observability()) {
        eprintln!("failed to initialize logging: {err}");
        return ExitCode::FAILURE;
    }
    build_info::log_startup();

    let loader = cli.loader();
    let result = match cli.command {
        Some(Commands::Check) => CheckCommand::new(loader).execute(),
        Some(Commands::Run {
            local_dir,
            file_name,
        }) => RunCommand::new(loader, local_dir, file_name).execute().await,
        None => {
            RunCommand::new(loader, PathBuf::from(DEFAULT_LOCAL_DIR), DEFAULT_FILE_NAME.to_string())
                .execute()
                .await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_run() {
        let cli = Cli::try_parse_from(["pipeline-upload"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
        assert!(cli.config_dirs.is_empty());
    }

    #[test]
    fn test_run_flags() {
        let cli = Cli::try_parse_from([
            "pipeline-upload",
            "run",
            "--local-dir",
            "/var/spool",
            "--file-name",
            "report.csv",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Run {
                local_dir,
                file_name,
            }) => {
                assert_eq!(local_dir, PathBuf::from("/var/spool"));
                assert_eq!(file_name, "report.csv");
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["pipeline-upload", "run"]).unwrap();
        match cli.command {
            Some(Commands::Run {
                local_dir,
                file_name,
            }) => {
                assert_eq!(local_dir, PathBuf::from("/tmp"));
                assert_eq!(file_name, "out.txt");
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "pipeline-upload",
            "check",
            "--config-dir",
            "/etc/pipeline",
            "--config-dir",
            "conf",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert!(matches!(cli.command, Some(Commands::Check)));
        assert_eq!(cli.config_dirs, vec![PathBuf::from("/etc/pipeline"), PathBuf::from("conf")]);
        assert_eq!(cli.log_format, Some(LogFormat::Json));
        assert_eq!(cli.observability().format, LogFormat::Json);
    }

    #[test]
    fn test_explicit_config_file_is_searched_first() {
        let cli = Cli::try_parse_from(["pipeline-upload", "--config", "/etc/app.toml"]).unwrap();
        assert_eq!(cli.loader().candidates()[0], PathBuf::from("/etc/app.toml"));
    }

    #[test]
    fn test_unknown_log_format_is_rejected() {
        assert!(Cli::try_parse_from(["pipeline-upload", "--log-format", "xml"]).is_err());
    }
}
