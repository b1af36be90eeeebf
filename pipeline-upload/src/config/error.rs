//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

use super::validation::format_validation_errors;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config source exists in any of the search paths
    #[error("no `{name}` config file found (searched: {})", display_paths(.searched))]
    NotFound {
        /// Config file base name
        name: String,
        /// Every candidate path that was tried
        searched: Vec<PathBuf>,
    },

    /// A config source exists but cannot be read
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        /// Path of the unreadable source
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Sources were read but could not be decoded into the config type
    #[error("failed to decode config: {0}")]
    Decode(#[from] Box<figment::Error>),

    /// Decoded config failed field validation
    #[error("invalid config:\n{}", format_validation_errors(.0))]
    Validation(#[from] validator::ValidationErrors),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Decode(Box::new(err))
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
