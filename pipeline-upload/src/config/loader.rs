//! Locating, merging and validating configuration sources

use std::path::PathBuf;

use figment::Figment;
use validator::Validate;

use super::source::{ConfigFile, ConfigFormat, EnvOverrides, KEY_DELIMITER};
use super::{AppConfig, ConfigError};

/// Base name of the config file (`app.env`, `app.toml`, `app.json`)
pub const CONFIG_NAME: &str = "app";

/// Directories searched for the config file, in order
pub const DEFAULT_SEARCH_PATHS: [&str; 2] = ["/config", "config"];

/// Top-level sections that environment variables may address
pub const ENV_SECTIONS: [&str; 1] = ["s3_config"];

/// Builder for loading [`AppConfig`]
///
/// # Example
///
/// ```rust,no_run
/// use pipeline_upload::config::ConfigLoader;
///
/// # fn example() -> Result<(), pipeline_upload::config::ConfigError> {
/// // Search only ./deploy, ignoring the default paths
/// let config = ConfigLoader::new().with_search_paths(["deploy"]).load()?;
///
/// // Or point at one file directly
/// let config = ConfigLoader::new().with_file("/etc/pipeline/app.toml").load()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    name: String,
    search_paths: Vec<PathBuf>,
    file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            name: CONFIG_NAME.to_string(),
            search_paths: DEFAULT_SEARCH_PATHS.iter().map(PathBuf::from).collect(),
            file: None,
        }
    }
}

impl ConfigLoader {
    /// Loader with the default name and search paths
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the directories searched for the config file
    #[must_use]
    pub fn with_search_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Use exactly this file instead of searching
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Every path that would be tried, in order
    #[must_use]
    pub fn candidates(&self) -> Vec<PathBuf> {
        if let Some(file) = &self.file {
            return vec![file.clone()];
        }

        self.search_paths
            .iter()
            .flat_map(|dir| {
                ConfigFormat::ALL
                    .iter()
                    .map(move |format| dir.join(format!("{}.{}", self.name, format.extension())))
            })
            .collect()
    }

    /// Find the config file that will be used
    pub fn locate(&self) -> Result<(PathBuf, ConfigFormat), ConfigError> {
        let candidates = self.candidates();
        candidates
            .iter()
            .find(|path| path.is_file())
            .map(|path| (path.clone(), ConfigFormat::from_path(path)))
            .ok_or_else(|| ConfigError::NotFound {
                name: self.name.clone(),
                searched: candidates.clone(),
            })
    }

    /// Locate and read the config file into a figment provider
    pub fn read_source(&self) -> Result<ConfigFile, ConfigError> {
        let (path, format) = self.locate()?;
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), %format, "Read config file");
        Ok(ConfigFile::new(path, format, content))
    }

    /// Merged figment: config file, then environment overrides
    pub fn figment(&self) -> Result<Figment, ConfigError> {
        Ok(merged(self.read_source()?))
    }

    /// Load, decode and validate the configuration
    ///
    /// Validation failures are errors: every failing field is reported.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        self.load_with_source().map(|(config, _)| config)
    }

    /// Like [`load`](Self::load), also returning the file that was used
    pub fn load_with_source(&self) -> Result<(AppConfig, ConfigFile), ConfigError> {
        let source = self.read_source()?;
        let config: AppConfig = merged(source.clone()).extract()?;

        if let Err(errors) = config.validate() {
            tracing::debug!(
                fields = ?super::failing_fields(&errors),
                "Configuration failed validation"
            );
            return Err(ConfigError::Validation(errors));
        }

        tracing::debug!(s3_config = ?config.s3_config, "Loaded configuration");
        Ok((config, source))
    }
}

fn merged(source: ConfigFile) -> Figment {
    Figment::new().merge(source).merge(env_provider())
}

const fn env_provider() -> EnvOverrides {
    EnvOverrides::filtered(is_known_section)
}

fn is_known_section(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    ENV_SECTIONS.iter().any(|section| {
        key.strip_prefix(section)
            .is_some_and(|rest| rest.starts_with(KEY_DELIMITER))
    })
}
