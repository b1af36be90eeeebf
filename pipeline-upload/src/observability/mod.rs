//! Observability (structured logging)
//!
//! Logs go to stderr so that command output on stdout stays machine-readable.
//! The filter is taken from `RUST_LOG` when set.

use std::fmt;
use std::str::FromStr;

use tracing::Subscriber;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, multi-line output
    Pretty,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// Pretty output for debug builds, JSON for release builds
    #[must_use]
    pub const fn for_build() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format `{other}` (expected `pretty` or `json`)")),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Service name attached to the startup event
    pub service_name: String,

    /// Output format
    pub format: LogFormat,

    /// Filter directives used when `RUST_LOG` is unset
    pub default_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "pipeline-upload".to_string(),
            format: LogFormat::for_build(),
            default_filter: default_filter().to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// Create new observability config
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Override the output format
    #[must_use]
    pub const fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Override the fallback filter directives
    #[must_use]
    pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }
}

const fn default_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "info,pipeline_upload=debug"
    } else {
        "info"
    }
}

/// Build the subscriber without installing it
///
/// The filter comes from `RUST_LOG` when set, else from
/// [`ObservabilityConfig::default_filter`].
#[must_use]
pub fn subscriber(config: &ObservabilityConfig) -> Box<dyn Subscriber + Send + Sync> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    match config.format {
        LogFormat::Pretty => Box::new(
            tracing_subscriber::registry().with(env_filter).with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            ),
        ),
        LogFormat::Json => Box::new(
            tracing_subscriber::registry().with(env_filter).with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
    }
}

/// Install the global subscriber
///
/// # Example
///
/// ```rust,no_run
/// use pipeline_upload::observability::{self, LogFormat, ObservabilityConfig};
///
/// # fn main() -> anyhow::Result<()> {
/// observability::init(&ObservabilityConfig::default().with_format(LogFormat::Json))?;
/// tracing::info!("Application started");
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Fails if a global subscriber has already been installed.
pub fn init(config: &ObservabilityConfig) -> Result<(), TryInitError> {
    subscriber(config).try_init()?;

    tracing::debug!(service = %config.service_name, format = %config.format, "Logging initialized");
    Ok(())
}
