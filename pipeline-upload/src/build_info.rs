//! Build metadata embedded at compile time

/// Crate version from `Cargo.toml`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Short git commit hash of the source tree, or `unknown`
pub const GIT_COMMIT_HASH: &str = env!("PIPELINE_GIT_COMMIT_HASH");

/// Log the build identifiers at startup
pub fn log_startup() {
    tracing::info!(
        version = VERSION,
        git_commit = GIT_COMMIT_HASH,
        "Pipeline source code git commit hash: {GIT_COMMIT_HASH}"
    );
}
