//! CLI command implementations

pub mod check;
pub mod run;

pub use check::CheckCommand;
pub use run::RunCommand;
