//! Tooling Layer
//!
//! Command-line entry points and script replay for driving a history store outside
//! the host application.

pub mod cli;
pub mod replay;

pub use cli::{Cli, CliContext, Commands};
pub use replay::{parse_script, replay, ReplayReport, ReplayStep, Replayer};
