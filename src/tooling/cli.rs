//! CLI Tooling
//!
//! Developer command line for replaying history scripts and inspecting the
//! effective configuration.

use crate::config::{AppConfig, ConfigLoader, HistoryConfig};
use crate::error::ApiError;
use crate::format::{format_layout_text, format_node_detail, format_node_table};
use crate::history::HistoryStore;
use crate::layout::TreeLayout;
use crate::tooling::replay::{load_script, replay, ReplayReport};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

/// Sketch history - branching generation history tools
#[derive(Parser)]
#[command(name = "sketch-history")]
#[command(about = "Replay and inspect branching generation histories")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply logging flags on top of the loaded configuration.
    pub fn apply_logging_overrides(&self, config: &mut AppConfig) {
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.logging.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.logging.file = Some(file.clone());
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a JSON script of history operations and print the resulting tree
    Replay {
        /// Script file: a JSON array of steps
        script: PathBuf,
        /// Override the configured store capacity
        #[arg(long)]
        capacity: Option<usize>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
        /// Also list every stored node
        #[arg(long)]
        nodes: bool,
        /// Print the detail block of the head node
        #[arg(long)]
        detail: bool,
        /// Disable colored text output
        #[arg(long)]
        no_color: bool,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// CLI execution context
pub struct CliContext {
    config: AppConfig,
}

impl CliContext {
    /// Load configuration from `config_path`, or defaults plus environment.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(&path)?,
            None => ConfigLoader::load()?,
        };
        Ok(Self { config })
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    /// Execute a command and return its output.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Replay {
                script,
                capacity,
                format,
                nodes,
                detail,
                no_color,
            } => {
                let history = HistoryConfig {
                    capacity: capacity.unwrap_or(self.config.history.capacity),
                    ..self.config.history.clone()
                };
                let mut store = HistoryStore::from_config(&history)?;
                let steps = load_script(script)?;
                let report = replay(&mut store, &steps)?;
                info!(
                    script = %script.display(),
                    steps = report.steps,
                    size = store.len(),
                    head = ?store.head(),
                    "Replay finished"
                );
                match format.as_str() {
                    "json" => self.replay_json(&store, &report),
                    "text" => Ok(self.replay_text(&store, &report, *nodes, *detail, !*no_color)),
                    other => Err(ApiError::ConfigError(format!(
                        "Invalid format: {} (must be 'text' or 'json')",
                        other
                    ))),
                }
            }
            Commands::Config => toml::to_string_pretty(&self.config)
                .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e))),
        }
    }

    fn tree_layout(&self) -> TreeLayout {
        TreeLayout::new(self.config.history.label_max_chars)
    }

    fn replay_json(&self, store: &HistoryStore, report: &ReplayReport) -> Result<String, ApiError> {
        let value = json!({
            "head": store.head(),
            "size": store.len(),
            "capacity": store.capacity(),
            "report": report,
            "groups": self.tree_layout().compute(store),
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn replay_text(
        &self,
        store: &HistoryStore,
        report: &ReplayReport,
        nodes: bool,
        detail: bool,
        color: bool,
    ) -> String {
        let mut out = format_layout_text(&self.tree_layout().compute(store), color);
        out.push('\n');
        if nodes {
            out.push_str(&format_node_table(store));
            out.push('\n');
        }
        if detail {
            if let Some(head) = store.head_node() {
                out.push_str(&format_node_detail(head));
                out.push('\n');
            }
        }
        out.push_str(&format!(
            "Replayed {} steps: {} created, {} restored, {} cancelled.\n",
            report.steps,
            report.created.len(),
            report.restored.len(),
            report.cancelled
        ));
        if !report.missed_restores.is_empty() {
            let ids: Vec<String> = report
                .missed_restores
                .iter()
                .map(|id| format!("#{}", id))
                .collect();
            out.push_str(&format!("Not found on restore: {}\n", ids.join(", ")));
        }
        if report.dangling_captures > 0 {
            out.push_str(&format!(
                "{} capture(s) never finalized.\n",
                report.dangling_captures
            ));
        }
        out
    }
}
