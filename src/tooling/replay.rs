//! Replay scripts
//!
//! Drives a history store from a JSON list of steps so capture, finalize, cancel and
//! restore sequences can be reproduced outside the application.

use crate::error::ApiError;
use crate::history::{HistoryStore, PendingCapture};
use crate::types::{NodeId, Snapshot};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// One scripted operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ReplayStep {
    /// Capture and finalize in one go.
    Generate {
        input: String,
        output: String,
        #[serde(default)]
        label: String,
    },
    /// Capture only; the capture waits for a later `finalize` or `cancel`.
    Capture {
        input: String,
        #[serde(default)]
        label: String,
    },
    /// Finalize the most recent pending capture.
    Finalize { output: String },
    /// Drop the most recent pending capture.
    Cancel,
    Restore { id: NodeId },
}

/// Outcome counters for a replay run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub steps: usize,
    pub created: Vec<NodeId>,
    pub restored: Vec<NodeId>,
    /// Restore ids that were not in the store
    pub missed_restores: Vec<NodeId>,
    pub cancelled: usize,
    /// Captures never finalized or cancelled
    pub dangling_captures: usize,
}

/// Parse a script from JSON text.
pub fn parse_script(text: &str) -> Result<Vec<ReplayStep>, ApiError> {
    Ok(serde_json::from_str(text)?)
}

/// Read and parse a script file.
pub fn load_script(path: &Path) -> Result<Vec<ReplayStep>, ApiError> {
    let text = std::fs::read_to_string(path)?;
    parse_script(&text)
}

/// Applies steps to a store, holding captures between `capture` and `finalize`.
pub struct Replayer<'s> {
    store: &'s mut HistoryStore,
    pending: Vec<PendingCapture>,
    report: ReplayReport,
}

impl<'s> Replayer<'s> {
    pub fn new(store: &'s mut HistoryStore) -> Self {
        Self {
            store,
            pending: Vec::new(),
            report: ReplayReport::default(),
        }
    }

    pub fn apply(&mut self, step: &ReplayStep) -> Result<(), ApiError> {
        self.report.steps += 1;
        match step {
            ReplayStep::Generate {
                input,
                output,
                label,
            } => {
                let pending = self
                    .store
                    .capture_pre_state(Snapshot::from_text(input), label.as_str());
                self.commit(pending, output);
            }
            ReplayStep::Capture { input, label } => {
                let pending = self
                    .store
                    .capture_pre_state(Snapshot::from_text(input), label.as_str());
                self.pending.push(pending);
            }
            ReplayStep::Finalize { output } => {
                let pending = self.pending.pop().ok_or_else(|| {
                    ApiError::ScriptError(format!(
                        "step {}: finalize without a pending capture",
                        self.report.steps
                    ))
                })?;
                self.commit(pending, output);
            }
            ReplayStep::Cancel => {
                if self.pending.pop().is_none() {
                    return Err(ApiError::ScriptError(format!(
                        "step {}: cancel without a pending capture",
                        self.report.steps
                    )));
                }
                self.report.cancelled += 1;
            }
            ReplayStep::Restore { id } => match self.store.restore(*id) {
                Ok(node) => {
                    info!(node_id = node.id(), "Restored");
                    self.report.restored.push(node.id());
                }
                Err(err) => {
                    warn!(node_id = id, error = %err, "Restore skipped");
                    self.report.missed_restores.push(*id);
                }
            },
        }
        Ok(())
    }

    fn commit(&mut self, pending: PendingCapture, output: &str) {
        let node = self.store.finalize_node(pending, Snapshot::from_text(output));
        info!(
            node_id = node.id(),
            parent_id = ?node.parent_id(),
            size = self.store.len(),
            "Generation recorded"
        );
        self.report.created.push(node.id());
    }

    pub fn finish(mut self) -> ReplayReport {
        self.report.dangling_captures = self.pending.len();
        self.report
    }
}

/// Apply every step in order.
pub fn replay(store: &mut HistoryStore, steps: &[ReplayStep]) -> Result<ReplayReport, ApiError> {
    let mut replayer = Replayer::new(store);
    for step in steps {
        replayer.apply(step)?;
    }
    Ok(replayer.finish())
}
