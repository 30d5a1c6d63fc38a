//! Integration tests for the sketch history store

mod forest_properties;
mod history_scenarios;
mod view_flow;

use sketch_history::{HistoryStore, NodeId, Snapshot};

/// Capture from the current head and finalize immediately.
pub fn generate(store: &mut HistoryStore, label: &str) -> NodeId {
    let pending = store.capture_pre_state(Snapshot::from_text(label), label);
    store
        .finalize_node(pending, Snapshot::from_text(label))
        .id()
}
