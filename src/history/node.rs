//! History node and pending capture records

use crate::types::{NodeId, Snapshot};
use chrono::{DateTime, Utc};

/// One committed generation step.
///
/// Fields are crate-private, so no caller outside the crate can change a node once the store
/// creates it.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) parent_id: Option<NodeId>,
    pub(crate) input_snapshot: Snapshot,
    pub(crate) output_snapshot: Snapshot,
    pub(crate) label: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Parent recorded at capture time. May no longer resolve after eviction.
    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent_id
    }

    pub fn input_snapshot(&self) -> &Snapshot {
        &self.input_snapshot
    }

    pub fn output_snapshot(&self) -> &Snapshot {
        &self.output_snapshot
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// State captured before a generation starts.
///
/// Only becomes a [`Node`] when handed to `HistoryStore::finalize_node`.
/// Dropping it is how a caller abandons a cancelled or failed generation.
#[derive(Debug, Clone)]
pub struct PendingCapture {
    pub(crate) input_snapshot: Snapshot,
    pub(crate) label: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) parent_id: Option<NodeId>,
}

impl PendingCapture {
    pub fn parent_id(&self) -> Option<NodeId> {
        self.parent_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn input_snapshot(&self) -> &Snapshot {
        &self.input_snapshot
    }
}
