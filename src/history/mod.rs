//! Generation History Store
//!
//! Bounded forest of immutable generation nodes addressed by id. Tracks the active
//! head, evicts when full, and restores any stored node as the new head.
//!
//! Relationships are derived by id lookup. A parent link only counts while it
//! resolves to a stored node with a smaller id, so traversals always terminate.

pub mod eviction;
pub mod node;

pub use eviction::{EvictionChoice, EvictionRule};
pub use node::{Node, PendingCapture};

use crate::config::HistoryConfig;
use crate::error::HistoryError;
use crate::types::{NodeId, Snapshot};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

/// Capacity used when none is configured.
pub const DEFAULT_CAPACITY: usize = 50;

/// Largest accepted capacity. Bounds how deeply forks can nest in a layout.
pub const MAX_CAPACITY: usize = 1000;

/// Bounded branching history of generation steps.
#[derive(Debug)]
pub struct HistoryStore {
    nodes: BTreeMap<NodeId, Node>,
    next_id: NodeId,
    head: Option<NodeId>,
    capacity: usize,
    revision: u64,
}

impl HistoryStore {
    /// Create an empty store holding at most `capacity` nodes.
    pub fn new(capacity: usize) -> Result<Self, HistoryError> {
        if capacity == 0 || capacity > MAX_CAPACITY {
            return Err(HistoryError::InvalidCapacity(capacity));
        }
        Ok(Self {
            nodes: BTreeMap::new(),
            next_id: 1,
            head: None,
            capacity,
            revision: 0,
        })
    }

    pub fn from_config(config: &HistoryConfig) -> Result<Self, HistoryError> {
        Self::new(config.capacity)
    }

    /// Record the state a generation starts from. Does not touch the store.
    pub fn capture_pre_state(
        &self,
        input_snapshot: Snapshot,
        label: impl Into<String>,
    ) -> PendingCapture {
        self.capture_pre_state_at(input_snapshot, label, Utc::now())
    }

    /// Same as [`capture_pre_state`](Self::capture_pre_state) with an explicit timestamp.
    pub fn capture_pre_state_at(
        &self,
        input_snapshot: Snapshot,
        label: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> PendingCapture {
        PendingCapture {
            input_snapshot,
            label: label.into(),
            created_at,
            parent_id: self.head,
        }
    }

    /// Commit a generation result as a new node and make it the head.
    ///
    /// Evicts one node first when the store is full. The parent recorded in
    /// `pending` is kept as-is even if it was evicted since the capture.
    pub fn finalize_node(&mut self, pending: PendingCapture, output_snapshot: Snapshot) -> Node {
        if self.nodes.len() >= self.capacity {
            self.evict_one();
        }

        let id = self.next_id;
        self.next_id += 1;

        let node = Node {
            id,
            parent_id: pending.parent_id,
            input_snapshot: pending.input_snapshot,
            output_snapshot,
            label: pending.label,
            created_at: pending.created_at,
        };
        self.nodes.insert(id, node.clone());
        self.head = Some(id);
        self.touch();

        debug!(
            node_id = id,
            parent_id = ?node.parent_id,
            size = self.nodes.len(),
            "History node finalized"
        );
        node
    }

    /// Make `id` the head again. The caller reapplies the node's payload.
    pub fn restore(&mut self, id: NodeId) -> Result<Node, HistoryError> {
        let node = self
            .nodes
            .get(&id)
            .cloned()
            .ok_or(HistoryError::NodeNotFound(id))?;
        self.head = Some(id);
        self.touch();
        debug!(node_id = id, "History head restored");
        Ok(node)
    }

    fn evict_one(&mut self) {
        if let Some(choice) = eviction::select_victim(self) {
            self.nodes.remove(&choice.id);
            debug!(
                node_id = choice.id,
                rule = %choice.rule,
                head = ?self.head,
                "Evicted history node"
            );
        }
    }

    /// Drop every node. Ids keep counting from where they were.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.touch();
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub fn head_node(&self) -> Option<&Node> {
        self.head.and_then(|id| self.nodes.get(&id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Counter bumped by every mutation; views compare it to detect staleness.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// All nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Parent id if it still resolves to an older stored node.
    pub fn resolved_parent(&self, node: &Node) -> Option<NodeId> {
        node.parent_id
            .filter(|parent| *parent < node.id && self.nodes.contains_key(parent))
    }

    pub fn is_root(&self, node: &Node) -> bool {
        self.resolved_parent(node).is_none()
    }

    /// Current roots in ascending id order.
    pub fn roots(&self) -> Vec<&Node> {
        self.nodes().filter(|node| self.is_root(node)).collect()
    }

    /// Nodes whose parent resolves to `id`, ascending.
    pub fn children(&self, id: NodeId) -> Vec<&Node> {
        self.nodes()
            .filter(|node| self.resolved_parent(node) == Some(id))
            .collect()
    }

    /// Nodes from the root of `id`'s tree down to `id`, inclusive.
    ///
    /// Empty when `id` is not stored.
    pub fn ancestry_path(&self, id: NodeId) -> Vec<&Node> {
        let mut path = Vec::new();
        let mut cursor = self.nodes.get(&id);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.resolved_parent(node).and_then(|p| self.nodes.get(&p));
        }
        path.reverse();
        path
    }

    pub(crate) fn ancestry_ids(&self, id: NodeId) -> Vec<NodeId> {
        self.ancestry_path(id).iter().map(|node| node.id).collect()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_id: 1,
            head: None,
            capacity: DEFAULT_CAPACITY,
            revision: 0,
        }
    }
}
