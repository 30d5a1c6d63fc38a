//! Eviction policy
//!
//! Picks the node to drop when the store is full. Inactive leaves go first, oldest
//! first, so the lineage of the head survives as long as anything else can be dropped.
//! When every leaf sits on the head's lineage the globally oldest node is dropped,
//! even though that can cut the lineage short.

use super::HistoryStore;
use crate::types::NodeId;
use std::collections::HashSet;
use std::fmt;

/// Which rule selected the victim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionRule {
    /// Oldest leaf outside the head's ancestry path.
    InactiveLeaf,
    /// No inactive leaf existed; oldest node overall.
    OldestFallback,
}

impl fmt::Display for EvictionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionRule::InactiveLeaf => write!(f, "inactive_leaf"),
            EvictionRule::OldestFallback => write!(f, "oldest_fallback"),
        }
    }
}

/// Selected victim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictionChoice {
    pub id: NodeId,
    pub rule: EvictionRule,
}

/// Choose the node to evict, or `None` when the store is empty.
pub fn select_victim(store: &HistoryStore) -> Option<EvictionChoice> {
    let active: HashSet<NodeId> = match store.head() {
        Some(head) => store.ancestry_ids(head).into_iter().collect(),
        None => HashSet::new(),
    };

    // Ids that some stored node resolves as its parent.
    let with_children: HashSet<NodeId> = store
        .nodes()
        .filter_map(|node| store.resolved_parent(node))
        .collect();

    let leaf = store
        .nodes()
        .map(|node| node.id())
        .find(|id| !active.contains(id) && !with_children.contains(id));

    if let Some(id) = leaf {
        return Some(EvictionChoice {
            id,
            rule: EvictionRule::InactiveLeaf,
        });
    }

    store.nodes().next().map(|node| EvictionChoice {
        id: node.id(),
        rule: EvictionRule::OldestFallback,
    })
}
