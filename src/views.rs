//! History Views
//!
//! Presentation state around the store: the overview panel, the detail panel for a
//! single node, and whether the last rendered layout is stale. Key handling stays
//! with the caller, which maps its dismiss key onto [`HistoryView::dismiss`].

use crate::history::{HistoryStore, Node};
use crate::layout::{BranchGroup, TreeLayout};
use crate::types::NodeId;
use tracing::{debug, warn};

/// Receives the node chosen for restore so live application state can be reset.
pub trait RestoreTarget {
    fn apply_restore(&mut self, node: &Node);
}

impl<F> RestoreTarget for F
where
    F: FnMut(&Node),
{
    fn apply_restore(&mut self, node: &Node) {
        self(node)
    }
}

/// What a dismiss request closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissed {
    Detail,
    Overview,
    Nothing,
}

/// Overview and detail panel state.
#[derive(Debug, Default)]
pub struct HistoryView {
    layout: TreeLayout,
    overview_open: bool,
    detail: Option<NodeId>,
    rendered_revision: Option<u64>,
}

impl HistoryView {
    pub fn new(layout: TreeLayout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn is_overview_open(&self) -> bool {
        self.overview_open
    }

    /// Node whose detail panel is open.
    pub fn detail_node(&self) -> Option<NodeId> {
        self.detail
    }

    /// Flip the overview; returns whether it is now open.
    pub fn toggle_overview(&mut self) -> bool {
        self.overview_open = !self.overview_open;
        if self.overview_open {
            self.rendered_revision = None;
        }
        self.overview_open
    }

    pub fn close_overview(&mut self) {
        self.overview_open = false;
    }

    /// Open the detail panel for `id`. Unknown ids leave the view untouched.
    pub fn open_detail<'s>(&mut self, store: &'s HistoryStore, id: NodeId) -> Option<&'s Node> {
        let node = store.get(id)?;
        self.detail = Some(id);
        Some(node)
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// Close the innermost open panel: detail first, then overview.
    pub fn dismiss(&mut self) -> Dismissed {
        if self.detail.is_some() {
            self.close_detail();
            Dismissed::Detail
        } else if self.overview_open {
            self.close_overview();
            Dismissed::Overview
        } else {
            Dismissed::Nothing
        }
    }

    /// Whether the overview is open and shows an older revision of the store.
    pub fn needs_render(&self, store: &HistoryStore) -> bool {
        self.overview_open && self.rendered_revision != Some(store.revision())
    }

    /// Lay out the store if the overview is open, marking the view fresh.
    pub fn render(&mut self, store: &HistoryStore) -> Option<Vec<BranchGroup>> {
        if !self.overview_open {
            return None;
        }
        self.rendered_revision = Some(store.revision());
        Some(self.layout.compute(store))
    }

    /// Restore the node in the open detail panel and hand it to `target`.
    ///
    /// Returns `None` without side effects when no detail panel is open or its
    /// node has been evicted since it was opened.
    pub fn restore_selected(
        &mut self,
        store: &mut HistoryStore,
        target: &mut dyn RestoreTarget,
    ) -> Option<Node> {
        let id = self.detail?;
        let node = match store.restore(id) {
            Ok(node) => node,
            Err(err) => {
                warn!(node_id = id, error = %err, "Selected history node is gone");
                return None;
            }
        };
        self.close_detail();
        target.apply_restore(&node);
        debug!(node_id = id, "Restored history node from detail view");
        Some(node)
    }
}
