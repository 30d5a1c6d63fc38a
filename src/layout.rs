//! Tree Layout
//!
//! Turns the store's parent links into nested branches for display. One group per
//! root, single-child chains merged into one run, forks split into sub-branches with
//! the head's lineage first and the rest newest first.

use crate::history::{HistoryStore, Node};
use crate::types::NodeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Label length kept before truncation.
pub const DEFAULT_LABEL_CHARS: usize = 30;

/// Appended to truncated labels.
pub const ELLIPSIS: &str = "...";

/// A node as shown in the layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: NodeId,
    /// Label truncated for display
    pub label: String,
    /// `#<id> · HH:MM:SS`
    pub caption: String,
    pub created_at: DateTime<Utc>,
    /// On the head's ancestry path
    pub active: bool,
    /// Is the head
    pub current: bool,
}

/// A run of single-child nodes, followed by the sub-branches of the fork it ends in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Whether the first node of the run is on the head's ancestry path
    pub active: bool,
    /// Oldest first
    pub nodes: Vec<LayoutNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub forks: Vec<Branch>,
}

/// Top-level group: the branch rooted at one current root.
pub type BranchGroup = Branch;

impl Branch {
    /// Nodes of this branch and all sub-branches, depth-first, runs before forks.
    pub fn flatten(&self) -> Vec<&LayoutNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(branch) = stack.pop() {
            out.extend(branch.nodes.iter());
            stack.extend(branch.forks.iter().rev());
        }
        out
    }
}

/// Truncate `label` to `max_chars` characters, appending [`ELLIPSIS`] when cut.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    match label.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &label[..cut], ELLIPSIS),
        None => label.to_string(),
    }
}

/// Layout settings.
#[derive(Debug, Clone, Copy)]
pub struct TreeLayout {
    pub label_max_chars: usize,
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self {
            label_max_chars: DEFAULT_LABEL_CHARS,
        }
    }
}

impl TreeLayout {
    pub fn new(label_max_chars: usize) -> Self {
        Self { label_max_chars }
    }

    /// Lay out every tree in the store, roots in ascending id order.
    pub fn compute(&self, store: &HistoryStore) -> Vec<BranchGroup> {
        let pass = LayoutPass::new(store, self.label_max_chars);
        store
            .roots()
            .into_iter()
            .map(|root| pass.branch_from(root))
            .collect()
    }
}

/// Lay out `store` with default settings.
pub fn layout(store: &HistoryStore) -> Vec<BranchGroup> {
    TreeLayout::default().compute(store)
}

/// Read-only state shared by one layout computation.
struct LayoutPass<'a> {
    children: HashMap<NodeId, Vec<&'a Node>>,
    active: HashSet<NodeId>,
    head: Option<NodeId>,
    label_max_chars: usize,
}

impl<'a> LayoutPass<'a> {
    fn new(store: &'a HistoryStore, label_max_chars: usize) -> Self {
        let mut children: HashMap<NodeId, Vec<&'a Node>> = HashMap::new();
        // Ascending iteration keeps each child list sorted by id.
        for node in store.nodes() {
            if let Some(parent) = store.resolved_parent(node) {
                children.entry(parent).or_default().push(node);
            }
        }
        let head = store.head();
        let active = head
            .map(|id| store.ancestry_path(id).iter().map(|n| n.id()).collect())
            .unwrap_or_default();
        Self {
            children,
            active,
            head,
            label_max_chars,
        }
    }

    fn children_of(&self, id: NodeId) -> &[&'a Node] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Build the branch rooted at `start` without recursing per fork level.
    fn branch_from(&self, start: &'a Node) -> Branch {
        let (mut top, first_forks) = self.run_from(start);
        let mut pending: Vec<(Option<usize>, &'a Node)> =
            first_forks.into_iter().rev().map(|child| (None, child)).collect();
        let mut built: Vec<(Option<usize>, Option<Branch>)> = Vec::new();
        while let Some((parent, child)) = pending.pop() {
            let (branch, forks) = self.run_from(child);
            let index = built.len();
            built.push((parent, Some(branch)));
            pending.extend(forks.into_iter().rev().map(|c| (Some(index), c)));
        }

        // Each branch sits after its parent, so folding from the back attaches complete
        // subtrees. Siblings arrive last-first and are flipped once their parent is done.
        for index in (0..built.len()).rev() {
            let parent = built[index].0;
            let Some(mut branch) = built[index].1.take() else {
                continue;
            };
            branch.forks.reverse();
            match parent {
                Some(p) => {
                    if let Some(target) = built[p].1.as_mut() {
                        target.forks.push(branch);
                    }
                }
                None => top.forks.push(branch),
            }
        }
        top.forks.reverse();
        top
    }

    /// The merged run starting at `start`, plus its fork children in display order.
    fn run_from(&self, start: &'a Node) -> (Branch, Vec<&'a Node>) {
        let mut run = vec![start];
        let mut cursor = start;
        while let [only] = self.children_of(cursor.id()) {
            let only: &'a Node = *only;
            run.push(only);
            cursor = only;
        }

        let mut fork_children: Vec<&'a Node> = self.children_of(cursor.id()).to_vec();
        fork_children.sort_by(|a, b| {
            let a_active = self.active.contains(&a.id());
            let b_active = self.active.contains(&b.id());
            b_active.cmp(&a_active).then(b.id().cmp(&a.id()))
        });

        let branch = Branch {
            active: self.active.contains(&start.id()),
            nodes: run.into_iter().map(|node| self.layout_node(node)).collect(),
            forks: Vec::new(),
        };
        (branch, fork_children)
    }

    fn layout_node(&self, node: &Node) -> LayoutNode {
        LayoutNode {
            id: node.id(),
            label: truncate_label(node.label(), self.label_max_chars),
            caption: format!("#{} \u{00B7} {}", node.id(), node.created_at().format("%H:%M:%S")),
            created_at: node.created_at(),
            active: self.active.contains(&node.id()),
            current: self.head == Some(node.id()),
        }
    }
}
