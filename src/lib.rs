//! Sketch History: Branching Generation History
//!
//! A bounded forest of immutable generation snapshots with lineage-preserving
//! eviction, restore of any past branch, and a layout that turns parent links into
//! readable branches.

pub mod config;
pub mod error;
pub mod format;
pub mod history;
pub mod layout;
pub mod logging;
pub mod tooling;
pub mod types;
pub mod views;

pub use error::{ApiError, HistoryError};
pub use history::{HistoryStore, Node, PendingCapture};
pub use layout::{layout, Branch, BranchGroup, LayoutNode, TreeLayout};
pub use types::{NodeId, Snapshot};
pub use views::{Dismissed, HistoryView, RestoreTarget};
