//! Format history layouts and node details as text.

use crate::history::{HistoryStore, Node};
use crate::layout::{Branch, BranchGroup, LayoutNode};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::{OwoColorize, Style};

/// Shown when the store holds no nodes.
pub const EMPTY_HISTORY: &str = "No generations yet";

fn paint(text: &str, style: Style, color: bool) -> String {
    if color {
        format!("{}", text.style(style))
    } else {
        text.to_string()
    }
}

/// Format a layout as an indented tree, one line per node.
///
/// `*` marks the head, `+` the rest of its lineage, `-` everything else.
pub fn format_layout_text(groups: &[BranchGroup], color: bool) -> String {
    let mut out = String::new();
    out.push_str(&paint("History", Style::new().bold().underline(), color));
    out.push('\n');
    if groups.is_empty() {
        out.push_str(EMPTY_HISTORY);
        out.push('\n');
        return out;
    }
    for group in groups {
        out.push('\n');
        write_branch(&mut out, group, color);
    }
    out
}

enum Line<'a> {
    Run(&'a Branch, usize),
    Fork(usize),
}

fn write_branch(out: &mut String, branch: &Branch, color: bool) {
    let mut stack = vec![Line::Run(branch, 0)];
    while let Some(line) = stack.pop() {
        match line {
            Line::Run(branch, depth) => {
                let indent = "  ".repeat(depth);
                for node in &branch.nodes {
                    out.push_str(&indent);
                    out.push_str(&format_node_line(node, color));
                    out.push('\n');
                }
                // Each fork prints its heading at the parent's indent, then its run one level in.
                for fork in branch.forks.iter().rev() {
                    stack.push(Line::Run(fork, depth + 1));
                    stack.push(Line::Fork(depth));
                }
            }
            Line::Fork(depth) => {
                out.push_str(&"  ".repeat(depth));
                out.push_str(&paint("Branch", Style::new().dimmed(), color));
                out.push('\n');
            }
        }
    }
}

fn format_node_line(node: &LayoutNode, color: bool) -> String {
    let (marker, style) = if node.current {
        ("*", Style::new().green().bold())
    } else if node.active {
        ("+", Style::new())
    } else {
        ("-", Style::new().dimmed())
    };
    let line = if node.label.is_empty() {
        format!("{} {}", marker, node.caption)
    } else {
        format!("{} {}  {}", marker, node.caption, node.label)
    };
    paint(&line, style, color)
}

/// Format the detail block for one node.
pub fn format_node_detail(node: &Node) -> String {
    let mut out = String::new();
    out.push_str("Generation Details\n\n");
    out.push_str(&format!("  Id: #{}\n", node.id()));
    match node.parent_id() {
        Some(parent) => out.push_str(&format!("  Parent: #{}\n", parent)),
        None => out.push_str("  Parent: none\n"),
    }
    out.push_str(&format!("  Created: {}\n", node.created_at().to_rfc3339()));
    out.push_str(&format!("  Input: {} bytes\n", node.input_snapshot().len()));
    out.push_str(&format!("  Output: {} bytes\n", node.output_snapshot().len()));
    out.push_str("  Prompt:\n");
    for line in node.label().lines() {
        out.push_str(&format!("    {}\n", line));
    }
    out
}

/// Format every stored node as a table, ascending id.
pub fn format_node_table(store: &HistoryStore) -> String {
    if store.is_empty() {
        return format!("{}\n", EMPTY_HISTORY);
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Id", "Parent", "Created", "Input", "Output", "Label"]);
    let head = store.head();
    for node in store.nodes() {
        let parent = match (node.parent_id(), store.resolved_parent(node)) {
            (Some(p), Some(_)) => format!("#{}", p),
            (Some(p), None) => format!("#{} (evicted)", p),
            (None, _) => "-".to_string(),
        };
        let id = if head == Some(node.id()) {
            format!("#{} *", node.id())
        } else {
            format!("#{}", node.id())
        };
        table.add_row(vec![
            id,
            parent,
            node.created_at().format("%H:%M:%S").to_string(),
            node.input_snapshot().len().to_string(),
            node.output_snapshot().len().to_string(),
            node.label().to_string(),
        ]);
    }
    format!(
        "{}\n\nTotal: {} of {} nodes.\n",
        table,
        store.len(),
        store.capacity()
    )
}
