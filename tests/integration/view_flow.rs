use crate::generate;
use sketch_history::format::format_layout_text;
use sketch_history::{Dismissed, HistoryStore, HistoryView, Node, RestoreTarget, TreeLayout};

/// Stand-in for the application state a restore writes back into.
#[derive(Default)]
struct Canvas {
    input: Vec<u8>,
    prompt: String,
}

impl RestoreTarget for Canvas {
    fn apply_restore(&mut self, node: &Node) {
        self.input = node.input_snapshot().as_bytes().to_vec();
        self.prompt = node.label().to_string();
    }
}

#[test]
fn browse_select_and_restore() {
    let mut store = HistoryStore::new(10).unwrap();
    let first = generate(&mut store, "a fox in the snow");
    generate(&mut store, "a fox in the rain");

    let mut view = HistoryView::new(TreeLayout::default());
    assert!(view.toggle_overview());
    let groups = view.render(&store).unwrap();
    assert_eq!(groups[0].nodes.len(), 2);

    let node = view.open_detail(&store, first).unwrap();
    assert_eq!(node.label(), "a fox in the snow");

    let mut canvas = Canvas::default();
    let restored = view.restore_selected(&mut store, &mut canvas).unwrap();
    assert_eq!(restored.id(), first);
    assert_eq!(canvas.prompt, "a fox in the snow");
    assert_eq!(canvas.input, b"a fox in the snow");

    // Restore moved the head, so the open overview is stale.
    assert!(view.needs_render(&store));
    let groups = view.render(&store).unwrap();
    assert!(groups[0].nodes[0].current);
    assert!(!groups[0].nodes[1].active);

    // Generating from the restored node forks the tree.
    generate(&mut store, "a fox in the fog");
    let text = format_layout_text(&view.render(&store).unwrap(), false);
    assert_eq!(text.matches("Branch").count(), 2);

    assert_eq!(view.dismiss(), Dismissed::Overview);
    assert!(view.render(&store).is_none());
}

#[test]
fn dismiss_without_panels_is_noop() {
    let mut view = HistoryView::default();
    assert_eq!(view.dismiss(), Dismissed::Nothing);
    assert!(!view.is_overview_open());
}
