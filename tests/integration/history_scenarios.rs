use crate::generate;
use sketch_history::format::format_layout_text;
use sketch_history::history::MAX_CAPACITY;
use sketch_history::{layout, HistoryError, HistoryStore, Snapshot};

#[test]
fn fill_to_capacity_keeps_everything() {
    let mut store = HistoryStore::new(8).unwrap();
    let ids: Vec<_> = (0..8).map(|i| generate(&mut store, &format!("n{}", i))).collect();

    assert_eq!(store.len(), 8);
    for id in &ids {
        assert!(store.get(*id).is_some(), "node #{} should be stored", id);
    }
    assert_eq!(store.head(), ids.last().copied());
}

#[test]
fn restore_and_generate_creates_fork_with_head_branch_first() {
    let mut store = HistoryStore::new(10).unwrap();
    let a = generate(&mut store, "A");
    let b = generate(&mut store, "B");
    store.restore(a).unwrap();
    let c = generate(&mut store, "C");
    assert_eq!(store.head(), Some(c));

    let groups = layout(&store);
    assert_eq!(groups.len(), 1);
    let root = &groups[0];
    assert_eq!(root.nodes.len(), 1);
    assert_eq!(root.nodes[0].id, a);
    assert_eq!(root.forks.len(), 2);
    assert_eq!(root.forks[0].nodes[0].id, c);
    assert_eq!(root.forks[1].nodes[0].id, b);
    assert!(root.forks[0].nodes[0].current);
    assert!(!root.forks[1].nodes[0].active);
}

#[test]
fn long_labels_are_truncated_in_layout() {
    let mut store = HistoryStore::new(4).unwrap();
    let long = "x".repeat(35);
    let pending = store.capture_pre_state(Snapshot::from_text("in"), long.as_str());
    store.finalize_node(pending, Snapshot::from_text("out"));
    let pending = store.capture_pre_state(Snapshot::from_text("in"), "ten chars!");
    store.finalize_node(pending, Snapshot::from_text("out"));

    let groups = layout(&store);
    assert_eq!(groups[0].nodes[0].label, format!("{}...", "x".repeat(30)));
    assert_eq!(groups[0].nodes[1].label, "ten chars!");
    // Stored label is untouched.
    assert_eq!(store.get(1).unwrap().label(), long);
}

#[test]
fn eviction_prefers_the_inactive_leaf() {
    let mut store = HistoryStore::new(3).unwrap();
    let a = generate(&mut store, "A");
    let b = generate(&mut store, "B");
    let c = generate(&mut store, "C");
    assert_eq!(store.head(), Some(c));

    store.restore(b).unwrap();
    // At capacity: D's insertion evicts C, the only inactive leaf.
    let d = generate(&mut store, "D");
    assert!(!store.contains(c));
    assert_eq!(store.len(), 3);

    let path: Vec<_> = store.ancestry_path(d).iter().map(|n| n.id()).collect();
    assert_eq!(path, vec![a, b, d]);

    // Next insertion: chain A-B-D is fully active, fallback drops A.
    let e = generate(&mut store, "E");
    assert!(!store.contains(a));
    assert!(store.contains(b) && store.contains(d) && store.contains(e));
}

#[test]
fn eviction_prefers_inactive_leaf_with_room_for_d() {
    // A, B, C then restore B and add D at capacity 4: chain A-B-D active, C inactive.
    let mut store = HistoryStore::new(4).unwrap();
    let a = generate(&mut store, "A");
    let b = generate(&mut store, "B");
    let c = generate(&mut store, "C");
    store.restore(b).unwrap();
    let d = generate(&mut store, "D");
    assert_eq!(store.len(), 4);

    generate(&mut store, "E");
    assert!(!store.contains(c), "inactive leaf C must go first");
    assert!(store.contains(a) && store.contains(b) && store.contains(d));
}

#[test]
fn eviction_fallback_cuts_active_chain_but_ancestry_terminates() {
    let mut store = HistoryStore::new(2).unwrap();
    let a = generate(&mut store, "A");
    let b = generate(&mut store, "B");
    assert_eq!(store.head(), Some(b));

    let c = generate(&mut store, "C");
    assert!(!store.contains(a));
    assert!(store.is_root(store.get(b).unwrap()));

    let path: Vec<_> = store.ancestry_path(c).iter().map(|n| n.id()).collect();
    assert_eq!(path, vec![b, c]);
    assert_eq!(store.roots().len(), 1);
}

#[test]
fn restore_of_evicted_id_is_not_found() {
    let mut store = HistoryStore::new(2).unwrap();
    let a = generate(&mut store, "A");
    generate(&mut store, "B");
    let c = generate(&mut store, "C");
    assert!(!store.contains(a));

    assert_eq!(store.restore(a).unwrap_err(), HistoryError::NodeNotFound(a));
    assert_eq!(store.head(), Some(c));
    assert_eq!(store.len(), 2);
}

#[test]
fn ids_are_never_reused_after_eviction() {
    let mut store = HistoryStore::new(1).unwrap();
    let first = generate(&mut store, "A");
    let second = generate(&mut store, "B");
    let third = generate(&mut store, "C");
    assert_eq!((first, second, third), (1, 2, 3));
    assert_eq!(store.len(), 1);
    assert_eq!(store.head(), Some(third));
}

#[test]
fn deeply_nested_forks_lay_out_and_render() {
    // Every main node gets a side child before the next main node, so each fork
    // nests one level inside the previous one.
    let mut store = HistoryStore::new(MAX_CAPACITY).unwrap();
    let mut main = generate(&mut store, "main");
    let forks = (MAX_CAPACITY - 1) / 2;
    for _ in 0..forks {
        generate(&mut store, "side");
        store.restore(main).unwrap();
        main = generate(&mut store, "main");
    }
    assert_eq!(store.len(), 2 * forks + 1);
    assert_eq!(store.ancestry_path(main).len(), forks + 1);

    let groups = layout(&store);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].flatten().len(), store.len());

    let mut branch = &groups[0];
    let mut depth = 0;
    while let Some(next) = branch.forks.first() {
        assert_eq!(branch.forks.len(), 2);
        assert!(next.active);
        assert!(!branch.forks[1].active);
        branch = next;
        depth += 1;
    }
    assert_eq!(depth, forks);
    assert!(branch.nodes[0].current);
    assert_eq!(branch.nodes[0].id, main);

    let text = format_layout_text(&groups, false);
    assert_eq!(text.lines().filter(|l| l.trim() == "Branch").count(), 2 * forks);
    let current_line = format!("{}* #{}", "  ".repeat(forks), main);
    assert!(text.lines().any(|l| l.starts_with(&current_line)));

    assert!(serde_json::to_string(&groups).is_ok());
}
