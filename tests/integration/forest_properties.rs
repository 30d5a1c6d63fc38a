use proptest::prelude::*;
use sketch_history::{layout, HistoryStore, NodeId, PendingCapture, Snapshot};
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Op {
    Generate,
    Restore(NodeId),
    Capture,
    FinalizePending,
    CancelPending,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => Just(Op::Generate),
        2 => (1u64..60).prop_map(Op::Restore),
        1 => Just(Op::Capture),
        1 => Just(Op::FinalizePending),
        1 => Just(Op::CancelPending),
    ]
}

fn check_invariants(store: &HistoryStore) {
    assert!(store.len() <= store.capacity());

    let Some(head) = store.head() else {
        assert!(store.is_empty());
        return;
    };
    assert!(store.contains(head), "head #{} must resolve", head);

    let path = store.ancestry_path(head);
    assert!(!path.is_empty());
    assert!(path.len() <= store.len());
    assert!(store.is_root(path[0]));
    assert_eq!(path.last().unwrap().id(), head);
    for pair in path.windows(2) {
        assert_eq!(store.resolved_parent(pair[1]), Some(pair[0].id()));
    }

    let groups = layout(store);
    assert_eq!(groups.len(), store.roots().len());
    let flat: Vec<_> = groups.iter().flat_map(|g| g.flatten()).collect();
    assert_eq!(flat.len(), store.len());
    let seen: HashSet<_> = flat.iter().map(|n| n.id).collect();
    assert_eq!(seen.len(), store.len());
    assert_eq!(flat.iter().filter(|n| n.current).count(), 1);
    assert_eq!(flat.iter().filter(|n| n.active).count(), path.len());
}

proptest! {
    #[test]
    fn forest_invariants_hold(capacity in 1usize..8, ops in prop::collection::vec(op_strategy(), 0..80)) {
        let mut store = HistoryStore::new(capacity).unwrap();
        let mut pending: Vec<PendingCapture> = Vec::new();
        let mut last_id: NodeId = 0;

        for op in ops {
            match op {
                Op::Generate => {
                    let capture = store.capture_pre_state(Snapshot::from_text("in"), "step");
                    let id = store.finalize_node(capture, Snapshot::from_text("out")).id();
                    prop_assert!(id > last_id);
                    last_id = id;
                }
                Op::Restore(id) => {
                    let head = store.head();
                    let known = store.contains(id);
                    let result = store.restore(id);
                    prop_assert_eq!(result.is_ok(), known);
                    if known {
                        prop_assert_eq!(store.head(), Some(id));
                    } else {
                        prop_assert_eq!(store.head(), head);
                    }
                }
                Op::Capture => {
                    pending.push(store.capture_pre_state(Snapshot::from_text("in"), "late"));
                }
                Op::FinalizePending => {
                    if let Some(capture) = pending.pop() {
                        let id = store.finalize_node(capture, Snapshot::from_text("out")).id();
                        prop_assert!(id > last_id);
                        last_id = id;
                    }
                }
                Op::CancelPending => {
                    pending.pop();
                }
            }
            check_invariants(&store);
        }
    }
}
