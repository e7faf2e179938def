//! Integration tests for the radial auto-spread layout.

use mindgraph::MindMap;

/// root with `fanout` children, each carrying `grandchildren` children.
fn build_tree(seed: u64, fanout: usize, grandchildren: usize) -> (MindMap, String) {
    let mut m = MindMap::new();
    m.set_seed(seed);
    let root = m.create_root().unwrap();
    for _ in 0..fanout {
        let c = m.create_child(&root, None).unwrap();
        for _ in 0..grandchildren {
            m.create_child(&c, None).unwrap();
        }
    }
    (m, root)
}

fn angle_from(origin: (f32, f32), p: (f32, f32)) -> f32 {
    (p.1 - origin.1).atan2(p.0 - origin.0)
}

#[test]
fn test_root_pinned_at_viewport_center() {
    let (mut m, root) = build_tree(42, 5, 2);
    assert!(m.auto_spread());
    let center = m.viewport().center();
    let rc = m.node(&root).unwrap().center();
    assert!((rc.0 - center.0).abs() < 0.01);
    assert!((rc.1 - center.1).abs() < 0.01);
}

#[test]
fn test_spread_moves_every_branch_off_the_root() {
    let (mut m, root) = build_tree(42, 6, 3);
    assert!(m.auto_spread());
    let rc = m.node(&root).unwrap().center();
    for n in m.iter_nodes().filter(|n| n.parent_id.is_some()) {
        let c = n.center();
        let d = ((c.0 - rc.0).powi(2) + (c.1 - rc.1).powi(2)).sqrt();
        assert!(d > 1.0, "node {} collapsed onto the root", n.id);
    }
}

#[test]
fn test_spread_is_deterministic_for_a_seed() {
    let (mut m1, _) = build_tree(123, 4, 2);
    let (mut m2, _) = build_tree(123, 4, 2);
    m1.auto_spread();
    m2.auto_spread();
    for (a, b) in m1.iter_nodes().zip(m2.iter_nodes()) {
        assert_eq!(a.id, b.id);
        assert_eq!((a.x, a.y), (b.x, b.y));
    }
}

#[test]
fn test_spread_preserves_angular_order() {
    let mut m = MindMap::new();
    m.set_seed(9);
    let root = m.create_root().unwrap();
    let right = m.create_child(&root, None).unwrap();
    let left = m.create_child(&root, None).unwrap();
    let rc = m.node(&root).unwrap().center();
    // Pin one child due right of the root, the other due left.
    m.update_node_position(&right, rc.0 + 250.0 - 50.0, rc.1 - 20.0);
    m.update_node_position(&left, rc.0 - 250.0 - 50.0, rc.1 - 20.0);
    assert!(m.auto_spread());

    let rc = m.node(&root).unwrap().center();
    let a_right = angle_from(rc, m.node(&right).unwrap().center());
    let a_left = angle_from(rc, m.node(&left).unwrap().center());
    // Sorted by pre-spread angle (right ~ 0 before left ~ pi), the
    // branches keep that circular order in the new layout.
    assert!(a_right < a_left);
}

#[test]
fn test_spread_keeps_sibling_clearance() {
    for seed in 0u64..20 {
        let (mut m, _root) = build_tree(seed, 5, 0);
        assert!(m.auto_spread());
        let centers: Vec<(f32, f32)> = m
            .iter_nodes()
            .filter(|n| n.parent_id.is_some())
            .map(|n| n.center())
            .collect();
        for i in 0..centers.len() {
            for j in i + 1..centers.len() {
                let (ax, ay) = centers[i];
                let (bx, by) = centers[j];
                let d = ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt();
                assert!(
                    d >= 110.0 - 1e-3,
                    "seed {seed}: children {i} and {j} only {d} apart"
                );
            }
        }
    }
}

#[test]
fn test_spread_records_one_undoable_entry() {
    let (mut m, root) = build_tree(7, 3, 2);
    let before: Vec<(f32, f32)> = m.iter_nodes().map(|n| (n.x, n.y)).collect();
    let undo_before = m.undo_len();
    assert!(m.auto_spread());
    assert_eq!(m.undo_len(), undo_before + 1);
    assert!(m.undo());
    let after_undo: Vec<(f32, f32)> = m.iter_nodes().map(|n| (n.x, n.y)).collect();
    assert_eq!(before, after_undo);
    assert!(m.node(&root).is_some());
}

#[test]
fn test_spread_on_empty_map_is_rejected() {
    let mut m = MindMap::new();
    assert!(!m.auto_spread());
    assert_eq!(m.revision(), 0);
}

#[test]
fn test_spread_lays_out_collapsed_branches_too() {
    let (mut m, root) = build_tree(5, 3, 2);
    let folded = m
        .iter_nodes()
        .find(|n| n.parent_id.as_deref() == Some(root.as_str()))
        .map(|n| n.id.clone())
        .unwrap();
    m.toggle_collapse(&folded);
    let hidden: Vec<(String, f32, f32)> = m
        .iter_nodes()
        .filter(|n| n.parent_id.as_deref() == Some(folded.as_str()))
        .map(|n| (n.id.clone(), n.x, n.y))
        .collect();
    assert!(m.auto_spread());
    // Hidden nodes get fresh positions so expanding later looks sane.
    let mut moved = 0;
    for (id, x, y) in hidden {
        let n = m.node(&id).unwrap();
        if (n.x, n.y) != (x, y) {
            moved += 1;
        }
    }
    assert!(moved > 0);
}
