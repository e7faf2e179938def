//! Integration tests for structural tree operations.

use mindgraph::model::{Direction, NodeStyle, NODE_WIDTH};
use mindgraph::MindMap;

fn engine() -> MindMap {
    let mut m = MindMap::new();
    m.set_seed(7);
    m
}

#[test]
fn test_create_root_only_once() {
    let mut m = engine();
    let root = m.create_root().unwrap();
    assert!(m.create_root().is_none());
    assert_eq!(m.node_count(), 1);
    assert_eq!(m.focused(), Some(root.as_str()));
    assert!(m.node(&root).unwrap().parent_id.is_none());
}

#[test]
fn test_rejected_create_root_leaves_revision_unchanged() {
    let mut m = engine();
    m.create_root().unwrap();
    let rev = m.revision();
    assert!(m.create_root().is_none());
    assert_eq!(m.revision(), rev);
}

#[test]
fn test_directional_child_lands_past_parent_extent() {
    let mut m = engine();
    let root = m.create_root().unwrap();
    let parent = m.node(&root).unwrap().clone();
    let child = m.create_child(&root, Some(Direction::Right)).unwrap();
    let c = m.node(&child).unwrap();
    assert!(c.x >= parent.x + NODE_WIDTH);
    assert!((c.y - parent.y).abs() <= 80.0);
    assert_eq!(c.parent_id.as_deref(), Some(root.as_str()));
    assert_eq!(m.focused(), Some(child.as_str()));
}

#[test]
fn test_child_inherits_parent_style() {
    let mut m = engine();
    let root = m.create_root().unwrap();
    let patch = NodeStyle {
        color: Some("#ff0000".into()),
        ..NodeStyle::default()
    };
    assert!(m.update_node_style(&root, &patch));
    let child = m.create_child(&root, None).unwrap();
    let style = m.node(&child).unwrap().style.clone().unwrap();
    assert_eq!(style.color.as_deref(), Some("#ff0000"));
}

#[test]
fn test_sibling_of_root_rejected() {
    let mut m = engine();
    let root = m.create_root().unwrap();
    assert!(m.create_sibling(&root).is_none());
}

#[test]
fn test_sibling_stacks_orthogonal_to_branch() {
    let mut m = engine();
    let root = m.create_root().unwrap();
    let child = m.create_child(&root, Some(Direction::Right)).unwrap();
    let c = m.node(&child).unwrap().clone();
    let sib = m.create_sibling(&child).unwrap();
    let s = m.node(&sib).unwrap();
    // Horizontal branch, so the sibling stacks below with small jitter.
    assert!((s.y - c.y - 60.0).abs() <= 5.0 + 1e-3);
    assert!((s.x - c.x).abs() <= 5.0 + 1e-3);
    assert_eq!(s.parent_id.as_deref(), Some(root.as_str()));
}

#[test]
fn test_delete_subtree_cascades() {
    let mut m = engine();
    let root = m.create_root().unwrap();
    let a = m.create_child(&root, None).unwrap();
    let b = m.create_child(&a, None).unwrap();
    assert!(m.delete_subtree(&a));
    assert_eq!(m.node_count(), 1);
    assert!(m.node(&a).is_none());
    assert!(m.node(&b).is_none());
}

#[test]
fn test_delete_root_rejected() {
    let mut m = engine();
    let root = m.create_root().unwrap();
    let rev = m.revision();
    assert!(!m.delete_subtree(&root));
    assert_eq!(m.revision(), rev);
    assert_eq!(m.node_count(), 1);
}

#[test]
fn test_delete_selected_is_one_history_entry() {
    let mut m = engine();
    let root = m.create_root().unwrap();
    let a = m.create_child(&root, None).unwrap();
    let b = m.create_child(&root, None).unwrap();
    let _under_a = m.create_child(&a, None).unwrap();
    m.select_node(&a, true);
    m.select_node(&b, true);
    let undo_before = m.undo_len();
    assert!(m.delete_selected(&a));
    assert_eq!(m.node_count(), 1);
    assert_eq!(m.undo_len(), undo_before + 1);
    assert_eq!(m.focused(), None);
    assert!(m.selected_ids().is_empty());
}

#[test]
fn test_delete_selected_skips_root() {
    let mut m = engine();
    let root = m.create_root().unwrap();
    let a = m.create_child(&root, None).unwrap();
    m.select_node(&root, true);
    m.select_node(&a, true);
    assert!(m.delete_selected(&a));
    assert_eq!(m.node_count(), 1);
    assert!(m.node(&root).is_some());
}

#[test]
fn test_reparent_rejects_cycle_and_root() {
    let mut m = engine();
    let root = m.create_root().unwrap();
    let a = m.create_child(&root, None).unwrap();
    let b = m.create_child(&a, None).unwrap();
    assert!(!m.reparent(&a, &b), "moving a node into its own subtree");
    assert!(!m.reparent(&root, &a), "root must stay the root");
    assert!(!m.reparent(&a, &a));
    assert!(m.reparent(&b, &root));
    assert_eq!(m.node(&b).unwrap().parent_id.as_deref(), Some(root.as_str()));
}

#[test]
fn test_promote_moves_up_one_level() {
    let mut m = engine();
    let root = m.create_root().unwrap();
    let a = m.create_child(&root, None).unwrap();
    let b = m.create_child(&a, None).unwrap();
    assert!(m.promote(&b));
    assert_eq!(m.node(&b).unwrap().parent_id.as_deref(), Some(root.as_str()));
    // A child of the root has nowhere higher to go.
    assert!(!m.promote(&a));
}

#[test]
fn test_demote_under_preceding_sibling() {
    let mut m = engine();
    let root = m.create_root().unwrap();
    let a = m.create_child(&root, None).unwrap();
    let b = m.create_child(&root, None).unwrap();
    assert!(m.demote(&b));
    assert_eq!(m.node(&b).unwrap().parent_id.as_deref(), Some(a.as_str()));
    // First sibling and root have no preceding sibling.
    assert!(!m.demote(&a));
    assert!(!m.demote(&root));
}

#[test]
fn test_update_text_noop_when_unchanged() {
    let mut m = engine();
    let root = m.create_root().unwrap();
    assert!(m.update_node_text(&root, "hello"));
    let rev = m.revision();
    assert!(!m.update_node_text(&root, "hello"));
    assert_eq!(m.revision(), rev);
}

#[test]
fn test_multi_selection_moves_rigidly() {
    let mut m = engine();
    let root = m.create_root().unwrap();
    let a = m.create_child(&root, None).unwrap();
    let b = m.create_child(&root, None).unwrap();
    m.update_node_position(&a, 100.0, 100.0);
    m.update_node_position(&b, 300.0, 100.0);
    m.select_node(&a, true);
    m.select_node(&b, true);
    assert!(m.update_node_position(&a, 110.0, 130.0));
    let nb = m.node(&b).unwrap();
    assert_eq!((nb.x, nb.y), (310.0, 130.0));
    // The root was not selected and stays put.
    let (rx, _) = {
        let r = m.node(&root).unwrap();
        (r.x, r.y)
    };
    assert!(rx != 110.0);
}

#[test]
fn test_select_subtree() {
    let mut m = engine();
    let root = m.create_root().unwrap();
    let a = m.create_child(&root, None).unwrap();
    let b = m.create_child(&a, None).unwrap();
    let other = m.create_child(&root, None).unwrap();
    assert!(m.select_subtree(&a));
    assert!(m.is_selected(&a));
    assert!(m.is_selected(&b));
    assert!(!m.is_selected(&other));
    assert_eq!(m.focused(), Some(a.as_str()));
}

#[test]
fn test_reset_replaces_everything() {
    let mut m = engine();
    let root = m.create_root().unwrap();
    m.create_child(&root, None).unwrap();
    m.create_child(&root, None).unwrap();
    let fresh = m.reset();
    assert_eq!(m.node_count(), 1);
    assert_ne!(fresh, root);
    assert_eq!(m.focused(), Some(fresh.as_str()));
    // Reset is undoable like any other mutation.
    assert!(m.undo());
    assert_eq!(m.node_count(), 3);
}

#[test]
fn test_bounding_box_and_connections() {
    let mut m = engine();
    let root = m.create_root().unwrap();
    let a = m.create_child(&root, None).unwrap();
    m.update_node_position(&root, 0.0, 0.0);
    m.update_node_position(&a, 200.0, 50.0);
    let (x0, y0, x1, y1) = m.bounding_box().unwrap();
    assert_eq!((x0, y0), (0.0, 0.0));
    assert_eq!((x1, y1), (300.0, 90.0));
    let conns = m.connections();
    assert_eq!(conns, vec![(root.clone(), a.clone())]);
    // Collapsing the root hides the child and its connection.
    m.toggle_collapse(&root);
    assert!(m.connections().is_empty());
}

#[test]
fn test_search_is_case_insensitive_and_capped() {
    let mut m = engine();
    let root = m.create_root().unwrap();
    m.update_node_text(&root, "Rust Engine");
    for i in 0..5 {
        let c = m.create_child(&root, None).unwrap();
        m.update_node_text(&c, &format!("engine part {i}"));
    }
    assert_eq!(m.search("ENGINE", 10).len(), 6);
    assert_eq!(m.search("engine", 3).len(), 3);
    assert!(m.search("  ", 10).is_empty());
    assert!(m.search("missing", 10).is_empty());
}
