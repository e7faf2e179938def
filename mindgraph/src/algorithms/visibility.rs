use crate::model::NodeId;
use crate::MindMap;

/// Depth of a node: root is 0, each parent hop adds 1. `None` for
/// unknown ids (or a broken parent chain, which the store never produces).
pub fn depth_impl(m: &MindMap, id: &str) -> Option<u32> {
    let mut depth = 0u32;
    let mut cur = m.node(id)?;
    while let Some(pid) = &cur.parent_id {
        cur = m.node(pid)?;
        depth += 1;
        if depth as usize > m.node_count() {
            return None;
        }
    }
    Some(depth)
}

/// A node is visible iff it is the root, or its parent is visible and
/// not collapsed. Collapsed subtrees are excluded from every consumer
/// (rendering, connections, navigation) through this single predicate.
pub fn is_visible_impl(m: &MindMap, id: &str) -> bool {
    let node = match m.node(id) {
        Some(n) => n,
        None => return false,
    };
    match &node.parent_id {
        None => true,
        Some(pid) => match m.node(pid) {
            Some(parent) => !parent.is_collapsed && is_visible_impl(m, pid),
            None => false,
        },
    }
}

/// Ids of all currently visible nodes, in creation order.
pub fn visible_nodes_impl(m: &MindMap) -> Vec<NodeId> {
    m.iter_nodes()
        .filter(|n| is_visible_impl(m, &n.id))
        .map(|n| n.id.clone())
        .collect()
}
