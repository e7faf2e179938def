use crate::model::NodeId;
use crate::MindMap;

/// Walk `steps` parent links upward from `id`, clamping at the root.
/// `None` only for unknown ids.
pub fn ascend_impl(m: &MindMap, id: &str, steps: u32) -> Option<NodeId> {
    let mut cur = m.node(id)?;
    for _ in 0..steps {
        match &cur.parent_id {
            Some(pid) => cur = m.node(pid)?,
            None => break,
        }
    }
    Some(cur.id.clone())
}

/// Ids of `root_id` and all its descendants paired with their depth
/// relative to `root_id` (the node itself is 0), in breadth-first order.
pub fn relative_depths_impl(m: &MindMap, root_id: &str) -> Vec<(NodeId, u32)> {
    if m.node(root_id).is_none() {
        return Vec::new();
    }
    let mut out: Vec<(NodeId, u32)> = vec![(root_id.to_string(), 0)];
    let mut cursor = 0;
    while cursor < out.len() {
        let (pid, d) = (out[cursor].0.clone(), out[cursor].1);
        for child in m.iter_nodes() {
            if child.parent_id.as_deref() == Some(pid.as_str()) {
                out.push((child.id.clone(), d + 1));
            }
        }
        cursor += 1;
    }
    out
}

/// Resolve a signed relative count: negative counts name an ancestor
/// |n| steps up, non-negative counts name the node itself.
pub fn resolve_relative_impl(m: &MindMap, id: &str, n: i32) -> Option<NodeId> {
    if n < 0 {
        ascend_impl(m, id, n.unsigned_abs())
    } else {
        m.node(id).map(|node| node.id.clone())
    }
}
