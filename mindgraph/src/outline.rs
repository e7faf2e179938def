use crate::history::EntryKind;
use crate::json::DocError;
use crate::model::{MindMapNode, NodeId, NodeStyle, Shape};
use crate::MindMap;
use rand::Rng;

const HEADER: &str = "mindmap";
const INDENT: &str = "  ";
/// Imported nodes are scattered this far around the viewport center;
/// a spread pass is expected to follow.
const SCATTER: f32 = 500.0;

fn escape(text: &str) -> String {
    // Parentheses are shape syntax in the outline format.
    text.chars().filter(|c| *c != '(' && *c != ')').collect()
}

/// Export the tree as an indented outline (mermaid `mindmap` dialect):
/// one line per node, two spaces per depth level, depth-first in
/// creation order.
pub fn to_outline_impl(m: &MindMap) -> String {
    fn walk(m: &MindMap, id: &str, depth: usize, out: &mut String) {
        let node = match m.node(id) {
            Some(n) => n,
            None => return,
        };
        for _ in 0..=depth {
            out.push_str(INDENT);
        }
        let label = escape(node.text.trim());
        if label.is_empty() {
            out.push_str("New Idea");
        } else {
            out.push_str(&label);
        }
        out.push('\n');
        let children: Vec<NodeId> = m
            .iter_nodes()
            .filter(|n| n.parent_id.as_deref() == Some(id))
            .map(|n| n.id.clone())
            .collect();
        for child in children {
            walk(m, &child, depth + 1, out);
        }
    }

    let mut out = String::from(HEADER);
    out.push('\n');
    if let Some(root) = m.root() {
        let root_id = root.id.clone();
        walk(m, &root_id, 0, &mut out);
    }
    out
}

/// Import an indented outline, replacing the whole map. Parents are
/// inferred from the nearest preceding line with strictly smaller
/// indentation; ids are freshly generated.
pub fn from_outline_impl(m: &mut MindMap, text: &str) -> Result<(), DocError> {
    let mut lines = text.lines();
    match lines.next() {
        Some(first) if first.trim().starts_with(HEADER) => {}
        _ => return Err(DocError::Invalid("outline must start with 'mindmap'")),
    }

    let (cx, cy) = m.viewport.center();
    let mut nodes: Vec<MindMapNode> = Vec::new();
    let mut stack: Vec<(NodeId, usize)> = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let indent = line.len() - line.trim_start().len();
        while stack.last().map_or(false, |&(_, i)| i >= indent) {
            stack.pop();
        }
        let parent_id = stack.last().map(|(id, _)| id.clone());
        if parent_id.is_none() && !nodes.is_empty() {
            return Err(DocError::Invalid("outline has more than one root"));
        }
        let id = m.generate_id();
        let x = cx + (m.rng.gen::<f32>() - 0.5) * SCATTER;
        let y = cy + (m.rng.gen::<f32>() - 0.5) * SCATTER;
        nodes.push(MindMapNode {
            id: id.clone(),
            text: line.trim().to_string(),
            x,
            y,
            parent_id,
            width: None,
            height: None,
            style: Some(NodeStyle {
                shape: Some(Shape::Rounded),
                background_color: Some("#ffffff".to_string()),
                color: Some("#000000".to_string()),
                ..NodeStyle::default()
            }),
            is_collapsed: false,
        });
        stack.push((id, indent));
    }
    if nodes.is_empty() {
        return Err(DocError::Invalid("outline has no nodes"));
    }

    m.replace_all(nodes, EntryKind::Update);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_strips_parens() {
        assert_eq!(escape("f(x) = y"), "fx = y");
    }

    #[test]
    fn test_outline_rejects_missing_header() {
        let mut m = MindMap::new();
        assert!(from_outline_impl(&mut m, "flowchart\n  a\n").is_err());
    }

    #[test]
    fn test_outline_rejects_second_root() {
        let mut m = MindMap::new();
        let text = "mindmap\n  one\n  two\n";
        assert!(from_outline_impl(&mut m, text).is_err());
    }

    #[test]
    fn test_outline_parent_inference() {
        let mut m = MindMap::new();
        let text = "mindmap\n  root\n    a\n      deep\n    b\n";
        from_outline_impl(&mut m, text).unwrap();
        assert_eq!(m.node_count(), 4);
        let root = m.root().unwrap().id.clone();
        let a = m.iter_nodes().find(|n| n.text == "a").unwrap().clone();
        let b = m.iter_nodes().find(|n| n.text == "b").unwrap().clone();
        let deep = m.iter_nodes().find(|n| n.text == "deep").unwrap().clone();
        assert_eq!(a.parent_id.as_deref(), Some(root.as_str()));
        assert_eq!(b.parent_id.as_deref(), Some(root.as_str()));
        assert_eq!(deep.parent_id.as_deref(), Some(a.id.as_str()));
        // Import focuses the root.
        assert_eq!(m.focused(), Some(root.as_str()));
    }
}
