use crate::history::{EntryKind, HistoryEntry};
use crate::model::{MindMapNode, NodeId, NodeStyle, Shape};
use crate::MindMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Storage keys for the injected key-value store.
pub const NODES_KEY: &str = "mindmapNodes";
pub const HISTORY_KEY: &str = "mindmapHistory";

/// Boundary failure for document import. The engine state is never
/// touched unless the whole document validates.
#[derive(Debug, Error)]
pub enum DocError {
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid document: {0}")]
    Invalid(&'static str),
}

/// Persist the node collection only. Used mid-drag, where history must
/// stay untouched but a crash should not lose the gesture.
pub fn save_nodes_impl(m: &MindMap) {
    match serde_json::to_string(&m.nodes) {
        Ok(text) => m.store.set(NODES_KEY, &text),
        Err(e) => log::warn!("failed to serialize nodes for storage: {e}"),
    }
}

/// Persist nodes and both history stacks.
pub fn save_impl(m: &MindMap) {
    save_nodes_impl(m);
    #[derive(Serialize)]
    struct Stacks<'a> {
        undo: &'a [HistoryEntry],
        redo: &'a [HistoryEntry],
    }
    let stacks = Stacks {
        undo: m.history.undo_entries(),
        redo: m.history.redo_entries(),
    };
    match serde_json::to_string(&stacks) {
        Ok(text) => m.store.set(HISTORY_KEY, &text),
        Err(e) => log::warn!("failed to serialize history for storage: {e}"),
    }
}

/// Load persisted nodes, if any. History is always forced empty: entries
/// from a previous session are never trusted across a reload. Malformed
/// JSON is logged and ignored, leaving the store empty so the caller
/// creates a fresh root.
pub fn load_impl(m: &mut MindMap) -> bool {
    let text = match m.store.get(NODES_KEY) {
        Some(t) => t,
        None => return false,
    };
    match serde_json::from_str::<Vec<MindMapNode>>(&text) {
        Ok(nodes) => {
            m.nodes = nodes;
            m.rebuild_index();
            m.history.clear();
            m.store.remove(HISTORY_KEY);
            true
        }
        Err(e) => {
            log::warn!("ignoring corrupt stored nodes: {e}");
            false
        }
    }
}

/// Export the map as a versioned document. `created`/`modified` are
/// host-supplied timestamps (the core has no clock); `None` omits them.
pub fn to_document_impl(
    m: &MindMap,
    title: &str,
    created: Option<&str>,
    modified: Option<&str>,
) -> Value {
    #[derive(Serialize)]
    struct MetaSer<'a> {
        title: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        created: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        modified: Option<&'a str>,
    }
    #[derive(Serialize)]
    struct PositionSer {
        x: f32,
        y: f32,
    }
    #[derive(Serialize)]
    struct StyleSer {
        color: String,
        #[serde(rename = "backgroundColor")]
        background_color: String,
        #[serde(rename = "fontSize")]
        font_size: u32,
        #[serde(rename = "fontWeight")]
        font_weight: String,
        #[serde(rename = "fontStyle")]
        font_style: String,
        shape: Shape,
    }
    #[derive(Serialize)]
    struct NodeSer<'a> {
        id: &'a str,
        #[serde(rename = "parentId")]
        parent_id: Option<&'a str>,
        text: &'a str,
        #[serde(rename = "type")]
        node_type: &'static str,
        position: PositionSer,
        style: StyleSer,
        collapsed: bool,
    }
    #[derive(Serialize)]
    struct Doc<'a> {
        version: &'static str,
        metadata: MetaSer<'a>,
        nodes: Vec<NodeSer<'a>>,
    }

    let nodes = m
        .nodes
        .iter()
        .map(|n| {
            let is_root = n.parent_id.is_none();
            let style = n.style.as_ref();
            NodeSer {
                id: &n.id,
                parent_id: n.parent_id.as_deref(),
                text: &n.text,
                node_type: if is_root { "root" } else { "topic" },
                position: PositionSer { x: n.x, y: n.y },
                style: StyleSer {
                    color: style
                        .and_then(|s| s.color.clone())
                        .unwrap_or_else(|| "#000000".to_string()),
                    background_color: style
                        .and_then(|s| s.background_color.clone())
                        .unwrap_or_else(|| "#ffffff".to_string()),
                    font_size: 14,
                    font_weight: style.and_then(|s| s.font_weight.clone()).unwrap_or_else(
                        || if is_root { "bold" } else { "normal" }.to_string(),
                    ),
                    font_style: style
                        .and_then(|s| s.font_style.clone())
                        .unwrap_or_else(|| "normal".to_string()),
                    shape: style.and_then(|s| s.shape).unwrap_or(Shape::Rounded),
                },
                collapsed: n.is_collapsed,
            }
        })
        .collect();

    serde_json::to_value(Doc {
        version: "1",
        metadata: MetaSer {
            title,
            created,
            modified,
        },
        nodes,
    })
    .unwrap_or(Value::Null)
}

/// Import a versioned document, replacing the whole map. Validation runs
/// against scratch data first; live state is swapped only on success.
pub fn from_document_impl(m: &mut MindMap, text: &str) -> Result<(), DocError> {
    #[derive(Deserialize)]
    struct PositionDe {
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
    }
    #[derive(Deserialize)]
    struct StyleDe {
        color: Option<String>,
        #[serde(rename = "backgroundColor")]
        background_color: Option<String>,
        #[serde(rename = "fontWeight")]
        font_weight: Option<String>,
        #[serde(rename = "fontStyle")]
        font_style: Option<String>,
        shape: Option<Shape>,
    }
    #[derive(Deserialize)]
    struct NodeDe {
        id: NodeId,
        #[serde(rename = "parentId")]
        parent_id: Option<NodeId>,
        #[serde(default)]
        text: String,
        position: Option<PositionDe>,
        style: Option<StyleDe>,
        #[serde(default)]
        collapsed: bool,
    }
    #[derive(Deserialize)]
    struct Doc {
        version: String,
        nodes: Vec<NodeDe>,
    }

    let doc: Doc = serde_json::from_str(text)?;
    if doc.version.is_empty() {
        return Err(DocError::Invalid("missing version"));
    }
    if doc.nodes.is_empty() {
        return Err(DocError::Invalid("document has no nodes"));
    }

    let mut seen = std::collections::HashSet::new();
    let mut roots = 0usize;
    for n in &doc.nodes {
        if !seen.insert(n.id.as_str()) {
            return Err(DocError::Invalid("duplicate node id"));
        }
        if n.parent_id.is_none() {
            roots += 1;
        }
    }
    if roots != 1 {
        return Err(DocError::Invalid("document must have exactly one root"));
    }
    for n in &doc.nodes {
        if let Some(pid) = &n.parent_id {
            if !seen.contains(pid.as_str()) {
                return Err(DocError::Invalid("node references unknown parent"));
            }
        }
    }
    // Every parent chain must terminate at the root; a cycle among
    // non-root nodes would pass the checks above.
    let parent_of: std::collections::HashMap<&str, Option<&str>> = doc
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), n.parent_id.as_deref()))
        .collect();
    for n in &doc.nodes {
        let mut cur = n.parent_id.as_deref();
        let mut hops = 0usize;
        while let Some(pid) = cur {
            hops += 1;
            if hops > doc.nodes.len() {
                return Err(DocError::Invalid("document contains a parent cycle"));
            }
            cur = parent_of.get(pid).copied().flatten();
        }
    }

    let nodes: Vec<MindMapNode> = doc
        .nodes
        .into_iter()
        .map(|n| {
            let pos = n.position.unwrap_or(PositionDe { x: 0.0, y: 0.0 });
            let style = n.style.map(|s| NodeStyle {
                color: s.color,
                background_color: s.background_color,
                font_weight: s.font_weight,
                font_style: s.font_style,
                shape: s.shape,
            });
            MindMapNode {
                id: n.id,
                text: n.text,
                x: pos.x,
                y: pos.y,
                parent_id: n.parent_id,
                width: None,
                height: None,
                style,
                is_collapsed: n.collapsed,
            }
        })
        .collect();

    m.replace_all(nodes, EntryKind::Update);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_rejects_dangling_parent() {
        let mut m = MindMap::new();
        let doc = r#"{"version":"1","nodes":[
            {"id":"a","parentId":null,"text":"root","position":{"x":0,"y":0},"collapsed":false},
            {"id":"b","parentId":"ghost","text":"","position":{"x":1,"y":1},"collapsed":false}
        ]}"#;
        assert!(matches!(
            from_document_impl(&mut m, doc),
            Err(DocError::Invalid(_))
        ));
        assert_eq!(m.node_count(), 0);
    }

    #[test]
    fn test_document_rejects_parent_cycle() {
        let mut m = MindMap::new();
        let doc = r#"{"version":"1","nodes":[
            {"id":"root","parentId":null,"text":"r","position":{"x":0,"y":0},"collapsed":false},
            {"id":"a","parentId":"b","text":"","position":{"x":1,"y":1},"collapsed":false},
            {"id":"b","parentId":"a","text":"","position":{"x":2,"y":2},"collapsed":false}
        ]}"#;
        assert!(matches!(
            from_document_impl(&mut m, doc),
            Err(DocError::Invalid(_))
        ));
        assert_eq!(m.node_count(), 0);
    }

    #[test]
    fn test_document_rejects_self_parent() {
        let mut m = MindMap::new();
        let doc = r#"{"version":"1","nodes":[
            {"id":"root","parentId":null,"text":"r"},
            {"id":"a","parentId":"a","text":""}
        ]}"#;
        assert!(from_document_impl(&mut m, doc).is_err());
    }

    #[test]
    fn test_document_rejects_two_roots() {
        let mut m = MindMap::new();
        let doc = r#"{"version":"1","nodes":[
            {"id":"a","parentId":null,"text":"r1"},
            {"id":"b","parentId":null,"text":"r2"}
        ]}"#;
        assert!(from_document_impl(&mut m, doc).is_err());
    }

    #[test]
    fn test_document_malformed_json_is_typed() {
        let mut m = MindMap::new();
        assert!(matches!(
            from_document_impl(&mut m, "{nope"),
            Err(DocError::Json(_))
        ));
    }
}
