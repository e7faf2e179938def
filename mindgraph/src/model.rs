use serde::{Deserialize, Serialize};

/// Stable, opaque node identifier. Never reused within a session.
pub type NodeId = String;

/// Rendered size fallback used by every geometry consumer (connections,
/// bounding boxes, layout) when a node has no measured size yet.
pub const NODE_WIDTH: f32 = 100.0;
pub const NODE_HEIGHT: f32 = 40.0;

/// Distance past the parent extent for direction-hinted child placement.
pub const CHILD_OFFSET: f32 = 120.0;
/// Perpendicular jitter band for direction-hinted children (total width).
pub const CHILD_JITTER: f32 = 160.0;
/// Radius for undirected (8-compass) child placement.
pub const CHILD_RADIUS: f32 = 120.0;
/// Gap between stacked siblings along the orthogonal axis.
pub const SIBLING_GAP: f32 = 60.0;
/// Jitter band applied to both axes of a new sibling.
pub const SIBLING_JITTER: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Rect,
    Rounded,
    Pill,
    Diamond,
}

/// Optional visual attributes, independently mutable per node.
/// Fields are all optional so a partial style can be merged over an
/// existing one without clobbering unset attributes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Shape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NodeStyle {
    /// Overlay the set fields of `patch` onto `self`.
    pub fn merge(&mut self, patch: &NodeStyle) {
        if let Some(w) = &patch.font_weight {
            self.font_weight = Some(w.clone());
        }
        if let Some(s) = &patch.font_style {
            self.font_style = Some(s.clone());
        }
        if let Some(s) = patch.shape {
            self.shape = Some(s);
        }
        if let Some(b) = &patch.background_color {
            self.background_color = Some(b.clone());
        }
        if let Some(c) = &patch.color {
            self.color = Some(c.clone());
        }
    }
}

/// A single mind-map topic. `x`/`y` is the top-left corner on the canvas.
/// Exactly one node in a non-empty map has `parent_id == None` (the root).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindMapNode {
    pub id: NodeId,
    #[serde(default)]
    pub text: String,
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<NodeStyle>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_collapsed: bool,
}

impl MindMapNode {
    pub fn size(&self) -> (f32, f32) {
        (
            self.width.unwrap_or(NODE_WIDTH),
            self.height.unwrap_or(NODE_HEIGHT),
        )
    }

    pub fn center(&self) -> (f32, f32) {
        let (w, h) = self.size();
        (self.x + w * 0.5, self.y + h * 0.5)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
}

impl Direction {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}
